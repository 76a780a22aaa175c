//! CLI entrypoint for ussd-sim
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ussd_application::{
    BehaviorConfig, ConversationLogger, DialTurnUseCase, EndpointCatalog, NoConversationLogger,
};
use ussd_infrastructure::{
    ConfigLoader, FileConfig, HttpUssdTransport, JsonEndpointCatalog, JsonlConversationLogger,
};
use ussd_presentation::{Cli, Command, ConsoleFormatter, DialerRepl, EndpointsCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting ussd-sim");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        let config = load_config(&cli)?;
        println!();
        println!("{}", config.to_toml().context("Failed to render configuration")?);
        return Ok(());
    }

    let config = load_config(&cli)?;

    // === Dependency Injection ===
    let catalog = open_catalog(&config)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Endpoints(command) => run_endpoints(&catalog, command),
        Command::Dial { endpoint, code } => {
            let endpoint = catalog.find(&endpoint)?;
            info!("Dialing endpoint {} ({})", endpoint.name, endpoint.id);

            let behavior = match cli.timeout {
                Some(seconds) => BehaviorConfig::with_timeout_seconds(seconds),
                None => config.behavior_config(),
            };
            let transcript = cli.transcript.or(config.logging.transcript_path);

            let transport = Arc::new(HttpUssdTransport::new()?);
            let dialer = DialTurnUseCase::new(transport, endpoint)?
                .with_behavior(behavior)
                .with_logger(transcript_logger(transcript));

            DialerRepl::new(dialer)
                .with_service_code(code)
                .with_progress(!cli.quiet)
                .run()
                .await?;
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_catalog(config: &FileConfig) -> Result<JsonEndpointCatalog> {
    let path = match &config.catalog.path {
        Some(path) => path.clone(),
        None => match JsonEndpointCatalog::default_path() {
            Some(path) => path,
            None => bail!("Could not determine a data directory; set catalog.path in the config"),
        },
    };
    info!("Using endpoint catalog {}", path.display());
    Ok(JsonEndpointCatalog::new(path).with_static_endpoints(config.static_endpoints()?))
}

fn transcript_logger(path: Option<PathBuf>) -> Arc<dyn ConversationLogger> {
    let Some(path) = path else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::new(&path) {
        Some(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            warn!("Continuing without a transcript");
            Arc::new(NoConversationLogger)
        }
    }
}

fn run_endpoints(catalog: &JsonEndpointCatalog, command: EndpointsCommand) -> Result<()> {
    match command {
        EndpointsCommand::List => {
            println!("{}", ConsoleFormatter::endpoint_table(&catalog.list()?));
        }
        EndpointsCommand::Show { id } => {
            println!("{}", ConsoleFormatter::endpoint_detail(&catalog.find(&id)?));
        }
        EndpointsCommand::Add(args) => {
            let endpoint = catalog.add(args.into_new_endpoint())?;
            println!("Added endpoint {}", endpoint.name);
            println!("{}", ConsoleFormatter::endpoint_detail(&endpoint));
        }
        EndpointsCommand::Update(args) => {
            let update = args.to_update();
            if update.is_empty() {
                bail!("Nothing to update. Pass at least one of --name, --url, --dialect, --phone");
            }
            let existing = catalog.find(&args.id)?;
            let endpoint = catalog.update(existing.id.as_str(), update)?;
            println!("Updated endpoint {}", endpoint.name);
            println!("{}", ConsoleFormatter::endpoint_detail(&endpoint));
        }
        EndpointsCommand::Remove { id } => {
            let existing = catalog.find(&id)?;
            let removed = catalog.remove(existing.id.as_str())?;
            println!("Removed endpoint {} ({})", removed.name, removed.id);
        }
    }
    Ok(())
}
