//! Configuration file loading for ussd-sim
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `USSD_SIM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./ussd-sim.toml` or `./.ussd-sim.toml`
//! 4. Global: `$XDG_CONFIG_HOME/ussd-sim/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    CONFIG_ENDPOINT_PREFIX, ConfigValidationError, FileBehaviorConfig, FileCatalogConfig,
    FileConfig, FileEndpointConfig, FileLoggingConfig,
};
pub use loader::{APP_DIR, ConfigLoader};
