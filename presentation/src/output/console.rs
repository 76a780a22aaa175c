//! Console output formatter for dialer screens and endpoint listings

use colored::Colorize;
use ussd_domain::{Endpoint, SessionSnapshot};

const MIN_BOX_WIDTH: usize = 32;

/// Formats dialogue messages and catalog entries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Frame a gateway message the way a handset pops it up
    pub fn message_box(message: &str, session_ended: bool) -> String {
        let lines: Vec<&str> = if message.is_empty() {
            vec![""]
        } else {
            message.lines().collect()
        };
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_BOX_WIDTH);

        let mut output = String::new();
        let title = if session_ended { " USSD · ended " } else { " USSD " };
        let rule = "─".repeat(width + 2 - title.chars().count());
        output.push_str(&format!("{}{}{}\n", "╭".cyan(), title.bold(), format!("{}╮", rule).cyan()));
        for line in &lines {
            let pad = width - line.chars().count();
            output.push_str(&format!(
                "{} {}{} {}\n",
                "│".cyan(),
                line,
                " ".repeat(pad),
                "│".cyan()
            ));
        }
        output.push_str(&format!("{}", format!("╰{}╯", "─".repeat(width + 2)).cyan()));
        output
    }

    /// One-line rendering of a failed turn
    pub fn turn_error(error: &str) -> String {
        format!(
            "{} {}\n{}",
            "x".red().bold(),
            error.red(),
            "  Send again to retry, or /cancel to hang up.".dimmed()
        )
    }

    /// Banner shown when a dialer attaches to an endpoint
    pub fn dial_header(endpoint: &Endpoint) -> String {
        format!(
            "{} {} {}\n{} {}\n{} {}",
            "Endpoint:".cyan().bold(),
            endpoint.name,
            format!("({})", endpoint.dialect.display_name()).dimmed(),
            "Callback:".cyan().bold(),
            endpoint.callback_url,
            "Phone:   ".cyan().bold(),
            endpoint.phone_number
        )
    }

    /// Inputs sent so far in the current dialogue
    pub fn history(snapshot: &SessionSnapshot) -> String {
        let Some(session_id) = &snapshot.session_id else {
            return "No active session".dimmed().to_string();
        };

        let mut output = format!(
            "{} {}  {} {}\n",
            "Session:".cyan().bold(),
            session_id,
            "Code:".cyan().bold(),
            snapshot.service_code
        );
        if snapshot.history.is_empty() {
            output.push_str(&format!("  {}", "(no input yet)".dimmed()));
        } else {
            let trail = snapshot
                .history
                .iter()
                .enumerate()
                .map(|(i, token)| format!("  {}. {}", i + 1, token))
                .collect::<Vec<_>>()
                .join("\n");
            output.push_str(&trail);
            output.push_str(&format!(
                "\n  {} {}",
                "text:".dimmed(),
                snapshot.history.join("*")
            ));
        }
        output
    }

    /// Table of endpoints, one per line
    pub fn endpoint_table(endpoints: &[Endpoint]) -> String {
        if endpoints.is_empty() {
            return format!(
                "{}\n{}",
                "No endpoints configured.".yellow(),
                "Add one with: ussd-sim endpoints add --name <NAME> --url <URL> --dialect <DIALECT> --phone <MSISDN>".dimmed()
            );
        }

        let name_width = endpoints
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        let mut output = format!(
            "{}\n",
            format!(
                "{:<name_width$}  {:<16}  {:<14}  {}",
                "NAME", "DIALECT", "PHONE", "CALLBACK"
            )
            .bold()
        );
        for endpoint in endpoints {
            output.push_str(&format!(
                "{:<name_width$}  {:<16}  {:<14}  {}\n",
                endpoint.name,
                endpoint.dialect.as_str(),
                endpoint.phone_number,
                endpoint.callback_url
            ));
        }
        output.push_str(&format!("{}", format!("{} endpoint(s)", endpoints.len()).dimmed()));
        output
    }

    /// Every field of one endpoint
    pub fn endpoint_detail(endpoint: &Endpoint) -> String {
        let fields = [
            ("Id", endpoint.id.to_string()),
            ("Name", endpoint.name.clone()),
            ("Dialect", endpoint.dialect.display_name().to_string()),
            ("Phone", endpoint.phone_number.clone()),
            ("Callback", endpoint.callback_url.clone()),
            ("Created", endpoint.created_at.to_string()),
        ];
        fields
            .iter()
            .map(|(label, value)| format!("{} {}", format!("{:<9}", format!("{}:", label)).cyan().bold(), value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Endpoint as pretty JSON
    pub fn endpoint_json(endpoint: &Endpoint) -> String {
        serde_json::to_string_pretty(endpoint).unwrap_or_else(|_| "{}".to_string())
    }
}
