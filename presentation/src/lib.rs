//! Presentation layer for ussd-sim
//!
//! This crate contains CLI definitions, console formatting,
//! the turn spinner, and the interactive dialer.

pub mod cli;
pub mod dialer;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{AddEndpointArgs, Cli, Command, EndpointsCommand, UpdateEndpointArgs};
pub use dialer::{DialerRepl, ReplInput};
pub use output::console::ConsoleFormatter;
pub use progress::spinner::TurnSpinner;
