//! Interactive dialer

pub mod repl;

pub use repl::{DialerRepl, ReplInput};
