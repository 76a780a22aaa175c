//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as the round-trip timeout for gateway callbacks.

use std::time::Duration;

/// Default upper bound on one turn's round trip.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application behavior configuration.
///
/// Controls runtime behavior of the dialer, like the timeout for each turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    /// Maximum time to wait for the gateway to reply to one turn.
    pub timeout: Duration,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TURN_TIMEOUT,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Duration::from_secs(seconds),
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, the default 30 second timeout applies.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        seconds.map(Self::with_timeout_seconds).unwrap_or_default()
    }
}
