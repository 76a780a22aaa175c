//! Dialect value object identifying a gateway wire format

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Supported USSD gateway dialects (Value Object)
///
/// Chosen once per configured endpoint and never changes for the sessions
/// run against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Arkesel,
    AfricasTalking,
    Hollatags,
}

impl Dialect {
    /// Every supported dialect, in display order
    pub const ALL: [Dialect; 3] = [Dialect::Arkesel, Dialect::AfricasTalking, Dialect::Hollatags];

    /// Get the identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Arkesel => "arkesel",
            Dialect::AfricasTalking => "africastalking",
            Dialect::Hollatags => "hollatags",
        }
    }

    /// Human-readable vendor name
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Arkesel => "Arkesel",
            Dialect::AfricasTalking => "Africa's Talking",
            Dialect::Hollatags => "Hollatags",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arkesel" => Ok(Dialect::Arkesel),
            "africastalking" | "africas_talking" | "africas-talking" => {
                Ok(Dialect::AfricasTalking)
            }
            "hollatags" => Ok(Dialect::Hollatags),
            _ => Err(DomainError::UnknownDialect(s.to_string())),
        }
    }
}

impl Serialize for Dialect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
