//! Service code value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A USSD short code such as `*123#` (Value Object)
///
/// Only the dial pad alphabet is accepted: digits, `*` and `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceCode {
    code: String,
}

impl ServiceCode {
    /// Parse and validate a service code, trimming surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(DomainError::InvalidServiceCode(
                "service code cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = code
            .chars()
            .find(|c| !(c.is_ascii_digit() || *c == '*' || *c == '#'))
        {
            return Err(DomainError::InvalidServiceCode(format!(
                "unexpected character '{}' in {}",
                bad, code
            )));
        }
        Ok(Self {
            code: code.to_string(),
        })
    }

    /// Get the code as dialed
    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for ServiceCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServiceCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceCode> for String {
    fn from(code: ServiceCode) -> Self {
        code.code
    }
}
