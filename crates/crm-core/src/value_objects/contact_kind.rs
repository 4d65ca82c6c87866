//! ContactKind - classification of a logged client interaction

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Kind of client interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactKind {
    Call,
    Meeting,
    Email,
    Other,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Meeting => "MEETING",
            Self::Email => "EMAIL",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CALL" => Ok(Self::Call),
            "MEETING" => Ok(Self::Meeting),
            "EMAIL" => Ok(Self::Email),
            "OTHER" => Ok(Self::Other),
            _ => Err(DomainError::Validation(format!(
                "unknown contact kind: {s}"
            ))),
        }
    }
}
