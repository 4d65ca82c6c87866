//! ClientStatus - lifecycle state of a client record

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Client lifecycle status
///
/// A won deal promotes the owning client to `ActiveClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    #[default]
    Lead,
    Prospect,
    ActiveClient,
    FormerClient,
}

impl ClientStatus {
    /// Status name as stored in the database and sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "LEAD",
            Self::Prospect => "PROSPECT",
            Self::ActiveClient => "ACTIVE_CLIENT",
            Self::FormerClient => "FORMER_CLIENT",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEAD" => Ok(Self::Lead),
            "PROSPECT" => Ok(Self::Prospect),
            "ACTIVE_CLIENT" => Ok(Self::ActiveClient),
            "FORMER_CLIENT" => Ok(Self::FormerClient),
            _ => Err(DomainError::Validation(format!(
                "unknown client status: {s}"
            ))),
        }
    }
}
