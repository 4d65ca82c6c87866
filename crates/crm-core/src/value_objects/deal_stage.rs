//! DealStage - position of a deal in the sales pipeline

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Pipeline stage of a deal
///
/// Open stages form the working pipeline; `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    /// Stage name as stored in the database and sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "LEAD",
            Self::Qualified => "QUALIFIED",
            Self::Proposal => "PROPOSAL",
            Self::Negotiation => "NEGOTIATION",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }

    /// Whether the deal can no longer move through the pipeline
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Whether the deal is still in play
    #[inline]
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEAD" => Ok(Self::Lead),
            "QUALIFIED" => Ok(Self::Qualified),
            "PROPOSAL" => Ok(Self::Proposal),
            "NEGOTIATION" => Ok(Self::Negotiation),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            _ => Err(DomainError::UnknownStage(s.to_string())),
        }
    }
}
