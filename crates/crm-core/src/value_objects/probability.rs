//! Probability - win likelihood of a deal as a whole percentage

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Deal win probability, an integer in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(u8);

impl Probability {
    /// Create a probability from a numeric input, rounding to the nearest
    /// integer first. Values outside `[0, 100]` after rounding are rejected.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidProbability(format!(
                "expected a number, got {value}"
            )));
        }
        let rounded = value.round();
        if !(0.0..=100.0).contains(&rounded) {
            return Err(DomainError::InvalidProbability(format!(
                "expected a value in [0, 100], got {value}"
            )));
        }
        Ok(Self(rounded as u8))
    }

    /// Create from an already-integral percentage
    pub fn from_int(value: i32) -> Result<Self, DomainError> {
        if !(0..=100).contains(&value) {
            return Err(DomainError::InvalidProbability(format!(
                "expected a value in [0, 100], got {value}"
            )));
        }
        Ok(Self(value as u8))
    }

    /// The percentage as an integer
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl std::str::FromStr for Probability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidProbability(format!("expected a number, got {s:?}")))?;
        Self::new(value)
    }
}
