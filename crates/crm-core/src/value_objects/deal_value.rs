//! DealValue - monetary value of a deal
//!
//! An immutable (amount, currency) pair constructed only through the
//! validating factory. Amounts are stored with two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Monetary value of a deal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealValue {
    amount: Decimal,
    currency: String,
}

impl DealValue {
    /// Upper bound for deal amounts: 999,999,999,999.99
    pub fn max_amount() -> Decimal {
        Decimal::new(99_999_999_999_999, 2)
    }

    /// Create a new DealValue
    ///
    /// The amount is rounded to two decimal places (round half up) and must
    /// fall in `[0, 999_999_999_999.99]`. The currency must be a 3-letter
    /// alphabetic code and is normalized to uppercase.
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::InvalidAmount(format!(
                "amount must not be negative, got {amount}"
            )));
        }
        if amount > Self::max_amount() {
            return Err(DomainError::InvalidAmount(format!(
                "amount exceeds maximum of {}, got {amount}",
                Self::max_amount()
            )));
        }

        let currency = currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(format!(
                "expected a 3-letter ISO code, got {currency:?}"
            )));
        }

        Ok(Self {
            amount: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            currency: currency.to_ascii_uppercase(),
        })
    }

    /// The amount, always at two decimal places
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The uppercase 3-letter currency code
    #[inline]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl std::fmt::Display for DealValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
