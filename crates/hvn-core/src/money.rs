//! # Monetary Amounts
//!
//! Amounts are stored as decimal strings to preserve arbitrary precision
//! across serialization boundaries. Purchase amounts must be strictly
//! positive; zero- and negative-amount transactions are rejected at
//! construction.
//!
//! # Security Invariant
//!
//! Financial amounts must never be represented as floating-point numbers.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Currencies accepted for escrow transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Nigerian naira. The platform default.
    #[default]
    #[serde(rename = "NGN")]
    Ngn,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
    /// Pound sterling.
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// All accepted currencies.
    pub fn all() -> &'static [Currency] {
        &[Self::Ngn, Self::Usd, Self::Eur, Self::Gbp]
    }

    /// The ISO 4217 code for this currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            other => Err(ValidationError::UnknownCurrency(other.to_string())),
        }
    }
}

/// A strictly positive monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount as a decimal string (e.g., "5000000", "250000.50").
    pub amount: String,
    /// Currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Create a new monetary amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] if the amount string is
    /// empty, contains non-numeric characters, or is not strictly positive.
    pub fn new(amount: impl Into<String>, currency: Currency) -> Result<Self, ValidationError> {
        let amount = amount.into();
        if !is_valid_decimal(&amount) || !is_positive(&amount) {
            return Err(ValidationError::InvalidAmount(amount));
        }
        Ok(Self { amount, currency })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Validate that a string is an unsigned decimal number.
fn is_valid_decimal(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut has_dot = false;
    let mut has_digit = false;
    for c in s.chars() {
        if c == '.' {
            if has_dot {
                return false;
            }
            has_dot = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else {
            return false;
        }
    }
    has_digit
}

/// Whether a validated decimal string is strictly greater than zero.
fn is_positive(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit() && c != '0')
}
