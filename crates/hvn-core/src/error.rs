//! Validation errors shared across the domain crates.

use thiserror::Error;

/// A value failed validation at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The amount string is not a strictly positive decimal number.
    #[error("invalid amount: '{0}' must be a positive decimal number")]
    InvalidAmount(String),

    /// The role string is not a recognized marketplace role.
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// The currency code is not in the accepted set.
    #[error("unknown currency: '{0}'")]
    UnknownCurrency(String),
}
