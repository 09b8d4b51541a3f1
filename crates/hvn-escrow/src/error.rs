//! Structured error hierarchy for the escrow subsystem.
//!
//! Every variant maps onto one of the request layer's failure categories:
//! not-found, forbidden, invalid-request, conflict, or invalid-state. The
//! mapping lives in the HTTP crate; this taxonomy stays transport-agnostic.

use thiserror::Error;

use hvn_core::{EscrowId, PropertyId};

use crate::property::PropertyStatus;
use crate::transaction::EscrowStatus;

/// Errors from escrow transaction operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EscrowError {
    /// The referenced property does not exist.
    #[error("property {0} not found")]
    PropertyNotFound(PropertyId),

    /// The referenced escrow transaction does not exist.
    #[error("escrow transaction {0} not found")]
    TransactionNotFound(EscrowId),

    /// The property has no registered owner to act as seller.
    #[error("property {0} has no registered owner")]
    MissingOwner(PropertyId),

    /// The buyer is the property's registered owner.
    #[error("cannot open an escrow transaction for your own property")]
    SelfPurchase,

    /// The property is not in a purchasable status.
    #[error("property {id} is not available for purchase (status: {status})")]
    PropertyUnavailable {
        id: PropertyId,
        status: PropertyStatus,
    },

    /// An outstanding transaction already holds the property.
    #[error("an outstanding escrow transaction already exists for property {0}")]
    DuplicateTransaction(PropertyId),

    /// The requested status is not a valid caller-driven update target.
    #[error("'{0}' is not a valid status update target")]
    UnsupportedStatusTarget(EscrowStatus),

    /// Arbitration was requested on a transaction that is not disputed.
    #[error("escrow transaction {0} is not in disputed status")]
    NotDisputed(EscrowId),

    /// A non-admin attempted an admin-only operation.
    #[error("only an admin can resolve a disputed escrow transaction")]
    AdminOnly,

    /// A string did not parse as an escrow status.
    #[error("unknown escrow status: '{0}'")]
    UnknownStatus(String),

    /// A string did not parse as a payment method.
    #[error("unknown payment method: '{0}'")]
    UnknownPaymentMethod(String),

    /// A string did not parse as a resolution outcome.
    #[error("unknown resolution outcome: '{0}'")]
    UnknownResolution(String),

    /// A string did not parse as a listing role filter.
    #[error("unknown transaction filter: '{0}'")]
    UnknownRoleFilter(String),
}
