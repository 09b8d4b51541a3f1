//! Structured error hierarchy for the dispute subsystem.

use thiserror::Error;

use hvn_core::{DisputeId, EscrowId, PropertyId};

/// Errors from dispute workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisputeError {
    /// The reason string is not in the recognized set.
    #[error("invalid dispute reason: '{0}'")]
    InvalidReason(String),

    /// The status string is not in the recognized set.
    #[error("invalid dispute status: '{0}'")]
    InvalidStatus(String),

    /// Neither a property nor an escrow transaction anchors the filing.
    #[error("either a property or an escrow transaction reference is required")]
    MissingAnchor,

    /// The referenced dispute does not exist.
    #[error("dispute {0} not found")]
    DisputeNotFound(DisputeId),

    /// The referenced escrow transaction does not exist.
    #[error("escrow transaction {0} not found")]
    EscrowNotFound(EscrowId),

    /// The referenced property does not exist.
    #[error("property {0} not found")]
    PropertyNotFound(PropertyId),

    /// The filer is neither buyer nor seller on the escrow transaction.
    #[error("you are not a participant in this escrow transaction")]
    NotEscrowParty,

    /// The caller is neither an admin nor a dispute participant.
    #[error("not authorized to access this dispute")]
    NotParticipant,

    /// A property owner filed without naming who they are disputing with.
    #[error("owner-filed property disputes require a counterparty")]
    CounterpartyRequired,

    /// No respondent could be determined for the filing.
    #[error("unable to determine a respondent for this dispute")]
    RespondentUnresolved,

    /// A non-admin attempted a status transition.
    #[error("only an admin can update dispute status")]
    AdminOnly,
}
