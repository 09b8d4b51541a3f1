//! # Dispute Records
//!
//! A [`Dispute`] is a persisted disagreement between two parties, anchored
//! to a property listing or to an escrow transaction. Records are created
//! on filing, mutated only by message-append and admin status transitions,
//! and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hvn_core::{ActorSnapshot, DisputeId, EscrowId, PropertyId, UserId};
use hvn_notify::Priority;

use crate::error::DisputeError;
use crate::timeline::TimelineEntry;

/// Why a dispute was filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeReason {
    /// The property's physical condition does not match the listing.
    PropertyCondition,
    /// Ownership or title documentation problems.
    TitleIssues,
    /// The seller failed to meet agreed obligations.
    SellerNonCompliance,
    /// The buyer failed to meet agreed obligations.
    BuyerNonCompliance,
    /// Funding, transfer, or refund problems.
    PaymentIssues,
    /// Anything else.
    Other,
}

impl DisputeReason {
    /// All recognized reasons.
    pub fn all() -> &'static [DisputeReason] {
        &[
            Self::PropertyCondition,
            Self::TitleIssues,
            Self::SellerNonCompliance,
            Self::BuyerNonCompliance,
            Self::PaymentIssues,
            Self::Other,
        ]
    }

    /// The canonical wire string for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyCondition => "property_condition",
            Self::TitleIssues => "title_issues",
            Self::SellerNonCompliance => "seller_non_compliance",
            Self::BuyerNonCompliance => "buyer_non_compliance",
            Self::PaymentIssues => "payment_issues",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DisputeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DisputeReason {
    type Err = DisputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property_condition" => Ok(Self::PropertyCondition),
            "title_issues" => Ok(Self::TitleIssues),
            "seller_non_compliance" => Ok(Self::SellerNonCompliance),
            "buyer_non_compliance" => Ok(Self::BuyerNonCompliance),
            "payment_issues" => Ok(Self::PaymentIssues),
            "other" => Ok(Self::Other),
            other => Err(DisputeError::InvalidReason(other.to_string())),
        }
    }
}

/// The lifecycle status of a dispute.
///
/// Every stored dispute starts at `Open`. Only admins move a dispute
/// between statuses, and they may set any member of the set — ordering is
/// an arbitration-process concern, not a record-level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    /// Newly filed.
    Open,
    /// Waiting on the respondent.
    AwaitingResponse,
    /// An admin is reviewing the case.
    UnderReview,
    /// An admin recorded a decision.
    Resolved,
    /// Proceedings concluded.
    Closed,
}

impl DisputeStatus {
    /// All statuses, in flow order.
    pub fn all() -> &'static [DisputeStatus] {
        &[
            Self::Open,
            Self::AwaitingResponse,
            Self::UnderReview,
            Self::Resolved,
            Self::Closed,
        ]
    }

    /// The canonical wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::AwaitingResponse => "awaiting_response",
            Self::UnderReview => "under_review",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DisputeStatus {
    type Err = DisputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "awaiting_response" => Ok(Self::AwaitingResponse),
            "under_review" => Ok(Self::UnderReview),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(DisputeError::InvalidStatus(other.to_string())),
        }
    }
}

/// A disagreement between two marketplace parties.
///
/// Exactly one anchor drives participant resolution at filing time —
/// either the property or the escrow transaction — though escrow-anchored
/// disputes backfill `property_id` from the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    /// Unique dispute identifier.
    pub id: DisputeId,
    /// The property the disagreement concerns.
    pub property_id: Option<PropertyId>,
    /// Listing title at filing time, for display without a catalog lookup.
    pub property_title: Option<String>,
    /// The escrow transaction the disagreement concerns, when in-progress.
    pub escrow_id: Option<EscrowId>,
    /// Why the dispute was filed.
    pub reason: DisputeReason,
    /// The raiser's account of the problem.
    pub description: String,
    /// Supporting document URIs, in upload order.
    pub attachments: Vec<String>,
    /// Current lifecycle status.
    pub status: DisputeStatus,
    /// Arbitration priority.
    pub priority: Priority,
    /// Who filed the dispute.
    pub raised_by: ActorSnapshot,
    /// The counterparty the dispute is filed against.
    pub respondent: ActorSnapshot,
    /// Users with read and comment access. Fixed at filing: the raiser
    /// first, then the counterparty side(s).
    pub participants: Vec<UserId>,
    /// Append-only event log.
    pub timeline: Vec<TimelineEntry>,
    /// Terminal decision label, set by admin resolution.
    pub resolution: Option<String>,
    /// Admin notes accompanying the decision.
    pub resolution_notes: Option<String>,
    /// When the dispute was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Which admin resolved it.
    pub resolved_by: Option<UserId>,
    /// When the record was created (UTC).
    pub created_at: DateTime<Utc>,
    /// When the record was last updated (UTC). Never moves backwards.
    pub updated_at: DateTime<Utc>,
}

impl Dispute {
    /// Whether the user may read and comment on this dispute.
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// The first participant other than the given user, falling back to the
    /// first participant when everyone matches.
    pub fn first_other_participant(&self, user: &UserId) -> Option<UserId> {
        self.participants
            .iter()
            .find(|id| *id != user)
            .or_else(|| self.participants.first())
            .copied()
    }

    /// Append an entry to the timeline.
    pub(crate) fn append(&mut self, entry: TimelineEntry) {
        self.timeline.push(entry);
    }

    /// Bump the update timestamp. Monotonic: a clock step backwards never
    /// regresses the recorded instant.
    pub(crate) fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}
