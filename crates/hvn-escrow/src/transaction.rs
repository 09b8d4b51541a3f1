//! # Escrow Transaction Records
//!
//! An [`EscrowTransaction`] tracks one property purchase from initiation to
//! a final state. Records are never deleted; terminal statuses are final
//! facts, not tombstones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hvn_core::{EscrowId, Money, PropertyId, UserId};

use crate::error::EscrowError;

/// The lifecycle status of an escrow transaction.
///
/// `Initiated` exists only transiently before the record is persisted;
/// every stored transaction starts at `Pending`. There is deliberately no
/// transition graph at this level: which status may follow which is a
/// business-process concern owned by the caller, not the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    /// Conceptual pre-persistence state.
    Initiated,
    /// Persisted, awaiting funding or counterparty action.
    Pending,
    /// Funds held, purchase in progress.
    Active,
    /// Purchase concluded. Releases the property.
    Completed,
    /// Purchase abandoned. Releases the property.
    Cancelled,
    /// A dispute has been raised against the transaction.
    Disputed,
    /// Funds returned to the buyer after arbitration.
    Refunded,
}

impl EscrowStatus {
    /// All statuses.
    pub fn all() -> &'static [EscrowStatus] {
        &[
            Self::Initiated,
            Self::Pending,
            Self::Active,
            Self::Completed,
            Self::Cancelled,
            Self::Disputed,
            Self::Refunded,
        ]
    }

    /// The canonical wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
            Self::Refunded => "refunded",
        }
    }

    /// Whether a transaction in this status releases its property for a new
    /// escrow. Only `completed` and `cancelled` do — a disputed or refunded
    /// transaction keeps the property locked until an operator settles it.
    pub fn releases_property(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EscrowStatus {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiated" => Ok(Self::Initiated),
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "disputed" => Ok(Self::Disputed),
            "refunded" => Ok(Self::Refunded),
            other => Err(EscrowError::UnknownStatus(other.to_string())),
        }
    }
}

/// Payment rails accepted for escrow funding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Flutterwave,
    Paystack,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    /// All accepted payment methods.
    pub fn all() -> &'static [PaymentMethod] {
        &[
            Self::Flutterwave,
            Self::Paystack,
            Self::BankTransfer,
            Self::Cash,
        ]
    }

    /// The canonical wire string for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flutterwave => "flutterwave",
            Self::Paystack => "paystack",
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flutterwave" => Ok(Self::Flutterwave),
            "paystack" => Ok(Self::Paystack),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cash" => Ok(Self::Cash),
            other => Err(EscrowError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Arbitration outcome for a disputed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    BuyerFavor,
    SellerFavor,
    PartialRefund,
    FullRefund,
}

impl ResolutionOutcome {
    /// All recognized outcomes.
    pub fn all() -> &'static [ResolutionOutcome] {
        &[
            Self::BuyerFavor,
            Self::SellerFavor,
            Self::PartialRefund,
            Self::FullRefund,
        ]
    }

    /// The canonical wire string for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuyerFavor => "buyer_favor",
            Self::SellerFavor => "seller_favor",
            Self::PartialRefund => "partial_refund",
            Self::FullRefund => "full_refund",
        }
    }

    /// The status a disputed transaction settles to under this outcome.
    /// Only a full refund returns funds; every other outcome concludes the
    /// purchase.
    pub fn settles_to(&self) -> EscrowStatus {
        match self {
            Self::FullRefund => EscrowStatus::Refunded,
            _ => EscrowStatus::Completed,
        }
    }
}

impl std::fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResolutionOutcome {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer_favor" => Ok(Self::BuyerFavor),
            "seller_favor" => Ok(Self::SellerFavor),
            "partial_refund" => Ok(Self::PartialRefund),
            "full_refund" => Ok(Self::FullRefund),
            other => Err(EscrowError::UnknownResolution(other.to_string())),
        }
    }
}

/// The recorded arbitration decision on a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The outcome the arbitrating admin chose.
    pub outcome: ResolutionOutcome,
    /// Free-form notes from the arbitrating admin.
    pub admin_notes: Option<String>,
    /// Which admin resolved the dispute.
    pub resolved_by: UserId,
    /// When the resolution was recorded (UTC).
    pub resolved_at: DateTime<Utc>,
}

/// A purchase-in-progress between a buyer and a seller for one property.
///
/// The seller is always derived from the property's registered owner at
/// creation time — callers never supply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowTransaction {
    /// Unique transaction identifier.
    pub id: EscrowId,
    /// The property being purchased.
    pub property_id: PropertyId,
    /// The purchasing party.
    pub buyer_id: UserId,
    /// The property's registered owner at creation time.
    pub seller_id: UserId,
    /// Purchase amount.
    pub amount: Money,
    /// Payment rail funding the escrow.
    pub payment_method: PaymentMethod,
    /// Current lifecycle status.
    pub status: EscrowStatus,
    /// Target completion instant. Stored as data only; nothing enforces it.
    pub expected_completion: Option<DateTime<Utc>>,
    /// When the purchase actually concluded.
    pub actual_completion: Option<DateTime<Utc>>,
    /// Arbitration decision, once an admin has resolved a dispute.
    pub resolution: Option<Resolution>,
    /// When the record was created (UTC).
    pub created_at: DateTime<Utc>,
    /// When the record was last updated (UTC). Never moves backwards.
    pub updated_at: DateTime<Utc>,
}

impl EscrowTransaction {
    /// Open a new transaction in `Pending` status.
    pub fn open(
        property_id: PropertyId,
        buyer_id: UserId,
        seller_id: UserId,
        amount: Money,
        payment_method: PaymentMethod,
        expected_completion: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EscrowId::new(),
            property_id,
            buyer_id,
            seller_id,
            amount,
            payment_method,
            status: EscrowStatus::Pending,
            expected_completion,
            actual_completion: None,
            resolution: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user is the buyer or the seller.
    pub fn is_party(&self, user: &UserId) -> bool {
        self.buyer_id == *user || self.seller_id == *user
    }

    /// The counterparty of the given party, if the user is a party at all.
    pub fn counterparty_of(&self, user: &UserId) -> Option<UserId> {
        if self.buyer_id == *user {
            Some(self.seller_id)
        } else if self.seller_id == *user {
            Some(self.buyer_id)
        } else {
            None
        }
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
