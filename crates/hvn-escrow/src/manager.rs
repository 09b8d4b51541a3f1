// SPDX-License-Identifier: BUSL-1.1
//! # Escrow Transaction Manager
//!
//! Entry point for all escrow mutations. The manager owns the creation
//! invariants (seller derived from the property owner, no self-purchase,
//! one outstanding transaction per property) and the visibility rules for
//! listing; the store and collaborators are injected at construction so
//! tests run against in-memory fakes.
//!
//! Notifications are a side effect, never a dependency: a failed hand-off
//! to the gateway is logged and swallowed, and the triggering operation
//! still succeeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use hvn_core::{Actor, EscrowId, Money, PropertyId, UserId};
use hvn_notify::{NotificationGateway, NotificationKind, NotificationRequest};

use crate::error::EscrowError;
use crate::property::PropertyDirectory;
use crate::store::{EscrowStore, Page, TransactionQuery, Visibility};
use crate::transaction::{
    EscrowStatus, EscrowTransaction, PaymentMethod, Resolution, ResolutionOutcome,
};

/// Role-relative filter for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFilter {
    /// Transactions where the caller is the buyer.
    Buyer,
    /// Transactions where the caller is the seller.
    Seller,
    /// The full collection. Honored only for admin callers.
    Admin,
}

impl std::str::FromStr for RoleFilter {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            other => Err(EscrowError::UnknownRoleFilter(other.to_string())),
        }
    }
}

/// Inputs for opening a new escrow transaction.
///
/// There is no seller field: the seller is always resolved from the
/// property's registered owner.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    /// The property being purchased.
    pub property_id: PropertyId,
    /// Purchase amount. Already validated strictly positive by [`Money`].
    pub amount: Money,
    /// Payment rail funding the escrow.
    pub payment_method: PaymentMethod,
    /// Target completion instant, stored as data only.
    pub expected_completion: Option<DateTime<Utc>>,
    /// The authenticated buyer.
    pub buyer: Actor,
}

/// Manages the escrow transaction lifecycle.
pub struct EscrowManager {
    store: Arc<dyn EscrowStore>,
    properties: Arc<dyn PropertyDirectory>,
    notifier: Arc<dyn NotificationGateway>,
}

impl EscrowManager {
    /// Build a manager over the given store and collaborators.
    pub fn new(
        store: Arc<dyn EscrowStore>,
        properties: Arc<dyn PropertyDirectory>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            store,
            properties,
            notifier,
        }
    }

    /// Open a new escrow transaction for a property purchase.
    ///
    /// Resolves the property, derives the seller from its registered owner,
    /// rejects self-purchases and unavailable properties, and enforces that
    /// no outstanding transaction already holds the property. On success the
    /// seller is notified best-effort.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::PropertyNotFound`] — unknown property.
    /// - [`EscrowError::MissingOwner`] — property has no registered owner.
    /// - [`EscrowError::SelfPurchase`] — buyer owns the property.
    /// - [`EscrowError::PropertyUnavailable`] — property not purchasable.
    /// - [`EscrowError::DuplicateTransaction`] — property already held.
    pub fn create_transaction(
        &self,
        request: CreateTransaction,
    ) -> Result<EscrowTransaction, EscrowError> {
        let property = self
            .properties
            .property_by_id(&request.property_id)
            .ok_or(EscrowError::PropertyNotFound(request.property_id))?;

        let seller_id = property
            .owner_id
            .ok_or(EscrowError::MissingOwner(property.id))?;
        if seller_id == request.buyer.id {
            return Err(EscrowError::SelfPurchase);
        }
        if !property.status.is_purchasable() {
            return Err(EscrowError::PropertyUnavailable {
                id: property.id,
                status: property.status,
            });
        }

        let tx = self.store.insert_new(EscrowTransaction::open(
            property.id,
            request.buyer.id,
            seller_id,
            request.amount,
            request.payment_method,
            request.expected_completion,
        ))?;

        self.notify(
            NotificationRequest::new(
                seller_id,
                NotificationKind::EscrowPaymentReceived,
                "Escrow created",
                format!(
                    "An escrow transaction was created for property {}",
                    property.title
                ),
            )
            .from_sender(request.buyer.id)
            .with_data(serde_json::json!({ "escrowId": tx.id })),
        );

        Ok(tx)
    }

    /// List transactions visible to the caller, newest first.
    ///
    /// Non-admin callers only ever see transactions where they are buyer or
    /// seller, whatever filter they request. The `buyer`/`seller` filters
    /// narrow to one side of the caller's own transactions; the `admin`
    /// filter (and no filter at all) widens to the full collection for
    /// admin callers only.
    pub fn list_transactions(
        &self,
        user: &Actor,
        status: Option<EscrowStatus>,
        filter: Option<RoleFilter>,
        page: usize,
        limit: usize,
    ) -> Page<EscrowTransaction> {
        let visibility = match (filter, user.is_admin()) {
            (Some(RoleFilter::Buyer), _) => Visibility::AsBuyer(user.id),
            (Some(RoleFilter::Seller), _) => Visibility::AsSeller(user.id),
            (Some(RoleFilter::Admin), true) | (None, true) => Visibility::All,
            _ => Visibility::Party(user.id),
        };
        self.store.query(&TransactionQuery {
            status,
            visibility,
            page,
            limit,
        })
    }

    /// Fetch a transaction by id.
    ///
    /// No authorization happens here; the request boundary decides who may
    /// see the record.
    pub fn transaction_by_id(&self, id: &EscrowId) -> Option<EscrowTransaction> {
        self.store.get(id)
    }

    /// Apply a caller-driven status update and notify both parties.
    ///
    /// Accepts `pending`, `active`, `completed`, `cancelled`, and
    /// `disputed` — permissively, with no transition graph: ordering
    /// between them is the calling workflow's concern. `initiated` and
    /// `refunded` are not reachable through this method (`refunded` only
    /// through [`EscrowManager::resolve_dispute`]).
    ///
    /// # Errors
    ///
    /// - [`EscrowError::UnsupportedStatusTarget`] — target not updatable.
    /// - [`EscrowError::TransactionNotFound`] — unknown transaction.
    pub fn update_status(
        &self,
        id: &EscrowId,
        status: EscrowStatus,
        user: &Actor,
        notes: Option<String>,
    ) -> Result<EscrowTransaction, EscrowError> {
        if matches!(status, EscrowStatus::Initiated | EscrowStatus::Refunded) {
            return Err(EscrowError::UnsupportedStatusTarget(status));
        }

        let updated = self
            .store
            .apply(id, &mut |tx| tx.status = status)
            .ok_or(EscrowError::TransactionNotFound(*id))?;

        for recipient in [updated.buyer_id, updated.seller_id] {
            self.notify(
                NotificationRequest::new(
                    recipient,
                    NotificationKind::EscrowStatusChanged,
                    format!("Escrow {status}"),
                    format!("Escrow {} status changed to {status}", updated.id),
                )
                .from_sender(user.id)
                .with_data(serde_json::json!({
                    "escrowId": updated.id,
                    "status": status,
                    "notes": notes,
                })),
            );
        }

        Ok(updated)
    }

    /// Arbitrate a disputed transaction. Admin only.
    ///
    /// A full refund settles the transaction to `refunded`; every other
    /// outcome concludes the purchase as `completed` and stamps the actual
    /// completion instant. The decision is recorded on the transaction and
    /// both parties are notified. Resolving the dispute record itself is a
    /// separate authority — this method never touches it.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::TransactionNotFound`] — unknown transaction.
    /// - [`EscrowError::NotDisputed`] — transaction is not disputed.
    /// - [`EscrowError::AdminOnly`] — caller is not an admin.
    pub fn resolve_dispute(
        &self,
        id: &EscrowId,
        outcome: ResolutionOutcome,
        admin_notes: Option<String>,
        user: &Actor,
    ) -> Result<EscrowTransaction, EscrowError> {
        let tx = self
            .store
            .get(id)
            .ok_or(EscrowError::TransactionNotFound(*id))?;
        if tx.status != EscrowStatus::Disputed {
            return Err(EscrowError::NotDisputed(*id));
        }
        if !user.is_admin() {
            return Err(EscrowError::AdminOnly);
        }

        let settled = outcome.settles_to();
        let resolver = user.id;
        let notes = admin_notes.clone();
        let updated = self
            .store
            .apply(id, &mut |tx| {
                tx.status = settled;
                tx.resolution = Some(Resolution {
                    outcome,
                    admin_notes: notes.clone(),
                    resolved_by: resolver,
                    resolved_at: Utc::now(),
                });
                if settled == EscrowStatus::Completed {
                    tx.actual_completion = Some(Utc::now());
                }
            })
            .ok_or(EscrowError::TransactionNotFound(*id))?;

        for recipient in [updated.buyer_id, updated.seller_id] {
            self.notify(
                NotificationRequest::new(
                    recipient,
                    NotificationKind::EscrowStatusChanged,
                    "Escrow dispute resolved",
                    format!("Dispute resolved: {outcome}"),
                )
                .from_sender(user.id)
                .with_data(serde_json::json!({
                    "escrowId": updated.id,
                    "resolution": outcome,
                    "status": settled,
                })),
            );
        }

        Ok(updated)
    }

    /// Hand a notification to the gateway, logging hand-off failures.
    fn notify(&self, request: NotificationRequest) {
        let recipient: UserId = request.recipient;
        if let Err(err) = self.notifier.dispatch(request) {
            tracing::warn!(%recipient, error = %err, "failed to enqueue escrow notification");
        }
    }
}
