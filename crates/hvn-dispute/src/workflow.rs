// SPDX-License-Identifier: BUSL-1.1
//! # Dispute Resolution Workflow
//!
//! Filing, messaging, and admin arbitration over dispute records. The
//! workflow owns participant eligibility:
//!
//! - **Escrow-anchored filings** must come from the buyer or seller on the
//!   transaction; the respondent is the other party and both parties become
//!   participants.
//! - **Property-anchored filings** default the respondent to the property
//!   owner; an owner filing against their own listing must name a
//!   counterparty explicitly.
//!
//! Status transitions are admin-only and fan a notification out to every
//! participant. Appending a message notifies exactly one counterparty — the
//! first participant that is not the author. The asymmetry is inherited
//! behavior, kept as-is.

use std::sync::Arc;

use chrono::Utc;

use hvn_core::{Actor, ActorSnapshot, DisputeId, EscrowId, PropertyId, UserId};
use hvn_escrow::{EscrowStore, PropertyDirectory};
use hvn_notify::{NotificationGateway, NotificationKind, NotificationRequest, Priority};

use crate::dispute::{Dispute, DisputeReason, DisputeStatus};
use crate::error::DisputeError;
use crate::store::{DisputeFilter, DisputeStore};
use crate::timeline::{TimelineEntry, TimelineEntryKind};

/// Inputs for filing a dispute.
#[derive(Debug, Clone)]
pub struct CreateDispute {
    /// The authenticated filer.
    pub user: Actor,
    /// Property anchor. Required when no escrow anchor is given.
    pub property_id: Option<PropertyId>,
    /// Escrow anchor. Takes precedence for participant resolution.
    pub escrow_id: Option<EscrowId>,
    /// Who an owner-filer is disputing with. Ignored on other paths.
    pub counterparty_id: Option<UserId>,
    /// Why the dispute is being filed.
    pub reason: DisputeReason,
    /// The filer's account of the problem.
    pub description: String,
    /// Supporting document URIs.
    pub attachments: Vec<String>,
}

/// Inputs for appending a message to a dispute's timeline.
#[derive(Debug, Clone)]
pub struct AddMessage {
    pub dispute_id: DisputeId,
    pub message: String,
    pub attachments: Vec<String>,
    pub user: Actor,
}

/// Inputs for an admin status transition.
#[derive(Debug, Clone)]
pub struct UpdateStatus {
    pub dispute_id: DisputeId,
    pub status: DisputeStatus,
    pub resolution_notes: Option<String>,
    pub resolution: Option<String>,
    pub user: Actor,
}

/// Drives the dispute lifecycle.
pub struct DisputeWorkflow {
    store: Arc<dyn DisputeStore>,
    escrows: Arc<dyn EscrowStore>,
    properties: Arc<dyn PropertyDirectory>,
    notifier: Arc<dyn NotificationGateway>,
}

impl DisputeWorkflow {
    /// Build a workflow over the given store and collaborators.
    pub fn new(
        store: Arc<dyn DisputeStore>,
        escrows: Arc<dyn EscrowStore>,
        properties: Arc<dyn PropertyDirectory>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            store,
            escrows,
            properties,
            notifier,
        }
    }

    /// File a new dispute.
    ///
    /// Exactly one anchor is required. The respondent is resolved from the
    /// anchor: the counterparty on an escrow transaction, or the property
    /// owner (unless the owner is the filer, who must then name a
    /// counterparty). The dispute opens with a single `dispute_created`
    /// timeline entry and the respondent receives a high-priority
    /// notification.
    ///
    /// # Errors
    ///
    /// - [`DisputeError::MissingAnchor`] — neither anchor supplied.
    /// - [`DisputeError::PropertyNotFound`] / [`DisputeError::EscrowNotFound`]
    ///   — dangling anchor.
    /// - [`DisputeError::NotEscrowParty`] — filer is a stranger to the
    ///   escrow transaction.
    /// - [`DisputeError::CounterpartyRequired`] — owner filed against their
    ///   own listing without naming anyone.
    /// - [`DisputeError::RespondentUnresolved`] — no respondent could be
    ///   determined (e.g. ownerless listing).
    pub fn create_dispute(&self, request: CreateDispute) -> Result<Dispute, DisputeError> {
        if request.property_id.is_none() && request.escrow_id.is_none() {
            return Err(DisputeError::MissingAnchor);
        }

        // Resolve the property anchor first so a dangling reference fails
        // even when an escrow anchor is also present.
        let mut property = None;
        if let Some(property_id) = request.property_id {
            property = Some(
                self.properties
                    .property_by_id(&property_id)
                    .ok_or(DisputeError::PropertyNotFound(property_id))?,
            );
        }

        let mut property_id = request.property_id;
        let mut participants = vec![request.user.id];
        let respondent: ActorSnapshot;

        if let Some(escrow_id) = request.escrow_id {
            let escrow = self
                .escrows
                .get(&escrow_id)
                .ok_or(DisputeError::EscrowNotFound(escrow_id))?;
            let counterparty = escrow
                .counterparty_of(&request.user.id)
                .ok_or(DisputeError::NotEscrowParty)?;
            respondent = ActorSnapshot::from_id(counterparty);
            property_id = property_id.or(Some(escrow.property_id));
            push_unique(&mut participants, escrow.buyer_id);
            push_unique(&mut participants, escrow.seller_id);
        } else {
            let property = property.as_ref().ok_or(DisputeError::MissingAnchor)?;
            let owner = property.owner_id;
            if owner == Some(request.user.id) {
                let counterparty = request
                    .counterparty_id
                    .ok_or(DisputeError::CounterpartyRequired)?;
                respondent = ActorSnapshot::from_id(counterparty);
            } else {
                let owner = owner.ok_or(DisputeError::RespondentUnresolved)?;
                respondent = ActorSnapshot::from_id(owner);
            }
            push_unique(&mut participants, respondent.id);
        }

        let now = Utc::now();
        let dispute = Dispute {
            id: DisputeId::new(),
            property_id,
            property_title: property.as_ref().map(|p| p.title.clone()),
            escrow_id: request.escrow_id,
            reason: request.reason,
            description: request.description.clone(),
            attachments: request.attachments,
            status: DisputeStatus::Open,
            priority: Priority::Medium,
            raised_by: ActorSnapshot::of(&request.user),
            respondent: respondent.clone(),
            participants,
            timeline: vec![TimelineEntry::new(
                TimelineEntryKind::DisputeCreated,
                format!("Dispute filed: {}", request.reason),
                &request.user,
                serde_json::json!({ "description": request.description }),
            )],
            resolution: None,
            resolution_notes: None,
            resolved_at: None,
            resolved_by: None,
            created_at: now,
            updated_at: now,
        };

        let dispute = self.store.insert(dispute);

        self.notify(
            NotificationRequest::new(
                respondent.id,
                NotificationKind::DisputeCreated,
                "New Dispute Filed",
                excerpt(&dispute.description),
            )
            .from_sender(request.user.id)
            .with_priority(Priority::High)
            .with_data(serde_json::json!({
                "disputeId": dispute.id,
                "propertyId": dispute.property_id,
                "reason": dispute.reason,
            })),
        );

        Ok(dispute)
    }

    /// List disputes visible to the caller, newest first.
    ///
    /// Admins see the whole collection (optionally filtered by status);
    /// everyone else sees only disputes they participate in.
    pub fn list_disputes(&self, user: &Actor, status: Option<DisputeStatus>) -> Vec<Dispute> {
        let participant = if user.is_admin() { None } else { Some(user.id) };
        self.store.list(&DisputeFilter {
            status,
            participant,
        })
    }

    /// Fetch a dispute, enforcing participant-or-admin access.
    ///
    /// # Errors
    ///
    /// - [`DisputeError::DisputeNotFound`] — unknown dispute.
    /// - [`DisputeError::NotParticipant`] — caller has no access.
    pub fn dispute_by_id(&self, id: &DisputeId, user: &Actor) -> Result<Dispute, DisputeError> {
        let dispute = self
            .store
            .get(id)
            .ok_or(DisputeError::DisputeNotFound(*id))?;
        if !user.is_admin() && !dispute.is_participant(&user.id) {
            return Err(DisputeError::NotParticipant);
        }
        Ok(dispute)
    }

    /// Append a message to a dispute's timeline.
    ///
    /// Does not change status. Notifies the first participant that is not
    /// the author — one recipient, not a fan-out.
    ///
    /// # Errors
    ///
    /// - [`DisputeError::DisputeNotFound`] — unknown dispute.
    /// - [`DisputeError::NotParticipant`] — caller has no access.
    pub fn add_message(&self, request: AddMessage) -> Result<Dispute, DisputeError> {
        let dispute = self
            .store
            .get(&request.dispute_id)
            .ok_or(DisputeError::DisputeNotFound(request.dispute_id))?;
        if !request.user.is_admin() && !dispute.is_participant(&request.user.id) {
            return Err(DisputeError::NotParticipant);
        }

        let entry = TimelineEntry::new(
            TimelineEntryKind::Message,
            request.message.clone(),
            &request.user,
            serde_json::json!({ "attachments": request.attachments }),
        );
        let updated = self
            .store
            .apply(&request.dispute_id, &mut |d| d.append(entry.clone()))
            .ok_or(DisputeError::DisputeNotFound(request.dispute_id))?;

        if let Some(recipient) = updated.first_other_participant(&request.user.id) {
            self.notify(
                NotificationRequest::new(
                    recipient,
                    NotificationKind::DisputeUpdated,
                    "New Dispute Message",
                    excerpt(&request.message),
                )
                .from_sender(request.user.id)
                .with_data(serde_json::json!({
                    "disputeId": updated.id,
                    "propertyId": updated.property_id,
                })),
            );
        }

        Ok(updated)
    }

    /// Transition a dispute's status. Admin only.
    ///
    /// Records a `status_change` timeline entry carrying the resolution
    /// details, stamps `resolved_at`/`resolved_by` when the target status
    /// is `resolved`, and notifies every participant.
    ///
    /// # Errors
    ///
    /// - [`DisputeError::AdminOnly`] — caller is not an admin.
    /// - [`DisputeError::DisputeNotFound`] — unknown dispute.
    pub fn update_status(&self, request: UpdateStatus) -> Result<Dispute, DisputeError> {
        if !request.user.is_admin() {
            return Err(DisputeError::AdminOnly);
        }

        let entry = TimelineEntry::new(
            TimelineEntryKind::StatusChange,
            format!("Status updated to {}", request.status),
            &request.user,
            serde_json::json!({
                "resolutionNotes": request.resolution_notes,
                "resolution": request.resolution,
            }),
        );

        let admin_id = request.user.id;
        let updated = self
            .store
            .apply(&request.dispute_id, &mut |d| {
                d.append(entry.clone());
                d.status = request.status;
                d.resolution_notes = request.resolution_notes.clone();
                d.resolution = request.resolution.clone();
                if request.status == DisputeStatus::Resolved {
                    d.resolved_at = Some(Utc::now());
                    d.resolved_by = Some(admin_id);
                }
            })
            .ok_or(DisputeError::DisputeNotFound(request.dispute_id))?;

        for participant in &updated.participants {
            self.notify(
                NotificationRequest::new(
                    *participant,
                    NotificationKind::DisputeUpdated,
                    "Dispute Status Updated",
                    format!("Dispute status changed to {}", request.status),
                )
                .from_sender(admin_id)
                .with_data(serde_json::json!({
                    "disputeId": updated.id,
                    "status": request.status,
                })),
            );
        }

        Ok(updated)
    }

    /// Hand a notification to the gateway, logging hand-off failures.
    fn notify(&self, request: NotificationRequest) {
        let recipient: UserId = request.recipient;
        if let Err(err) = self.notifier.dispatch(request) {
            tracing::warn!(%recipient, error = %err, "failed to enqueue dispute notification");
        }
    }
}

/// Push an id if not already present, preserving insertion order.
fn push_unique(participants: &mut Vec<UserId>, id: UserId) {
    if !participants.contains(&id) {
        participants.push(id);
    }
}

/// First 140 characters, for notification bodies.
fn excerpt(text: &str) -> String {
    text.chars().take(140).collect()
}
