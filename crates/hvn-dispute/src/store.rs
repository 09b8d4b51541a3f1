// SPDX-License-Identifier: BUSL-1.1
//! # Dispute Store
//!
//! Persistence seam for dispute records, with a DashMap-backed in-memory
//! implementation. Listing is participant-scoped at the store level so a
//! caller-visibility bug upstream cannot leak other parties' disputes.

use dashmap::DashMap;

use hvn_core::{DisputeId, UserId};

use crate::dispute::{Dispute, DisputeStatus};

/// The most disputes a single listing call returns.
pub const MAX_LISTING: usize = 100;

/// Filter for dispute listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisputeFilter {
    /// Restrict to one status, if set.
    pub status: Option<DisputeStatus>,
    /// Restrict to disputes the user participates in, if set.
    pub participant: Option<UserId>,
}

/// Persistence operations for disputes.
pub trait DisputeStore: Send + Sync {
    /// Persist a new dispute.
    fn insert(&self, dispute: Dispute) -> Dispute;

    /// Fetch a dispute by id.
    fn get(&self, id: &DisputeId) -> Option<Dispute>;

    /// Mutate a dispute in place under the store's write lock and return
    /// the updated record. The store bumps the update timestamp after the
    /// closure runs.
    fn apply(
        &self,
        id: &DisputeId,
        mutate: &mut dyn FnMut(&mut Dispute),
    ) -> Option<Dispute>;

    /// List disputes matching the filter, newest first, capped at
    /// [`MAX_LISTING`].
    fn list(&self, filter: &DisputeFilter) -> Vec<Dispute>;
}

/// In-memory dispute store. Thread-safe via `DashMap`.
#[derive(Default)]
pub struct InMemoryDisputeStore {
    disputes: DashMap<DisputeId, Dispute>,
}

impl InMemoryDisputeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisputeStore for InMemoryDisputeStore {
    fn insert(&self, dispute: Dispute) -> Dispute {
        self.disputes.insert(dispute.id, dispute.clone());
        dispute
    }

    fn get(&self, id: &DisputeId) -> Option<Dispute> {
        self.disputes.get(id).map(|d| d.value().clone())
    }

    fn apply(
        &self,
        id: &DisputeId,
        mutate: &mut dyn FnMut(&mut Dispute),
    ) -> Option<Dispute> {
        let mut entry = self.disputes.get_mut(id)?;
        let dispute = entry.value_mut();
        mutate(dispute);
        dispute.touch();
        Some(dispute.clone())
    }

    fn list(&self, filter: &DisputeFilter) -> Vec<Dispute> {
        let mut matches: Vec<Dispute> = self
            .disputes
            .iter()
            .filter(|entry| {
                let d = entry.value();
                filter.status.map(|s| d.status == s).unwrap_or(true)
                    && filter
                        .participant
                        .map(|user| d.is_participant(&user))
                        .unwrap_or(true)
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(MAX_LISTING);
        matches
    }
}
