// SPDX-License-Identifier: BUSL-1.1
//! # Escrow Transaction Store
//!
//! [`EscrowStore`] is the persistence seam the manager is constructed over;
//! [`InMemoryEscrowStore`] is the DashMap-backed implementation used by
//! tests and single-node deployments.
//!
//! The store owns the one-outstanding-transaction-per-property rule:
//! [`EscrowStore::insert_new`] runs the duplicate check and the insert under
//! a single per-property lock, so two concurrent creations for the same
//! property cannot both pass the check. A SQL implementation would express
//! the same rule as a partial unique index on `property_id` filtered to
//! non-released statuses.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use hvn_core::{EscrowId, PropertyId, UserId};

use crate::error::EscrowError;
use crate::transaction::{EscrowStatus, EscrowTransaction};

/// Whose transactions a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every transaction. Admin-only.
    All,
    /// Transactions where the user is buyer or seller.
    Party(UserId),
    /// Transactions where the user is the buyer.
    AsBuyer(UserId),
    /// Transactions where the user is the seller.
    AsSeller(UserId),
}

impl Visibility {
    fn admits(&self, tx: &EscrowTransaction) -> bool {
        match self {
            Self::All => true,
            Self::Party(user) => tx.is_party(user),
            Self::AsBuyer(user) => tx.buyer_id == *user,
            Self::AsSeller(user) => tx.seller_id == *user,
        }
    }
}

/// A page request over the transaction collection.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    /// Restrict to one status, if set.
    pub status: Option<EscrowStatus>,
    /// Visibility scope, derived from the caller's identity by the manager.
    pub visibility: Visibility,
    /// 1-based page number. Values below 1 are treated as 1.
    pub page: usize,
    /// Items per page. Values below 1 are treated as 1.
    pub limit: usize,
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    /// At least 1, even for an empty result.
    pub total_pages: usize,
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Persistence operations for escrow transactions.
pub trait EscrowStore: Send + Sync {
    /// Persist a new transaction, enforcing that no outstanding transaction
    /// already references the same property.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::DuplicateTransaction`] if any stored
    /// transaction on the property has a status that does not release it.
    fn insert_new(&self, tx: EscrowTransaction) -> Result<EscrowTransaction, EscrowError>;

    /// Fetch a transaction by id.
    fn get(&self, id: &EscrowId) -> Option<EscrowTransaction>;

    /// Mutate a transaction in place under the store's write lock and return
    /// the updated record. The store bumps the update timestamp after the
    /// closure runs.
    fn apply(
        &self,
        id: &EscrowId,
        mutate: &mut dyn FnMut(&mut EscrowTransaction),
    ) -> Option<EscrowTransaction>;

    /// Query transactions, newest first, with pagination metadata.
    fn query(&self, query: &TransactionQuery) -> Page<EscrowTransaction>;
}

/// In-memory escrow store.
///
/// Thread-safe via `DashMap`. The per-property index entry doubles as the
/// creation lock: `insert_new` holds it across the outstanding check and
/// the insert.
#[derive(Default)]
pub struct InMemoryEscrowStore {
    transactions: DashMap<EscrowId, EscrowTransaction>,
    by_property: DashMap<PropertyId, Vec<EscrowId>>,
}

impl InMemoryEscrowStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EscrowStore for InMemoryEscrowStore {
    fn insert_new(&self, tx: EscrowTransaction) -> Result<EscrowTransaction, EscrowError> {
        // Entry lock held for the whole check-and-insert.
        let mut index = self.by_property.entry(tx.property_id).or_default();
        let outstanding = index.iter().any(|id| {
            self.transactions
                .get(id)
                .map(|existing| !existing.status.releases_property())
                .unwrap_or(false)
        });
        if outstanding {
            return Err(EscrowError::DuplicateTransaction(tx.property_id));
        }
        index.push(tx.id);
        self.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }

    fn get(&self, id: &EscrowId) -> Option<EscrowTransaction> {
        self.transactions.get(id).map(|tx| tx.value().clone())
    }

    fn apply(
        &self,
        id: &EscrowId,
        mutate: &mut dyn FnMut(&mut EscrowTransaction),
    ) -> Option<EscrowTransaction> {
        let mut entry = self.transactions.get_mut(id)?;
        let tx = entry.value_mut();
        mutate(tx);
        tx.touch();
        Some(tx.clone())
    }

    fn query(&self, query: &TransactionQuery) -> Page<EscrowTransaction> {
        let mut matches: Vec<EscrowTransaction> = self
            .transactions
            .iter()
            .filter(|entry| {
                let tx = entry.value();
                query.visibility.admits(tx)
                    && query.status.map(|s| tx.status == s).unwrap_or(true)
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = query.limit.max(1);
        let page = query.page.max(1);
        let total_items = matches.len();
        let total_pages = total_items.div_ceil(limit).max(1);
        let items = matches
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Page {
            items,
            pagination: Pagination {
                current_page: page,
                items_per_page: limit,
                total_items,
                total_pages,
            },
        }
    }
}
