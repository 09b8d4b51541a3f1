//! # Application State
//!
//! Shared state for the Axum application. The managers are constructed
//! over injected stores and collaborators; [`AppState::in_memory`] wires
//! the in-memory implementations used by the development server and tests,
//! with the notification gateway supplied by the caller so the binary can
//! plug in the outbound queue and tests can plug in a recording fake.

use std::sync::Arc;

use hvn_dispute::{DisputeWorkflow, InMemoryDisputeStore};
use hvn_escrow::{EscrowManager, InMemoryEscrowStore, InMemoryPropertyDirectory};
use hvn_notify::NotificationGateway;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Escrow transaction manager.
    pub escrow: Arc<EscrowManager>,
    /// Dispute resolution workflow.
    pub disputes: Arc<DisputeWorkflow>,
    /// The property directory handle, kept concrete so development and test
    /// setups can seed listings.
    pub directory: Arc<InMemoryPropertyDirectory>,
}

impl AppState {
    /// Wire the full service graph over in-memory stores.
    pub fn in_memory(notifier: Arc<dyn NotificationGateway>) -> Self {
        let escrow_store = Arc::new(InMemoryEscrowStore::new());
        let dispute_store = Arc::new(InMemoryDisputeStore::new());
        let directory = Arc::new(InMemoryPropertyDirectory::new());

        let escrow = Arc::new(EscrowManager::new(
            escrow_store.clone(),
            directory.clone(),
            notifier.clone(),
        ));
        let disputes = Arc::new(DisputeWorkflow::new(
            dispute_store,
            escrow_store,
            directory.clone(),
            notifier,
        ));

        Self {
            escrow,
            disputes,
            directory,
        }
    }
}
