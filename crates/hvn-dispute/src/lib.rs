//! # hvn-dispute — Dispute Resolution Workflow
//!
//! Manages disagreements between marketplace parties, anchored either to a
//! property listing (pre-escrow) or to an escrow transaction (in-progress):
//!
//! - **Dispute** ([`dispute`]): the persisted record — reason, parties,
//!   participants, and status.
//!
//! - **Timeline** ([`timeline`]): the append-only event log embedded in
//!   every dispute. Entries are never mutated or reordered.
//!
//! - **Store** ([`store`]): the persistence seam with an in-memory
//!   implementation.
//!
//! - **Workflow** ([`workflow`]): filing with respondent resolution,
//!   participant-gated messaging, and admin-only status transitions with
//!   full notification fan-out.
//!
//! Resolving a dispute does not move the underlying escrow transaction;
//! arbitration outcome and fund movement are separate authorities.

pub mod dispute;
pub mod error;
pub mod store;
pub mod timeline;
pub mod workflow;

pub use dispute::{Dispute, DisputeReason, DisputeStatus};
pub use error::DisputeError;
pub use store::{DisputeFilter, DisputeStore, InMemoryDisputeStore};
pub use timeline::{TimelineEntry, TimelineEntryKind};
pub use workflow::{AddMessage, CreateDispute, DisputeWorkflow, UpdateStatus};
