//! # hvn-escrow — Escrow Transaction Lifecycle
//!
//! Manages the purchase-in-progress between a buyer and a seller for one
//! property:
//!
//! - **Transaction** ([`transaction`]): the persisted escrow record and its
//!   status lifecycle.
//!
//! - **Property** ([`property`]): the read-only property catalog seam the
//!   manager consults at creation time.
//!
//! - **Store** ([`store`]): the persistence seam. The in-memory
//!   implementation enforces the one-outstanding-transaction-per-property
//!   rule atomically.
//!
//! - **Manager** ([`manager`]): the entry point for all escrow mutations —
//!   creation invariants, visibility-scoped listing, caller-driven status
//!   updates, and admin arbitration of disputed transactions.

pub mod error;
pub mod manager;
pub mod property;
pub mod store;
pub mod transaction;

pub use error::EscrowError;
pub use manager::{CreateTransaction, EscrowManager, RoleFilter};
pub use property::{InMemoryPropertyDirectory, Property, PropertyDirectory, PropertyStatus};
pub use store::{EscrowStore, InMemoryEscrowStore, Page, Pagination, TransactionQuery, Visibility};
pub use transaction::{
    EscrowStatus, EscrowTransaction, PaymentMethod, Resolution, ResolutionOutcome,
};
