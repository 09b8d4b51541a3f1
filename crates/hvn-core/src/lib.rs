//! # hvn-core — Marketplace Domain Primitives
//!
//! Shared vocabulary for the Haven marketplace services:
//!
//! - **Identifiers** ([`ids`]): Uuid-backed newtypes for users, properties,
//!   escrow transactions, and disputes. Each identifier is a distinct type —
//!   you cannot pass a [`PropertyId`] where an [`EscrowId`] is expected.
//!
//! - **Actors** ([`actor`]): the canonical authenticated-caller model.
//!   Upstream layers normalize whatever identity representation they carry
//!   into an [`Actor`] once, at the boundary; everything below works with
//!   the canonical struct.
//!
//! - **Money** ([`money`]): decimal-string monetary amounts with a fixed
//!   currency set. Financial values are never floats.

pub mod actor;
pub mod error;
pub mod ids;
pub mod money;

pub use actor::{Actor, ActorRole, ActorSnapshot};
pub use error::ValidationError;
pub use ids::{DisputeId, EscrowId, PropertyId, UserId};
pub use money::{Currency, Money};
