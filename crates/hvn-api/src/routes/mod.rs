//! Route modules, one per domain.

pub mod disputes;
pub mod escrow;
