//! # hvn-notify — Outbound Notification Side Channel
//!
//! The escrow and dispute services emit notifications as a side effect of
//! state changes. Delivery (push, email, in-app) is another system's job;
//! this crate only models the request and the hand-off.
//!
//! Dispatch is best-effort by contract: a failed hand-off is logged by the
//! caller and swallowed. No domain operation fails, blocks, or retries
//! because a notification could not be enqueued.

pub mod gateway;
pub mod request;

pub use gateway::{CollectingGateway, NotificationGateway, NotifyError, OutboundQueue};
pub use request::{NotificationKind, NotificationRequest, Priority};
