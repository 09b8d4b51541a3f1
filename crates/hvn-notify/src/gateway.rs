// SPDX-License-Identifier: BUSL-1.1
//! # Notification Gateway
//!
//! [`NotificationGateway`] is the seam between the domain services and the
//! delivery system. The production implementation, [`OutboundQueue`], hands
//! requests to a bounded tokio channel without waiting for delivery; a drain
//! task owned by the binary forwards them to the actual delivery backend.
//!
//! Enqueueing never blocks a domain operation. When the queue is full the
//! request is dropped with an error the caller logs and swallows — delivery
//! is not on the critical path of transactional correctness, and retry is
//! the delivery system's concern, not ours.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::request::NotificationRequest;

/// Hand-off failure. Callers treat every variant as non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The outbound queue is at capacity; the request was dropped.
    #[error("outbound notification queue is full")]
    QueueFull,

    /// The drain task has shut down; no further requests can be delivered.
    #[error("outbound notification queue is closed")]
    QueueClosed,
}

/// Accepts notification requests for eventual delivery.
pub trait NotificationGateway: Send + Sync {
    /// Hand a request off for delivery. Must not block.
    fn dispatch(&self, request: NotificationRequest) -> Result<(), NotifyError>;
}

/// Bounded, non-blocking outbound queue.
pub struct OutboundQueue {
    tx: mpsc::Sender<NotificationRequest>,
}

impl OutboundQueue {
    /// Create a queue with the given capacity, returning the gateway half
    /// and the receiver the drain task consumes.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NotificationRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Spawn a drain task that logs each delivered request.
    ///
    /// Stands in for the real delivery backend in development and tests;
    /// deployments replace this with a forwarder to the delivery service.
    pub fn spawn_log_drain(mut rx: mpsc::Receiver<NotificationRequest>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(req) = rx.recv().await {
                tracing::info!(
                    recipient = %req.recipient,
                    kind = %req.kind,
                    priority = req.priority.as_str(),
                    title = %req.title,
                    "notification dispatched"
                );
            }
        })
    }
}

impl NotificationGateway for OutboundQueue {
    fn dispatch(&self, request: NotificationRequest) -> Result<(), NotifyError> {
        self.tx.try_send(request).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotifyError::QueueClosed,
        })
    }
}

/// Test double that records every dispatched request.
///
/// Set `fail` to make every dispatch report [`NotifyError::QueueFull`],
/// for asserting that callers swallow hand-off failures.
#[derive(Default)]
pub struct CollectingGateway {
    sent: parking_lot::Mutex<Vec<NotificationRequest>>,
    fail: bool,
}

impl CollectingGateway {
    /// A gateway that accepts and records everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects everything.
    pub fn failing() -> Self {
        Self {
            sent: parking_lot::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// All requests dispatched so far, in order.
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().clone()
    }
}

impl NotificationGateway for CollectingGateway {
    fn dispatch(&self, request: NotificationRequest) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::QueueFull);
        }
        self.sent.lock().push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::NotificationKind;
    use hvn_core::UserId;

    fn sample_request() -> NotificationRequest {
        NotificationRequest::new(
            UserId::new(),
            NotificationKind::EscrowStatusChanged,
            "Escrow active",
            "Escrow status changed to active",
        )
    }

    #[tokio::test]
    async fn queue_delivers_to_receiver() {
        let (queue, mut rx) = OutboundQueue::new(8);
        queue.dispatch(sample_request()).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::EscrowStatusChanged);
    }

    #[tokio::test]
    async fn full_queue_reports_without_blocking() {
        let (queue, _rx) = OutboundQueue::new(1);
        queue.dispatch(sample_request()).unwrap();
        assert_eq!(queue.dispatch(sample_request()), Err(NotifyError::QueueFull));
    }

    #[tokio::test]
    async fn closed_queue_reports_closed() {
        let (queue, rx) = OutboundQueue::new(1);
        drop(rx);
        assert_eq!(
            queue.dispatch(sample_request()),
            Err(NotifyError::QueueClosed)
        );
    }

    #[test]
    fn collecting_gateway_records_in_order() {
        let gateway = CollectingGateway::new();
        let first = sample_request();
        let second = sample_request();
        gateway.dispatch(first.clone()).unwrap();
        gateway.dispatch(second.clone()).unwrap();

        let sent = gateway.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient, first.recipient);
        assert_eq!(sent[1].recipient, second.recipient);
    }

    #[test]
    fn failing_gateway_rejects_and_records_nothing() {
        let gateway = CollectingGateway::failing();
        assert!(gateway.dispatch(sample_request()).is_err());
        assert!(gateway.sent().is_empty());
    }
}
