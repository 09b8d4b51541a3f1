//! Notification request model.

use serde::{Deserialize, Serialize};

use hvn_core::UserId;

/// The event class a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An escrow transaction was opened against the recipient's property.
    EscrowPaymentReceived,
    /// An escrow transaction the recipient is party to changed status.
    EscrowStatusChanged,
    /// A dispute was filed naming the recipient as respondent.
    DisputeCreated,
    /// A dispute the recipient participates in changed.
    DisputeUpdated,
}

impl NotificationKind {
    /// The canonical wire string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EscrowPaymentReceived => "escrow_payment_received",
            Self::EscrowStatusChanged => "escrow_status_changed",
            Self::DisputeCreated => "dispute_created",
            Self::DisputeUpdated => "dispute_updated",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery priority hint for the downstream delivery system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A single notification to be delivered to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Who receives the notification.
    pub recipient: UserId,
    /// Who triggered it, when attributable to a user action.
    pub sender: Option<UserId>,
    /// Event class.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Structured payload for deep-linking (escrow id, dispute id, ...).
    pub data: serde_json::Value,
    /// Delivery priority hint.
    pub priority: Priority,
}

impl NotificationRequest {
    /// Build a medium-priority notification with an empty payload.
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            sender: None,
            kind,
            title: title.into(),
            message: message.into(),
            data: serde_json::Value::Null,
            priority: Priority::default(),
        }
    }

    /// Attribute the notification to a sending user.
    pub fn from_sender(mut self, sender: UserId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Attach a structured payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Override the delivery priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names() {
        assert_eq!(
            NotificationKind::EscrowPaymentReceived.as_str(),
            "escrow_payment_received"
        );
        assert_eq!(
            NotificationKind::EscrowStatusChanged.as_str(),
            "escrow_status_changed"
        );
        assert_eq!(NotificationKind::DisputeCreated.as_str(), "dispute_created");
        assert_eq!(NotificationKind::DisputeUpdated.as_str(), "dispute_updated");
    }

    #[test]
    fn kind_serializes_to_wire_name() {
        let json = serde_json::to_string(&NotificationKind::DisputeCreated).unwrap();
        assert_eq!(json, "\"dispute_created\"");
    }

    #[test]
    fn builder_defaults() {
        let req = NotificationRequest::new(
            UserId::new(),
            NotificationKind::DisputeUpdated,
            "Dispute Status Updated",
            "Dispute status changed to resolved",
        );
        assert!(req.sender.is_none());
        assert_eq!(req.priority, Priority::Medium);
        assert!(req.data.is_null());
    }

    #[test]
    fn builder_overrides() {
        let sender = UserId::new();
        let req = NotificationRequest::new(
            UserId::new(),
            NotificationKind::DisputeCreated,
            "New Dispute Filed",
            "...",
        )
        .from_sender(sender)
        .with_priority(Priority::High)
        .with_data(serde_json::json!({"reason": "payment_issues"}));

        assert_eq!(req.sender, Some(sender));
        assert_eq!(req.priority, Priority::High);
        assert_eq!(req.data["reason"], "payment_issues");
    }
}
