//! # Dispute Timeline
//!
//! Every dispute embeds an ordered event log. The log is append-only:
//! entries are pushed at the end and nothing ever mutates or reorders
//! existing ones, giving an audit trail of the proceeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hvn_core::{Actor, ActorRole, UserId};

/// The kind of event a timeline entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEntryKind {
    /// The filing event. Always the first entry.
    DisputeCreated,
    /// A message from a participant or an admin.
    Message,
    /// An admin-driven status change.
    StatusChange,
}

impl TimelineEntryKind {
    /// The canonical wire string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DisputeCreated => "dispute_created",
            Self::Message => "message",
            Self::StatusChange => "status_change",
        }
    }
}

impl std::fmt::Display for TimelineEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One event in a dispute's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// What happened.
    pub kind: TimelineEntryKind,
    /// Human-readable summary.
    pub message: String,
    /// Who authored the event.
    pub author_id: Option<UserId>,
    /// The author's role at the time.
    pub author_role: Option<ActorRole>,
    /// Event-specific payload (description, attachments, resolution notes).
    pub metadata: serde_json::Value,
    /// When the entry was appended (UTC).
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    /// Build an entry authored by the given actor.
    pub fn new(
        kind: TimelineEntryKind,
        message: impl Into<String>,
        author: &Actor,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            author_id: Some(author.id),
            author_role: Some(author.role),
            metadata,
            created_at: Utc::now(),
        }
    }
}
