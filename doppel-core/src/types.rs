//! Core types: message, sender side, and correspondent identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the conversation authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person this engine writes as.
    Me,
    /// The correspondent (contact or group member).
    Them,
}

impl Sender {
    /// Stable string form used by the history store ("me" / "them").
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Me => "me",
            Sender::Them => "them",
        }
    }

    /// Parses the stored string form back. `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "me" => Some(Sender::Me),
            "them" => Some(Sender::Them),
            _ => None,
        }
    }
}

/// A single conversational message. Immutable once stored; created by history
/// import or live capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub correspondent_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message with the given fields (id supplied by the caller;
    /// history import keeps the source ids so re-imports stay idempotent).
    pub fn new(
        id: impl Into<String>,
        correspondent_id: impl Into<String>,
        sender: Sender,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            correspondent_id: correspondent_id.into(),
            sender,
            content: content.into(),
            timestamp,
        }
    }

    /// True when this message was written by the user themselves.
    pub fn is_me(&self) -> bool {
        self.sender == Sender::Me
    }
}

/// The other party in a conversation: a contact or a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correspondent {
    pub id: String,
    pub name: String,
    pub is_group: bool,
}

impl Correspondent {
    /// A direct (one-to-one) correspondent.
    pub fn contact(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_group: false,
        }
    }

    /// A group correspondent.
    pub fn group(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_group: true,
        }
    }
}
