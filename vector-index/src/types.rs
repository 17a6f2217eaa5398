//! Index entry types: embedded messages, embedded conversation threads, and
//! the query-time thread result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An indexed Them message with its embedding and, when known, the reply the
/// user gave it. Upserted by `message_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMessage {
    pub message_id: String,
    pub correspondent_id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub is_me: bool,
    pub timestamp: DateTime<Utc>,
    /// The user's immediate reply to this message, when one exists.
    pub response_content: Option<String>,
}

/// One turn inside an embedded conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub content: String,
    pub is_me: bool,
    pub timestamp: DateTime<Utc>,
}

/// A time-bounded run of consecutive messages embedded as one retrievable
/// unit. Upserted by `id`, which is derived from the first message's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedConversation {
    pub id: String,
    pub correspondent_id: String,
    pub turns: Vec<ConversationTurn>,
    pub embedding: Vec<f32>,
    /// Timestamp of the first turn.
    pub timestamp: DateTime<Utc>,
}

impl EmbeddedConversation {
    /// Builds a conversation entry; the id is derived from the first message
    /// id so re-indexing the same thread replaces instead of duplicating.
    pub fn new(
        first_message_id: &str,
        correspondent_id: impl Into<String>,
        turns: Vec<ConversationTurn>,
        embedding: Vec<f32>,
    ) -> Self {
        let timestamp = turns
            .first()
            .map(|t| t.timestamp)
            .unwrap_or_else(Utc::now);
        Self {
            id: format!("thread-{}", first_message_id),
            correspondent_id: correspondent_id.into(),
            turns,
            embedding,
            timestamp,
        }
    }
}

/// The raw text of a turn run, used as embedding input. Plain content joined
/// by newlines so it compares against plain incoming-message queries.
pub fn transcript_text(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Query-time thread result: the matched turns plus their similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationThread {
    pub turns: Vec<ConversationTurn>,
    pub similarity: f32,
}

impl ConversationThread {
    /// Renders the thread as a named two-party transcript for prompt context.
    pub fn format_transcript(&self, user_name: &str, correspondent_name: &str) -> String {
        self.turns
            .iter()
            .map(|t| {
                let speaker = if t.is_me { user_name } else { correspondent_name };
                format!("{}: {}", speaker, t.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn turn(content: &str, is_me: bool, minute: u32) -> ConversationTurn {
        ConversationTurn {
            content: content.to_string(),
            is_me,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, 14, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_conversation_id_and_timestamp_from_first_turn() {
        let turns = vec![turn("oi", false, 0), turn("opa", true, 1)];
        let conversation = EmbeddedConversation::new("msg-42", "alice", turns, vec![0.1]);
        assert_eq!(conversation.id, "thread-msg-42");
        assert_eq!(
            conversation.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_transcript_text_joins_plain_content() {
        let turns = vec![turn("oi", false, 0), turn("opa, tudo bem?", true, 1)];
        assert_eq!(transcript_text(&turns), "oi\nopa, tudo bem?");
    }

    #[test]
    fn test_format_transcript_names_both_parties() {
        let thread = ConversationThread {
            turns: vec![turn("vc vem hoje?", false, 0), turn("vou sim", true, 1)],
            similarity: 0.8,
        };
        let transcript = thread.format_transcript("Rafa", "Ana");
        assert_eq!(transcript, "Ana: vc vem hoje?\nRafa: vou sim");
    }
}
