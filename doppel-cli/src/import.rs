//! Parsing of JSON message exports into history messages.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use doppel_core::{Message, Sender};
use serde::Deserialize;
use uuid::Uuid;

/// One record of a message export. `id` and `correspondent_id` are optional:
/// records without an id get a generated one (losing re-import idempotency
/// for those records), a missing correspondent falls back to the
/// `--correspondent` flag.
#[derive(Debug, Deserialize)]
pub struct ExportRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub correspondent_id: Option<String>,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Parses a JSON array of export records.
pub fn parse_export(raw: &str, default_correspondent: Option<&str>) -> Result<Vec<Message>> {
    let records: Vec<ExportRecord> =
        serde_json::from_str(raw).context("Export must be a JSON array of message records")?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let correspondent_id = record
                .correspondent_id
                .or_else(|| default_correspondent.map(str::to_string))
                .with_context(|| {
                    format!(
                        "Record {} has no correspondent_id and no --correspondent was given",
                        i
                    )
                })?;
            let id = record.id.unwrap_or_else(|| Uuid::new_v4().to_string());
            Ok(Message::new(
                id,
                correspondent_id,
                record.sender,
                record.content,
                record.timestamp,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_records() {
        let raw = r#"[
            {"id": "m1", "correspondent_id": "ana", "sender": "them",
             "content": "oi, tudo bem?", "timestamp": "2024-03-10T14:00:00Z"},
            {"id": "m2", "correspondent_id": "ana", "sender": "me",
             "content": "tudo sim!", "timestamp": "2024-03-10T14:01:00Z"}
        ]"#;

        let messages = parse_export(raw, None).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "m1");
        assert_eq!(messages[0].correspondent_id, "ana");
        assert_eq!(messages[0].sender, Sender::Them);
        assert_eq!(messages[1].content, "tudo sim!");
        assert!(messages[1].is_me());
    }

    #[test]
    fn test_missing_ids_are_generated_and_unique() {
        let raw = r#"[
            {"correspondent_id": "ana", "sender": "them",
             "content": "oi", "timestamp": "2024-03-10T14:00:00Z"},
            {"correspondent_id": "ana", "sender": "me",
             "content": "opa", "timestamp": "2024-03-10T14:01:00Z"}
        ]"#;

        let messages = parse_export(raw, None).unwrap();

        assert!(!messages[0].id.is_empty());
        assert_ne!(messages[0].id, messages[1].id);
    }

    #[test]
    fn test_flag_fills_missing_correspondent() {
        let raw = r#"[
            {"sender": "them", "content": "oi", "timestamp": "2024-03-10T14:00:00Z"}
        ]"#;

        let messages = parse_export(raw, Some("ana")).unwrap();
        assert_eq!(messages[0].correspondent_id, "ana");
    }

    #[test]
    fn test_missing_correspondent_without_flag_is_an_error() {
        let raw = r#"[
            {"sender": "them", "content": "oi", "timestamp": "2024-03-10T14:00:00Z"}
        ]"#;

        let err = parse_export(raw, None).unwrap_err();
        assert!(err.to_string().contains("Record 0"));
    }

    #[test]
    fn test_record_correspondent_wins_over_flag() {
        let raw = r#"[
            {"correspondent_id": "bruno", "sender": "them",
             "content": "oi", "timestamp": "2024-03-10T14:00:00Z"}
        ]"#;

        let messages = parse_export(raw, Some("ana")).unwrap();
        assert_eq!(messages[0].correspondent_id, "bruno");
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(parse_export("{not json", None).is_err());
        assert!(parse_export(r#"{"sender": "me"}"#, None).is_err());
    }
}
