//! Read-side contract over the imported message archive.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doppel_core::Message;

/// Read access to a person's message history.
///
/// The engine only reads through this trait. Writing happens once, at import
/// time, through the concrete adapter.
#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// Returns up to `limit` most recent messages exchanged with one
    /// correspondent, oldest first.
    async fn get_messages(
        &self,
        correspondent_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, anyhow::Error>;

    /// Returns the total number of stored messages for one correspondent.
    async fn get_message_count(&self, correspondent_id: &str) -> Result<i64, anyhow::Error>;
}

/// Archive-wide counters, shown by the status report.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub total_messages: i64,
    pub messages_sent: i64,
    pub messages_received: i64,
    pub correspondents: i64,
    pub first_message: Option<DateTime<Utc>>,
    pub last_message: Option<DateTime<Utc>>,
}
