//! SQLite-backed message archive.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doppel_core::{Message, Sender};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

use crate::store::{HistoryStats, MessageHistory};

/// Message archive in a single SQLite file. Owns its schema; callers only see
/// [`Message`] values.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Opens the database at `database_url`, creating the file and schema when
    /// missing. Accepts plain paths as well as `sqlite:` URLs.
    pub async fn new(database_url: &str) -> Result<Self> {
        let path = database_url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");

        // A :memory: database lives inside its connection, so the pool must
        // not open a second one.
        let pool = if path == ":memory:" {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(SqliteConnectOptions::from_str(":memory:")?)
                .await?
        } else {
            let options = SqliteConnectOptions::new()
                .create_if_missing(true)
                .filename(path);
            SqlitePool::connect_with(options).await?
        };

        let history = Self { pool };
        history.init_schema().await?;
        Ok(history)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                correspondent_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_correspondent
                ON messages(correspondent_id);
            CREATE INDEX IF NOT EXISTS idx_messages_timestamp
                ON messages(timestamp);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Bulk-loads messages from an export. Rows whose id already exists are
    /// left untouched, so re-importing the same export is a no-op. Returns the
    /// number of newly inserted rows.
    pub async fn import(&self, messages: &[Message]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for message in messages {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO messages (id, correspondent_id, sender, content, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&message.id)
            .bind(&message.correspondent_id)
            .bind(message.sender.as_str())
            .bind(&message.content)
            .bind(message.timestamp.to_rfc3339())
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;

        info!(
            received = messages.len(),
            inserted = inserted,
            "step: history import committed"
        );

        Ok(inserted)
    }

    /// Archive-wide counters across all correspondents.
    pub async fn get_stats(&self) -> Result<HistoryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN sender = 'me' THEN 1 ELSE 0 END), 0) AS sent,
                COALESCE(SUM(CASE WHEN sender = 'them' THEN 1 ELSE 0 END), 0) AS received,
                COUNT(DISTINCT correspondent_id) AS correspondents,
                MIN(timestamp) AS first,
                MAX(timestamp) AS last
            FROM messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(HistoryStats {
            total_messages: row.try_get("total")?,
            messages_sent: row.try_get("sent")?,
            messages_received: row.try_get("received")?,
            correspondents: row.try_get("correspondents")?,
            first_message: parse_optional_timestamp(row.try_get("first")?)?,
            last_message: parse_optional_timestamp(row.try_get("last")?)?,
        })
    }

    fn row_to_message(row: &SqliteRow) -> Result<Message, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let correspondent_id: String = row.try_get("correspondent_id")?;
        let sender_str: String = row.try_get("sender")?;
        let content: String = row.try_get("content")?;
        let timestamp_str: String = row.try_get("timestamp")?;

        let sender = Sender::parse(&sender_str)
            .ok_or_else(|| sqlx::Error::Decode(format!("Invalid sender: {}", sender_str).into()))?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| sqlx::Error::Decode(format!("Invalid timestamp: {}", e).into()))?;

        Ok(Message {
            id,
            correspondent_id,
            sender,
            content,
            timestamp,
        })
    }
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(s) => {
            let parsed = DateTime::parse_from_rfc3339(&s)
                .map_err(|e| anyhow::anyhow!("Invalid stored timestamp '{}': {}", s, e))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl MessageHistory for SqliteHistory {
    async fn get_messages(
        &self,
        correspondent_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, anyhow::Error> {
        // Newest window first, then flipped back to chronological order.
        let rows = sqlx::query(
            r#"
            SELECT id, correspondent_id, sender, content, timestamp
            FROM (
                SELECT * FROM messages
                WHERE correspondent_id = ?1
                ORDER BY timestamp DESC
                LIMIT ?2
            ) AS recent
            ORDER BY timestamp ASC
            "#,
        )
        .bind(correspondent_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(Self::row_to_message(row)?);
        }

        Ok(messages)
    }

    async fn get_message_count(&self, correspondent_id: &str) -> Result<i64, anyhow::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE correspondent_id = ?1")
                .bind(correspondent_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
