//! The index proper: keyed collections behind RwLocks, similarity search,
//! and JSON persistence.
//!
//! Writers go through `upsert_*` and `persist`; readers search against the
//! in-memory snapshot and never block on a save in flight.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::similarity::cosine_similarity;
use crate::types::{EmbeddedConversation, EmbeddedMessage};

/// Minimum similarity for a pair match to count.
pub const PAIR_SIMILARITY_FLOOR: f32 = 0.3;
/// Minimum similarity for a thread match. Thread embeddings blend several
/// turns and score broader, so this floor sits below the pair floor.
pub const THREAD_SIMILARITY_FLOOR: f32 = 0.25;

const MESSAGES_FILE: &str = "messages.json";
const CONVERSATIONS_FILE: &str = "conversations.json";
const INDEX_FORMAT_VERSION: u32 = 1;

/// On-disk wrapper for one collection.
#[derive(Debug, Serialize, Deserialize)]
struct Collection<T> {
    version: u32,
    entries: Vec<T>,
}

/// Persisted vector index over two collections: single embedded messages
/// (with their known replies) and embedded conversation threads.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dir: PathBuf,
    messages: Arc<RwLock<HashMap<String, EmbeddedMessage>>>,
    conversations: Arc<RwLock<HashMap<String, EmbeddedConversation>>>,
}

impl VectorIndex {
    /// Loads the index from `dir`, eagerly reading both collection files.
    /// Missing files start the collection empty; unreadable ones are logged
    /// and likewise start empty.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let messages: Vec<EmbeddedMessage> = load_collection(&dir.join(MESSAGES_FILE), "messages");
        let conversations: Vec<EmbeddedConversation> =
            load_collection(&dir.join(CONVERSATIONS_FILE), "conversations");

        info!(
            dir = %dir.display(),
            message_count = messages.len(),
            conversation_count = conversations.len(),
            "step: vector index loaded"
        );

        Self {
            dir,
            messages: Arc::new(RwLock::new(
                messages
                    .into_iter()
                    .map(|e| (e.message_id.clone(), e))
                    .collect(),
            )),
            conversations: Arc::new(RwLock::new(
                conversations.into_iter().map(|e| (e.id.clone(), e)).collect(),
            )),
        }
    }

    /// Inserts or replaces a message entry, keyed by `message_id`.
    pub async fn upsert_message(&self, entry: EmbeddedMessage) {
        let mut messages = self.messages.write().await;
        messages.insert(entry.message_id.clone(), entry);
    }

    /// Inserts or replaces a conversation entry, keyed by `id`.
    pub async fn upsert_conversation(&self, entry: EmbeddedConversation) {
        let mut conversations = self.conversations.write().await;
        conversations.insert(entry.id.clone(), entry);
    }

    /// Ranked message search. `correspondent_id` narrows the scan when given;
    /// entries below `min_similarity` are dropped.
    pub async fn search(
        &self,
        query: &[f32],
        correspondent_id: Option<&str>,
        limit: usize,
        min_similarity: f32,
    ) -> Vec<(EmbeddedMessage, f32)> {
        let messages = self.messages.read().await;
        let mut scored: Vec<(EmbeddedMessage, f32)> = messages
            .values()
            .filter(|e| correspondent_id.map_or(true, |id| e.correspondent_id == id))
            .map(|e| (e.clone(), cosine_similarity(query, &e.embedding)))
            .filter(|(_, sim)| *sim >= min_similarity)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Ranked (them_text, me_text, similarity) tuples for entries with a
    /// known reply, above [`PAIR_SIMILARITY_FLOOR`].
    pub async fn search_conversation_pairs(
        &self,
        query: &[f32],
        correspondent_id: &str,
        limit: usize,
    ) -> Vec<(String, String, f32)> {
        let messages = self.messages.read().await;
        let mut scored: Vec<(String, String, f32)> = messages
            .values()
            .filter(|e| e.correspondent_id == correspondent_id)
            .filter_map(|e| {
                let response = e.response_content.as_ref()?;
                let sim = cosine_similarity(query, &e.embedding);
                (sim > PAIR_SIMILARITY_FLOOR)
                    .then(|| (e.content.clone(), response.clone(), sim))
            })
            .collect();
        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Ranked conversation threads above [`THREAD_SIMILARITY_FLOOR`].
    pub async fn search_conversation_threads(
        &self,
        query: &[f32],
        correspondent_id: &str,
        limit: usize,
    ) -> Vec<(EmbeddedConversation, f32)> {
        let conversations = self.conversations.read().await;
        let mut scored: Vec<(EmbeddedConversation, f32)> = conversations
            .values()
            .filter(|e| e.correspondent_id == correspondent_id)
            .filter_map(|e| {
                let sim = cosine_similarity(query, &e.embedding);
                (sim > THREAD_SIMILARITY_FLOOR).then(|| (e.clone(), sim))
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Writes both collections to disk from a read snapshot; searches keep
    /// running against the in-memory state while the save is in flight.
    pub async fn persist(&self) -> Result<(), anyhow::Error> {
        let mut messages: Vec<EmbeddedMessage> =
            self.messages.read().await.values().cloned().collect();
        messages.sort_by(|a, b| a.message_id.cmp(&b.message_id));

        let mut conversations: Vec<EmbeddedConversation> =
            self.conversations.read().await.values().cloned().collect();
        conversations.sort_by(|a, b| a.id.cmp(&b.id));

        std::fs::create_dir_all(&self.dir)?;
        write_collection(&self.dir.join(MESSAGES_FILE), messages.len(), messages)?;
        write_collection(
            &self.dir.join(CONVERSATIONS_FILE),
            conversations.len(),
            conversations,
        )?;

        info!(dir = %self.dir.display(), "step: vector index persisted");
        Ok(())
    }

    /// Most recently indexed (content, reply) pairs for one correspondent,
    /// newest first. For heuristics that need raw examples without a query
    /// vector.
    pub async fn recent_pairs(
        &self,
        correspondent_id: &str,
        limit: usize,
    ) -> Vec<(String, String)> {
        let messages = self.messages.read().await;
        let mut entries: Vec<&EmbeddedMessage> = messages
            .values()
            .filter(|e| e.correspondent_id == correspondent_id && e.response_content.is_some())
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
            .into_iter()
            .take(limit)
            .map(|e| {
                let reply = e.response_content.clone().unwrap_or_default();
                (e.content.clone(), reply)
            })
            .collect()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// (message entries, conversation entries) indexed for one correspondent.
    pub async fn count_for(&self, correspondent_id: &str) -> (usize, usize) {
        let messages = self
            .messages
            .read()
            .await
            .values()
            .filter(|e| e.correspondent_id == correspondent_id)
            .count();
        let conversations = self
            .conversations
            .read()
            .await
            .values()
            .filter(|e| e.correspondent_id == correspondent_id)
            .count();
        (messages, conversations)
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path, label: &str) -> Vec<T> {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Collection<T>>(&raw) {
            Ok(collection) => collection.entries,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "{} collection unreadable, starting empty",
                    label
                );
                Vec::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "{} collection absent, starting empty", label);
            Vec::new()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "{} collection unreadable, starting empty",
                label
            );
            Vec::new()
        }
    }
}

fn write_collection<T: Serialize>(
    path: &Path,
    count: usize,
    entries: Vec<T>,
) -> Result<(), anyhow::Error> {
    let doc = Collection {
        version: INDEX_FORMAT_VERSION,
        entries,
    };
    std::fs::write(path, serde_json::to_string(&doc)?)?;
    debug!(path = %path.display(), count = count, "collection written");
    Ok(())
}
