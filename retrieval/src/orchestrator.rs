//! Bulk index builds and query-time similarity lookups.

use anyhow::Result;
use doppel_core::Sender;
use embedding::EmbeddingClient;
use history::MessageHistory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, warn};
use vector_index::{
    transcript_text, ConversationThread, ConversationTurn, EmbeddedConversation, EmbeddedMessage,
    VectorIndex,
};

use crate::threads::{build_pairs, build_threads};

/// How many recent messages a bulk build reads per correspondent.
const RECENT_MESSAGE_LIMIT: usize = 1000;
/// Threads per embedding request.
const THREAD_BATCH_SIZE: usize = 10;
/// Pairs per embedding request.
const PAIR_BATCH_SIZE: usize = 20;
/// Pause between embedding requests, to stay under backend rate limits.
const BATCH_PAUSE_MS: u64 = 200;

/// Progress callback for bulk builds: (phase, batches done, batches total).
/// The phase is `"threads"` or `"pairs"`.
pub type ProgressFn = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Outcome of one bulk index build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexReport {
    pub threads_indexed: usize,
    pub pairs_indexed: usize,
    pub batches_failed: usize,
    pub elapsed_secs: f64,
}

/// Builds the vector index from history and answers similarity queries.
///
/// A missing embedding client is not an error: bulk builds become no-ops and
/// queries return empty, so the rest of the engine degrades instead of
/// failing.
pub struct RetrievalOrchestrator {
    history: Arc<dyn MessageHistory>,
    embedding: Option<Arc<dyn EmbeddingClient>>,
    index: Arc<VectorIndex>,
    in_progress: AtomicBool,
}

impl RetrievalOrchestrator {
    pub fn new(
        history: Arc<dyn MessageHistory>,
        embedding: Option<Arc<dyn EmbeddingClient>>,
        index: Arc<VectorIndex>,
    ) -> Self {
        Self {
            history,
            embedding,
            index,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Re-embeds one correspondent's recent history into the index and
    /// persists it once at the end.
    ///
    /// Returns `None` when a build is already running; the flag is released on
    /// every other exit path. Failed embedding batches are logged, counted and
    /// skipped, never fatal.
    pub async fn generate_embeddings(
        &self,
        correspondent_id: &str,
        progress: Option<ProgressFn>,
    ) -> Option<IndexReport> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(
                correspondent_id = %correspondent_id,
                "step: index build already in progress, skipping"
            );
            return None;
        }

        let started = Instant::now();
        let result = self.build_index(correspondent_id, progress).await;
        self.in_progress.store(false, Ordering::SeqCst);

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                error!(
                    correspondent_id = %correspondent_id,
                    error = %e,
                    "step: index build failed"
                );
                Some(IndexReport {
                    elapsed_secs: started.elapsed().as_secs_f64(),
                    ..IndexReport::default()
                })
            }
        }
    }

    async fn build_index(
        &self,
        correspondent_id: &str,
        progress: Option<ProgressFn>,
    ) -> Result<IndexReport> {
        let started = Instant::now();

        let Some(embedding) = self.embedding.as_ref() else {
            info!(
                correspondent_id = %correspondent_id,
                "step: no embedding backend configured, index build skipped"
            );
            return Ok(IndexReport::default());
        };

        let messages = self
            .history
            .get_messages(correspondent_id, RECENT_MESSAGE_LIMIT)
            .await?;

        let threads: Vec<(String, Vec<ConversationTurn>)> = build_threads(&messages)
            .into_iter()
            .map(|thread| {
                let first_id = thread[0].id.clone();
                let turns = thread.into_iter().map(to_turn).collect();
                (first_id, turns)
            })
            .collect();
        let pairs = build_pairs(&messages);

        info!(
            correspondent_id = %correspondent_id,
            messages = messages.len(),
            threads = threads.len(),
            pairs = pairs.len(),
            "step: building index"
        );

        let mut report = IndexReport::default();

        let thread_batches = batch_count(threads.len(), THREAD_BATCH_SIZE);
        for (batch_index, batch) in threads.chunks(THREAD_BATCH_SIZE).enumerate() {
            let texts: Vec<String> = batch
                .iter()
                .map(|(_, turns)| transcript_text(turns))
                .collect();

            match embedding.embed_batch(&texts).await {
                Ok(vectors) => {
                    for ((first_id, turns), vector) in batch.iter().zip(vectors) {
                        let entry = EmbeddedConversation::new(
                            first_id,
                            correspondent_id,
                            turns.clone(),
                            vector,
                        );
                        self.index.upsert_conversation(entry).await;
                        report.threads_indexed += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        correspondent_id = %correspondent_id,
                        batch = batch_index,
                        error = %e,
                        "step: thread batch failed, skipping"
                    );
                    report.batches_failed += 1;
                }
            }

            if let Some(callback) = progress.as_ref() {
                callback("threads", batch_index + 1, thread_batches);
            }
            if batch_index + 1 < thread_batches {
                sleep(Duration::from_millis(BATCH_PAUSE_MS)).await;
            }
        }

        let pair_batches = batch_count(pairs.len(), PAIR_BATCH_SIZE);
        for (batch_index, batch) in pairs.chunks(PAIR_BATCH_SIZE).enumerate() {
            let texts: Vec<String> = batch
                .iter()
                .map(|(them, _)| them.content.clone())
                .collect();

            match embedding.embed_batch(&texts).await {
                Ok(vectors) => {
                    for ((them, me), vector) in batch.iter().zip(vectors) {
                        let entry = EmbeddedMessage {
                            message_id: them.id.clone(),
                            correspondent_id: them.correspondent_id.clone(),
                            content: them.content.clone(),
                            embedding: vector,
                            is_me: them.sender == Sender::Me,
                            timestamp: them.timestamp,
                            response_content: Some(me.content.clone()),
                        };
                        self.index.upsert_message(entry).await;
                        report.pairs_indexed += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        correspondent_id = %correspondent_id,
                        batch = batch_index,
                        error = %e,
                        "step: pair batch failed, skipping"
                    );
                    report.batches_failed += 1;
                }
            }

            if let Some(callback) = progress.as_ref() {
                callback("pairs", batch_index + 1, pair_batches);
            }
            if batch_index + 1 < pair_batches {
                sleep(Duration::from_millis(BATCH_PAUSE_MS)).await;
            }
        }

        if let Err(e) = self.index.persist().await {
            warn!(error = %e, "step: index persist failed, keeping in-memory entries");
        }

        report.elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            correspondent_id = %correspondent_id,
            threads_indexed = report.threads_indexed,
            pairs_indexed = report.pairs_indexed,
            batches_failed = report.batches_failed,
            "step: index build finished"
        );

        Ok(report)
    }

    /// Ranked (their message, the user's reply, similarity) tuples for the
    /// correspondent. Empty when the backend is unconfigured, the query embed
    /// fails, or nothing is indexed.
    pub async fn find_similar_context(
        &self,
        text: &str,
        correspondent_id: &str,
        limit: usize,
    ) -> Vec<(String, String, f32)> {
        let Some(query) = self.embed_query(text).await else {
            return Vec::new();
        };
        self.index
            .search_conversation_pairs(&query, correspondent_id, limit)
            .await
    }

    /// Ranked conversation threads for the correspondent, same degradation
    /// rules as [`find_similar_context`](Self::find_similar_context).
    pub async fn find_similar_threads(
        &self,
        text: &str,
        correspondent_id: &str,
        limit: usize,
    ) -> Vec<ConversationThread> {
        let Some(query) = self.embed_query(text).await else {
            return Vec::new();
        };
        self.index
            .search_conversation_threads(&query, correspondent_id, limit)
            .await
            .into_iter()
            .map(|(conversation, similarity)| ConversationThread {
                turns: conversation.turns,
                similarity,
            })
            .collect()
    }

    async fn embed_query(&self, text: &str) -> Option<Vec<f32>> {
        let embedding = self.embedding.as_ref()?;
        match embedding.embed(text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(error = %e, "step: query embedding failed");
                None
            }
        }
    }
}

fn to_turn(message: doppel_core::Message) -> ConversationTurn {
    ConversationTurn {
        is_me: message.sender == Sender::Me,
        content: message.content,
        timestamp: message.timestamp,
    }
}

fn batch_count(total: usize, batch_size: usize) -> usize {
    (total + batch_size - 1) / batch_size
}
