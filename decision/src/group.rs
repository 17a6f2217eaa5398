//! Topic-relevance gate for group chats.
//!
//! Groups are noisy, so a default-respond policy would make the engine talk
//! over everyone. The gate keeps a short rolling window per group, embeds the
//! window plus the incoming message, and only lets generation proceed when
//! that text lands near conversations the user actually took part in.

use doppel_core::Message;
use embedding::EmbeddingClient;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vector_index::VectorIndex;

/// Rolling window size per group.
pub const GROUP_WINDOW_CAP: usize = 15;
/// Turns required before the gate evaluates at all.
const MIN_CONTEXT_TURNS: usize = 3;
/// Relevance needed when the incoming message is a question.
const QUESTION_THRESHOLD: f32 = 0.45;
/// Relevance needed for plain statements.
const STATEMENT_THRESHOLD: f32 = 0.55;
/// Added when several matches are individually strong.
const RELEVANCE_BOOST: f32 = 0.1;
const BOOST_MATCH_FLOOR: f32 = 0.5;
const BOOST_MATCH_COUNT: usize = 2;
/// Matches averaged into the relevance score.
const TOP_MATCHES: usize = 5;
/// Keyword fallback: words this short carry no topical signal.
const KEYWORD_MIN_CHARS: usize = 4;
const KEYWORD_MIN_SHARED: usize = 2;
const FALLBACK_PAIR_LIMIT: usize = 50;

/// Per-group rolling context plus the participation check.
///
/// Without an embedding backend the gate goes straight to the keyword
/// fallback instead of refusing to work.
pub struct GroupTopicEngine {
    embedding: Option<Arc<dyn EmbeddingClient>>,
    index: Arc<VectorIndex>,
    windows: RwLock<HashMap<String, VecDeque<String>>>,
}

impl GroupTopicEngine {
    pub fn new(embedding: Option<Arc<dyn EmbeddingClient>>, index: Arc<VectorIndex>) -> Self {
        Self {
            embedding,
            index,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Appends one turn to the group's window, evicting the oldest past
    /// [`GROUP_WINDOW_CAP`].
    pub async fn record(&self, group_id: &str, text: &str) {
        let mut windows = self.windows.write().await;
        let window = windows.entry(group_id.to_string()).or_default();
        if window.len() == GROUP_WINDOW_CAP {
            window.pop_front();
        }
        window.push_back(text.to_string());
    }

    /// Drops the group's window entirely.
    pub async fn invalidate(&self, group_id: &str) {
        self.windows.write().await.remove(group_id);
    }

    pub async fn window_len(&self, group_id: &str) -> usize {
        self.windows
            .read()
            .await
            .get(group_id)
            .map_or(0, VecDeque::len)
    }

    /// Decides whether the user would plausibly join in on `message`.
    pub async fn should_participate(
        &self,
        group_id: &str,
        message: &Message,
        correspondent_id: &str,
    ) -> bool {
        let window: Vec<String> = {
            let windows = self.windows.read().await;
            match windows.get(group_id) {
                Some(w) if w.len() >= MIN_CONTEXT_TURNS => w.iter().cloned().collect(),
                _ => {
                    debug!(group_id = %group_id, "step: group window too small, staying quiet");
                    return false;
                }
            }
        };

        let threshold = if lexicon::is_question(&message.content) {
            QUESTION_THRESHOLD
        } else {
            STATEMENT_THRESHOLD
        };

        if let Some(relevance) = self
            .topic_relevance(&window, &message.content, correspondent_id)
            .await
        {
            if relevance >= threshold {
                info!(
                    group_id = %group_id,
                    relevance = relevance,
                    threshold = threshold,
                    "step: group topic relevant, participating"
                );
                return true;
            }
            debug!(
                group_id = %group_id,
                relevance = relevance,
                threshold = threshold,
                "step: group topic below threshold"
            );
        }

        self.matches_response_pattern(&message.content, correspondent_id)
            .await
    }

    /// Average similarity of the window-plus-message text against the
    /// correspondent's indexed context. `None` when no embedding is possible;
    /// an empty index scores 0.0.
    async fn topic_relevance(
        &self,
        window: &[String],
        current: &str,
        correspondent_id: &str,
    ) -> Option<f32> {
        let embedding = self.embedding.as_ref()?;

        let mut text = window.join("\n");
        text.push('\n');
        text.push_str(current);

        let query = match embedding.embed(&text).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "step: group window embedding failed");
                return None;
            }
        };

        let matches = self
            .index
            .search(&query, Some(correspondent_id), TOP_MATCHES, 0.0)
            .await;
        if matches.is_empty() {
            return Some(0.0);
        }

        let mut relevance =
            matches.iter().map(|(_, sim)| sim).sum::<f32>() / matches.len() as f32;
        let strong = matches
            .iter()
            .filter(|(_, sim)| *sim > BOOST_MATCH_FLOOR)
            .count();
        if strong >= BOOST_MATCH_COUNT {
            relevance += RELEVANCE_BOOST;
        }

        Some(relevance)
    }

    /// Keyword fallback: the message shares enough meaningful words with
    /// replies the user has given this correspondent before.
    async fn matches_response_pattern(&self, current: &str, correspondent_id: &str) -> bool {
        let pairs = self
            .index
            .recent_pairs(correspondent_id, FALLBACK_PAIR_LIMIT)
            .await;
        if pairs.is_empty() {
            return false;
        }

        let current_words = keywords(current);
        for (_, reply) in &pairs {
            let shared = current_words.intersection(&keywords(reply)).count();
            if shared >= KEYWORD_MIN_SHARED {
                info!(
                    correspondent_id = %correspondent_id,
                    shared = shared,
                    "step: matches historical response pattern, participating"
                );
                return true;
            }
        }

        false
    }
}

fn keywords(text: &str) -> HashSet<String> {
    lexicon::tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= KEYWORD_MIN_CHARS)
        .collect()
}
