//! Shared mocks for retrieval tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use doppel_core::{Message, Sender};
use embedding::EmbeddingClient;
use history::MessageHistory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn message(id: &str, correspondent: &str, sender: Sender, content: &str, minute: i64) -> Message {
    let base = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
    Message::new(id, correspondent, sender, content, base + Duration::minutes(minute))
}

/// History stub backed by a plain vector.
pub struct MockHistory {
    messages: Vec<Message>,
}

impl MockHistory {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl MessageHistory for MockHistory {
    async fn get_messages(
        &self,
        correspondent_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, anyhow::Error> {
        let mut selected: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.correspondent_id == correspondent_id)
            .cloned()
            .collect();
        if selected.len() > limit {
            selected = selected.split_off(selected.len() - limit);
        }
        Ok(selected)
    }

    async fn get_message_count(&self, correspondent_id: &str) -> Result<i64, anyhow::Error> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.correspondent_id == correspondent_id)
            .count() as i64)
    }
}

/// Embedding stub with canned vectors per exact input text. Unknown texts get
/// the default vector. Selected batch calls can be made to fail, and an
/// optional latency keeps calls pending long enough for concurrency tests.
pub struct MockEmbedding {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    failing_batches: Vec<usize>,
    fail_single: bool,
    latency: Option<std::time::Duration>,
    batch_calls: AtomicUsize,
    single_calls: AtomicUsize,
}

impl MockEmbedding {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default,
            failing_batches: Vec::new(),
            fail_single: false,
            latency: None,
            batch_calls: AtomicUsize::new(0),
            single_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Makes the `call_index`-th `embed_batch` call fail.
    pub fn failing_on_batch(mut self, call_index: usize) -> Self {
        self.failing_batches.push(call_index);
        self
    }

    pub fn failing_single(mut self) -> Self {
        self.fail_single = true;
        self
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_single {
            anyhow::bail!("mock embed failure");
        }
        Ok(self.lookup(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing_batches.contains(&call) {
            anyhow::bail!("mock batch failure");
        }
        Ok(texts.iter().map(|t| self.lookup(t)).collect())
    }
}
