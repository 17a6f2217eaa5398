//! Bounded per-correspondent cache of built style profiles.

use anyhow::Result;
use history::MessageHistory;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use style::{StyleProfile, StyleProfileBuilder};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Messages read from history when (re)building a profile.
const PROFILE_HISTORY_LIMIT: usize = 500;

/// Caches one built profile per correspondent, evicting the oldest entry once
/// `capacity` is reached. Profiles only change when history changes, so
/// rebuilds go through the explicit invalidate calls.
pub struct ProfileCache {
    history: Arc<dyn MessageHistory>,
    builder: StyleProfileBuilder,
    capacity: usize,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    profiles: HashMap<String, Arc<StyleProfile>>,
    order: VecDeque<String>,
}

impl ProfileCache {
    pub fn new(history: Arc<dyn MessageHistory>, capacity: usize) -> Self {
        Self {
            history,
            builder: StyleProfileBuilder::new(),
            capacity: capacity.max(1),
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Cached profile for the correspondent, built from their recent history
    /// on the first request.
    pub async fn get_or_build(&self, correspondent_id: &str) -> Result<Arc<StyleProfile>> {
        if let Some(profile) = self.state.read().await.profiles.get(correspondent_id) {
            debug!(correspondent_id = %correspondent_id, "step: profile cache hit");
            return Ok(profile.clone());
        }

        let messages = self
            .history
            .get_messages(correspondent_id, PROFILE_HISTORY_LIMIT)
            .await?;
        let profile = Arc::new(self.builder.build(&messages));

        let mut state = self.state.write().await;
        // Two tasks can race past the read check; the first insert wins.
        if !state.profiles.contains_key(correspondent_id) {
            if state.profiles.len() >= self.capacity {
                if let Some(evicted) = state.order.pop_front() {
                    state.profiles.remove(&evicted);
                    debug!(correspondent_id = %evicted, "step: profile evicted");
                }
            }
            state
                .profiles
                .insert(correspondent_id.to_string(), profile.clone());
            state.order.push_back(correspondent_id.to_string());

            info!(
                correspondent_id = %correspondent_id,
                source_messages = profile.message_count,
                "step: style profile built"
            );
        }

        Ok(profile)
    }

    /// Drops the cached profile so the next request rebuilds it. Call after
    /// importing new history for the correspondent.
    pub async fn invalidate(&self, correspondent_id: &str) {
        let mut state = self.state.write().await;
        state.profiles.remove(correspondent_id);
        state.order.retain(|id| id != correspondent_id);
    }

    pub async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.profiles.clear();
        state.order.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use doppel_core::{Message, Sender};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHistory {
        messages: Vec<Message>,
        calls: AtomicUsize,
    }

    impl CountingHistory {
        fn new(messages: Vec<Message>) -> Self {
            Self {
                messages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MessageHistory for CountingHistory {
        async fn get_messages(
            &self,
            correspondent_id: &str,
            _limit: usize,
        ) -> Result<Vec<Message>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .messages
                .iter()
                .filter(|m| m.correspondent_id == correspondent_id)
                .cloned()
                .collect())
        }

        async fn get_message_count(&self, correspondent_id: &str) -> Result<i64> {
            Ok(self
                .messages
                .iter()
                .filter(|m| m.correspondent_id == correspondent_id)
                .count() as i64)
        }
    }

    fn chat(correspondent_id: &str, count: usize) -> Vec<Message> {
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::Them } else { Sender::Me };
                Message::new(
                    format!("{}-{}", correspondent_id, i),
                    correspondent_id,
                    sender,
                    format!("mensagem {}", i),
                    base + Duration::minutes(i as i64),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_second_get_hits_the_cache() {
        let history = Arc::new(CountingHistory::new(chat("ana", 10)));
        let cache = ProfileCache::new(history.clone(), 8);

        let first = cache.get_or_build("ana").await.unwrap();
        let second = cache.get_or_build("ana").await.unwrap();

        assert_eq!(history.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.message_count, second.message_count);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let history = Arc::new(CountingHistory::new(chat("ana", 10)));
        let cache = ProfileCache::new(history.clone(), 8);

        cache.get_or_build("ana").await.unwrap();
        cache.invalidate("ana").await;
        cache.get_or_build("ana").await.unwrap();

        assert_eq!(history.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let mut messages = chat("ana", 6);
        messages.extend(chat("bruno", 6));
        messages.extend(chat("carla", 6));
        let history = Arc::new(CountingHistory::new(messages));
        let cache = ProfileCache::new(history.clone(), 2);

        cache.get_or_build("ana").await.unwrap();
        cache.get_or_build("bruno").await.unwrap();
        cache.get_or_build("carla").await.unwrap();

        assert_eq!(cache.len().await, 2);

        // "ana" was evicted, so this builds again.
        cache.get_or_build("ana").await.unwrap();
        assert_eq!(history.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_invalidate_all_empties_the_cache() {
        let history = Arc::new(CountingHistory::new(chat("ana", 6)));
        let cache = ProfileCache::new(history, 8);

        cache.get_or_build("ana").await.unwrap();
        cache.invalidate_all().await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_profile_reflects_own_messages_only() {
        let history = Arc::new(CountingHistory::new(chat("ana", 10)));
        let cache = ProfileCache::new(history, 8);

        let profile = cache.get_or_build("ana").await.unwrap();

        // 10 alternating messages hold 5 self-authored ones.
        assert_eq!(profile.message_count, 5);
    }
}
