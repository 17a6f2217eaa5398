//! End-to-end reply pipeline.
//!
//! Order matters: cheap gates first (feature flag, decision rules), then
//! sanitization, then the history floor, and only then the expensive parts
//! (retrieval, profile build, backend call). Every skip returns `Ok(None)`;
//! only a failing backend or history store surfaces an error.

use crate::cache::ProfileCache;
use crate::output::clean_output;
use crate::prompt::PromptBuilder;
use crate::sanitize::sanitize_incoming;
use anyhow::Result;
use decision::{mentions_user, GroupTopicEngine, ResponseDecisionEngine, Verdict};
use doppel_core::{Correspondent, Message, Settings};
use history::MessageHistory;
use llm_client::GenerationClient;
use retrieval::{build_pairs, RetrievalOrchestrator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Messages pulled for decision context and pair counting.
const RECENT_CONTEXT_LIMIT: usize = 200;

/// Below these floors the profile and examples would be noise, so the engine
/// stays quiet rather than reply out of character.
const MIN_HISTORY_MESSAGES: usize = 10;
const MIN_HISTORY_PAIRS: usize = 5;

/// Retrieved context pulled into each prompt.
const RETRIEVED_THREADS: usize = 2;
const RETRIEVED_PAIRS: usize = 3;

const PROFILE_CACHE_CAPACITY: usize = 64;

pub struct GenerationOrchestrator {
    settings: Settings,
    history: Arc<dyn MessageHistory>,
    retrieval: Arc<RetrievalOrchestrator>,
    generation: Option<Arc<dyn GenerationClient>>,
    decision: ResponseDecisionEngine,
    group_topic: Option<Arc<GroupTopicEngine>>,
    profiles: ProfileCache,
}

impl GenerationOrchestrator {
    pub fn new(
        settings: Settings,
        history: Arc<dyn MessageHistory>,
        retrieval: Arc<RetrievalOrchestrator>,
        generation: Option<Arc<dyn GenerationClient>>,
    ) -> Self {
        let decision = ResponseDecisionEngine::new(settings.user_name.clone());
        let profiles = ProfileCache::new(history.clone(), PROFILE_CACHE_CAPACITY);
        Self {
            settings,
            history,
            retrieval,
            generation,
            decision,
            group_topic: None,
            profiles,
        }
    }

    /// Enables topic-based participation in group chats.
    pub fn with_group_topic(mut self, engine: Arc<GroupTopicEngine>) -> Self {
        self.group_topic = Some(engine);
        self
    }

    /// Replaces the default decision engine, e.g. to set a timezone offset.
    pub fn with_decision_engine(mut self, engine: ResponseDecisionEngine) -> Self {
        self.decision = engine;
        self
    }

    /// Drops the cached style profile for one correspondent. Call after
    /// importing new history.
    pub async fn invalidate_profile(&self, correspondent_id: &str) {
        self.profiles.invalidate(correspondent_id).await;
    }

    /// Produces a reply to `incoming`, or `None` when the engine decides to
    /// stay quiet. Backend and history failures are errors; a rejected
    /// completion is not.
    pub async fn generate(
        &self,
        correspondent: &Correspondent,
        incoming: &Message,
    ) -> Result<Option<String>> {
        if !self.settings.smart_response {
            debug!("step: smart response disabled");
            return Ok(None);
        }

        let Some(generation) = self.generation.as_ref() else {
            info!("step: no generation backend configured, staying quiet");
            return Ok(None);
        };

        if correspondent.is_group && !self.should_join_group(correspondent, incoming).await {
            return Ok(None);
        }

        let recent = self
            .history
            .get_messages(&correspondent.id, RECENT_CONTEXT_LIMIT)
            .await?;

        let decision = self.decision.decide(incoming, correspondent, &recent);
        if decision.verdict == Verdict::Skip {
            info!(
                correspondent_id = %correspondent.id,
                reason = %decision.reason,
                "step: skipping reply"
            );
            return Ok(None);
        }

        let sanitized = sanitize_incoming(&incoming.content);
        if sanitized.is_empty() {
            info!(
                correspondent_id = %correspondent.id,
                "step: message empty after sanitizing, staying quiet"
            );
            return Ok(None);
        }

        let total = self.history.get_message_count(&correspondent.id).await?;
        let pair_count = build_pairs(&recent).len();
        if (total as usize) < MIN_HISTORY_MESSAGES || pair_count < MIN_HISTORY_PAIRS {
            info!(
                correspondent_id = %correspondent.id,
                messages = total,
                pairs = pair_count,
                "step: not enough history to imitate, staying quiet"
            );
            return Ok(None);
        }

        let mut threads = Vec::new();
        let mut pairs = Vec::new();
        if self.settings.use_rag {
            threads = self
                .retrieval
                .find_similar_threads(&sanitized, &correspondent.id, RETRIEVED_THREADS)
                .await;
            if threads.is_empty() {
                pairs = self
                    .retrieval
                    .find_similar_context(&sanitized, &correspondent.id, RETRIEVED_PAIRS)
                    .await;
            }
        }

        let profile = self.profiles.get_or_build(&correspondent.id).await?;

        let (system_prompt, user_prompt) =
            PromptBuilder::new(&self.settings.user_name, &correspondent.name, &profile)
                .with_threads(&threads)
                .with_pairs(&pairs)
                .build(&sanitized);

        debug!(
            correspondent_id = %correspondent.id,
            threads = threads.len(),
            pairs = pairs.len(),
            "step: prompt assembled"
        );

        let raw = generation.generate(&user_prompt, Some(&system_prompt)).await?;

        match clean_output(&raw, &self.settings.user_name) {
            Some(reply) => {
                info!(
                    correspondent_id = %correspondent.id,
                    chars = reply.chars().count(),
                    "step: reply generated"
                );
                Ok(Some(reply))
            }
            None => {
                warn!(
                    correspondent_id = %correspondent.id,
                    "step: completion rejected by output validation"
                );
                Ok(None)
            }
        }
    }

    /// Group messages only get replies when the user is mentioned, unless
    /// topic participation is on and the topic engine recognizes the subject.
    async fn should_join_group(&self, correspondent: &Correspondent, incoming: &Message) -> bool {
        if mentions_user(&self.settings.user_name, &incoming.content) {
            return true;
        }

        if !self.settings.group_topic_participation {
            debug!(
                correspondent_id = %correspondent.id,
                "step: group message without mention, staying quiet"
            );
            return false;
        }

        match self.group_topic.as_ref() {
            Some(engine) => {
                engine
                    .should_participate(&correspondent.id, incoming, &correspondent.id)
                    .await
            }
            None => false,
        }
    }
}
