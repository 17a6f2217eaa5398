//! Shared mocks for generation tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use doppel_core::{Message, Sender};
use history::MessageHistory;
use llm_client::GenerationClient;
use std::sync::Mutex;

/// 14:00 UTC, comfortably outside quiet hours.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap()
}

pub fn message(id: &str, correspondent: &str, sender: Sender, content: &str, minute: i64) -> Message {
    Message::new(id, correspondent, sender, content, base_time() + Duration::minutes(minute))
}

/// `count` alternating Them/Me messages one minute apart, so `count / 2`
/// reply pairs.
pub fn chat(correspondent: &str, count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let (sender, content) = if i % 2 == 0 {
                (Sender::Them, format!("pergunta {}?", i))
            } else {
                (Sender::Me, format!("resposta {}", i))
            };
            message(
                &format!("{}-{}", correspondent, i),
                correspondent,
                sender,
                &content,
                i as i64,
            )
        })
        .collect()
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

/// Generation stub that returns a canned completion and records the prompts
/// it was handed.
pub struct MockGeneration {
    response: String,
    fail: bool,
    last_prompt: Mutex<Option<String>>,
    last_system: Mutex<Option<String>>,
}

impl MockGeneration {
    pub fn replying(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            last_prompt: Mutex::new(None),
            last_system: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            last_prompt: Mutex::new(None),
            last_system: Mutex::new(None),
        }
    }

    /// The user prompt from the last call, if any call was made.
    pub fn prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockGeneration {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> anyhow::Result<String> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_system.lock().unwrap() = Some(system_prompt.unwrap_or_default().to_string());
        if self.fail {
            anyhow::bail!("backend unavailable");
        }
        Ok(self.response.clone())
    }
}
