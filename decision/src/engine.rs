//! Ordered heuristic rules deciding whether a message deserves an auto-reply.

use chrono::{Duration, Timelike};
use doppel_core::{Correspondent, Message};
use std::fmt;
use tracing::debug;

/// Quiet hours end at this local hour (exclusive). Messages between midnight
/// and 06:59 are never auto-answered.
const QUIET_END_HOUR: u32 = 7;
/// A conversation counts as active when the previous message is at most this
/// many minutes old.
const ACTIVE_WINDOW_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Respond,
    Skip,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Respond => write!(f, "respond"),
            Verdict::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Which rule produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    QuietHours,
    Acknowledgment,
    Question,
    DirectAddress,
    Greeting,
    Request,
    ActiveConversation,
    Closing,
    Default,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecisionReason::QuietHours => "quiet hours",
            DecisionReason::Acknowledgment => "bare acknowledgment",
            DecisionReason::Question => "question",
            DecisionReason::DirectAddress => "directly addressed",
            DecisionReason::Greeting => "greeting",
            DecisionReason::Request => "request",
            DecisionReason::ActiveConversation => "active conversation",
            DecisionReason::Closing => "conversation closing",
            DecisionReason::Default => "no specific signal",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub reason: DecisionReason,
}

impl Decision {
    fn respond(confidence: Confidence, reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Respond,
            confidence,
            reason,
        }
    }

    fn skip(confidence: Confidence, reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Skip,
            confidence,
            reason,
        }
    }
}

/// True when `content` addresses `user_name` directly, as a bare name token
/// or an @mention. Multi-word display names match on their first word.
pub fn mentions_user(user_name: &str, content: &str) -> bool {
    match lexicon::tokenize(user_name).into_iter().next() {
        Some(first) => lexicon::tokenize(content).iter().any(|t| *t == first),
        None => false,
    }
}

/// Stateless respond-or-skip classifier.
///
/// Rules are evaluated in a fixed order and the first match wins; the order
/// encodes priority (time of day above everything, then cheap lexical
/// signals, then conversational context).
pub struct ResponseDecisionEngine {
    user_name: String,
    timezone_offset_hours: i32,
}

impl ResponseDecisionEngine {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            timezone_offset_hours: 0,
        }
    }

    /// Shifts message timestamps by `hours` before the hour-of-day rule.
    /// Timestamps are stored in UTC; the quiet-hours window is local.
    pub fn with_timezone_offset(mut self, hours: i32) -> Self {
        self.timezone_offset_hours = hours;
        self
    }

    pub fn decide(
        &self,
        message: &Message,
        correspondent: &Correspondent,
        recent_messages: &[Message],
    ) -> Decision {
        let decision = self.evaluate(message, recent_messages);
        debug!(
            correspondent_id = %correspondent.id,
            verdict = %decision.verdict,
            confidence = %decision.confidence,
            reason = %decision.reason,
            "step: decision evaluated"
        );
        decision
    }

    fn evaluate(&self, message: &Message, recent_messages: &[Message]) -> Decision {
        let content = message.content.as_str();

        let local = message.timestamp + Duration::hours(self.timezone_offset_hours as i64);
        if local.hour() < QUIET_END_HOUR {
            return Decision::skip(Confidence::High, DecisionReason::QuietHours);
        }

        if lexicon::is_acknowledgment(content) {
            return Decision::skip(Confidence::High, DecisionReason::Acknowledgment);
        }

        if lexicon::is_question(content) {
            return Decision::respond(Confidence::High, DecisionReason::Question);
        }

        if mentions_user(&self.user_name, content) {
            return Decision::respond(Confidence::High, DecisionReason::DirectAddress);
        }

        if lexicon::is_greeting(content) {
            return Decision::respond(Confidence::High, DecisionReason::Greeting);
        }

        if lexicon::is_request(content) {
            return Decision::respond(Confidence::Medium, DecisionReason::Request);
        }

        if self.conversation_is_active(message, recent_messages) && lexicon::invites_reply(content)
        {
            return Decision::respond(Confidence::Medium, DecisionReason::ActiveConversation);
        }

        if lexicon::is_closing(content) {
            return Decision::skip(Confidence::Medium, DecisionReason::Closing);
        }

        Decision::respond(Confidence::Low, DecisionReason::Default)
    }

    fn conversation_is_active(&self, message: &Message, recent_messages: &[Message]) -> bool {
        recent_messages.last().map_or(false, |previous| {
            let gap = message.timestamp - previous.timestamp;
            gap >= Duration::zero() && gap <= Duration::minutes(ACTIVE_WINDOW_MINUTES)
        })
    }
}
