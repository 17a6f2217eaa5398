//! Respond-or-skip heuristics: an ordered decision list for direct chats plus
//! a topic-relevance gate for group conversations.

pub mod engine;
pub mod group;

pub use engine::{
    mentions_user, Confidence, Decision, DecisionReason, ResponseDecisionEngine, Verdict,
};
pub use group::GroupTopicEngine;
