//! # Vector Index
//!
//! In-memory store of embedded messages and embedded conversation threads
//! with cosine-similarity search filtered by correspondent. Persists both
//! collections as JSON documents and loads them eagerly at startup; a
//! missing or corrupt file means starting empty, never crashing.

mod index;
mod similarity;
mod types;

pub use index::{VectorIndex, PAIR_SIMILARITY_FLOOR, THREAD_SIMILARITY_FLOOR};
pub use similarity::cosine_similarity;
pub use types::{
    transcript_text, ConversationThread, ConversationTurn, EmbeddedConversation, EmbeddedMessage,
};
