//! Retrieval layer: turns raw history into embedded threads and reply pairs,
//! and answers "what did this conversation look like before" queries.

pub mod orchestrator;
pub mod threads;

pub use orchestrator::{IndexReport, ProgressFn, RetrievalOrchestrator};
pub use threads::{build_pairs, build_threads};
