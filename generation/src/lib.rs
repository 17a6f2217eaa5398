//! # Generation
//!
//! The reply pipeline: gates a message through the decision rules, sanitizes
//! it, assembles a persona prompt from the style profile and retrieved
//! context, calls the generation backend and validates what comes back.

pub mod cache;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod sanitize;

pub use cache::ProfileCache;
pub use orchestrator::GenerationOrchestrator;
pub use output::clean_output;
pub use prompt::PromptBuilder;
pub use sanitize::sanitize_incoming;
