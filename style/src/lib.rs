//! # Style
//!
//! Extracts a quantitative writing-style profile from a person's own messages.
//! The profile feeds prompt assembly in the generation layer; the builder is a
//! pure function over a message slice so it can be cached and rebuilt at will.

pub mod builder;
pub mod profile;

pub use builder::StyleProfileBuilder;
pub use profile::{
    CapitalizationStyle, EmotionalPhrases, ResponseContext, SampleResponses, StyleProfile,
};
