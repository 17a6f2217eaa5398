//! # doppel-core
//!
//! Core types for the auto-reply engine: [`Message`], [`Correspondent`], the
//! error taxonomy, [`Settings`], and tracing initialization. Transport- and
//! backend-agnostic; every other crate in the workspace builds on this one.

pub mod error;
pub mod logger;
pub mod settings;
pub mod types;

pub use error::{DoppelError, Result};
pub use logger::init_tracing;
pub use settings::{Backend, EmbeddingProvider, Settings};
pub use types::{Correspondent, Message, Sender};
