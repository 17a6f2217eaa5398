//! Error taxonomy for the workspace.
//!
//! Absent configuration and insufficient data are not errors anywhere in the
//! engine (they degrade to "no reply"); these variants cover genuine failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoppelError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, DoppelError>;
