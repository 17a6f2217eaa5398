//! # doppel-cli
//!
//! Wiring for the `doppel` binary: backend client factories and message
//! export parsing. The subcommand handlers live in `main.rs`.

pub mod clients;
pub mod import;

pub use clients::{create_embedding_client, create_generation_client};
pub use import::parse_export;
