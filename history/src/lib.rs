//! Message archive for the reply engine.
//!
//! Imported conversations land in SQLite through [`SqliteHistory`]; everything
//! downstream reads them back through the [`MessageHistory`] trait and never
//! touches SQL.

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteHistory;
pub use store::{HistoryStats, MessageHistory};
