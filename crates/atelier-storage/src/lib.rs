//! Atelier Storage - SQLite persistence for moderation verdicts.
//!
//! Implements the [`atelier_moderation::ModerationStore`] contract over a
//! local SQLite database. Only the verdict snapshot is stored; the content
//! itself belongs to the surrounding application.
//!
//! # Example
//!
//! ```no_run
//! use atelier_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//! assert!(db.load_verdict("post-1").unwrap().is_none());
//! ```

mod database;
pub mod error;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use repository::ModerationRecordsRepo;
