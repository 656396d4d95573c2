//! High-level database interface.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use directories::ProjectDirs;
use rusqlite::Connection;
use tracing::info;

use atelier_moderation::{ModerationError, ModerationStore, StoredVerdict, SubjectKind};

use crate::error::{Result, StorageError};
use crate::repository::ModerationRecordsRepo;
use crate::schema::run_migrations;

/// SQLite-backed store for moderation verdict snapshots.
///
/// A Mutex-protected connection is sufficient here: snapshots are small
/// and writes are rare (the orchestrator skips unchanged verdicts).
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening moderation database at: {:?}", path);
        let conn = Connection::open(&path)?;
        Self::setup(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "atelier", "atelier")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("moderation.db"))
    }

    fn setup(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        run_migrations(conn)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Config("Connection mutex poisoned".to_string()))
    }

    /// Load the snapshot for a subject, if any.
    pub fn load_verdict(&self, subject_id: &str) -> Result<Option<StoredVerdict>> {
        let conn = self.lock()?;
        ModerationRecordsRepo::get(&conn, subject_id)
    }

    /// Patch the subject with a verdict snapshot (upsert).
    pub fn save_verdict(&self, record: &StoredVerdict) -> Result<()> {
        let conn = self.lock()?;
        ModerationRecordsRepo::upsert(&conn, record)
    }

    /// Delete the snapshot for a subject.
    pub fn delete_verdict(&self, subject_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        ModerationRecordsRepo::delete(&conn, subject_id)
    }

    /// Count snapshots, optionally per subject kind.
    pub fn count_verdicts(&self, kind: Option<SubjectKind>) -> Result<i64> {
        let conn = self.lock()?;
        ModerationRecordsRepo::count(&conn, kind)
    }
}

// SQLite calls hold the connection mutex, so they run on the blocking
// pool instead of the async worker threads.
#[async_trait]
impl ModerationStore for Database {
    async fn load(
        &self,
        subject_id: &str,
    ) -> atelier_moderation::Result<Option<StoredVerdict>> {
        let db = self.clone();
        let subject_id = subject_id.to_string();
        tokio::task::spawn_blocking(move || db.load_verdict(&subject_id))
            .await
            .map_err(|e| ModerationError::Store(e.to_string()))?
            .map_err(|e| ModerationError::Store(e.to_string()))
    }

    async fn patch(&self, record: &StoredVerdict) -> atelier_moderation::Result<()> {
        let db = self.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || db.save_verdict(&record))
            .await
            .map_err(|e| ModerationError::Store(e.to_string()))?
            .map_err(|e| ModerationError::Store(e.to_string()))
    }
}
