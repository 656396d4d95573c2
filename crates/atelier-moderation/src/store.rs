//! Moderation verdict persistence seam.
//!
//! The surrounding application owns content storage; this trait covers
//! only the "patch subject with moderation fields" operation and the
//! read-back needed for change detection.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModerationError, Result};
use crate::policy::RecommendedAction;
use crate::subject::SubjectKind;
use crate::verdict::{ReportVerdict, TopicVerdict};

/// Last-persisted moderation snapshot for a subject.
///
/// Holds the fields a collaborator patches onto the subject document.
/// `updated_at` is bookkeeping and excluded from change detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVerdict {
    pub subject_id: String,
    pub kind: SubjectKind,
    /// Report path only.
    pub is_violating: Option<bool>,
    /// Topic path only.
    pub is_approved: Option<bool>,
    /// Topic path only.
    pub suitability_score: Option<f32>,
    /// Topic path only.
    pub categories: Vec<String>,
    /// Topic path only.
    pub action: Option<RecommendedAction>,
    pub confidence: f32,
    pub reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StoredVerdict {
    /// Builds the snapshot for a report verdict.
    pub fn from_report(subject_id: &str, kind: SubjectKind, verdict: &ReportVerdict) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            kind,
            is_violating: Some(verdict.is_violating),
            is_approved: None,
            suitability_score: None,
            categories: Vec::new(),
            action: None,
            confidence: verdict.confidence,
            reason: verdict.reason.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Builds the snapshot for a topic verdict and its recommended action.
    pub fn from_topic(subject_id: &str, verdict: &TopicVerdict, action: RecommendedAction) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            kind: SubjectKind::TopicSuggestion,
            is_violating: None,
            is_approved: Some(verdict.is_approved),
            suitability_score: Some(verdict.suitability_score),
            categories: verdict.categories.clone(),
            action: Some(action),
            confidence: verdict.confidence,
            reason: verdict.reasons.first().cloned(),
            updated_at: Utc::now(),
        }
    }

    /// Field-equality over everything except `updated_at`. When this
    /// returns true the orchestrator skips the write.
    pub fn same_verdict(&self, other: &StoredVerdict) -> bool {
        self.subject_id == other.subject_id
            && self.kind == other.kind
            && self.is_violating == other.is_violating
            && self.is_approved == other.is_approved
            && self.suitability_score == other.suitability_score
            && self.categories == other.categories
            && self.action == other.action
            && self.confidence == other.confidence
            && self.reason == other.reason
    }
}

/// External document store holding moderation snapshots.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Loads the last-persisted snapshot for a subject, if any.
    async fn load(&self, subject_id: &str) -> Result<Option<StoredVerdict>>;

    /// Patches the subject with the given snapshot (upsert).
    async fn patch(&self, record: &StoredVerdict) -> Result<()>;
}

/// In-memory store, suitable for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, StoredVerdict>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records. A poisoned store reads as
    /// empty rather than panicking.
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquires the record map, surfacing poisoning as a store error.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoredVerdict>>> {
        self.records
            .lock()
            .map_err(|_| ModerationError::Store("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn load(&self, subject_id: &str) -> Result<Option<StoredVerdict>> {
        Ok(self.lock()?.get(subject_id).cloned())
    }

    async fn patch(&self, record: &StoredVerdict) -> Result<()> {
        self.lock()?
            .insert(record.subject_id.clone(), record.clone());
        Ok(())
    }
}
