//! Moderation record repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use atelier_moderation::{RecommendedAction, StoredVerdict, SubjectKind};

use crate::error::{Result, StorageError};

/// Repository for moderation verdict snapshots.
pub struct ModerationRecordsRepo;

impl ModerationRecordsRepo {
    /// Upsert a snapshot, keyed by subject id.
    pub fn upsert(conn: &Connection, record: &StoredVerdict) -> Result<()> {
        let categories_json = serde_json::to_string(&record.categories)?;

        conn.execute(
            "INSERT INTO moderation_records
                (subject_id, kind, is_violating, is_approved, suitability_score,
                 categories, action, confidence, reason, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(subject_id) DO UPDATE SET
                kind = excluded.kind,
                is_violating = excluded.is_violating,
                is_approved = excluded.is_approved,
                suitability_score = excluded.suitability_score,
                categories = excluded.categories,
                action = excluded.action,
                confidence = excluded.confidence,
                reason = excluded.reason,
                updated_at = excluded.updated_at",
            params![
                record.subject_id,
                record.kind.as_str(),
                record.is_violating.map(|b| b as i32),
                record.is_approved.map(|b| b as i32),
                record.suitability_score,
                categories_json,
                record.action.map(|a| a.as_str()),
                record.confidence,
                record.reason,
                record.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get the snapshot for a subject, if any.
    pub fn get(conn: &Connection, subject_id: &str) -> Result<Option<StoredVerdict>> {
        let mut stmt = conn.prepare(
            "SELECT subject_id, kind, is_violating, is_approved, suitability_score,
                    categories, action, confidence, reason, updated_at
             FROM moderation_records
             WHERE subject_id = ?1",
        )?;

        let row = stmt
            .query_row([subject_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<i32>>(2)?,
                    row.get::<_, Option<i32>>(3)?,
                    row.get::<_, Option<f32>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, f32>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .optional()?;

        let Some((
            subject_id,
            kind,
            is_violating,
            is_approved,
            suitability_score,
            categories,
            action,
            confidence,
            reason,
            updated_at,
        )) = row
        else {
            return Ok(None);
        };

        let kind: SubjectKind = kind
            .parse()
            .map_err(StorageError::Config)?;
        let action = action
            .map(|a| a.parse::<RecommendedAction>())
            .transpose()
            .map_err(StorageError::Config)?;

        Ok(Some(StoredVerdict {
            subject_id,
            kind,
            is_violating: is_violating.map(|v| v != 0),
            is_approved: is_approved.map(|v| v != 0),
            suitability_score,
            categories: parse_json_array(&categories),
            action,
            confidence,
            reason,
            updated_at: parse_datetime(&updated_at),
        }))
    }

    /// Delete the snapshot for a subject.
    pub fn delete(conn: &Connection, subject_id: &str) -> Result<bool> {
        let deleted = conn.execute(
            "DELETE FROM moderation_records WHERE subject_id = ?1",
            [subject_id],
        )?;
        Ok(deleted > 0)
    }

    /// Count snapshots, optionally per subject kind.
    pub fn count(conn: &Connection, kind: Option<SubjectKind>) -> Result<i64> {
        let count: i64 = match kind {
            Some(kind) => conn.query_row(
                "SELECT COUNT(*) FROM moderation_records WHERE kind = ?1",
                [kind.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM moderation_records", [], |row| {
                row.get(0)
            })?,
        };
        Ok(count)
    }
}

/// Parse a JSON array from string.
fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Parse a datetime from its stored RFC 3339 form.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
