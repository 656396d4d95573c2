//! Moderation error types.

use thiserror::Error;

/// Errors from a pluggable classifier backend.
///
/// These never escape the gateway: every variant is converted into a
/// fallback classification, with the message embedded in the verdict's
/// reason field for operator diagnosis.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend registered under the requested name.
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    /// Network-level failure (connect, timeout, non-success status).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend responded, but the payload failed schema validation.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur at the moderation persistence boundary.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The subject cannot be persisted (e.g. empty identifier).
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    /// The moderation store rejected the operation.
    #[error("Store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for moderation operations.
pub type Result<T> = std::result::Result<T, ModerationError>;
