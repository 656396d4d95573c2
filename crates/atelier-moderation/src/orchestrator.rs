//! Moderation pipeline orchestration.
//!
//! Dispatches by subject kind, short-circuits via the quick filter,
//! delegates to the gateway (which falls back internally), applies the
//! decision policy on the topic path, and persists verdicts idempotently.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ModerationError, Result};
use crate::filter::QuickFilter;
use crate::gateway::ClassifierGateway;
use crate::policy::{decide, RecommendedAction};
use crate::prompts::{
    comment_prompt, post_prompt, profile_prompt, topic_prompt, COMMENT_MAX_TOKENS,
    POST_MAX_TOKENS, PROFILE_MAX_TOKENS, REPORT_SYSTEM_PROMPT, TOPIC_MAX_TOKENS,
    TOPIC_SYSTEM_PROMPT,
};
use crate::store::{ModerationStore, StoredVerdict};
use crate::subject::ModerationSubject;
use crate::verdict::{ReportVerdict, TopicVerdict};

/// Confidence attached to a quick-filter short circuit on the report path.
const FILTER_REPORT_CONFIDENCE: f32 = 0.8;

/// Confidence attached to a quick-filter rejection on the topic path.
const FILTER_TOPIC_CONFIDENCE: f32 = 0.9;

/// Outcome of the topic path: the graded verdict plus the recommended
/// workflow action derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicReview {
    pub verdict: TopicVerdict,
    pub action: RecommendedAction,
}

/// Coordinates the quick filter, the classifier gateway and the decision
/// policy per subject kind, and owns idempotent verdict persistence.
pub struct ModerationOrchestrator {
    gateway: ClassifierGateway,
    filter: QuickFilter,
    store: Arc<dyn ModerationStore>,
    backend_name: String,
}

impl ModerationOrchestrator {
    /// Creates an orchestrator using the default quick-filter term lists.
    pub fn new(
        gateway: ClassifierGateway,
        store: Arc<dyn ModerationStore>,
        backend_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            filter: QuickFilter::with_defaults(),
            store,
            backend_name: backend_name.into(),
        }
    }

    /// Creates an orchestrator with a custom quick filter.
    pub fn with_filter(
        gateway: ClassifierGateway,
        filter: QuickFilter,
        store: Arc<dyn ModerationStore>,
        backend_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            filter,
            store,
            backend_name: backend_name.into(),
        }
    }

    /// Classifies reported content.
    ///
    /// Missing required text and non-report subject kinds return the safe
    /// default without any backend call. A quick-filter hit short-circuits
    /// at confidence 0.8 before the backend is consulted.
    pub async fn moderate_report(&self, subject: &ModerationSubject) -> ReportVerdict {
        let (scan_text, user_prompt, max_tokens) = match subject {
            ModerationSubject::Post { title, content, .. } => {
                if content.trim().is_empty() {
                    debug!(id = subject.id(), "empty post content, returning safe default");
                    return ReportVerdict::safe_default();
                }
                (
                    format!("{title} {content}"),
                    post_prompt(title, content),
                    POST_MAX_TOKENS,
                )
            }
            ModerationSubject::Comment { content, .. } => {
                if content.trim().is_empty() {
                    debug!(id = subject.id(), "empty comment, returning safe default");
                    return ReportVerdict::safe_default();
                }
                (content.clone(), comment_prompt(content), COMMENT_MAX_TOKENS)
            }
            ModerationSubject::UserProfile { username, bio, .. } => {
                if bio.trim().is_empty() && username.trim().is_empty() {
                    debug!(id = subject.id(), "empty profile, returning safe default");
                    return ReportVerdict::safe_default();
                }
                (
                    format!("{username} {bio}"),
                    profile_prompt(username, bio),
                    PROFILE_MAX_TOKENS,
                )
            }
            ModerationSubject::TopicSuggestion { .. } => {
                // Topic suggestions go through the topic path, never reports.
                debug!(id = subject.id(), "topic suggestion on report path, returning safe default");
                return ReportVerdict::safe_default();
            }
        };

        if self.filter.scan(&scan_text) {
            info!(id = subject.id(), "quick filter flagged reported content");
            return ReportVerdict::new(
                true,
                FILTER_REPORT_CONFIDENCE,
                Some("Contains inappropriate language".to_string()),
            );
        }

        self.gateway
            .classify_report(
                REPORT_SYSTEM_PROMPT,
                &user_prompt,
                max_tokens,
                &self.backend_name,
            )
            .await
    }

    /// Reviews a suggested topic and derives the recommended action.
    ///
    /// An empty or whitespace-only title yields the deterministic invalid
    /// verdict; a quick-filter hit on title or description rejects at
    /// confidence 0.9. Both short circuits skip the backend entirely.
    pub async fn moderate_topic(&self, subject: &ModerationSubject) -> TopicReview {
        let verdict = match subject {
            ModerationSubject::TopicSuggestion {
                title, description, ..
            } => {
                if title.trim().is_empty() {
                    debug!(id = subject.id(), "empty topic title");
                    TopicVerdict::invalid_title()
                } else if self.filter.scan(title) || self.filter.scan(description) {
                    info!(id = subject.id(), "quick filter rejected suggested topic");
                    TopicVerdict::new(
                        false,
                        0.0,
                        vec!["inappropriate".to_string()],
                        vec!["Contains inappropriate language".to_string()],
                        vec!["Remove inappropriate language and resubmit".to_string()],
                        FILTER_TOPIC_CONFIDENCE,
                    )
                } else {
                    self.gateway
                        .classify_topic(
                            TOPIC_SYSTEM_PROMPT,
                            &topic_prompt(title, description),
                            TOPIC_MAX_TOKENS,
                            &self.backend_name,
                        )
                        .await
                }
            }
            other => {
                debug!(id = other.id(), "non-topic subject on topic path");
                TopicVerdict::new(
                    false,
                    0.0,
                    vec!["invalid".to_string()],
                    vec!["Subject is not a topic suggestion".to_string()],
                    vec!["Submit through the report workflow".to_string()],
                    1.0,
                )
            }
        };

        let action = decide(&verdict);
        TopicReview { verdict, action }
    }

    /// Persists a report verdict if it differs from the stored snapshot.
    ///
    /// Returns true when a write was issued. Fails only on an empty
    /// subject identifier or a store error.
    pub async fn persist_report(
        &self,
        subject: &ModerationSubject,
        verdict: &ReportVerdict,
    ) -> Result<bool> {
        let record = StoredVerdict::from_report(checked_id(subject)?, subject.kind(), verdict);
        self.write_if_changed(record).await
    }

    /// Persists a topic review if it differs from the stored snapshot.
    pub async fn persist_topic(
        &self,
        subject: &ModerationSubject,
        review: &TopicReview,
    ) -> Result<bool> {
        let record = StoredVerdict::from_topic(checked_id(subject)?, &review.verdict, review.action);
        self.write_if_changed(record).await
    }

    /// Classifies and persists in one step. A persistence failure is
    /// logged and never discards the verdict already computed.
    pub async fn moderate_report_and_persist(&self, subject: &ModerationSubject) -> ReportVerdict {
        let verdict = self.moderate_report(subject).await;
        if let Err(error) = self.persist_report(subject, &verdict).await {
            tracing::warn!(id = subject.id(), %error, "failed to persist report verdict");
        }
        verdict
    }

    /// Topic counterpart of [`Self::moderate_report_and_persist`].
    pub async fn moderate_topic_and_persist(&self, subject: &ModerationSubject) -> TopicReview {
        let review = self.moderate_topic(subject).await;
        if let Err(error) = self.persist_topic(subject, &review).await {
            tracing::warn!(id = subject.id(), %error, "failed to persist topic review");
        }
        review
    }

    async fn write_if_changed(&self, record: StoredVerdict) -> Result<bool> {
        if let Some(existing) = self.store.load(&record.subject_id).await? {
            if existing.same_verdict(&record) {
                debug!(id = %record.subject_id, "verdict unchanged, skipping write");
                return Ok(false);
            }
        }

        self.store.patch(&record).await?;
        debug!(id = %record.subject_id, "verdict persisted");
        Ok(true)
    }
}

/// Validates the subject identifier at the persistence boundary.
fn checked_id(subject: &ModerationSubject) -> Result<&str> {
    let id = subject.id();
    if id.trim().is_empty() {
        return Err(ModerationError::InvalidSubject(
            "subject has no identifier".to_string(),
        ));
    }
    Ok(id)
}
