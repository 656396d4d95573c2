//! Classification verdicts produced by the moderation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder category used when a backend omits or malforms the list.
pub const DEFAULT_CATEGORY: &str = "needs_review";

/// Placeholder reason used when a backend omits or malforms the list.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Placeholder suggestion used when a backend omits or malforms the list.
pub const DEFAULT_SUGGESTION: &str = "No suggestions available";

/// Binary violation verdict for reported content (posts, comments, profiles).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportVerdict {
    /// Whether the content violates community rules.
    pub is_violating: bool,
    /// Why the content was flagged, if it was.
    pub reason: Option<String>,
    /// Classifier certainty (0.0 to 1.0).
    pub confidence: f32,
    /// Reserved for a future backend integration; never set today.
    #[serde(default)]
    pub rate_limited: bool,
}

impl ReportVerdict {
    /// Creates a new verdict, clamping confidence to [0, 1].
    pub fn new(is_violating: bool, confidence: f32, reason: Option<String>) -> Self {
        Self {
            is_violating,
            reason,
            confidence: confidence.clamp(0.0, 1.0),
            rate_limited: false,
        }
    }

    /// The deterministic non-violating default, used when there is nothing
    /// to classify.
    pub fn safe_default() -> Self {
        Self::new(false, 0.0, None)
    }
}

/// Graded suitability verdict for a suggested topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicVerdict {
    /// Whether the topic fits the platform's content domain.
    pub is_approved: bool,
    /// How well the topic fits (0.0 to 1.0).
    pub suitability_score: f32,
    /// Topic categories; never empty after normalization.
    pub categories: Vec<String>,
    /// Reasons behind the verdict; never empty after normalization.
    pub reasons: Vec<String>,
    /// Suggestions for improving the topic; never empty after normalization.
    pub suggestions: Vec<String>,
    /// Classifier certainty (0.0 to 1.0).
    pub confidence: f32,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl TopicVerdict {
    /// Creates a new verdict, clamping numeric fields to [0, 1] and
    /// substituting placeholders for empty lists.
    pub fn new(
        is_approved: bool,
        suitability_score: f32,
        categories: Vec<String>,
        reasons: Vec<String>,
        suggestions: Vec<String>,
        confidence: f32,
    ) -> Self {
        Self {
            is_approved,
            suitability_score: suitability_score.clamp(0.0, 1.0),
            categories: non_empty(categories, DEFAULT_CATEGORY),
            reasons: non_empty(reasons, DEFAULT_REASON),
            suggestions: non_empty(suggestions, DEFAULT_SUGGESTION),
            confidence: confidence.clamp(0.0, 1.0),
            checked_at: Utc::now(),
        }
    }

    /// The deterministic verdict for a topic with a missing title.
    pub fn invalid_title() -> Self {
        Self::new(
            false,
            0.0,
            vec!["invalid".to_string()],
            vec!["Title is required".to_string()],
            vec!["Provide a title for the suggested topic".to_string()],
            1.0,
        )
    }

    /// Returns true if the verdict carries the given category.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Substitutes a placeholder when the list is empty.
fn non_empty(list: Vec<String>, placeholder: &str) -> Vec<String> {
    if list.is_empty() {
        vec![placeholder.to_string()]
    } else {
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_verdict_clamps_confidence() {
        let verdict = ReportVerdict::new(true, 1.5, None);
        assert_eq!(verdict.confidence, 1.0);

        let verdict = ReportVerdict::new(false, -0.2, None);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn report_verdict_never_rate_limited() {
        let verdict = ReportVerdict::new(true, 0.9, Some("spam".to_string()));
        assert!(!verdict.rate_limited);
    }

    #[test]
    fn safe_default_is_non_violating_zero_confidence() {
        let verdict = ReportVerdict::safe_default();
        assert!(!verdict.is_violating);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn topic_verdict_clamps_numeric_fields() {
        let verdict = TopicVerdict::new(true, 1.5, vec![], vec![], vec![], -0.2);
        assert_eq!(verdict.suitability_score, 1.0);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn topic_verdict_lists_never_empty() {
        let verdict = TopicVerdict::new(true, 0.5, vec![], vec![], vec![], 0.5);
        assert_eq!(verdict.categories, vec![DEFAULT_CATEGORY.to_string()]);
        assert_eq!(verdict.reasons, vec![DEFAULT_REASON.to_string()]);
        assert_eq!(verdict.suggestions, vec![DEFAULT_SUGGESTION.to_string()]);
    }

    #[test]
    fn topic_verdict_keeps_provided_lists() {
        let verdict = TopicVerdict::new(
            true,
            0.9,
            vec!["art_design".to_string()],
            vec!["On-topic".to_string()],
            vec![],
            0.9,
        );
        assert_eq!(verdict.categories, vec!["art_design".to_string()]);
        assert!(verdict.has_category("art_design"));
        assert!(!verdict.has_category("inappropriate"));
    }

    #[test]
    fn invalid_title_verdict_shape() {
        let verdict = TopicVerdict::invalid_title();
        assert!(!verdict.is_approved);
        assert_eq!(verdict.suitability_score, 0.0);
        assert_eq!(verdict.categories, vec!["invalid".to_string()]);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.reasons, vec!["Title is required".to_string()]);
    }

    #[test]
    fn rate_limited_defaults_false_on_deserialize() {
        let json = r#"{"is_violating":false,"reason":null,"confidence":0.3}"#;
        let verdict: ReportVerdict = serde_json::from_str(json).unwrap();
        assert!(!verdict.rate_limited);
    }
}
