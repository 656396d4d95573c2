//! Heuristic fallback classifiers.
//!
//! Active only when the primary AI backend errors or is unavailable.
//! Both functions are pure and never fail: reduced-trust confidence values
//! and the truncated backend error are embedded in the verdict so
//! operators can see why the degraded path ran.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::filter::TermMatcher;
use crate::verdict::{ReportVerdict, TopicVerdict};

/// Confidence when the report fallback finds harmful content.
const REPORT_MATCH_CONFIDENCE: f32 = 0.7;

/// Confidence when the report fallback finds nothing.
const REPORT_NO_MATCH_CONFIDENCE: f32 = 0.3;

/// Confidence when the topic fallback finds inappropriate content.
const TOPIC_INAPPROPRIATE_CONFIDENCE: f32 = 0.8;

/// Fixed confidence for heuristic topic scoring (reduced trust relative
/// to a real AI verdict).
const TOPIC_HEURISTIC_CONFIDENCE: f32 = 0.4;

/// Score contribution per matched domain keyword.
const KEYWORD_SCORE_STEP: f32 = 0.12;

/// Ceiling for the heuristic suitability score.
const KEYWORD_SCORE_CAP: f32 = 0.6;

/// Minimum heuristic score for approval.
const APPROVAL_THRESHOLD: f32 = 0.4;

/// Max characters of the backend error kept in a report reason.
const REPORT_ERROR_SNIPPET_LEN: usize = 50;

/// Max characters of the backend error kept in a topic reason.
const TOPIC_ERROR_SNIPPET_LEN: usize = 80;

/// Word lists driving the fallback heuristics.
///
/// Plain data, like [`crate::filter::FilterConfig`], so moderation policy
/// can be tuned without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackLexicon {
    /// Terms treated as clearly harmful by the report fallback.
    pub severe_terms: Vec<String>,
    /// Terms that make a suggested topic inappropriate outright.
    pub inappropriate_terms: Vec<String>,
    /// Domain-relevance keywords for topic scoring.
    pub domain_keywords: Vec<String>,
}

impl Default for FallbackLexicon {
    fn default() -> Self {
        Self {
            severe_terms: [
                "kill yourself",
                "kys",
                "rape",
                "child porn",
                "bestiality",
                "nazi",
                "terrorist",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            inappropriate_terms: [
                "porn",
                "nude",
                "nsfw",
                "gore",
                "drugs",
                "gambling",
                "escort",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            // Fixed set of 8 terms marking a topic as on-domain.
            domain_keywords: [
                "art",
                "design",
                "drawing",
                "illustration",
                "painting",
                "sketch",
                "portfolio",
                "typography",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Degraded-mode report classification.
///
/// Scans the prompt text against the severe-term list. A match yields a
/// violating verdict at reduced confidence; otherwise the verdict is
/// non-violating with the backend error surfaced in the reason.
pub fn report_fallback(
    lexicon: &FallbackLexicon,
    prompt_text: &str,
    error: &BackendError,
) -> ReportVerdict {
    if TermMatcher::new(&lexicon.severe_terms).is_match(prompt_text) {
        return ReportVerdict::new(
            true,
            REPORT_MATCH_CONFIDENCE,
            Some("Contains potentially harmful content (detected by fallback)".to_string()),
        );
    }

    ReportVerdict::new(
        false,
        REPORT_NO_MATCH_CONFIDENCE,
        Some(format!(
            "AI temporarily unavailable: {}",
            truncate(&error.to_string(), REPORT_ERROR_SNIPPET_LEN)
        )),
    )
}

/// Degraded-mode topic suitability classification.
///
/// Inappropriate terms reject outright. Otherwise the suitability score is
/// derived from how many of the fixed domain keywords appear in the text.
pub fn topic_fallback(
    lexicon: &FallbackLexicon,
    prompt_text: &str,
    error: &BackendError,
) -> TopicVerdict {
    if TermMatcher::new(&lexicon.inappropriate_terms).is_match(prompt_text) {
        return TopicVerdict::new(
            false,
            0.1,
            vec!["inappropriate".to_string()],
            vec!["Topic contains inappropriate content".to_string()],
            vec!["Remove inappropriate language and resubmit".to_string()],
            TOPIC_INAPPROPRIATE_CONFIDENCE,
        );
    }

    let match_count = TermMatcher::new(&lexicon.domain_keywords).match_count(prompt_text);

    let score = (match_count as f32 * KEYWORD_SCORE_STEP).min(KEYWORD_SCORE_CAP);
    let is_approved = score >= APPROVAL_THRESHOLD;
    let category = if is_approved { "art_design" } else { "off_topic" };

    TopicVerdict::new(
        is_approved,
        score,
        vec![category.to_string()],
        vec![
            "Heuristic keyword assessment (AI unavailable)".to_string(),
            format!(
                "Backend error: {}",
                truncate(&error.to_string(), TOPIC_ERROR_SNIPPET_LEN)
            ),
        ],
        vec!["Resubmit later for a full AI review".to_string()],
        TOPIC_HEURISTIC_CONFIDENCE,
    )
}

/// Truncates to at most `max_chars` characters, respecting char boundaries.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> FallbackLexicon {
        FallbackLexicon::default()
    }

    fn error() -> BackendError {
        BackendError::Network("connection refused by upstream".to_string())
    }

    #[test]
    fn report_fallback_flags_severe_terms() {
        let verdict = report_fallback(&lexicon(), "go kys now", &error());
        assert!(verdict.is_violating);
        assert_eq!(verdict.confidence, 0.7);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Contains potentially harmful content (detected by fallback)")
        );
    }

    #[test]
    fn report_fallback_ignores_underscored_identifiers() {
        let verdict = report_fallback(&lexicon(), "reporting user kys_account", &error());
        assert!(!verdict.is_violating);
    }

    #[test]
    fn report_fallback_passes_clean_text_with_error_reason() {
        let verdict = report_fallback(&lexicon(), "a nice painting of a lake", &error());
        assert!(!verdict.is_violating);
        assert_eq!(verdict.confidence, 0.3);
        let reason = verdict.reason.unwrap();
        assert!(reason.starts_with("AI temporarily unavailable: "));
        assert!(reason.contains("connection refused"));
    }

    #[test]
    fn report_fallback_truncates_long_errors() {
        let long = BackendError::Network("x".repeat(200));
        let verdict = report_fallback(&lexicon(), "clean text", &long);
        let reason = verdict.reason.unwrap();
        let snippet = reason.strip_prefix("AI temporarily unavailable: ").unwrap();
        assert_eq!(snippet.chars().count(), 50);
    }

    #[test]
    fn topic_fallback_rejects_inappropriate_terms() {
        let verdict = topic_fallback(&lexicon(), "best gore compilations", &error());
        assert!(!verdict.is_approved);
        assert_eq!(verdict.suitability_score, 0.1);
        assert_eq!(verdict.categories, vec!["inappropriate".to_string()]);
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn topic_fallback_three_keywords_is_off_topic() {
        // Exactly 3 of the 8 domain keywords: art, design, sketch
        let verdict = topic_fallback(
            &lexicon(),
            "weekly art and design challenge: one sketch per day",
            &error(),
        );
        assert!((verdict.suitability_score - 0.36).abs() < 1e-6);
        assert!(!verdict.is_approved);
        assert_eq!(verdict.categories, vec!["off_topic".to_string()]);
        assert_eq!(verdict.confidence, 0.4);
    }

    #[test]
    fn topic_fallback_four_keywords_approves() {
        // 4 matches: 0.48 >= 0.4
        let verdict = topic_fallback(
            &lexicon(),
            "art design painting illustration showcase",
            &error(),
        );
        assert!((verdict.suitability_score - 0.48).abs() < 1e-6);
        assert!(verdict.is_approved);
        assert_eq!(verdict.categories, vec!["art_design".to_string()]);
    }

    #[test]
    fn topic_fallback_score_caps_at_point_six() {
        let all = "art design drawing illustration painting sketch portfolio typography";
        let verdict = topic_fallback(&lexicon(), all, &error());
        assert!((verdict.suitability_score - 0.6).abs() < 1e-6);
        assert!(verdict.is_approved);
    }

    #[test]
    fn topic_fallback_no_keywords_scores_zero() {
        let verdict = topic_fallback(&lexicon(), "favorite soup recipes", &error());
        assert_eq!(verdict.suitability_score, 0.0);
        assert!(!verdict.is_approved);
        assert_eq!(verdict.categories, vec!["off_topic".to_string()]);
    }

    #[test]
    fn topic_fallback_embeds_truncated_error_in_reasons() {
        let long = BackendError::Network("y".repeat(300));
        let verdict = topic_fallback(&lexicon(), "art topic", &long);
        let backend_reason = verdict
            .reasons
            .iter()
            .find(|r| r.starts_with("Backend error: "))
            .expect("backend error reason present");
        let snippet = backend_reason.strip_prefix("Backend error: ").unwrap();
        assert!(snippet.chars().count() <= 80);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let verdict = topic_fallback(&lexicon(), "art art art art art", &error());
        assert!((verdict.suitability_score - 0.12).abs() < 1e-6);
    }
}
