//! Decision policy mapping a topic verdict to a workflow action.
//!
//! Evaluated as ordered rules, first match wins. Automatic publication
//! requires triple agreement (approved + high suitability + high
//! confidence); automatic rejection requires a clearly bad score or a
//! confidently-negative verdict; everything ambiguous goes to a human.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::subject::TopicStatus;
use crate::verdict::TopicVerdict;

/// Category that always blocks automatic publication.
const INAPPROPRIATE_CATEGORY: &str = "inappropriate";

/// Workflow action recommended for a suggested topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Publish without human involvement.
    Published,
    /// Reject without human involvement.
    Rejected,
    /// Queue for a human reviewer.
    NeedsHumanReview,
}

impl RecommendedAction {
    /// Returns the stable string form used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Published => "published",
            RecommendedAction::Rejected => "rejected",
            RecommendedAction::NeedsHumanReview => "needs_human_review",
        }
    }

    /// Returns the topic status this action sets at creation time.
    pub fn initial_status(&self) -> TopicStatus {
        match self {
            RecommendedAction::Published => TopicStatus::AiApproved,
            RecommendedAction::Rejected => TopicStatus::AiRejected,
            RecommendedAction::NeedsHumanReview => TopicStatus::NeedsHumanReview,
        }
    }
}

impl FromStr for RecommendedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(RecommendedAction::Published),
            "rejected" => Ok(RecommendedAction::Rejected),
            "needs_human_review" => Ok(RecommendedAction::NeedsHumanReview),
            _ => Err(format!("unknown recommended action: {s}")),
        }
    }
}

/// Maps a suitability verdict to a recommended action.
pub fn decide(verdict: &TopicVerdict) -> RecommendedAction {
    let inappropriate = verdict.has_category(INAPPROPRIATE_CATEGORY);

    if verdict.is_approved
        && verdict.suitability_score >= 0.8
        && verdict.confidence >= 0.85
        && !inappropriate
    {
        return RecommendedAction::Published;
    }

    if !verdict.is_approved
        && (verdict.suitability_score < 0.3 || inappropriate || verdict.confidence >= 0.8)
    {
        return RecommendedAction::Rejected;
    }

    RecommendedAction::NeedsHumanReview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(
        is_approved: bool,
        suitability_score: f32,
        confidence: f32,
        categories: Vec<&str>,
    ) -> TopicVerdict {
        TopicVerdict::new(
            is_approved,
            suitability_score,
            categories.into_iter().map(|c| c.to_string()).collect(),
            vec!["test".to_string()],
            vec!["test".to_string()],
            confidence,
        )
    }

    #[test]
    fn triple_agreement_publishes() {
        let v = verdict(true, 0.9, 0.9, vec!["art_design"]);
        assert_eq!(decide(&v), RecommendedAction::Published);
    }

    #[test]
    fn publication_boundary_values() {
        assert_eq!(
            decide(&verdict(true, 0.8, 0.85, vec!["art_design"])),
            RecommendedAction::Published
        );
        // Just under either threshold: human review
        assert_eq!(
            decide(&verdict(true, 0.79, 0.9, vec!["art_design"])),
            RecommendedAction::NeedsHumanReview
        );
        assert_eq!(
            decide(&verdict(true, 0.9, 0.84, vec!["art_design"])),
            RecommendedAction::NeedsHumanReview
        );
    }

    #[test]
    fn inappropriate_category_blocks_publication() {
        let v = verdict(true, 0.95, 0.95, vec!["art_design", "inappropriate"]);
        assert_eq!(decide(&v), RecommendedAction::NeedsHumanReview);
    }

    #[test]
    fn low_score_rejects() {
        let v = verdict(false, 0.1, 0.5, vec!["off_topic"]);
        assert_eq!(decide(&v), RecommendedAction::Rejected);
    }

    #[test]
    fn inappropriate_unapproved_rejects() {
        let v = verdict(false, 0.5, 0.5, vec!["inappropriate"]);
        assert_eq!(decide(&v), RecommendedAction::Rejected);
    }

    #[test]
    fn confident_negative_rejects() {
        let v = verdict(false, 0.5, 0.8, vec!["off_topic"]);
        assert_eq!(decide(&v), RecommendedAction::Rejected);
    }

    #[test]
    fn ambiguous_goes_to_human() {
        let v = verdict(true, 0.5, 0.5, vec!["art_design"]);
        assert_eq!(decide(&v), RecommendedAction::NeedsHumanReview);

        let v = verdict(false, 0.5, 0.5, vec!["off_topic"]);
        assert_eq!(decide(&v), RecommendedAction::NeedsHumanReview);
    }

    #[test]
    fn decision_is_deterministic() {
        let v = verdict(true, 0.9, 0.9, vec![]);
        let first = decide(&v);
        for _ in 0..10 {
            assert_eq!(decide(&v), first);
        }
    }

    #[test]
    fn action_maps_to_initial_status() {
        assert_eq!(
            RecommendedAction::Published.initial_status(),
            TopicStatus::AiApproved
        );
        assert_eq!(
            RecommendedAction::Rejected.initial_status(),
            TopicStatus::AiRejected
        );
        assert_eq!(
            RecommendedAction::NeedsHumanReview.initial_status(),
            TopicStatus::NeedsHumanReview
        );
    }

    #[test]
    fn action_round_trips_through_str() {
        for action in [
            RecommendedAction::Published,
            RecommendedAction::Rejected,
            RecommendedAction::NeedsHumanReview,
        ] {
            assert_eq!(action.as_str().parse::<RecommendedAction>().unwrap(), action);
        }
    }
}
