//! Moderation subjects and the topic suggestion lifecycle.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A unit of user-submitted content being evaluated for moderation.
///
/// Each variant carries only the text fields relevant to classification
/// plus an opaque identifier. Content storage itself belongs to the
/// calling workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ModerationSubject {
    /// A published post (title + body).
    Post {
        id: String,
        title: String,
        content: String,
    },
    /// A comment on a post.
    Comment { id: String, content: String },
    /// A user profile (username + bio).
    UserProfile {
        id: String,
        username: String,
        bio: String,
    },
    /// A suggested discussion topic awaiting review.
    TopicSuggestion {
        id: String,
        title: String,
        description: String,
    },
}

impl ModerationSubject {
    /// Returns the opaque subject identifier.
    pub fn id(&self) -> &str {
        match self {
            ModerationSubject::Post { id, .. } => id,
            ModerationSubject::Comment { id, .. } => id,
            ModerationSubject::UserProfile { id, .. } => id,
            ModerationSubject::TopicSuggestion { id, .. } => id,
        }
    }

    /// Returns the kind of this subject.
    pub fn kind(&self) -> SubjectKind {
        match self {
            ModerationSubject::Post { .. } => SubjectKind::Post,
            ModerationSubject::Comment { .. } => SubjectKind::Comment,
            ModerationSubject::UserProfile { .. } => SubjectKind::UserProfile,
            ModerationSubject::TopicSuggestion { .. } => SubjectKind::TopicSuggestion,
        }
    }
}

/// Kind of content under moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Post,
    Comment,
    UserProfile,
    TopicSuggestion,
}

impl SubjectKind {
    /// Returns the stable string form used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Post => "post",
            SubjectKind::Comment => "comment",
            SubjectKind::UserProfile => "user_profile",
            SubjectKind::TopicSuggestion => "topic_suggestion",
        }
    }
}

impl FromStr for SubjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(SubjectKind::Post),
            "comment" => Ok(SubjectKind::Comment),
            "user_profile" => Ok(SubjectKind::UserProfile),
            "topic_suggestion" => Ok(SubjectKind::TopicSuggestion),
            _ => Err(format!("unknown subject kind: {s}")),
        }
    }
}

/// Workflow status of a topic suggestion.
///
/// The automatic path (`PendingAi` to one of the AI states) is set by the
/// decision policy at creation time. Manual states are set only by the
/// human-review workflow. `Published` and `Rejected` are terminal;
/// `Published` is also reachable directly from automatic approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    /// Awaiting automatic review.
    PendingAi,
    /// Approved automatically.
    AiApproved,
    /// Rejected automatically.
    AiRejected,
    /// The automatic verdict was ambiguous; a human must decide.
    NeedsHumanReview,
    /// Approved by a human reviewer.
    ManuallyApproved,
    /// Rejected (terminal).
    Rejected,
    /// Published (terminal).
    Published,
}

impl TopicStatus {
    /// Returns a human-readable name for this status.
    pub fn name(&self) -> &'static str {
        match self {
            TopicStatus::PendingAi => "Pending AI Review",
            TopicStatus::AiApproved => "AI Approved",
            TopicStatus::AiRejected => "AI Rejected",
            TopicStatus::NeedsHumanReview => "Needs Human Review",
            TopicStatus::ManuallyApproved => "Manually Approved",
            TopicStatus::Rejected => "Rejected",
            TopicStatus::Published => "Published",
        }
    }

    /// Returns true if no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TopicStatus::Published | TopicStatus::Rejected)
    }

    /// Returns true if the transition to `next` is legal.
    pub fn can_transition_to(&self, next: TopicStatus) -> bool {
        use TopicStatus::*;
        match (*self, next) {
            (PendingAi, AiApproved | AiRejected | NeedsHumanReview) => true,
            (AiApproved | AiRejected | NeedsHumanReview, ManuallyApproved | Rejected | Published) => {
                true
            }
            (ManuallyApproved, Rejected | Published) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_exposes_id_and_kind() {
        let subject = ModerationSubject::Post {
            id: "post-1".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
        };
        assert_eq!(subject.id(), "post-1");
        assert_eq!(subject.kind(), SubjectKind::Post);

        let subject = ModerationSubject::TopicSuggestion {
            id: "topic-9".to_string(),
            title: "Watercolor basics".to_string(),
            description: "A place to share beginner techniques".to_string(),
        };
        assert_eq!(subject.kind(), SubjectKind::TopicSuggestion);
    }

    #[test]
    fn subject_kind_round_trips_through_str() {
        for kind in [
            SubjectKind::Post,
            SubjectKind::Comment,
            SubjectKind::UserProfile,
            SubjectKind::TopicSuggestion,
        ] {
            assert_eq!(kind.as_str().parse::<SubjectKind>().unwrap(), kind);
        }
        assert!("article".parse::<SubjectKind>().is_err());
    }

    #[test]
    fn pending_transitions_to_ai_states_only() {
        let pending = TopicStatus::PendingAi;
        assert!(pending.can_transition_to(TopicStatus::AiApproved));
        assert!(pending.can_transition_to(TopicStatus::AiRejected));
        assert!(pending.can_transition_to(TopicStatus::NeedsHumanReview));
        assert!(!pending.can_transition_to(TopicStatus::ManuallyApproved));
        assert!(!pending.can_transition_to(TopicStatus::Published));
    }

    #[test]
    fn ai_approved_can_publish_directly() {
        assert!(TopicStatus::AiApproved.can_transition_to(TopicStatus::Published));
    }

    #[test]
    fn human_review_states_accept_manual_outcomes() {
        for status in [
            TopicStatus::AiApproved,
            TopicStatus::AiRejected,
            TopicStatus::NeedsHumanReview,
        ] {
            assert!(status.can_transition_to(TopicStatus::ManuallyApproved));
            assert!(status.can_transition_to(TopicStatus::Rejected));
            assert!(status.can_transition_to(TopicStatus::Published));
        }
    }

    #[test]
    fn terminal_states_reject_all_transitions() {
        for terminal in [TopicStatus::Published, TopicStatus::Rejected] {
            assert!(terminal.is_terminal());
            for next in [
                TopicStatus::PendingAi,
                TopicStatus::AiApproved,
                TopicStatus::AiRejected,
                TopicStatus::NeedsHumanReview,
                TopicStatus::ManuallyApproved,
                TopicStatus::Rejected,
                TopicStatus::Published,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TopicStatus::NeedsHumanReview).unwrap();
        assert_eq!(json, "\"needs_human_review\"");
    }
}
