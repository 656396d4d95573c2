//! Atelier Moderation - layered content classification for the Atelier
//! community platform.
//!
//! Evaluates user-submitted content (posts, comments, user profiles and
//! topic suggestions) against community-suitability rules and produces a
//! structured verdict:
//!
//! - **Report path**: a binary violation judgment for reported posts,
//!   comments and profiles.
//! - **Topic path**: a graded suitability judgment plus a recommended
//!   workflow action for suggested topics.
//!
//! Classification is layered: a deterministic quick filter short-circuits
//! obvious violations, a pluggable AI backend handles the rest, and a
//! heuristic fallback takes over whenever the backend errors or is
//! unavailable. The pipeline is non-throwing end-to-end; the only raising
//! path is a structurally invalid request at the persistence boundary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use atelier_moderation::{
//!     BackendRegistry, ClassifierGateway, MemoryStore, ModerationOrchestrator,
//!     ModerationSubject, OpenAiCompatBackend, OpenAiCompatConfig,
//! };
//!
//! # async fn run() {
//! let mut registry = BackendRegistry::new();
//! let config = OpenAiCompatConfig::new("https://api.openai.com/v1", "sk-...", "gpt-4o-mini");
//! registry.register(Arc::new(OpenAiCompatBackend::new("openai", config).unwrap()));
//!
//! let gateway = ClassifierGateway::new(registry);
//! let orchestrator =
//!     ModerationOrchestrator::new(gateway, Arc::new(MemoryStore::new()), "openai");
//!
//! let subject = ModerationSubject::Comment {
//!     id: "comment-42".to_string(),
//!     content: "love the linework here".to_string(),
//! };
//! let verdict = orchestrator.moderate_report_and_persist(&subject).await;
//! assert!(!verdict.is_violating);
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod gateway;
pub mod orchestrator;
pub mod policy;
pub mod prompts;
pub mod store;
pub mod subject;
pub mod verdict;

pub use backend::{
    BackendRegistry, ClassifierBackend, CompletionRequest, OpenAiCompatBackend, OpenAiCompatConfig,
};
pub use error::{BackendError, ModerationError, Result};
pub use fallback::{report_fallback, topic_fallback, FallbackLexicon};
pub use filter::{FilterConfig, QuickFilter, ViolationLevel};
pub use gateway::ClassifierGateway;
pub use orchestrator::{ModerationOrchestrator, TopicReview};
pub use policy::{decide, RecommendedAction};
pub use store::{MemoryStore, ModerationStore, StoredVerdict};
pub use subject::{ModerationSubject, SubjectKind, TopicStatus};
pub use verdict::{ReportVerdict, TopicVerdict};
