//! Prompt assembly and per-kind output budgets.

/// Output token budget for post reports.
pub const POST_MAX_TOKENS: u32 = 300;

/// Output token budget for comment reports.
pub const COMMENT_MAX_TOKENS: u32 = 200;

/// Output token budget for user profile reports.
pub const PROFILE_MAX_TOKENS: u32 = 200;

/// Output token budget for topic suitability checks.
pub const TOPIC_MAX_TOKENS: u32 = 500;

/// Fixed low temperature keeps output compact and near-deterministic.
pub const CLASSIFIER_TEMPERATURE: f32 = 0.1;

/// System prompt for the report path (posts, comments, profiles).
pub const REPORT_SYSTEM_PROMPT: &str = "\
You are a content moderator for an art and design community. Decide whether \
the submitted content violates community rules (harassment, hate speech, \
sexual content, spam, or threats). Respond with JSON only, matching: \
{\"is_violating\": boolean, \"reason\": string or null, \"confidence\": number between 0 and 1}";

/// System prompt for the topic suitability path.
pub const TOPIC_SYSTEM_PROMPT: &str = "\
You are reviewing a suggested discussion topic for an art and design \
community. Judge how well it fits the platform's domain. Respond with JSON \
only, matching: {\"is_approved\": boolean, \"suitability_score\": number \
between 0 and 1, \"categories\": array of strings, \"reasons\": array of \
strings, \"suggestions\": array of strings, \"confidence\": number between 0 and 1}";

/// Builds the user prompt for a reported post.
pub fn post_prompt(title: &str, content: &str) -> String {
    format!("Post title: {title}\n\nPost content:\n{content}")
}

/// Builds the user prompt for a reported comment.
pub fn comment_prompt(content: &str) -> String {
    format!("Comment:\n{content}")
}

/// Builds the user prompt for a reported user profile.
pub fn profile_prompt(username: &str, bio: &str) -> String {
    format!("Username: {username}\n\nProfile bio:\n{bio}")
}

/// Builds the user prompt for a suggested topic.
pub fn topic_prompt(title: &str, description: &str) -> String {
    format!("Suggested topic: {title}\n\nDescription:\n{description}")
}
