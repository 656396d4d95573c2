//! Deterministic keyword/phrase prefilter (tier 1).
//!
//! Catches obviously unacceptable content before any backend call is made,
//! saving cost and latency on the common case. Matching uses pre-compiled
//! word-boundary regex patterns, case-insensitive; "skill" never matches
//! "kill".

use regex::RegexSet;
use serde::{Deserialize, Serialize};

/// Severity of a quick-filter match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationLevel {
    /// No disallowed term found.
    None,
    /// A mild-tier term found.
    Mild,
    /// A severe-tier term found.
    Severe,
}

/// Disallowed term lists for the quick filter.
///
/// Kept as plain data so moderation policy can be tuned without code
/// changes. Terms may be single words or multi-word phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Terms that mark content as severely violating.
    pub severe_terms: Vec<String>,
    /// Terms that mark content as mildly violating.
    pub mild_terms: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            severe_terms: [
                "kill yourself",
                "kys",
                "rape",
                "child porn",
                "bestiality",
                "snuff",
                "gore dump",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            mild_terms: [
                "idiot",
                "moron",
                "dumbass",
                "screw you",
                "shut up",
                "loser",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Pre-compiled whole-word matcher over a term list.
///
/// Each term becomes a case-insensitive pattern wrapped in word
/// boundaries; multi-word phrases match across any whitespace run.
pub(crate) struct TermMatcher {
    set: RegexSet,
}

impl TermMatcher {
    /// Compiles a matcher from the given terms.
    pub(crate) fn new(terms: &[String]) -> Self {
        let patterns: Vec<String> = terms.iter().map(|t| term_pattern(t)).collect();
        let set = RegexSet::new(&patterns).expect("Invalid term patterns");
        Self { set }
    }

    /// Returns true if any term occurs in the text.
    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    /// Returns how many distinct terms occur in the text.
    pub(crate) fn match_count(&self, text: &str) -> usize {
        self.set.matches(text).iter().count()
    }
}

/// Builds the word-boundary pattern for a term or phrase.
fn term_pattern(term: &str) -> String {
    let words: Vec<String> = term
        .split_whitespace()
        .map(|w| regex::escape(w))
        .collect();
    format!(r"(?i)\b{}\b", words.join(r"\s+"))
}

/// Whole-word, case-insensitive prefilter over two severity tiers.
pub struct QuickFilter {
    severe: TermMatcher,
    mild: TermMatcher,
}

impl QuickFilter {
    /// Creates a filter from the given term lists.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            severe: TermMatcher::new(&config.severe_terms),
            mild: TermMatcher::new(&config.mild_terms),
        }
    }

    /// Creates a filter with the built-in term lists.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Returns true if the text contains any disallowed term.
    pub fn scan(&self, text: &str) -> bool {
        self.violation_level(text) != ViolationLevel::None
    }

    /// Returns the severity of the worst match found.
    pub fn violation_level(&self, text: &str) -> ViolationLevel {
        if self.severe.is_match(text) {
            return ViolationLevel::Severe;
        }
        if self.mild.is_match(text) {
            return ViolationLevel::Mild;
        }
        ViolationLevel::None
    }
}

impl Default for QuickFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> QuickFilter {
        QuickFilter::with_defaults()
    }

    #[test]
    fn detects_severe_term() {
        assert_eq!(
            filter().violation_level("just kys already"),
            ViolationLevel::Severe
        );
        assert!(filter().scan("just kys already"));
    }

    #[test]
    fn detects_severe_phrase() {
        assert_eq!(
            filter().violation_level("go kill yourself"),
            ViolationLevel::Severe
        );
    }

    #[test]
    fn detects_mild_term() {
        assert_eq!(
            filter().violation_level("you are such an idiot"),
            ViolationLevel::Mild
        );
    }

    #[test]
    fn severe_wins_over_mild() {
        assert_eq!(
            filter().violation_level("you idiot, kys"),
            ViolationLevel::Severe
        );
    }

    #[test]
    fn clean_text_passes() {
        assert_eq!(
            filter().violation_level("I love your watercolor technique"),
            ViolationLevel::None
        );
        assert!(!filter().scan("I love your watercolor technique"));
    }

    #[test]
    fn case_insensitive() {
        assert!(filter().scan("KILL YOURSELF"));
        assert!(filter().scan("You Idiot"));
    }

    #[test]
    fn whole_word_only_no_substring_matches() {
        // "skys" must not match "kys", "idiotic" must not match "idiot"
        assert!(!filter().scan("painting blue skys at dusk"));
        assert!(!filter().scan("an idiotic amount of detail"));
    }

    #[test]
    fn underscore_is_a_word_character() {
        // \b does not break at underscores, so joined identifiers pass
        assert!(!filter().scan("check out my kys_account handle"));
        assert!(!filter().scan("user idiot_424 posted this"));
    }

    #[test]
    fn punctuation_does_not_hide_terms() {
        assert!(filter().scan("kys!"));
        assert!(filter().scan("what an idiot."));
    }

    #[test]
    fn phrases_match_across_whitespace_runs() {
        assert!(filter().scan("kill  yourself"));
        assert!(filter().scan("kill\nyourself"));
        // Non-consecutive words are not a phrase match
        assert!(!filter().scan("please kill the yourself process"));
    }

    #[test]
    fn empty_text_passes() {
        assert_eq!(filter().violation_level(""), ViolationLevel::None);
    }

    #[test]
    fn custom_config_overrides_defaults() {
        let filter = QuickFilter::new(FilterConfig {
            severe_terms: vec!["contraband".to_string()],
            mild_terms: vec![],
        });
        assert_eq!(
            filter.violation_level("selling contraband here"),
            ViolationLevel::Severe
        );
        // Built-in terms are gone
        assert!(!filter.scan("you idiot"));
    }

    #[test]
    fn config_terms_are_escaped_not_interpreted() {
        let filter = QuickFilter::new(FilterConfig {
            severe_terms: vec!["a+b".to_string()],
            mild_terms: vec![],
        });
        assert!(filter.scan("the a+b shortcut"));
        assert!(!filter.scan("the aab shortcut"));
    }

    #[test]
    fn matcher_counts_distinct_terms_once() {
        let matcher = TermMatcher::new(&[
            "art".to_string(),
            "design".to_string(),
            "sketch".to_string(),
        ]);
        assert_eq!(matcher.match_count("art and design"), 2);
        assert_eq!(matcher.match_count("art art art art"), 1);
        assert_eq!(matcher.match_count("nothing relevant"), 0);
    }

    #[test]
    fn empty_term_list_never_matches() {
        let matcher = TermMatcher::new(&[]);
        assert!(!matcher.is_match("anything at all"));
        assert_eq!(matcher.match_count("anything at all"), 0);
    }
}
