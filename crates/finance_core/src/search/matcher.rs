//! Pluggable text matching used by filtering and highlighting.
//!
//! # Responsibility
//! - Define the narrow `Matcher` contract (`matches`, `mark`).
//! - Provide the case-insensitive regular-expression implementation.
//!
//! # Invariants
//! - An invalid pattern is represented as `SearchPattern::Invalid`, never
//!   as a panic.

use regex::{Captures, Regex, RegexBuilder};

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

// User-typed patterns; keep compiled programs small.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Matching engine behind the query functions.
pub trait Matcher {
    /// Whether the pattern occurs anywhere in `text`.
    fn matches(&self, text: &str) -> bool;
    /// Wraps every occurrence in `text` with highlight markers.
    fn mark(&self, text: &str) -> String;
}

/// Case-insensitive regular-expression matcher.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compiles `pattern` case-insensitively.
    ///
    /// # Errors
    /// - Returns the regex syntax or size error for malformed patterns.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn mark(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &Captures<'_>| {
                format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0])
            })
            .into_owned()
    }
}

/// A search term after compilation.
#[derive(Debug, Clone)]
pub enum SearchPattern {
    /// Blank term: everything matches, nothing is marked.
    All,
    Pattern(RegexMatcher),
    /// Malformed term: nothing matches, nothing is marked.
    Invalid(regex::Error),
}

impl SearchPattern {
    /// Compiles a filter term; whitespace-only terms select everything.
    pub fn for_filter(term: &str) -> Self {
        if term.trim().is_empty() {
            return Self::All;
        }
        Self::compile(term)
    }

    /// Compiles a highlight term; only the empty string disables marking.
    pub fn for_highlight(term: &str) -> Self {
        if term.is_empty() {
            return Self::All;
        }
        Self::compile(term)
    }

    fn compile(term: &str) -> Self {
        match RegexMatcher::new(term) {
            Ok(matcher) => Self::Pattern(matcher),
            Err(err) => Self::Invalid(err),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{Matcher, RegexMatcher, SearchPattern};

    #[test]
    fn matcher_ignores_case() {
        let matcher = RegexMatcher::new("coffee").unwrap();
        assert!(matcher.matches("Morning COFFEE"));
        assert!(!matcher.matches("tea"));
    }

    #[test]
    fn mark_wraps_every_occurrence_preserving_case() {
        let matcher = RegexMatcher::new("ab").unwrap();
        assert_eq!(matcher.mark("Ab xab"), "<mark>Ab</mark> x<mark>ab</mark>");
    }

    #[test]
    fn malformed_term_is_invalid() {
        assert!(SearchPattern::for_filter("[unclosed").is_invalid());
        assert!(matches!(SearchPattern::for_filter("   "), SearchPattern::All));
        assert!(matches!(
            SearchPattern::for_highlight(" "),
            SearchPattern::Pattern(_)
        ));
    }
}
