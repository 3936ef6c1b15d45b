//! Pin equality: does a freshly produced result denote the record a user pinned?
//!
//! Plugin identity is always compared exactly. Title and subtitle are compared
//! either exactly or, when the producing plugin attached an equality pattern,
//! by what that pattern captures in each string:
//!
//! 1. If the pattern fails to match either string, fall back to exact equality.
//! 2. If the two matches differ in how many groups participated, not equal.
//! 3. A pattern without explicit groups compares the whole matched substrings.
//! 4. Otherwise every explicit group must hold the same text in both matches.
//!    Text outside the groups is ignored.
//!
//! Step 2 counts participating groups: the static group count is a property of
//! the pattern and so always agrees, while an optional group that matched on
//! one side only is a real difference in shape.

use crate::record::Record;
use launchpin_core::{EqualityPattern, LaunchResult};
use regex::Captures;

/// How a single text field is compared
#[derive(Debug, Clone, Copy)]
pub enum FieldComparison<'a> {
    /// Plain string equality
    Exact,
    /// Compare only what the pattern captures, falling back to exact equality
    PatternNarrowed(&'a EqualityPattern),
}

/// Outcome of comparing one field, including which branch decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch {
    /// No pattern; plain equality
    Exact(bool),
    /// The pattern missed at least one side; plain equality
    Fallback(bool),
    /// Both sides matched with a different number of participating groups
    ShapeMismatch,
    /// Both sides matched; compared captured text
    Captures(bool),
}

impl FieldMatch {
    pub fn is_equal(self) -> bool {
        match self {
            FieldMatch::Exact(equal) | FieldMatch::Fallback(equal) | FieldMatch::Captures(equal) => equal,
            FieldMatch::ShapeMismatch => false,
        }
    }
}

impl<'a> FieldComparison<'a> {
    pub fn from_pattern(pattern: Option<&'a EqualityPattern>) -> Self {
        match pattern {
            Some(pattern) => FieldComparison::PatternNarrowed(pattern),
            None => FieldComparison::Exact,
        }
    }

    /// Compare `reference` (the pinned text) with `candidate` (the live text)
    pub fn evaluate(&self, reference: &str, candidate: &str) -> FieldMatch {
        match self {
            FieldComparison::Exact => FieldMatch::Exact(reference == candidate),
            FieldComparison::PatternNarrowed(pattern) => compare_captured(pattern, reference, candidate),
        }
    }

    pub fn equal(&self, reference: &str, candidate: &str) -> bool {
        self.evaluate(reference, candidate).is_equal()
    }
}

fn compare_captured(pattern: &EqualityPattern, reference: &str, candidate: &str) -> FieldMatch {
    let regex = pattern.regex();
    let (Some(left), Some(right)) = (regex.captures(reference), regex.captures(candidate)) else {
        return FieldMatch::Fallback(reference == candidate);
    };

    if participating(&left) != participating(&right) {
        return FieldMatch::ShapeMismatch;
    }

    if pattern.is_whole_match() {
        return FieldMatch::Captures(left[0] == right[0]);
    }

    let equal = (1..left.len()).all(|i| left.get(i).map(|m| m.as_str()) == right.get(i).map(|m| m.as_str()));
    FieldMatch::Captures(equal)
}

/// Groups that took part in the match, the whole match included
fn participating(captures: &Captures<'_>) -> usize {
    captures.iter().flatten().count()
}

/// Compare one field, narrowed by `pattern` when present
pub fn field_equal(reference: &str, candidate: &str, pattern: Option<&EqualityPattern>) -> bool {
    FieldComparison::from_pattern(pattern).equal(reference, candidate)
}

/// Whether `result` is the same pinned thing as `record`
pub fn record_equal(
    record: &Record, result: &LaunchResult, title_pattern: Option<&EqualityPattern>,
    subtitle_pattern: Option<&EqualityPattern>,
) -> bool {
    field_equal(record.title(), &result.title, title_pattern)
        && field_equal(record.subtitle(), &result.subtitle, subtitle_pattern)
        && record.plugin_id() == result.plugin_id
}
