//! Anaphoric reference detection.
//!
//! Runs before classification: if the incoming text clearly refers back to
//! the previous exchange ("what date did you set for it?", "it has been
//! done"), the orchestrator dispatches directly with the last referenced
//! task injected, bypassing the classifier.
//!
//! Three pattern families in fixed priority: a date/deadline match wins over
//! a confirmation match; an explanation match reuses the most recent
//! non-error agent kind instead of naming one here.

use crate::agent::kind::AgentKind;
use regex::Regex;
use std::sync::OnceLock;

/// Which family of back-reference matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Asking about the date/deadline of the referenced task.
    Deadline,
    /// Confirming the referenced task is done.
    Confirmation,
    /// Asking to explain the previous action.
    Explanation,
}

impl ReferenceKind {
    /// The agent that should handle this reference, when it is fixed.
    /// `Explanation` resolves against history instead.
    pub fn target_agent(&self) -> Option<AgentKind> {
        match self {
            ReferenceKind::Deadline => Some(AgentKind::Planner),
            ReferenceKind::Confirmation => Some(AgentKind::Task),
            ReferenceKind::Explanation => None,
        }
    }
}

fn deadline_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\bwhat (date|day|deadline)\b.*\b(it|that)\b",
            r"(?i)\bwhen\b.*\b(is (it|that) due|did you (set|schedule))\b",
            r"(?i)\b(due date|deadline)\b.*\b(it|that (task|one))\b",
            r"(?i)\b(move|change|push)\b.*\b(the )?(deadline|due date)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

fn confirmation_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\bit (has been|is|was) (done|finished|completed)\b",
            r"(?i)\bi('ve| have)? (just )?(did|done|finished|completed) (it|that( one)?)\b",
            r"(?i)\bmark (it|that( one)?) (as )?(done|complete|completed|finished)\b",
            r"(?i)\bthat('s| is) (done|finished|complete)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

fn explanation_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\bexplain (what|that)\b",
            r"(?i)\bwhat did you (just )?do\b",
            r"(?i)\bwhat (just )?happened\b",
            r"(?i)\bwhy did you do that\b",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Detect a back-reference in `input`, honoring the family priority order.
pub fn detect_reference(input: &str) -> Option<ReferenceKind> {
    if deadline_patterns().iter().any(|re| re.is_match(input)) {
        return Some(ReferenceKind::Deadline);
    }
    if confirmation_patterns().iter().any(|re| re.is_match(input)) {
        return Some(ReferenceKind::Confirmation);
    }
    if explanation_patterns().iter().any(|re| re.is_match(input)) {
        return Some(ReferenceKind::Explanation);
    }
    None
}
