//! Keyword-based intent classification.
//!
//! The fast, local half of the two-stage classifier. Counts case-insensitive
//! keyword hits per agent kind; the kind with the most hits wins, ties broken
//! by declaration order. Confidence follows the original heuristic
//! `min(0.5 + matches / 5, 1.0)`; with zero matches the determination falls
//! back to the task agent at 0.5 — low, but not zero, since tasks are the
//! sane default domain.

use crate::agent::kind::AgentKind;
use crate::agent::reply::AgentDetermination;

/// Classify `input` using keyword matching alone.
///
/// Pure and infallible. Callers decide whether the returned confidence is
/// high enough to skip the LLM classification stage.
pub fn keyword_classify(input: &str) -> AgentDetermination {
    let haystack = input.to_lowercase();

    let mut best: Option<(AgentKind, usize)> = None;
    for kind in AgentKind::all() {
        let matches = kind
            .keywords()
            .iter()
            .filter(|kw| haystack.contains(&kw.to_lowercase()))
            .count();

        // Strictly-greater keeps the first declared kind on ties.
        if matches > 0 && best.map_or(true, |(_, n)| matches > n) {
            best = Some((*kind, matches));
        }
    }

    match best {
        Some((kind, matches)) => {
            let confidence = (0.5 + matches as f64 / 5.0).min(1.0);
            AgentDetermination::new(kind, confidence)
                .with_reasoning(format!("{} keyword match(es)", matches))
        }
        None => AgentDetermination::fallback(),
    }
}
