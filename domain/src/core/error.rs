//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: String, end: String },

    #[error("Date range too narrow: {tasks} tasks need at least {needed} days, got {available}")]
    RangeTooNarrow {
        tasks: usize,
        needed: i64,
        available: i64,
    },
}
