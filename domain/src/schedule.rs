//! Deadline and scheduling math.
//!
//! Pure date logic used by the planner agent: even distribution of tasks
//! across a date range, upcoming-deadline windows and exact-day matching.
//! No I/O — the planner agent feeds these with tasks it fetched from the
//! store.

use crate::core::error::DomainError;
use crate::task::Task;
use chrono::{Duration, NaiveDate};

/// Distribute `count` deadline slots evenly across `[start, end]`.
///
/// Slot `i` lands on `start + round(i * days_diff / (count - 1))` days; a
/// single slot degenerates to `start`. Fails when the range is inverted or
/// when there are fewer whole days than gaps between tasks, so callers can
/// ask the user to widen the range instead of silently stacking deadlines.
pub fn distribute_evenly(
    count: usize,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>, DomainError> {
    if end < start {
        return Err(DomainError::EndBeforeStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let days_diff = (end - start).num_days();
    let needed = count as i64 - 1;
    if days_diff < needed {
        return Err(DomainError::RangeTooNarrow {
            tasks: count,
            needed,
            available: days_diff,
        });
    }

    if count == 1 {
        return Ok(vec![start]);
    }

    let slots = (0..count)
        .map(|i| {
            let offset =
                (i as f64 * days_diff as f64 / (count as f64 - 1.0)).round() as i64;
            start + Duration::days(offset)
        })
        .collect();
    Ok(slots)
}

/// Sort tasks for priority-ordered scheduling: high before medium before
/// low, missing priority last, stable within each group.
///
/// Priority determines which task takes the earliest slot; the spacing
/// formula is the same as the even distribution.
pub fn priority_order(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(|t| t.priority.map_or(3, |p| p.rank()));
    tasks
}

/// Tasks whose deadline falls within `[today, today + days_ahead]`
/// inclusive, sorted ascending by deadline, truncated to `limit` if given.
pub fn upcoming_deadlines(
    tasks: &[Task],
    today: NaiveDate,
    days_ahead: i64,
    limit: Option<usize>,
) -> Vec<Task> {
    let horizon = today + Duration::days(days_ahead);
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|t| {
            t.deadline
                .is_some_and(|d| d >= today && d <= horizon)
        })
        .cloned()
        .collect();
    upcoming.sort_by_key(|t| t.deadline);
    if let Some(limit) = limit {
        upcoming.truncate(limit);
    }
    upcoming
}

/// Tasks with a future deadline (strictly after `today` or on it), sorted
/// ascending. Used for the planner context snapshot.
pub fn future_deadlines(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut future: Vec<Task> = tasks
        .iter()
        .filter(|t| t.deadline.is_some_and(|d| d >= today))
        .cloned()
        .collect();
    future.sort_by_key(|t| t.deadline);
    future
}

/// Tasks whose deadline is exactly `date` (calendar day, no time-of-day).
pub fn tasks_on_date(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.deadline == Some(date))
        .cloned()
        .collect()
}
