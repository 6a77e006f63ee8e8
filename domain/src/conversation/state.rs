//! Per-session conversational state.
//!
//! The authoritative turn log is append-only and unbounded; only the most
//! recent [`HISTORY_WINDOW`] turns are exposed to agents. State is
//! process-local and lost on restart by design.

use crate::agent::kind::AgentKind;
use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many recent turns are handed to agents as context.
pub const HISTORY_WINDOW: usize = 5;

/// Identifies one independent conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_input: String,
    pub agent_kind: AgentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Conversation history plus the last-referenced task pointer for a single
/// session.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    turns: Vec<ConversationTurn>,
    last_task: Option<Task>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed turn to the authoritative log.
    pub fn record_turn(
        &mut self,
        user_input: impl Into<String>,
        agent_kind: AgentKind,
        action: Option<String>,
        response: impl Into<String>,
    ) {
        self.turns.push(ConversationTurn {
            user_input: user_input.into(),
            agent_kind,
            action,
            response: response.into(),
            timestamp: Utc::now(),
        });
    }

    /// The bounded recent slice handed to agents. The log itself is never
    /// trimmed.
    pub fn recent_turns(&self) -> &[ConversationTurn] {
        let len = self.turns.len();
        &self.turns[len.saturating_sub(HISTORY_WINDOW)..]
    }

    pub fn all_turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Agent kind of the most recent turn that was not an error, used to
    /// answer "explain what you just did" without reclassifying.
    pub fn last_successful_kind(&self) -> Option<AgentKind> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.action.as_deref() != Some("error"))
            .map(|t| t.agent_kind)
    }

    pub fn last_task(&self) -> Option<&Task> {
        self.last_task.as_ref()
    }

    pub fn set_last_task(&mut self, task: Task) {
        self.last_task = Some(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_turns_bounded_to_window() {
        let mut state = ConversationState::new();
        for i in 0..8 {
            state.record_turn(format!("input {}", i), AgentKind::Task, None, "ok");
        }

        assert_eq!(state.all_turns().len(), 8);
        let recent = state.recent_turns();
        assert_eq!(recent.len(), HISTORY_WINDOW);
        assert_eq!(recent[0].user_input, "input 3");
        assert_eq!(recent[4].user_input, "input 7");
    }

    #[test]
    fn test_last_successful_kind_skips_errors() {
        let mut state = ConversationState::new();
        state.record_turn("plan my week", AgentKind::Planner, Some("schedule_tasks".into()), "done");
        state.record_turn("delete task 99", AgentKind::Task, Some("error".into()), "not found");

        assert_eq!(state.last_successful_kind(), Some(AgentKind::Planner));
    }

    #[test]
    fn test_empty_state() {
        let state = ConversationState::new();
        assert!(state.recent_turns().is_empty());
        assert!(state.last_task().is_none());
        assert!(state.last_successful_kind().is_none());
    }
}
