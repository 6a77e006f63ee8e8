//! Agent context: the snapshot of domain state handed to an agent before it
//! reasons about a request.
//!
//! The snapshot is a discriminated union with one variant per agent kind, so
//! each agent statically declares exactly the fields it needs — no untyped
//! grab-bag objects crossing the boundary.

use crate::agent::kind::AgentKind;
use crate::conversation::state::ConversationTurn;
use crate::messaging::Contact;
use crate::task::{Category, Task, TaskStats};
use serde::{Deserialize, Serialize};

/// Per-agent-kind domain snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DomainSnapshot {
    Task {
        tasks: Vec<Task>,
        categories: Vec<Category>,
    },
    Category {
        categories: Vec<Category>,
        /// (category, number of tasks in it)
        task_counts: Vec<(Category, usize)>,
    },
    Analytics {
        stats: TaskStats,
        categories: Vec<Category>,
        tasks: Vec<Task>,
    },
    Planner {
        tasks: Vec<Task>,
        /// Tasks with a future deadline, ascending by deadline.
        upcoming: Vec<Task>,
    },
    /// Marketing and project agents: tasks filtered by the domain's keyword
    /// allowlist.
    Focused {
        tasks: Vec<Task>,
        categories: Vec<Category>,
    },
    Messaging {
        contacts: Vec<Contact>,
    },
}

impl DomainSnapshot {
    /// The agent kind this snapshot variant serves. `Focused` serves both
    /// marketing and project; callers carry the kind alongside.
    pub fn serves(&self, kind: AgentKind) -> bool {
        matches!(
            (self, kind),
            (DomainSnapshot::Task { .. }, AgentKind::Task)
                | (DomainSnapshot::Category { .. }, AgentKind::Category)
                | (DomainSnapshot::Analytics { .. }, AgentKind::Analytics)
                | (DomainSnapshot::Planner { .. }, AgentKind::Planner)
                | (DomainSnapshot::Focused { .. }, AgentKind::Marketing)
                | (DomainSnapshot::Focused { .. }, AgentKind::Project)
                | (DomainSnapshot::Messaging { .. }, AgentKind::Messaging)
        )
    }
}

/// Everything an agent sees for one request: the bounded history window, the
/// last referenced task and its kind-specific snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub history: Vec<ConversationTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_task: Option<Task>,
    pub snapshot: DomainSnapshot,
}

impl AgentContext {
    pub fn new(snapshot: DomainSnapshot) -> Self {
        Self {
            history: Vec::new(),
            last_task: None,
            snapshot,
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_last_task(mut self, task: Task) -> Self {
        self.last_task = Some(task);
        self
    }

    /// Serialize for inclusion in the model prompt.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serves_matching_kind() {
        let snapshot = DomainSnapshot::Planner {
            tasks: vec![],
            upcoming: vec![],
        };
        assert!(snapshot.serves(AgentKind::Planner));
        assert!(!snapshot.serves(AgentKind::Task));
    }

    #[test]
    fn test_focused_serves_marketing_and_project() {
        let snapshot = DomainSnapshot::Focused {
            tasks: vec![],
            categories: vec![],
        };
        assert!(snapshot.serves(AgentKind::Marketing));
        assert!(snapshot.serves(AgentKind::Project));
    }

    #[test]
    fn test_prompt_json_is_valid() {
        let context = AgentContext::new(DomainSnapshot::Messaging { contacts: vec![] });
        let value: serde_json::Value =
            serde_json::from_str(&context.to_prompt_json()).unwrap();
        assert_eq!(value["snapshot"]["kind"], "messaging");
    }
}
