//! Agent kind value object
//!
//! The closed set of specialized agents that can handle a user message.
//! Each kind carries a short description (used in the classification prompt)
//! and a fixed keyword set (used by the local keyword classifier).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The specialized agents available for dispatch (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Task,
    Planner,
    Category,
    Analytics,
    Marketing,
    Project,
    Messaging,
}

impl AgentKind {
    /// All kinds in declaration order. Order matters: keyword-count ties are
    /// broken by the first declared kind.
    pub fn all() -> &'static [AgentKind] {
        &[
            AgentKind::Task,
            AgentKind::Planner,
            AgentKind::Category,
            AgentKind::Analytics,
            AgentKind::Marketing,
            AgentKind::Project,
            AgentKind::Messaging,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Task => "task",
            AgentKind::Planner => "planner",
            AgentKind::Category => "category",
            AgentKind::Analytics => "analytics",
            AgentKind::Marketing => "marketing",
            AgentKind::Project => "project",
            AgentKind::Messaging => "messaging",
        }
    }

    /// Short description used in the LLM classification prompt.
    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Task => "creates, updates, lists and deletes tasks",
            AgentKind::Planner => "schedules tasks, sets deadlines and reports upcoming work",
            AgentKind::Category => "manages task categories and labels",
            AgentKind::Analytics => "reports statistics and progress summaries",
            AgentKind::Marketing => "handles marketing and campaign related tasks",
            AgentKind::Project => "handles project, milestone and roadmap tasks",
            AgentKind::Messaging => "sends messages to contacts and reads message history",
        }
    }

    /// Trigger words for the local keyword classifier.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            AgentKind::Task => &[
                "task", "todo", "create", "complete", "done", "pending", "finish", "delete",
                "update",
            ],
            AgentKind::Planner => &[
                "plan", "schedule", "deadline", "calendar", "week", "organize", "due", "upcoming",
            ],
            AgentKind::Category => &["category", "categories", "label", "tag", "color", "group"],
            AgentKind::Analytics => &[
                "statistics",
                "stats",
                "report",
                "progress",
                "summary",
                "how many",
                "count",
            ],
            AgentKind::Marketing => &[
                "marketing",
                "campaign",
                "social",
                "promotion",
                "advertising",
                "brand",
            ],
            AgentKind::Project => &["project", "milestone", "roadmap", "sprint", "release"],
            AgentKind::Messaging => &["whatsapp", "message", "send", "contact", "notify", "text"],
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(AgentKind::Task),
            "planner" => Ok(AgentKind::Planner),
            "category" => Ok(AgentKind::Category),
            "analytics" => Ok(AgentKind::Analytics),
            "marketing" => Ok(AgentKind::Marketing),
            "project" => Ok(AgentKind::Project),
            "messaging" => Ok(AgentKind::Messaging),
            other => Err(format!("unknown agent kind: {}", other)),
        }
    }
}

impl Serialize for AgentKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for kind in AgentKind::all() {
            let parsed: AgentKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("weather".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_task_is_declared_first() {
        // The keyword classifier's tie-break and fallback both rely on this.
        assert_eq!(AgentKind::all()[0], AgentKind::Task);
    }
}
