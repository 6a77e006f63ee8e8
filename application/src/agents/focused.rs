//! Focused agents: marketing and project.
//!
//! These two share one implementation parameterized by an [`AgentKind`] and a
//! keyword scope. They only ever see the slice of tasks whose text matches
//! their scope, so a "list my tasks" addressed to the marketing agent answers
//! with marketing tasks and nothing else.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, Task, ToolCall, ToolDefinition, ToolSpec,
};

pub const MARKETING_SCOPE: &[&str] = &[
    "marketing",
    "campaign",
    "social",
    "promotion",
    "launch",
    "brand",
    "content",
];

pub const PROJECT_SCOPE: &[&str] = &[
    "project",
    "milestone",
    "sprint",
    "roadmap",
    "release",
    "phase",
];

pub struct FocusedAgent {
    kind: AgentKind,
    scope: &'static [&'static str],
    store: Arc<dyn TaskStorePort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
}

impl FocusedAgent {
    pub fn marketing(
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self::new(AgentKind::Marketing, MARKETING_SCOPE, store, gateway, timeout)
    }

    pub fn project(
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self::new(AgentKind::Project, PROJECT_SCOPE, store, gateway, timeout)
    }

    fn new(
        kind: AgentKind,
        scope: &'static [&'static str],
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            kind,
            scope,
            store,
            gateway,
            spec: Self::declare_tools(kind),
            timeout,
        }
    }

    fn declare_tools(kind: AgentKind) -> ToolSpec {
        ToolSpec::new().register(ToolDefinition::new(
            "list_tasks",
            match kind {
                AgentKind::Marketing => "List the marketing related tasks",
                _ => "List the project related tasks",
            },
        ))
    }

    fn in_scope(&self, task: &Task) -> bool {
        self.scope.iter().any(|kw| task.matches_keyword(kw))
    }

    async fn list_tasks(&self) -> AgentReply {
        let tasks = match self.store.tasks().await {
            Ok(tasks) => tasks,
            Err(e) => return AgentReply::error(format!("I couldn't read the tasks: {}", e)),
        };

        let scoped: Vec<Task> = tasks.into_iter().filter(|t| self.in_scope(t)).collect();
        let message = if scoped.is_empty() {
            format!("There are no {} tasks right now.", self.kind)
        } else {
            let lines: Vec<String> = scoped
                .iter()
                .map(|t| format!("#{} {} [{}]", t.id, t.title, t.status))
                .collect();
            format!(
                "{} {} task(s):\n{}",
                scoped.len(),
                self.kind,
                lines.join("\n")
            )
        };

        AgentReply::action("list_tasks", message, Some(json!({ "tasks": scoped })))
    }
}

#[async_trait]
impl SpecializedAgent for FocusedAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn gateway(&self) -> &Arc<dyn LlmGateway> {
        &self.gateway
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }

    async fn execute_tool(&self, call: &ToolCall, _context: &AgentContext) -> AgentReply {
        match call.name.as_str() {
            "list_tasks" => self.list_tasks().await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}
