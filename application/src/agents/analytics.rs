//! Analytics agent: task statistics and progress summaries.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, TaskStatus, ToolCall, ToolDefinition, ToolParameter,
    ToolSpec,
};

pub struct AnalyticsAgent {
    store: Arc<dyn TaskStorePort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
}

impl AnalyticsAgent {
    pub fn new(
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            spec: Self::declare_tools(),
            timeout,
        }
    }

    fn declare_tools() -> ToolSpec {
        ToolSpec::new()
            .register(ToolDefinition::new(
                "get_statistics",
                "Aggregate task counts by status",
            ))
            .register(
                ToolDefinition::new("list_tasks_by_status", "Tasks in a given status")
                    .with_parameter(
                        ToolParameter::new("status", "Status to filter by", true).with_enum(&[
                            "pending",
                            "in-progress",
                            "review",
                            "completed",
                        ]),
                    ),
            )
    }

    async fn get_statistics(&self) -> AgentReply {
        match self.store.task_stats().await {
            Ok(stats) => {
                let mut parts: Vec<String> = stats
                    .by_status
                    .iter()
                    .map(|(status, count)| format!("{} {}", count, status))
                    .collect();
                parts.sort();
                let message = format!(
                    "You have {} task(s) in total: {}.",
                    stats.total,
                    parts.join(", ")
                );
                AgentReply::action("get_statistics", message, Some(json!({ "stats": stats })))
            }
            Err(e) => AgentReply::error(format!("I couldn't compute the statistics: {}", e)),
        }
    }

    async fn list_tasks_by_status(&self, call: &ToolCall) -> AgentReply {
        let status: TaskStatus = match call.require_str("status") {
            Ok(status) => status.parse().unwrap_or_default(),
            Err(reason) => return AgentReply::error(reason),
        };

        match self.store.tasks_by_status(&status).await {
            Ok(tasks) => {
                let message = if tasks.is_empty() {
                    format!("No tasks are {}.", status)
                } else {
                    let lines: Vec<String> = tasks
                        .iter()
                        .map(|t| format!("#{} {}", t.id, t.title))
                        .collect();
                    format!("{} task(s) {}:\n{}", tasks.len(), status, lines.join("\n"))
                };
                AgentReply::action("list_tasks_by_status", message, Some(json!({ "tasks": tasks })))
            }
            Err(e) => AgentReply::error(format!("I couldn't list the tasks: {}", e)),
        }
    }
}

#[async_trait]
impl SpecializedAgent for AnalyticsAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Analytics
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
            "get_statistics" => self.get_statistics().await,
            "list_tasks_by_status" => self.list_tasks_by_status(call).await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}
