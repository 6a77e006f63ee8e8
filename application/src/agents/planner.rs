//! Planner agent: deadlines and scheduling.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, Task, TaskId, TaskPatch, ToolCall, ToolDefinition,
    ToolParameter, ToolSpec, schedule,
};
use tracing::info;

/// The planner agent. All date math is pure domain logic
/// ([`taskcrew_domain::schedule`]); this agent validates model arguments,
/// runs the math and applies the resulting deadlines through the store.
pub struct PlannerAgent {
    store: Arc<dyn TaskStorePort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
}

impl PlannerAgent {
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
            .register(
                ToolDefinition::new(
                    "get_upcoming_deadlines",
                    "Tasks due within the next N days, soonest first",
                )
                .with_parameter(
                    ToolParameter::new("days_ahead", "Days from today, inclusive", true)
                        .with_type("integer"),
                )
                .with_parameter(
                    ToolParameter::new("limit", "Maximum number of tasks", false)
                        .with_type("integer"),
                ),
            )
            .register(
                ToolDefinition::new("set_deadline", "Set the deadline of an existing task")
                    .with_parameter(
                        ToolParameter::new("id", "Task id", true).with_type("integer"),
                    )
                    .with_parameter(
                        ToolParameter::new("deadline", "Absolute date as YYYY-MM-DD", true)
                            .with_format("date"),
                    ),
            )
            .register(
                ToolDefinition::new(
                    "schedule_tasks",
                    "Spread deadlines for several tasks across a date range",
                )
                .with_parameter(
                    ToolParameter::new("task_ids", "Array of task ids", true).with_type("array"),
                )
                .with_parameter(
                    ToolParameter::new("start_date", "Range start as YYYY-MM-DD", true)
                        .with_format("date"),
                )
                .with_parameter(
                    ToolParameter::new("end_date", "Range end as YYYY-MM-DD", true)
                        .with_format("date"),
                )
                .with_parameter(
                    ToolParameter::new(
                        "distribute_evenly",
                        "Even spacing in id order (default true); when false, \
                         priority decides which task takes the earliest slot",
                        false,
                    )
                    .with_type("boolean"),
                ),
            )
            .register(
                ToolDefinition::new("get_tasks_by_date", "Tasks due on an exact calendar day")
                    .with_parameter(
                        ToolParameter::new("date", "Date as YYYY-MM-DD", true).with_format("date"),
                    ),
            )
    }

    fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AgentReply> {
        value.parse().map_err(|_| {
            AgentReply::error(format!(
                "'{}' is not a valid {} (expected YYYY-MM-DD).",
                value, field
            ))
        })
    }

    async fn get_upcoming_deadlines(&self, call: &ToolCall) -> AgentReply {
        let Some(days_ahead) = call.get_i64("days_ahead") else {
            return AgentReply::error("I need to know how many days ahead to look.");
        };
        let limit = call.get_i64("limit").map(|n| n.max(0) as usize);

        let tasks = match self.store.tasks().await {
            Ok(tasks) => tasks,
            Err(e) => return AgentReply::error(format!("I couldn't read the tasks: {}", e)),
        };

        let today = Utc::now().date_naive();
        let upcoming = schedule::upcoming_deadlines(&tasks, today, days_ahead, limit);

        let message = if upcoming.is_empty() {
            format!("Nothing is due in the next {} days.", days_ahead)
        } else {
            let lines: Vec<String> = upcoming
                .iter()
                .map(|t| {
                    format!(
                        "#{} {} — due {}",
                        t.id,
                        t.title,
                        t.deadline.map(|d| d.to_string()).unwrap_or_default()
                    )
                })
                .collect();
            format!(
                "{} task(s) due in the next {} days:\n{}",
                upcoming.len(),
                days_ahead,
                lines.join("\n")
            )
        };

        AgentReply::action(
            "get_upcoming_deadlines",
            message,
            Some(json!({ "tasks": upcoming })),
        )
    }

    async fn set_deadline(&self, call: &ToolCall) -> AgentReply {
        let Some(id) = call.get_i64("id").map(TaskId) else {
            return AgentReply::error("I need the id of the task.");
        };
        let deadline = match call.require_str("deadline") {
            Ok(value) => match Self::parse_date(value, "deadline") {
                Ok(date) => date,
                Err(reply) => return reply,
            },
            Err(reason) => return AgentReply::error(reason),
        };

        match self.store.update_task(id, TaskPatch::deadline(deadline)).await {
            Ok(task) => {
                info!(id = %task.id, %deadline, "deadline set");
                AgentReply::action(
                    "set_deadline",
                    format!("Set the deadline of \"{}\" to {}.", task.title, deadline),
                    Some(json!({ "task": task })),
                )
            }
            Err(e) if e.is_not_found() => {
                AgentReply::error(format!("Task {} doesn't exist; no deadline was set.", id))
            }
            Err(e) => AgentReply::error(format!("I couldn't set the deadline: {}", e)),
        }
    }

    /// Validate the range, compute the slots, then apply deadlines task by
    /// task — a missing id fails that item only, never the batch.
    async fn schedule_tasks(&self, call: &ToolCall) -> AgentReply {
        let ids = call.get_id_list("task_ids");
        if ids.is_empty() {
            return AgentReply::error("I need at least one task id to schedule.");
        }

        let start = match call.require_str("start_date") {
            Ok(value) => match Self::parse_date(value, "start date") {
                Ok(date) => date,
                Err(reply) => return reply,
            },
            Err(reason) => return AgentReply::error(reason),
        };
        let end = match call.require_str("end_date") {
            Ok(value) => match Self::parse_date(value, "end date") {
                Ok(date) => date,
                Err(reply) => return reply,
            },
            Err(reason) => return AgentReply::error(reason),
        };
        let evenly = call.get_bool("distribute_evenly").unwrap_or(true);

        let slots = match schedule::distribute_evenly(ids.len(), start, end) {
            Ok(slots) => slots,
            Err(e) => {
                // Carries actionable guidance ("widen the range") as text.
                return AgentReply::error(format!(
                    "I couldn't schedule the tasks: {}. Please widen the date range.",
                    e
                ));
            }
        };

        // Resolve the tasks first so ordering can use priority.
        let mut tasks: Vec<Task> = Vec::new();
        let mut failed_ids: Vec<i64> = Vec::new();
        for id in &ids {
            match self.store.task(TaskId(*id)).await {
                Ok(task) => tasks.push(task),
                Err(_) => failed_ids.push(*id),
            }
        }

        if tasks.is_empty() {
            let failed: Vec<String> = failed_ids.iter().map(|id| id.to_string()).collect();
            return AgentReply::error(format!(
                "None of the task ids exist: {}.",
                failed.join(", ")
            ));
        }

        // Priority decides ordering only; the spacing formula is unchanged.
        if !evenly {
            tasks = schedule::priority_order(tasks);
        }

        let mut scheduled = Vec::new();
        for (task, slot) in tasks.iter().zip(slots.iter()) {
            match self
                .store
                .update_task(task.id, TaskPatch::deadline(*slot))
                .await
            {
                Ok(updated) => scheduled.push(updated),
                Err(_) => failed_ids.push(task.id.0),
            }
        }

        let mut message = format!(
            "Scheduled {} task(s) between {} and {}",
            scheduled.len(),
            start,
            end
        );
        if !failed_ids.is_empty() {
            let failed: Vec<String> = failed_ids.iter().map(|id| id.to_string()).collect();
            message.push_str(&format!("; couldn't schedule id(s) {}", failed.join(", ")));
        }
        message.push('.');

        AgentReply::action(
            "schedule_tasks",
            message,
            Some(json!({ "scheduled": scheduled, "failed_ids": failed_ids })),
        )
    }

    async fn get_tasks_by_date(&self, call: &ToolCall) -> AgentReply {
        let date = match call.require_str("date") {
            Ok(value) => match Self::parse_date(value, "date") {
                Ok(date) => date,
                Err(reply) => return reply,
            },
            Err(reason) => return AgentReply::error(reason),
        };

        let tasks = match self.store.tasks().await {
            Ok(tasks) => tasks,
            Err(e) => return AgentReply::error(format!("I couldn't read the tasks: {}", e)),
        };

        let on_date = schedule::tasks_on_date(&tasks, date);
        let message = if on_date.is_empty() {
            format!("Nothing is due on {}.", date)
        } else {
            let lines: Vec<String> = on_date
                .iter()
                .map(|t| format!("#{} {}", t.id, t.title))
                .collect();
            format!("{} task(s) due on {}:\n{}", on_date.len(), date, lines.join("\n"))
        };

        AgentReply::action("get_tasks_by_date", message, Some(json!({ "tasks": on_date })))
    }
}

#[async_trait]
impl SpecializedAgent for PlannerAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Planner
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
            "get_upcoming_deadlines" => self.get_upcoming_deadlines(call).await,
            "set_deadline" => self.set_deadline(call).await,
            "schedule_tasks" => self.schedule_tasks(call).await,
            "get_tasks_by_date" => self.get_tasks_by_date(call).await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}
