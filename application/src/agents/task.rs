//! Task agent: create, update, list and delete tasks.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, CategoryId, Priority, TaskDraft, TaskId, TaskPatch,
    TaskStatus, ToolCall, ToolDefinition, ToolParameter, ToolSpec,
};
use tracing::info;

/// The task agent. Owns the richest tool set; every mutation of a task's
/// lifecycle goes through one of its tools or the planner's.
pub struct TaskAgent {
    store: Arc<dyn TaskStorePort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
    /// Category assigned when the model omits one.
    fallback_category: CategoryId,
}

impl TaskAgent {
    pub fn new(
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
        fallback_category: CategoryId,
    ) -> Self {
        Self {
            store,
            gateway,
            spec: Self::declare_tools(),
            timeout,
            fallback_category,
        }
    }

    fn declare_tools() -> ToolSpec {
        let priority = || {
            ToolParameter::new("priority", "Task priority", false)
                .with_enum(&["high", "medium", "low"])
        };
        let deadline = || {
            ToolParameter::new("deadline", "Absolute deadline as YYYY-MM-DD", false)
                .with_format("date")
        };

        ToolSpec::new()
            .register(
                ToolDefinition::new("create_task", "Create a single task")
                    .with_parameter(ToolParameter::new("title", "Task title", true))
                    .with_parameter(ToolParameter::new(
                        "description",
                        "Optional task description",
                        false,
                    ))
                    .with_parameter(priority())
                    .with_parameter(
                        ToolParameter::new("category_id", "Category id", false)
                            .with_type("integer"),
                    )
                    .with_parameter(deadline()),
            )
            .register(
                ToolDefinition::new("create_tasks", "Create several tasks in order")
                    .with_parameter(
                        ToolParameter::new(
                            "tasks",
                            "Array of {title, description?, priority?, category_id?, deadline?}",
                            true,
                        )
                        .with_type("array"),
                    ),
            )
            .register(
                ToolDefinition::new("update_task", "Update fields of an existing task")
                    .with_parameter(
                        ToolParameter::new("id", "Task id", true).with_type("integer"),
                    )
                    .with_parameter(ToolParameter::new("title", "New title", false))
                    .with_parameter(ToolParameter::new("description", "New description", false))
                    .with_parameter(
                        ToolParameter::new("status", "New status", false).with_enum(&[
                            "pending",
                            "in-progress",
                            "review",
                            "completed",
                        ]),
                    )
                    .with_parameter(priority())
                    .with_parameter(deadline()),
            )
            .register(
                ToolDefinition::new("delete_task", "Delete a single task").with_parameter(
                    ToolParameter::new("id", "Task id", true).with_type("integer"),
                ),
            )
            .register(
                ToolDefinition::new("delete_tasks", "Delete several tasks").with_parameter(
                    ToolParameter::new("task_ids", "Array of task ids", true).with_type("array"),
                ),
            )
            .register(
                ToolDefinition::new(
                    "list_tasks",
                    "List tasks, optionally filtered. When both filters are given, \
                     status takes precedence over category.",
                )
                .with_parameter(
                    ToolParameter::new("status", "Filter by status", false).with_enum(&[
                        "pending",
                        "in-progress",
                        "review",
                        "completed",
                    ]),
                )
                .with_parameter(
                    ToolParameter::new("category_id", "Filter by category id", false)
                        .with_type("integer"),
                ),
            )
    }

    /// Build a draft from model-provided arguments, applying the documented
    /// defaults: medium priority, fallback category.
    fn draft_from_args(&self, args: &serde_json::Value) -> Result<TaskDraft, String> {
        let title = args
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "a task needs a title".to_string())?;

        let mut draft = TaskDraft::new(title.trim());

        if let Some(description) = args.get("description").and_then(|v| v.as_str()) {
            draft = draft.with_description(description);
        }

        let priority = args
            .get("priority")
            .and_then(|v| v.as_str())
            .and_then(Priority::parse)
            .unwrap_or_default();
        draft = draft.with_priority(priority);

        let category = args
            .get("category_id")
            .and_then(|v| v.as_i64())
            .map(CategoryId)
            .unwrap_or(self.fallback_category);
        draft = draft.with_category(category);

        if let Some(deadline) = args.get("deadline").and_then(|v| v.as_str()) {
            let parsed: NaiveDate = deadline
                .parse()
                .map_err(|_| format!("'{}' is not a valid YYYY-MM-DD date", deadline))?;
            draft = draft.with_deadline(parsed);
        }

        Ok(draft)
    }

    async fn create_task(&self, call: &ToolCall) -> AgentReply {
        let args = serde_json::to_value(&call.arguments).unwrap_or_default();
        let draft = match self.draft_from_args(&args) {
            Ok(draft) => draft,
            Err(reason) => return AgentReply::error(format!("I couldn't create the task: {}", reason)),
        };

        match self.store.create_task(draft).await {
            Ok(task) => {
                info!(id = %task.id, title = %task.title, "task created");
                let mut message = format!("Created task \"{}\"", task.title);
                if let Some(deadline) = task.deadline {
                    message.push_str(&format!(", due {}", deadline));
                }
                message.push('.');
                AgentReply::action("create_task", message, Some(json!({ "task": task })))
            }
            Err(e) => AgentReply::error(format!("I couldn't create the task: {}", e)),
        }
    }

    /// Best-effort batch create: one bad item never aborts the rest.
    async fn create_tasks(&self, call: &ToolCall) -> AgentReply {
        let Some(items) = call.get_array("tasks").filter(|items| !items.is_empty()) else {
            return AgentReply::error("I couldn't create the tasks: the list was empty.");
        };

        let total = items.len();
        let mut created = Vec::new();
        let mut failures = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match self.draft_from_args(item) {
                Ok(draft) => match self.store.create_task(draft).await {
                    Ok(task) => created.push(task),
                    Err(e) => failures.push(format!("item {}: {}", index + 1, e)),
                },
                Err(reason) => failures.push(format!("item {}: {}", index + 1, reason)),
            }
        }

        let titles: Vec<&str> = created.iter().map(|t| t.title.as_str()).collect();
        let mut message = format!("Created {} of {} tasks", created.len(), total);
        if !titles.is_empty() {
            message.push_str(&format!(": {}", titles.join(", ")));
        }
        message.push('.');
        if !failures.is_empty() {
            message.push_str(&format!(" Skipped: {}.", failures.join("; ")));
        }

        AgentReply::action(
            "create_tasks",
            message,
            Some(json!({ "tasks": created, "failures": failures })),
        )
    }

    async fn update_task(&self, call: &ToolCall) -> AgentReply {
        let Some(id) = call.get_i64("id").map(TaskId) else {
            return AgentReply::error("I need the id of the task to update.");
        };

        let mut patch = TaskPatch::default();
        if let Some(title) = call.get_str("title") {
            patch.title = Some(title.to_string());
        }
        if let Some(description) = call.get_str("description") {
            patch.description = Some(description.to_string());
        }
        if let Some(status) = call.get_str("status") {
            patch.status = status.parse::<TaskStatus>().ok();
        }
        if let Some(priority) = call.get_str("priority").and_then(Priority::parse) {
            patch.priority = Some(priority);
        }
        if let Some(deadline) = call.get_str("deadline") {
            match deadline.parse::<NaiveDate>() {
                Ok(parsed) => patch.deadline = Some(parsed),
                Err(_) => {
                    return AgentReply::error(format!(
                        "'{}' is not a valid YYYY-MM-DD date.",
                        deadline
                    ));
                }
            }
        }

        if patch.is_empty() {
            return AgentReply::error(format!("Nothing to change on task {}.", id));
        }

        match self.store.update_task(id, patch).await {
            Ok(task) => AgentReply::action(
                "update_task",
                format!("Updated task \"{}\" (id {}).", task.title, task.id),
                Some(json!({ "task": task })),
            ),
            Err(e) if e.is_not_found() => {
                AgentReply::error(format!("Task {} doesn't exist, so there was nothing to update.", id))
            }
            Err(e) => AgentReply::error(format!("I couldn't update task {}: {}", id, e)),
        }
    }

    async fn delete_task(&self, call: &ToolCall) -> AgentReply {
        let Some(id) = call.get_i64("id").map(TaskId) else {
            return AgentReply::error("I need the id of the task to delete.");
        };

        match self.store.delete_task(id).await {
            Ok(task) => AgentReply::action(
                "delete_task",
                format!("Deleted task \"{}\" (id {}).", task.title, task.id),
                Some(json!({ "task": task })),
            ),
            Err(e) if e.is_not_found() => {
                AgentReply::error(format!("Task {} doesn't exist, so there was nothing to delete.", id))
            }
            Err(e) => AgentReply::error(format!("I couldn't delete task {}: {}", id, e)),
        }
    }

    /// Batch delete reports the deleted set and the failed ids separately —
    /// never all-or-nothing.
    async fn delete_tasks(&self, call: &ToolCall) -> AgentReply {
        let ids = call.get_id_list("task_ids");
        if ids.is_empty() {
            return AgentReply::error("I need at least one task id to delete.");
        }

        let mut deleted = Vec::new();
        let mut failed_ids = Vec::new();

        for id in ids {
            match self.store.delete_task(TaskId(id)).await {
                Ok(task) => deleted.push(task),
                Err(_) => failed_ids.push(id),
            }
        }

        let mut message = format!("Deleted {} task(s)", deleted.len());
        if !failed_ids.is_empty() {
            let failed: Vec<String> = failed_ids.iter().map(|id| id.to_string()).collect();
            message.push_str(&format!(
                "; couldn't find task(s) {}",
                failed.join(", ")
            ));
        }
        message.push('.');

        AgentReply::action(
            "delete_tasks",
            message,
            Some(json!({ "deleted_tasks": deleted, "failed_ids": failed_ids })),
        )
    }

    /// At most one filter dimension is honored: status takes precedence over
    /// category when both are given.
    async fn list_tasks(&self, call: &ToolCall) -> AgentReply {
        let result = if let Some(status) = call.get_str("status") {
            let status: TaskStatus = status.parse().unwrap_or_default();
            self.store.tasks_by_status(&status).await
        } else if let Some(category) = call.get_i64("category_id") {
            self.store.tasks_by_category(CategoryId(category)).await
        } else {
            self.store.tasks().await
        };

        match result {
            Ok(tasks) => {
                let message = if tasks.is_empty() {
                    "No tasks matched.".to_string()
                } else {
                    let lines: Vec<String> = tasks
                        .iter()
                        .map(|t| format!("#{} {} [{}]", t.id, t.title, t.status))
                        .collect();
                    format!("You have {} task(s):\n{}", tasks.len(), lines.join("\n"))
                };
                AgentReply::action("list_tasks", message, Some(json!({ "tasks": tasks })))
            }
            Err(e) => AgentReply::error(format!("I couldn't list the tasks: {}", e)),
        }
    }
}

#[async_trait]
impl SpecializedAgent for TaskAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Task
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
            "create_task" => self.create_task(call).await,
            "create_tasks" => self.create_tasks(call).await,
            "update_task" => self.update_task(call).await,
            "delete_task" => self.delete_task(call).await,
            "delete_tasks" => self.delete_tasks(call).await,
            "list_tasks" => self.list_tasks(call).await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, LlmReply};
    use crate::ports::task_store::{StoreError, TaskStorePort};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};
    use taskcrew_domain::{Category, Contact, DomainSnapshot, StoredMessage, Task, TaskStats};

    struct OfflineGateway;

    #[async_trait]
    impl LlmGateway for OfflineGateway {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, GatewayError> {
            Err(GatewayError::ConnectionError("offline".to_string()))
        }

        async fn complete_with_tools(
            &self,
            _system: &str,
            _user: &str,
            _tools: &[serde_json::Value],
        ) -> Result<LlmReply, GatewayError> {
            Err(GatewayError::ConnectionError("offline".to_string()))
        }
    }

    struct VecStore {
        tasks: Mutex<Vec<Task>>,
        next_id: AtomicI64,
    }

    impl VecStore {
        fn empty() -> Self {
            Self {
                tasks: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }
        }
    }

    #[async_trait]
    impl TaskStorePort for VecStore {
        async fn tasks(&self) -> Result<Vec<Task>, StoreError> {
            Ok(self.tasks.lock().unwrap().clone())
        }
        async fn task(&self, id: TaskId) -> Result<Task, StoreError> {
            self.tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| StoreError::task_not_found(id))
        }
        async fn tasks_by_status(&self, status: &TaskStatus) -> Result<Vec<Task>, StoreError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| &t.status == status)
                .cloned()
                .collect())
        }
        async fn tasks_by_category(&self, id: CategoryId) -> Result<Vec<Task>, StoreError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.category_id == Some(id))
                .cloned()
                .collect())
        }
        async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
            let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
            let task = Task::from_draft(id, draft);
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }
        async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StoreError::task_not_found(id))?;
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(deadline) = patch.deadline {
                task.deadline = Some(deadline);
            }
            Ok(task.clone())
        }
        async fn delete_task(&self, id: TaskId) -> Result<Task, StoreError> {
            let mut tasks = self.tasks.lock().unwrap();
            let pos = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::task_not_found(id))?;
            Ok(tasks.remove(pos))
        }
        async fn task_stats(&self) -> Result<TaskStats, StoreError> {
            Ok(TaskStats::from_tasks(self.tasks.lock().unwrap().iter()))
        }
        async fn categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(Vec::new())
        }
        async fn create_category(
            &self,
            _name: String,
            _color: String,
        ) -> Result<Category, StoreError> {
            Err(StoreError::Backend("unused".to_string()))
        }
        async fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
            Ok(Vec::new())
        }
        async fn messages_with(&self, _contact_id: i64) -> Result<Vec<StoredMessage>, StoreError> {
            Ok(Vec::new())
        }
        async fn record_message(&self, _message: StoredMessage) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn agent(store: Arc<VecStore>) -> TaskAgent {
        TaskAgent::new(
            store,
            Arc::new(OfflineGateway),
            std::time::Duration::from_secs(5),
            CategoryId(1),
        )
    }

    fn context() -> AgentContext {
        AgentContext::new(DomainSnapshot::Task {
            tasks: vec![],
            categories: vec![],
        })
    }

    #[tokio::test]
    async fn test_create_task_applies_defaults() {
        let store = Arc::new(VecStore::empty());
        let agent = agent(store.clone());

        let call = ToolCall::new("create_task")
            .with_arg("title", "Do the accounting")
            .with_arg("deadline", "2026-03-27");
        let reply = agent.execute_tool(&call, &context()).await;

        assert_eq!(reply.action.as_deref(), Some("create_task"));
        let tasks = store.tasks.lock().unwrap();
        assert_eq!(tasks[0].priority, Some(Priority::Medium));
        assert_eq!(tasks[0].category_id, Some(CategoryId(1)));
        assert_eq!(tasks[0].deadline.unwrap().to_string(), "2026-03-27");
    }

    #[tokio::test]
    async fn test_create_task_rejects_bad_date() {
        let store = Arc::new(VecStore::empty());
        let agent = agent(store.clone());

        let call = ToolCall::new("create_task")
            .with_arg("title", "Do the accounting")
            .with_arg("deadline", "next tuesday");
        let reply = agent.execute_tool(&call, &context()).await;

        assert!(reply.is_error());
        assert!(store.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_tasks_reports_partial_success() {
        let store = Arc::new(VecStore::empty());
        store.create_task(TaskDraft::new("one")).await.unwrap();
        store.create_task(TaskDraft::new("two")).await.unwrap();
        let agent = agent(store.clone());

        let call = ToolCall::new("delete_tasks")
            .with_arg("task_ids", serde_json::json!([1, 2, 99]));
        let reply = agent.execute_tool(&call, &context()).await;

        assert_eq!(reply.action.as_deref(), Some("delete_tasks"));
        assert!(reply.response.contains("Deleted 2 task(s)"));
        assert!(reply.response.contains("99"));

        let data = reply.data.unwrap();
        assert_eq!(data["deleted_tasks"].as_array().unwrap().len(), 2);
        assert_eq!(data["failed_ids"], serde_json::json!([99]));
        assert!(store.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_an_error_reply() {
        let store = Arc::new(VecStore::empty());
        let agent = agent(store.clone());

        let call = ToolCall::new("update_task")
            .with_arg("id", 42)
            .with_arg("status", "completed");
        let reply = agent.execute_tool(&call, &context()).await;

        assert!(reply.is_error());
        assert!(reply.response.contains("42"));
        assert!(store.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_tasks_is_best_effort() {
        let store = Arc::new(VecStore::empty());
        let agent = agent(store.clone());

        let call = ToolCall::new("create_tasks").with_arg(
            "tasks",
            serde_json::json!([
                { "title": "first" },
                { "title": "" },
                { "title": "third", "priority": "high" },
            ]),
        );
        let reply = agent.execute_tool(&call, &context()).await;

        assert!(reply.response.contains("Created 2 of 3 tasks"));
        let tasks = store.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].priority, Some(Priority::High));
    }
}
