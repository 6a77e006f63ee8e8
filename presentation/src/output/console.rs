//! Console output formatter for orchestrator responses

use colored::Colorize;
use taskcrew_application::OrchestratorResponse;
use taskcrew_domain::Task;

/// Formats orchestrator responses for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human-readable rendering: the message, plus a compact task table when
    /// the reply data carries tasks.
    pub fn format(response: &OrchestratorResponse) -> String {
        let mut output = String::new();

        if let Some(agent) = &response.agent_used {
            output.push_str(&format!("{}\n", format!("[{}]", agent).dimmed()));
        }

        if response.action.as_deref() == Some("error") {
            output.push_str(&format!("{}\n", response.message.red()));
        } else {
            output.push_str(&format!("{}\n", response.message));
        }

        if let Some(tasks) = Self::tasks_in(response) {
            for task in &tasks {
                output.push_str(&Self::task_line(task));
            }
        }

        output
    }

    /// Raw JSON rendering, for scripting.
    pub fn format_json(response: &OrchestratorResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn tasks_in(response: &OrchestratorResponse) -> Option<Vec<Task>> {
        let data = response.data.as_ref()?;
        let value = data
            .get("tasks")
            .or_else(|| data.get("scheduled"))
            .or_else(|| data.get("deleted_tasks"))?;
        serde_json::from_value(value.clone()).ok()
    }

    fn task_line(task: &Task) -> String {
        let mut line = format!(
            "  {} {} [{}]",
            format!("#{}", task.id).cyan(),
            task.title.bold(),
            task.status
        );
        if let Some(priority) = task.priority {
            line.push_str(&format!(" ({})", priority.to_string().yellow()));
        }
        if let Some(deadline) = task.deadline {
            line.push_str(&format!(" due {}", deadline.to_string().green()));
        }
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskcrew_domain::{TaskDraft, TaskId};

    fn response_with_tasks() -> OrchestratorResponse {
        let task = Task::from_draft(TaskId(7), TaskDraft::new("Do the accounting"));
        OrchestratorResponse {
            action: Some("list_tasks".to_string()),
            message: "1 task(s):".to_string(),
            data: Some(json!({ "tasks": [task] })),
            agent_used: Some("task".to_string()),
        }
    }

    #[test]
    fn test_format_includes_message_and_task_lines() {
        colored::control::set_override(false);
        let rendered = ConsoleFormatter::format(&response_with_tasks());
        assert!(rendered.contains("[task]"));
        assert!(rendered.contains("1 task(s):"));
        assert!(rendered.contains("#7"));
        assert!(rendered.contains("Do the accounting"));
    }

    #[test]
    fn test_format_json_is_parseable() {
        let rendered = ConsoleFormatter::format_json(&response_with_tasks());
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["agent_used"], "task");
    }
}
