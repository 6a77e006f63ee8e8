//! Context building use case.
//!
//! Fetches exactly the slice of domain state the chosen agent kind needs and
//! packs it into the typed snapshot, together with the bounded history window
//! and the last referenced task. Every fetch completes before dispatch.

use crate::agents::focused::{MARKETING_SCOPE, PROJECT_SCOPE};
use crate::ports::task_store::{StoreError, TaskStorePort};
use chrono::Utc;
use std::sync::Arc;
use taskcrew_domain::{
    AgentContext, AgentKind, ConversationState, DomainSnapshot, Task, schedule,
};

pub struct BuildContextUseCase {
    store: Arc<dyn TaskStorePort>,
}

impl BuildContextUseCase {
    pub fn new(store: Arc<dyn TaskStorePort>) -> Self {
        Self { store }
    }

    /// Build the context for `kind` out of the current store state and the
    /// session's conversation state.
    pub async fn execute(
        &self,
        kind: AgentKind,
        state: &ConversationState,
    ) -> Result<AgentContext, StoreError> {
        let snapshot = self.snapshot_for(kind).await?;

        let mut context = AgentContext::new(snapshot).with_history(state.recent_turns().to_vec());
        if let Some(task) = state.last_task() {
            context = context.with_last_task(task.clone());
        }
        Ok(context)
    }

    async fn snapshot_for(&self, kind: AgentKind) -> Result<DomainSnapshot, StoreError> {
        match kind {
            AgentKind::Task => Ok(DomainSnapshot::Task {
                tasks: self.store.tasks().await?,
                categories: self.store.categories().await?,
            }),
            AgentKind::Category => {
                let categories = self.store.categories().await?;
                let mut task_counts = Vec::with_capacity(categories.len());
                for category in &categories {
                    let tasks = self.store.tasks_by_category(category.id).await?;
                    task_counts.push((category.clone(), tasks.len()));
                }
                Ok(DomainSnapshot::Category {
                    categories,
                    task_counts,
                })
            }
            AgentKind::Analytics => Ok(DomainSnapshot::Analytics {
                stats: self.store.task_stats().await?,
                categories: self.store.categories().await?,
                tasks: self.store.tasks().await?,
            }),
            AgentKind::Planner => {
                let tasks = self.store.tasks().await?;
                let upcoming = schedule::future_deadlines(&tasks, Utc::now().date_naive());
                Ok(DomainSnapshot::Planner { tasks, upcoming })
            }
            AgentKind::Marketing | AgentKind::Project => {
                let scope = if kind == AgentKind::Marketing {
                    MARKETING_SCOPE
                } else {
                    PROJECT_SCOPE
                };
                let tasks: Vec<Task> = self
                    .store
                    .tasks()
                    .await?
                    .into_iter()
                    .filter(|t| scope.iter().any(|kw| t.matches_keyword(kw)))
                    .collect();
                Ok(DomainSnapshot::Focused {
                    tasks,
                    categories: self.store.categories().await?,
                })
            }
            AgentKind::Messaging => Ok(DomainSnapshot::Messaging {
                contacts: self.store.contacts().await?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use taskcrew_domain::{
        Category, CategoryId, Contact, StoredMessage, TaskDraft, TaskId, TaskPatch, TaskStats,
        TaskStatus,
    };

    struct FixtureStore {
        tasks: Vec<Task>,
    }

    fn task(id: i64, title: &str) -> Task {
        Task::from_draft(TaskId(id), TaskDraft::new(title))
    }

    #[async_trait]
    impl TaskStorePort for FixtureStore {
        async fn tasks(&self) -> Result<Vec<Task>, StoreError> {
            Ok(self.tasks.clone())
        }
        async fn task(&self, id: TaskId) -> Result<Task, StoreError> {
            self.tasks
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| StoreError::task_not_found(id))
        }
        async fn tasks_by_status(&self, _status: &TaskStatus) -> Result<Vec<Task>, StoreError> {
            Ok(Vec::new())
        }
        async fn tasks_by_category(&self, _id: CategoryId) -> Result<Vec<Task>, StoreError> {
            Ok(Vec::new())
        }
        async fn create_task(&self, _draft: TaskDraft) -> Result<Task, StoreError> {
            Err(StoreError::Backend("read only".to_string()))
        }
        async fn update_task(&self, id: TaskId, _patch: TaskPatch) -> Result<Task, StoreError> {
            Err(StoreError::task_not_found(id))
        }
        async fn delete_task(&self, id: TaskId) -> Result<Task, StoreError> {
            Err(StoreError::task_not_found(id))
        }
        async fn task_stats(&self) -> Result<TaskStats, StoreError> {
            Ok(TaskStats::from_tasks(&self.tasks))
        }
        async fn categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(Vec::new())
        }
        async fn create_category(
            &self,
            _name: String,
            _color: String,
        ) -> Result<Category, StoreError> {
            Err(StoreError::Backend("read only".to_string()))
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

    #[tokio::test]
    async fn test_marketing_snapshot_is_keyword_scoped() {
        let store = Arc::new(FixtureStore {
            tasks: vec![
                task(1, "Launch the spring campaign"),
                task(2, "Fix the build server"),
            ],
        });
        let use_case = BuildContextUseCase::new(store);

        let context = use_case
            .execute(AgentKind::Marketing, &ConversationState::new())
            .await
            .unwrap();

        let DomainSnapshot::Focused { tasks, .. } = context.snapshot else {
            panic!("expected the focused snapshot");
        };
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId(1));
    }

    #[tokio::test]
    async fn test_context_carries_last_task_and_history() {
        let store = Arc::new(FixtureStore { tasks: vec![] });
        let use_case = BuildContextUseCase::new(store);

        let mut state = ConversationState::new();
        state.record_turn("make a task", AgentKind::Task, Some("create_task".into()), "done");
        state.set_last_task(task(42, "Accounting"));

        let context = use_case
            .execute(AgentKind::Task, &state)
            .await
            .unwrap();

        assert_eq!(context.history.len(), 1);
        assert_eq!(context.last_task.unwrap().id, TaskId(42));
    }
}
