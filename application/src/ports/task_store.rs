//! Task store port
//!
//! CRUD access to tasks, categories, contacts and message history. The
//! store's internal representation (in-memory map or relational) is
//! irrelevant to the core; agents only call this contract.

use async_trait::async_trait;
use taskcrew_domain::{
    Category, CategoryId, Contact, StoredMessage, Task, TaskDraft, TaskId, TaskPatch, TaskStats,
    TaskStatus,
};
use thiserror::Error;

/// Errors surfaced by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn task_not_found(id: TaskId) -> Self {
        StoreError::NotFound {
            entity: "Task",
            id: id.0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Port for the persistence collaborator
#[async_trait]
pub trait TaskStorePort: Send + Sync {
    async fn tasks(&self) -> Result<Vec<Task>, StoreError>;
    async fn task(&self, id: TaskId) -> Result<Task, StoreError>;
    async fn tasks_by_status(&self, status: &TaskStatus) -> Result<Vec<Task>, StoreError>;
    async fn tasks_by_category(&self, id: CategoryId) -> Result<Vec<Task>, StoreError>;
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError>;
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError>;
    /// Returns the deleted task so callers can echo it back to the user.
    async fn delete_task(&self, id: TaskId) -> Result<Task, StoreError>;
    async fn task_stats(&self) -> Result<TaskStats, StoreError>;

    async fn categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn create_category(&self, name: String, color: String) -> Result<Category, StoreError>;

    async fn contacts(&self) -> Result<Vec<Contact>, StoreError>;
    async fn messages_with(&self, contact_id: i64) -> Result<Vec<StoredMessage>, StoreError>;
    async fn record_message(&self, message: StoredMessage) -> Result<(), StoreError>;
}
