//! In-memory task store adapter.
//!
//! Process-local, lost on restart. Serves the CLI and the tests; a relational
//! adapter would implement the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use taskcrew_application::ports::task_store::{StoreError, TaskStorePort};
use taskcrew_domain::{
    Category, CategoryId, Contact, StoredMessage, Task, TaskDraft, TaskId, TaskPatch, TaskStats,
    TaskStatus,
};

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    contacts: Vec<Contact>,
    messages: HashMap<i64, Vec<StoredMessage>>,
    next_task_id: i64,
    next_category_id: i64,
}

pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_task_id: 1,
                next_category_id: 1,
                ..Default::default()
            }),
        }
    }

    /// A store pre-populated with demo categories and contacts, for the CLI.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().unwrap();
            for (name, color) in [
                ("Work", "blue"),
                ("Personal", "green"),
                ("Marketing", "orange"),
            ] {
                let id = CategoryId(inner.next_category_id);
                inner.next_category_id += 1;
                inner.categories.push(Category {
                    id,
                    name: name.to_string(),
                    color: color.to_string(),
                });
            }
            inner.contacts = vec![
                Contact {
                    id: 1,
                    name: "Maria Lopez".to_string(),
                    number: "+34600111222".to_string(),
                },
                Contact {
                    id: 2,
                    name: "Juan Perez".to_string(),
                    number: "+34600333444".to_string(),
                },
            ];
        }
        store
    }
}

#[async_trait]
impl TaskStorePort for InMemoryTaskStore {
    async fn tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.inner.read().unwrap().tasks.clone())
    }

    async fn task(&self, id: TaskId) -> Result<Task, StoreError> {
        self.inner
            .read()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn tasks_by_status(&self, status: &TaskStatus) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .tasks
            .iter()
            .filter(|t| &t.status == status)
            .cloned()
            .collect())
    }

    async fn tasks_by_category(&self, id: CategoryId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .tasks
            .iter()
            .filter(|t| t.category_id == Some(id))
            .cloned()
            .collect())
    }

    async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().unwrap();
        let id = TaskId(inner.next_task_id);
        inner.next_task_id += 1;
        let task = Task::from_draft(id, draft);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().unwrap();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = Some(priority);
        }
        if let Some(category_id) = patch.category_id {
            task.category_id = Some(category_id);
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = Some(deadline);
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().unwrap();
        let pos = inner
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;
        Ok(inner.tasks.remove(pos))
    }

    async fn task_stats(&self) -> Result<TaskStats, StoreError> {
        Ok(TaskStats::from_tasks(self.inner.read().unwrap().tasks.iter()))
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.inner.read().unwrap().categories.clone())
    }

    async fn create_category(&self, name: String, color: String) -> Result<Category, StoreError> {
        let mut inner = self.inner.write().unwrap();
        let id = CategoryId(inner.next_category_id);
        inner.next_category_id += 1;
        let category = Category { id, name, color };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.inner.read().unwrap().contacts.clone())
    }

    async fn messages_with(&self, contact_id: i64) -> Result<Vec<StoredMessage>, StoreError> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .messages
            .get(&contact_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_message(&self, message: StoredMessage) -> Result<(), StoreError> {
        self.inner
            .write()
            .unwrap()
            .messages
            .entry(message.contact_id)
            .or_default()
            .push(message);
        Ok(())
    }
}
