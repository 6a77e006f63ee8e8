//! Task management domain objects

pub mod entities;

pub use entities::{
    Category, CategoryId, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStats, TaskStatus,
};
