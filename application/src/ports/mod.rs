//! Ports: interfaces the application layer depends on.
//! Adapters live in the infrastructure layer.

pub mod conversation_logger;
pub mod llm_gateway;
pub mod messenger;
pub mod task_store;
