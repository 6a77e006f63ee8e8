//! Tool declarations shared between agents and the LLM boundary

pub mod entities;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
