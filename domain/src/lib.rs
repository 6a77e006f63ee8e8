//! Domain layer for taskcrew
//!
//! This crate contains the core business logic, entities and value objects
//! of the conversational task assistant. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Intent routing
//!
//! Every user message is routed to one specialized agent. Routing runs in
//! stages: back-reference detection, local keyword classification, and only
//! when the local signal is weak, LLM classification.
//!
//! ## Collaborative fallback
//!
//! When no single agent can be chosen with confidence, the request is
//! broadcast to all agents and the highest-confidence reply wins.
//!
//! ## Defensive boundaries
//!
//! Everything that crosses the LLM boundary is parsed defensively: malformed
//! output degrades to typed fallbacks, never to a failed request.

pub mod agent;
pub mod context;
pub mod conversation;
pub mod core;
pub mod messaging;
pub mod prompt;
pub mod schedule;
pub mod task;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    AgentDetermination, AgentKind, AgentReply, extract_json, keyword_classify, parse_agent_reply,
    parse_classification,
};
pub use context::{AgentContext, DomainSnapshot};
pub use conversation::{
    ConversationState, ConversationTurn, HISTORY_WINDOW, ReferenceKind, SessionId,
    detect_reference,
};
pub use core::DomainError;
pub use messaging::{
    Contact, InvestigateAndSend, MessageDirection, StoredMessage, canned_summary,
    match_investigate_and_send, resolve_contact,
};
pub use prompt::{AgentPromptTemplate, ClassificationPrompt};
pub use task::{
    Category, CategoryId, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStats, TaskStatus,
};
pub use tool::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
