//! LLM Gateway port
//!
//! Defines the interface for communicating with the model provider. The
//! boundary is treated as unreliable and slow: callers wrap every call in a
//! timeout and parse every response defensively.

use async_trait::async_trait;
use serde_json::Value;
use taskcrew_domain::ToolCall;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// What the model produced for one request: either a structured tool
/// invocation or free text.
#[derive(Debug, Clone)]
pub enum LlmReply {
    Text(String),
    ToolCall(ToolCall),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the model provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Plain completion: system prompt + user text, free text back.
    async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError>;

    /// Completion with tool declarations offered; the model may answer with
    /// a tool call or with free text.
    async fn complete_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: &[Value],
    ) -> Result<LlmReply, GatewayError>;
}
