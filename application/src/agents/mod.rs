//! Specialized agents.
//!
//! Every agent shares the same shape: a fixed system prompt, a declared tool
//! set, and the logic that executes a chosen tool against the store and
//! phrases a user-facing confirmation. The dispatch flow lives here as a
//! default trait method; agents implement `execute_tool` and may add a
//! pre-model fast path.

pub mod analytics;
pub mod category;
pub mod focused;
pub mod messaging;
pub mod planner;
pub mod task;

pub use analytics::AnalyticsAgent;
pub use category::CategoryAgent;
pub use focused::FocusedAgent;
pub use messaging::MessagingAgent;
pub use planner::PlannerAgent;
pub use task::TaskAgent;

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmReply};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentPromptTemplate, AgentReply, ToolCall, ToolSpec,
    parse_agent_reply,
};
use tracing::{debug, warn};

/// Wrap a gateway call in the configured timeout. Elapse is reported as
/// [`GatewayError::Timeout`] and handled exactly like a malformed response.
pub(crate) async fn complete_with_tools_timed(
    gateway: &dyn LlmGateway,
    timeout: Duration,
    system: &str,
    user: &str,
    tools: &[serde_json::Value],
) -> Result<LlmReply, GatewayError> {
    match tokio::time::timeout(timeout, gateway.complete_with_tools(system, user, tools)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}

/// Shared shape of all specialized agents.
///
/// `process` is infallible by contract: every failure mode inside an agent
/// degrades to a reply, so a single broken agent can never abort the
/// collaborative fallback batch.
#[async_trait]
pub trait SpecializedAgent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn tool_spec(&self) -> &ToolSpec;

    fn gateway(&self) -> &Arc<dyn LlmGateway>;

    fn request_timeout(&self) -> Duration;

    /// Execute a tool the model selected. Arguments were produced by the
    /// model and must be validated here; bad arguments become error replies.
    async fn execute_tool(&self, call: &ToolCall, context: &AgentContext) -> AgentReply;

    /// Optional pre-model shortcut for narrow, frequent phrasings.
    async fn fast_path(&self, _input: &str, _context: &AgentContext) -> Option<AgentReply> {
        None
    }

    /// Full dispatch: fast path, then model call with tools, then either
    /// tool execution or defensive free-text parsing.
    async fn process(&self, input: &str, context: &AgentContext) -> AgentReply {
        if let Some(reply) = self.fast_path(input, context).await {
            debug!(agent = %self.kind(), "fast path handled the request");
            return reply;
        }

        let system = AgentPromptTemplate::system(self.kind());
        let user = AgentPromptTemplate::user(input, &context.to_prompt_json());
        let tools = self.tool_spec().to_api_schema();

        match complete_with_tools_timed(
            self.gateway().as_ref(),
            self.request_timeout(),
            system,
            &user,
            &tools,
        )
        .await
        {
            Ok(LlmReply::ToolCall(call)) => {
                if self.tool_spec().get(&call.name).is_none() {
                    warn!(agent = %self.kind(), tool = %call.name, "model chose an undeclared tool");
                    return AgentReply::respond(
                        "I wasn't able to complete that request. Could you rephrase it?",
                        0.2,
                    );
                }
                debug!(agent = %self.kind(), tool = %call.name, "executing tool");
                self.execute_tool(&call, context).await
            }
            Ok(LlmReply::Text(text)) => parse_agent_reply(&text),
            Err(e) => {
                warn!(agent = %self.kind(), error = %e, "gateway call failed");
                AgentReply::respond(
                    "I couldn't process that right now. Please try again.",
                    0.1,
                )
            }
        }
    }
}
