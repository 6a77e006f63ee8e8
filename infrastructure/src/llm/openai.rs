//! OpenAI-compatible chat-completions gateway adapter.
//!
//! Speaks the `/chat/completions` wire format with function tools. Tool
//! declarations coming from the application layer are wrapped as
//! `{"type": "function", "function": <declaration>}`; a `tool_calls` entry in
//! the answer is decoded back into a domain [`ToolCall`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use taskcrew_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmReply};
use taskcrew_domain::ToolCall;
use tracing::debug;

pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object, per the wire format.
    arguments: String,
}

impl OpenAiGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    async fn chat(&self, body: Value) -> Result<ChatMessage, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{}: {}",
                status, text
            )));
        }

        let mut parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        if parsed.choices.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "response carried no choices".to_string(),
            ));
        }
        Ok(parsed.choices.remove(0).message)
    }

    fn messages(system: &str, user: &str) -> Value {
        serde_json::json!([
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ])
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let message = self
            .chat(serde_json::json!({
                "model": self.model,
                "messages": Self::messages(system, user),
            }))
            .await?;

        message
            .content
            .ok_or_else(|| GatewayError::InvalidResponse("message had no content".to_string()))
    }

    async fn complete_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: &[Value],
    ) -> Result<LlmReply, GatewayError> {
        let wrapped: Vec<Value> = tools
            .iter()
            .map(|t| serde_json::json!({ "type": "function", "function": t }))
            .collect();

        let message = self
            .chat(serde_json::json!({
                "model": self.model,
                "messages": Self::messages(system, user),
                "tools": wrapped,
                "tool_choice": "auto",
            }))
            .await?;

        if let Some(wire) = message.tool_calls.into_iter().next() {
            debug!(tool = %wire.function.name, "model chose a tool");
            let arguments = serde_json::from_str(&wire.function.arguments).map_err(|e| {
                GatewayError::InvalidResponse(format!("tool arguments were not JSON: {}", e))
            })?;
            return Ok(LlmReply::ToolCall(ToolCall {
                name: wire.function.name,
                arguments,
            }));
        }

        message
            .content
            .map(LlmReply::Text)
            .ok_or_else(|| GatewayError::InvalidResponse("message had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_response_with_tool_call_decodes() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "create_task",
                            "arguments": "{\"title\": \"Accounting\", \"deadline\": \"2026-03-27\"}"
                        }
                    }]
                }
            }]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let call = &parsed.choices[0].message.tool_calls[0];
        assert_eq!(call.function.name, "create_task");

        let args: std::collections::HashMap<String, Value> =
            serde_json::from_str(&call.function.arguments).unwrap();
        assert_eq!(args["title"], "Accounting");
    }

    #[test]
    fn test_wire_response_with_text_decodes() {
        let raw = r#"{"choices": [{"message": {"content": "hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
        assert!(parsed.choices[0].message.tool_calls.is_empty());
    }
}
