//! Agent reply and determination value objects

use crate::agent::kind::AgentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of intent classification: best-guess agent kind plus confidence.
///
/// Transient — produced fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDetermination {
    pub kind: AgentKind,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl AgentDetermination {
    pub fn new(kind: AgentKind, confidence: f64) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// The safe default when classification cannot decide: the task agent
    /// at low-but-nonzero confidence.
    pub fn fallback() -> Self {
        Self::new(AgentKind::Task, 0.5)
    }
}

/// What an agent produced for one user message.
///
/// Errors are replies too: a not-found id or an invalid date range becomes
/// `action = "error"` with a human-readable response, never a thrown error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub confidence: f64,
}

impl AgentReply {
    /// A successful tool-backed reply.
    pub fn action(
        action: impl Into<String>,
        response: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            action: Some(action.into()),
            response: response.into(),
            data,
            confidence: 0.9,
        }
    }

    /// A plain conversational reply with no side effects.
    pub fn respond(response: impl Into<String>, confidence: f64) -> Self {
        Self {
            action: Some("respond".to_string()),
            response: response.into(),
            data: None,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// A user-facing failure (entity not found, validation failure).
    pub fn error(response: impl Into<String>) -> Self {
        Self {
            action: Some("error".to_string()),
            response: response.into(),
            data: None,
            confidence: 0.7,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_error(&self) -> bool {
        self.action.as_deref() == Some("error")
    }
}
