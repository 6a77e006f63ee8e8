//! Defensive parsing of LLM output.
//!
//! The model boundary is unreliable: responses may be prose, fenced JSON,
//! truncated JSON or JSON with missing fields. Every function here degrades
//! to a typed fallback instead of failing — classification falls back to the
//! task agent, reply parsing wraps the raw text as a low-confidence
//! "respond".

use crate::agent::kind::AgentKind;
use crate::agent::reply::{AgentDetermination, AgentReply};
use serde_json::Value;

/// Extract the first top-level JSON object embedded in free text.
///
/// Handles fenced code blocks and surrounding prose by slicing from the
/// first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text[start..].rfind('}')?;
    serde_json::from_str(&text[start..start + end + 1]).ok()
}

/// Parse a classification response of the shape
/// `{"agent_type": ..., "confidence": ..., "reasoning": ...}`.
///
/// Never fails: malformed output, unknown agent types and out-of-range
/// confidences all collapse into the task-agent fallback.
pub fn parse_classification(text: &str) -> AgentDetermination {
    let Some(value) = extract_json(text) else {
        return AgentDetermination::fallback();
    };

    let Some(kind) = value
        .get("agent_type")
        .or_else(|| value.get("agentType"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<AgentKind>().ok())
    else {
        return AgentDetermination::fallback();
    };

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.5);

    let mut det = AgentDetermination::new(kind, confidence);
    if let Some(reasoning) = value.get("reasoning").and_then(|v| v.as_str()) {
        det = det.with_reasoning(reasoning);
    }
    det
}

/// Parse a free-text agent response into the expected reply shape
/// `{"action": ..., "response": ..., "confidence": ...}`.
///
/// When the text is not parseable, the raw text itself becomes a
/// low-confidence "respond" reply — the request never fails on this path.
pub fn parse_agent_reply(text: &str) -> AgentReply {
    if let Some(value) = extract_json(text)
        && let Some(response) = value.get("response").and_then(|v| v.as_str())
    {
        let action = value
            .get("action")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let confidence = value
            .get("confidence")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.6);

        return AgentReply {
            action,
            response: response.to_string(),
            data: value.get("data").cloned(),
            confidence: confidence.clamp(0.0, 1.0),
        };
    }

    AgentReply::respond(text.trim(), 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fenced_block() {
        let text = "Sure!\n```json\n{\"agent_type\": \"planner\", \"confidence\": 0.9}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["agent_type"], "planner");
    }

    #[test]
    fn test_parse_classification() {
        let det = parse_classification(
            r#"{"agent_type": "analytics", "confidence": 0.85, "reasoning": "asks for stats"}"#,
        );
        assert_eq!(det.kind, AgentKind::Analytics);
        assert!((det.confidence - 0.85).abs() < 1e-9);
        assert_eq!(det.reasoning.as_deref(), Some("asks for stats"));
    }

    #[test]
    fn test_parse_classification_garbage_falls_back() {
        for text in ["not json at all", "{broken", r#"{"agent_type": "weather"}"#, ""] {
            let det = parse_classification(text);
            assert_eq!(det.kind, AgentKind::Task);
            assert_eq!(det.confidence, 0.5);
        }
    }

    #[test]
    fn test_parse_classification_accepts_camel_case_key() {
        let det = parse_classification(r#"{"agentType": "messaging", "confidence": 0.7}"#);
        assert_eq!(det.kind, AgentKind::Messaging);
    }

    #[test]
    fn test_parse_agent_reply_structured() {
        let reply = parse_agent_reply(
            r#"{"action": "list_tasks", "response": "You have 3 tasks", "confidence": 0.8}"#,
        );
        assert_eq!(reply.action.as_deref(), Some("list_tasks"));
        assert_eq!(reply.response, "You have 3 tasks");
    }

    #[test]
    fn test_parse_agent_reply_prose_wraps_as_respond() {
        let reply = parse_agent_reply("I can help you manage tasks.");
        assert_eq!(reply.action.as_deref(), Some("respond"));
        assert_eq!(reply.response, "I can help you manage tasks.");
        assert!((reply.confidence - 0.3).abs() < 1e-9);
    }
}
