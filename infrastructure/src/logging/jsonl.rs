//! JSONL conversation transcript logger.
//!
//! One JSON object per line: `{"timestamp", "event", "payload"}`. Logging is
//! best-effort; write failures are reported through tracing and otherwise
//! ignored, so a full disk never breaks a conversation.

use chrono::Utc;
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use taskcrew_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use tracing::warn;

pub struct JsonlConversationLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript file in append mode.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event.event_type,
            "payload": event.payload,
        });

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{}", line) {
            warn!(path = %self.path.display(), error = %e, "transcript write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_events_append_as_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("turn", json!({ "input": "hello" })));
        logger.log(ConversationEvent::new(
            "classification",
            json!({ "agent": "task", "confidence": 0.9 }),
        ));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "turn");
        assert_eq!(first["payload"]["input"], "hello");

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["payload"]["agent"], "task");
    }

    #[test]
    fn test_open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("log.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();
        logger.log(ConversationEvent::new("turn", json!({})));
        assert!(path.exists());
    }
}
