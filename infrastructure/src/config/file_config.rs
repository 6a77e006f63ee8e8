//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default so a missing file or a partial file is valid.

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model provider settings
    pub model: FileModelConfig,
    /// Orchestrator tuning
    pub orchestrator: FileOrchestratorConfig,
    /// Outbound messaging transport credentials
    pub messenger: FileMessengerConfig,
    /// Transcript logging
    pub transcript: FileTranscriptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub name: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub request_timeout_secs: u64,
    pub fallback_category_id: i64,
    /// Keyword confidence above which the model classifier is skipped.
    pub keyword_accept: f64,
    /// Confidence below which the collaborative fallback runs.
    pub fallback_threshold: f64,
    /// Confidence below which the orchestrator asks for clarification.
    pub floor_threshold: f64,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            fallback_category_id: 1,
            keyword_accept: 0.8,
            fallback_threshold: 0.7,
            floor_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMessengerConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
}

impl FileMessengerConfig {
    /// Credentials are all-or-nothing; partial credentials mean console
    /// delivery.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        match (&self.account_sid, &self.auth_token, &self.from_number) {
            (Some(sid), Some(token), Some(from)) => {
                Some((sid.as_str(), token.as_str(), from.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// Path of the JSONL transcript; `None` disables transcript logging.
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[model]
name = "gpt-4o"

[orchestrator]
fallback_category_id = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gpt-4o");
        assert_eq!(config.orchestrator.fallback_category_id, 3);
        // Defaults should apply everywhere else
        assert_eq!(config.orchestrator.request_timeout_secs, 30);
        assert_eq!(config.orchestrator.keyword_accept, 0.8);
        assert!(config.messenger.credentials().is_none());
        assert!(config.transcript.path.is_none());
    }

    #[test]
    fn test_partial_messenger_credentials_are_none() {
        let toml_str = r#"
[messenger]
account_sid = "AC123"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.messenger.credentials().is_none());
    }

    #[test]
    fn test_full_messenger_credentials() {
        let toml_str = r#"
[messenger]
account_sid = "AC123"
auth_token = "secret"
from_number = "+1000"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (sid, token, from) = config.messenger.credentials().unwrap();
        assert_eq!(sid, "AC123");
        assert_eq!(token, "secret");
        assert_eq!(from, "+1000");
    }
}
