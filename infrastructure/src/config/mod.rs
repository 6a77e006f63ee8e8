//! Configuration: raw TOML structure and the multi-source loader.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileMessengerConfig, FileModelConfig, FileOrchestratorConfig,
    FileTranscriptConfig,
};
pub use loader::ConfigLoader;
