//! Infrastructure layer for taskcrew
//!
//! Adapters behind the application-layer ports: the in-memory task store,
//! the OpenAI-compatible gateway, the Twilio-style messenger, the JSONL
//! transcript logger and the configuration loader.

pub mod config;
pub mod llm;
pub mod logging;
pub mod messaging;
pub mod store;

pub use config::{ConfigLoader, FileConfig};
pub use llm::OpenAiGateway;
pub use logging::JsonlConversationLogger;
pub use messaging::{ConsoleMessenger, TwilioMessenger};
pub use store::InMemoryTaskStore;
