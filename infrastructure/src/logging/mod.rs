//! Conversation transcript logging adapters.

mod jsonl;

pub use jsonl::JsonlConversationLogger;
