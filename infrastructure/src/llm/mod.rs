//! LLM gateway adapters.

mod openai;

pub use openai::OpenAiGateway;
