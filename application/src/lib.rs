//! Application layer for taskcrew
//!
//! Ports define what the core needs from the outside world; use cases and
//! agents compose domain logic over those ports. The orchestrator is the
//! single entry point: one user message in, one normalized response out.

pub mod agents;
pub mod ports;
pub mod use_cases;

pub use agents::SpecializedAgent;
pub use ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
pub use ports::llm_gateway::{GatewayError, LlmGateway, LlmReply};
pub use ports::messenger::{DeliveryResult, MessengerPort};
pub use ports::task_store::{StoreError, TaskStorePort};
pub use use_cases::{
    BuildContextUseCase, ClassifyIntentUseCase, OrchestrateError, Orchestrator,
    OrchestratorResponse,
};
