//! Use cases: the application-layer flows composed from ports and domain
//! logic.

pub mod build_context;
pub mod classify_intent;
pub mod orchestrate;

pub use build_context::BuildContextUseCase;
pub use classify_intent::ClassifyIntentUseCase;
pub use orchestrate::{OrchestrateError, Orchestrator, OrchestratorResponse};
