//! Intent classification use case.
//!
//! Two-stage: the pure keyword classifier runs first and, when its confidence
//! clears the accept threshold, the model is never consulted. Otherwise one
//! gateway call refines the decision; any failure on that call, timeout
//! included, degrades to the task-agent fallback.

use crate::ports::llm_gateway::LlmGateway;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentDetermination, ClassificationPrompt, keyword_classify, parse_classification,
};
use tracing::{debug, warn};

pub struct ClassifyIntentUseCase {
    gateway: Arc<dyn LlmGateway>,
    accept_threshold: f64,
    timeout: Duration,
}

impl ClassifyIntentUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, accept_threshold: f64, timeout: Duration) -> Self {
        Self {
            gateway,
            accept_threshold,
            timeout,
        }
    }

    /// Classify `input`. Infallible: every failure path returns a
    /// determination, never an error.
    pub async fn execute(&self, input: &str) -> AgentDetermination {
        let local = keyword_classify(input);
        if local.confidence > self.accept_threshold {
            debug!(kind = %local.kind, confidence = local.confidence, "keyword classification accepted");
            return local;
        }

        let user = ClassificationPrompt::user(input);
        match tokio::time::timeout(
            self.timeout,
            self.gateway.complete(ClassificationPrompt::system(), &user),
        )
        .await
        {
            Ok(Ok(text)) => {
                let det = parse_classification(&text);
                debug!(kind = %det.kind, confidence = det.confidence, "model classification");
                det
            }
            Ok(Err(e)) => {
                warn!(error = %e, "classification gateway call failed, using fallback");
                AgentDetermination::fallback()
            }
            Err(_) => {
                warn!("classification gateway call timed out, using fallback");
                AgentDetermination::fallback()
            }
        }
    }
}
