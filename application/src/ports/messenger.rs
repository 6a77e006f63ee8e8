//! Messenger port.
//!
//! Boundary contract for the outbound messaging transport: "send text to a
//! destination". The vendor protocol behind it (Twilio, console, test stub)
//! is an infrastructure concern.

use async_trait::async_trait;

/// Outcome of one delivery attempt. Failures are data, not errors — the
/// messaging agent reports them to the user in its reply.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub success: bool,
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Port for the outbound messaging transport.
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Send `body` to the destination address (phone number).
    async fn send_message(&self, to: &str, body: &str) -> DeliveryResult;
}
