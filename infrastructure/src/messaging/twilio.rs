//! Twilio-style messenger adapter.
//!
//! Posts to the Messages endpoint with basic auth. Delivery failures come
//! back as data, matching the port contract; nothing here ever panics the
//! request path.

use async_trait::async_trait;
use taskcrew_application::ports::messenger::{DeliveryResult, MessengerPort};
use tracing::{info, warn};

pub struct TwilioMessenger {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl TwilioMessenger {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            base_url: "https://api.twilio.com".to_string(),
        }
    }

    /// Override the API host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MessengerPort for TwilioMessenger {
    async fn send_message(&self, to: &str, body: &str) -> DeliveryResult {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let form = [("From", self.from_number.as_str()), ("To", to), ("Body", body)];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => {
                info!(%to, "message accepted by transport");
                DeliveryResult::delivered()
            }
            Ok(r) => {
                let status = r.status();
                let text = r.text().await.unwrap_or_default();
                warn!(%to, %status, "transport rejected the message");
                DeliveryResult::failed(format!("transport returned {}: {}", status, text))
            }
            Err(e) => {
                warn!(%to, error = %e, "transport unreachable");
                DeliveryResult::failed(e.to_string())
            }
        }
    }
}

/// Messenger that only logs, used when no transport credentials are
/// configured. Keeps the full pipeline exercisable from the CLI.
pub struct ConsoleMessenger;

#[async_trait]
impl MessengerPort for ConsoleMessenger {
    async fn send_message(&self, to: &str, body: &str) -> DeliveryResult {
        info!(%to, %body, "console messenger delivery");
        DeliveryResult::delivered()
    }
}
