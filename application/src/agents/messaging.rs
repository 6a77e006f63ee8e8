//! Messaging agent: send messages to contacts and read message history.
//!
//! Two entry points. The fast path recognizes the combined "investigate X
//! and send it to Y" phrasing and answers without a model round-trip; every
//! other phrasing goes through the standard tool flow.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::messenger::MessengerPort;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, Contact, MessageDirection, StoredMessage, ToolCall,
    ToolDefinition, ToolParameter, ToolSpec, canned_summary, match_investigate_and_send,
    resolve_contact,
};
use tracing::{info, warn};

pub struct MessagingAgent {
    store: Arc<dyn TaskStorePort>,
    messenger: Arc<dyn MessengerPort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
}

impl MessagingAgent {
    pub fn new(
        store: Arc<dyn TaskStorePort>,
        messenger: Arc<dyn MessengerPort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            messenger,
            gateway,
            spec: Self::declare_tools(),
            timeout,
        }
    }

    fn declare_tools() -> ToolSpec {
        ToolSpec::new()
            .register(
                ToolDefinition::new("send_message", "Send a message to a known contact")
                    .with_parameter(ToolParameter::new(
                        "contact",
                        "Contact name or phone number",
                        true,
                    ))
                    .with_parameter(ToolParameter::new("body", "Message text to send", true)),
            )
            .register(ToolDefinition::new("list_contacts", "List all known contacts"))
            .register(
                ToolDefinition::new(
                    "get_contact_history",
                    "Message history with one contact, oldest first",
                )
                .with_parameter(ToolParameter::new(
                    "contact",
                    "Contact name or phone number",
                    true,
                )),
            )
    }

    /// Deliver a message to a resolved contact and record it. Failure to
    /// record is logged but does not undo a successful delivery.
    async fn deliver(&self, contact: &Contact, body: &str, action: &str) -> AgentReply {
        let result = self.messenger.send_message(&contact.number, body).await;
        if !result.success {
            return AgentReply::error(format!(
                "I couldn't deliver the message to {}: {}.",
                contact.name,
                result.error.unwrap_or_else(|| "delivery failed".to_string())
            ));
        }

        let record = StoredMessage {
            contact_id: contact.id,
            direction: MessageDirection::Outbound,
            body: body.to_string(),
            timestamp: Utc::now(),
        };
        if let Err(e) = self.store.record_message(record).await {
            warn!(contact = %contact.name, error = %e, "sent message could not be recorded");
        }

        info!(contact = %contact.name, "message delivered");
        AgentReply::action(
            action,
            format!("Sent your message to {}.", contact.name),
            Some(json!({ "contact": contact, "body": body })),
        )
    }

    /// Unknown contact: answer with the full contact list so the user can
    /// correct themselves in one turn.
    fn unknown_contact_reply(query: &str, contacts: &[Contact]) -> AgentReply {
        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        let listing = if names.is_empty() {
            "I don't have any contacts saved.".to_string()
        } else {
            format!("I know these contacts: {}.", names.join(", "))
        };
        AgentReply::error(format!("I don't know \"{}\". {}", query, listing))
    }

    async fn send_message(&self, call: &ToolCall) -> AgentReply {
        let query = match call.require_str("contact") {
            Ok(query) => query,
            Err(reason) => return AgentReply::error(reason),
        };
        let body = match call.require_str("body") {
            Ok(body) => body,
            Err(reason) => return AgentReply::error(reason),
        };

        let contacts = match self.store.contacts().await {
            Ok(contacts) => contacts,
            Err(e) => return AgentReply::error(format!("I couldn't read the contacts: {}", e)),
        };

        match resolve_contact(&contacts, query) {
            Some(contact) => self.deliver(&contact.clone(), body, "send_message").await,
            None => Self::unknown_contact_reply(query, &contacts),
        }
    }

    async fn list_contacts(&self) -> AgentReply {
        match self.store.contacts().await {
            Ok(contacts) => {
                let message = if contacts.is_empty() {
                    "There are no contacts yet.".to_string()
                } else {
                    let lines: Vec<String> = contacts
                        .iter()
                        .map(|c| format!("{} ({})", c.name, c.number))
                        .collect();
                    format!("{} contact(s):\n{}", contacts.len(), lines.join("\n"))
                };
                AgentReply::action("list_contacts", message, Some(json!({ "contacts": contacts })))
            }
            Err(e) => AgentReply::error(format!("I couldn't read the contacts: {}", e)),
        }
    }

    async fn get_contact_history(&self, call: &ToolCall) -> AgentReply {
        let query = match call.require_str("contact") {
            Ok(query) => query,
            Err(reason) => return AgentReply::error(reason),
        };

        let contacts = match self.store.contacts().await {
            Ok(contacts) => contacts,
            Err(e) => return AgentReply::error(format!("I couldn't read the contacts: {}", e)),
        };
        let Some(contact) = resolve_contact(&contacts, query).cloned() else {
            return Self::unknown_contact_reply(query, &contacts);
        };

        match self.store.messages_with(contact.id).await {
            Ok(messages) => {
                let message = if messages.is_empty() {
                    format!("No messages exchanged with {} yet.", contact.name)
                } else {
                    let lines: Vec<String> = messages
                        .iter()
                        .map(|m| {
                            let arrow = match m.direction {
                                MessageDirection::Outbound => "→",
                                MessageDirection::Inbound => "←",
                            };
                            format!("{} {}", arrow, m.body)
                        })
                        .collect();
                    format!(
                        "{} message(s) with {}:\n{}",
                        messages.len(),
                        contact.name,
                        lines.join("\n")
                    )
                };
                AgentReply::action(
                    "get_contact_history",
                    message,
                    Some(json!({ "contact": contact, "messages": messages })),
                )
            }
            Err(e) => AgentReply::error(format!("I couldn't read the history: {}", e)),
        }
    }
}

#[async_trait]
impl SpecializedAgent for MessagingAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Messaging
    }

    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn gateway(&self) -> &Arc<dyn LlmGateway> {
        &self.gateway
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }

    async fn fast_path(&self, input: &str, _context: &AgentContext) -> Option<AgentReply> {
        let matched = match_investigate_and_send(input)?;

        let contacts = match self.store.contacts().await {
            Ok(contacts) => contacts,
            Err(e) => {
                return Some(AgentReply::error(format!(
                    "I couldn't read the contacts: {}",
                    e
                )));
            }
        };

        let Some(contact) = resolve_contact(&contacts, &matched.contact_query).cloned() else {
            return Some(Self::unknown_contact_reply(&matched.contact_query, &contacts));
        };

        let body = canned_summary(&matched.topic);
        Some(self.deliver(&contact, &body, "investigate_and_send").await)
    }

    async fn execute_tool(&self, call: &ToolCall, _context: &AgentContext) -> AgentReply {
        match call.name.as_str() {
            "send_message" => self.send_message(call).await,
            "list_contacts" => self.list_contacts().await,
            "get_contact_history" => self.get_contact_history(call).await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}
