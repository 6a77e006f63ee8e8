//! Category agent. Deliberately thin: the product only needs category
//! creation and listing from the conversational surface.

use crate::agents::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::task_store::TaskStorePort;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_domain::{
    AgentContext, AgentKind, AgentReply, ToolCall, ToolDefinition, ToolParameter, ToolSpec,
};

pub struct CategoryAgent {
    store: Arc<dyn TaskStorePort>,
    gateway: Arc<dyn LlmGateway>,
    spec: ToolSpec,
    timeout: Duration,
}

impl CategoryAgent {
    pub fn new(
        store: Arc<dyn TaskStorePort>,
        gateway: Arc<dyn LlmGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            spec: Self::declare_tools(),
            timeout,
        }
    }

    fn declare_tools() -> ToolSpec {
        ToolSpec::new()
            .register(
                ToolDefinition::new("create_category", "Create a task category")
                    .with_parameter(ToolParameter::new("name", "Category name", true))
                    .with_parameter(
                        ToolParameter::new("color", "Display color", false).with_enum(&[
                            "red", "orange", "yellow", "green", "blue", "purple", "gray",
                        ]),
                    ),
            )
            .register(ToolDefinition::new("list_categories", "List all categories"))
    }

    async fn create_category(&self, call: &ToolCall) -> AgentReply {
        let name = match call.require_str("name") {
            Ok(name) => name.to_string(),
            Err(reason) => return AgentReply::error(reason),
        };
        let color = call.get_str("color").unwrap_or("gray").to_string();

        match self.store.create_category(name, color).await {
            Ok(category) => AgentReply::action(
                "create_category",
                format!("Created category \"{}\".", category.name),
                Some(json!({ "category": category })),
            ),
            Err(e) => AgentReply::error(format!("I couldn't create the category: {}", e)),
        }
    }

    async fn list_categories(&self) -> AgentReply {
        match self.store.categories().await {
            Ok(categories) => {
                let message = if categories.is_empty() {
                    "There are no categories yet.".to_string()
                } else {
                    let names: Vec<&str> =
                        categories.iter().map(|c| c.name.as_str()).collect();
                    format!("Categories: {}.", names.join(", "))
                };
                AgentReply::action(
                    "list_categories",
                    message,
                    Some(json!({ "categories": categories })),
                )
            }
            Err(e) => AgentReply::error(format!("I couldn't list the categories: {}", e)),
        }
    }
}

#[async_trait]
impl SpecializedAgent for CategoryAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Category
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

    async fn execute_tool(&self, call: &ToolCall, _context: &AgentContext) -> AgentReply {
        match call.name.as_str() {
            "create_category" => self.create_category(call).await,
            "list_categories" => self.list_categories().await,
            other => AgentReply::error(format!("Unknown tool: {}", other)),
        }
    }
}
