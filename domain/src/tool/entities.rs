//! Tool declarations and calls.
//!
//! The declaration schema is the stable contract between agents and the LLM
//! boundary: `{name, description, parameters: {type: "object", properties:
//! {<field>: {type, description, enum?, format?}}, required: [...]}}`.
//! It must be preserved field-for-field for prompt compatibility across
//! providers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Declaration of a tool an agent offers to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

/// One parameter of a tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// JSON type hint: "string", "integer", "number", "boolean", "array"
    pub param_type: String,
    /// Closed value set, when the field is enum-like (e.g. priority).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Format hint (e.g. "date" for YYYY-MM-DD fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Render the wire-format declaration handed to the LLM boundary.
    pub fn to_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(param.param_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if !param.enum_values.is_empty() {
                prop.insert("enum".to_string(), serde_json::json!(param.enum_values));
            }
            if let Some(format) = &param.format {
                prop.insert("format".to_string(), serde_json::json!(format));
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            enum_values: Vec::new(),
            format: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.enum_values = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Ordered set of tools an agent declares. Declaration order is preserved in
/// the schema sent to the model.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Wire-format declarations for the whole set, in declaration order.
    pub fn to_api_schema(&self) -> Vec<Value> {
        self.tools.iter().map(|t| t.to_schema()).collect()
    }
}

/// A structured tool invocation chosen by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: HashMap<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn require_str(&self, key: &str) -> Result<&str, String> {
        self.get_str(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.arguments.get(key).and_then(|v| v.as_array())
    }

    /// Interpret an argument as a list of task ids, accepting numbers and
    /// numeric strings.
    pub fn get_id_list(&self, key: &str) -> Vec<i64> {
        self.get_array(key)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| {
                        v.as_i64()
                            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let tool = ToolDefinition::new("create_task", "Create a new task")
            .with_parameter(ToolParameter::new("title", "Task title", true))
            .with_parameter(
                ToolParameter::new("priority", "Task priority", false)
                    .with_enum(&["high", "medium", "low"]),
            )
            .with_parameter(
                ToolParameter::new("deadline", "Deadline as YYYY-MM-DD", false)
                    .with_format("date"),
            );

        let schema = tool.to_schema();
        assert_eq!(schema["name"], "create_task");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(
            schema["parameters"]["properties"]["priority"]["enum"][0],
            "high"
        );
        assert_eq!(
            schema["parameters"]["properties"]["deadline"]["format"],
            "date"
        );

        let required = schema["parameters"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "title");
    }

    #[test]
    fn test_spec_preserves_declaration_order() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("create_task", "Create"))
            .register(ToolDefinition::new("list_tasks", "List"));

        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["create_task", "list_tasks"]);

        let schemas = spec.to_api_schema();
        assert_eq!(schemas[0]["name"], "create_task");
        assert_eq!(schemas[1]["name"], "list_tasks");
    }

    #[test]
    fn test_tool_call_argument_access() {
        let call = ToolCall::new("update_task")
            .with_arg("id", 7)
            .with_arg("status", "completed");

        assert_eq!(call.get_i64("id"), Some(7));
        assert_eq!(call.get_str("status"), Some("completed"));
        assert!(call.require_str("missing").is_err());
    }

    #[test]
    fn test_id_list_accepts_numbers_and_strings() {
        let call = ToolCall::new("delete_tasks")
            .with_arg("task_ids", serde_json::json!([1, "2", 3, "x"]));
        assert_eq!(call.get_id_list("task_ids"), vec![1, 2, 3]);
    }
}
