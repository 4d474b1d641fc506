//! Tools compiled from MCP server descriptors.
//!
//! The server describes each tool with a JSON schema. Rather than
//! re-interpreting that schema on every call, a [`RemoteTool`] compiles it
//! once into a closed set of parameter specs ([`ParamKind`]) and validates
//! arguments against those before dispatching over the wire.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::mcp::{ToolDescriptor, ToolProvider};

use super::{Tool, ToolResult};

/// The primitive parameter types the compiler understands.
///
/// Anything outside this set is carried as an opaque string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    /// Map a JSON schema `type` string to a kind. Unknown types degrade
    /// to `String`.
    fn from_schema_type(schema_type: Option<&str>) -> Self {
        match schema_type {
            Some("integer") => Self::Integer,
            Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            _ => Self::String,
        }
    }

    fn as_schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Coerce a value to this kind where the conversion is unambiguous.
    ///
    /// Values that cannot be converted cleanly are stringified and passed
    /// through; the tool server gives a better error than we could.
    fn coerce(self, value: &Value) -> Value {
        match self {
            Self::String => match value {
                Value::String(_) => value.clone(),
                other => Value::String(other.to_string()),
            },
            Self::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => value.clone(),
                Value::String(s) => match s.trim().parse::<i64>() {
                    Ok(n) => json!(n),
                    Err(_) => value.clone(),
                },
                other => Value::String(other.to_string()),
            },
            Self::Number => match value {
                Value::Number(_) => value.clone(),
                Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(n) => json!(n),
                    Err(_) => value.clone(),
                },
                other => Value::String(other.to_string()),
            },
            Self::Boolean => match value {
                Value::Bool(_) => value.clone(),
                Value::String(s) => match s.trim() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => value.clone(),
                },
                other => Value::String(other.to_string()),
            },
        }
    }
}

/// One compiled parameter of a remote tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
}

/// A tool whose execution happens on the MCP server.
pub struct RemoteTool {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    provider: Arc<dyn ToolProvider>,
}

impl RemoteTool {
    /// Compile a descriptor into a tool bound to a provider.
    pub fn from_descriptor(descriptor: ToolDescriptor, provider: Arc<dyn ToolProvider>) -> Self {
        let params = compile_params(&descriptor.input_schema);
        Self {
            name: descriptor.name,
            description: descriptor.description,
            params,
            provider,
        }
    }

    /// The compiled parameter specs, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check required parameters and coerce declared ones.
    ///
    /// Extra arguments the schema never mentioned pass through untouched;
    /// the server may understand more than it advertises.
    fn validate_args(&self, args: Value) -> Result<Value, String> {
        let mut object = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(format!(
                    "Arguments for '{}' must be an object, got: {}",
                    self.name, other
                ))
            }
        };

        for spec in &self.params {
            match object.get(&spec.name) {
                Some(value) => {
                    let coerced = spec.kind.coerce(value);
                    object.insert(spec.name.clone(), coerced);
                }
                None if spec.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        spec.name, self.name
                    ));
                }
                None => {}
            }
        }

        Ok(Value::Object(object))
    }
}

/// Extract parameter specs from a JSON schema's `properties`/`required`.
fn compile_params(input_schema: &Value) -> Vec<ParamSpec> {
    let required: Vec<&str> = input_schema["required"]
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = input_schema["properties"].as_object() else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, prop)| ParamSpec {
            name: name.clone(),
            kind: ParamKind::from_schema_type(prop["type"].as_str()),
            required: required.contains(&name.as_str()),
            description: prop["description"].as_str().unwrap_or_default().to_string(),
        })
        .collect()
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for spec in &self.params {
            properties.insert(
                spec.name.clone(),
                json!({
                    "type": spec.kind.as_schema_type(),
                    "description": spec.description,
                }),
            );
            if spec.required {
                required.push(Value::String(spec.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args = match self.validate_args(args) {
            Ok(args) => args,
            Err(message) => return ToolResult::Failure(message),
        };

        tracing::debug!(tool = %self.name, "dispatching tool call");

        match self.provider.call_tool(&self.name, &args).await {
            Ok(output) => ToolResult::Success(output),
            Err(e) => ToolResult::Failure(e.to_string()),
        }
    }
}
