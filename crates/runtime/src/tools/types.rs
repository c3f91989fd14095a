//! Conversions between MCP types and runtime types.

use super::ToolError;
use crate::model::ToolSpec;
use rmcp::model::{JsonObject, Tool};
use serde_json::Value;

impl From<Tool> for ToolSpec {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.into_owned(),
            description: tool
                .description
                .map(|d| d.into_owned())
                .unwrap_or_default(),
            schema: Value::Object((*tool.input_schema).clone()),
        }
    }
}

/// Arguments for an MCP tool call.
///
/// MCP only accepts a JSON object (or nothing) as arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments(pub Option<JsonObject>);

impl TryFrom<Value> for ToolArguments {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(Some(map))),
            Value::Null => Ok(Self(None)),
            other => Err(ToolError::InvalidInput(format!(
                "tool arguments must be a JSON object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_arguments_pass_through() {
        let args = ToolArguments::try_from(json!({"city": "Oslo"})).unwrap();
        let map = args.0.unwrap();
        assert_eq!(map["city"], "Oslo");
    }

    #[test]
    fn null_arguments_become_none() {
        assert_eq!(ToolArguments::try_from(Value::Null).unwrap(), ToolArguments(None));
    }

    #[test]
    fn scalar_arguments_are_rejected() {
        let err = ToolArguments::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
