//! Anthropic Messages API backend.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolResult,
    ToolSpec, Usage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: ApiContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiContent {
    Text(String),
    Blocks(Vec<ApiContentBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: Vec<ApiContentBlock>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

#[derive(Debug, Serialize)]
struct ApiTool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiResponseBlock>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicBackendBuilder {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    system: Option<String>,
}

impl AnthropicBackendBuilder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
            base_url: DEFAULT_BASE_URL.to_string(),
            system: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn build(self) -> AnthropicBackend {
        AnthropicBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            model: self.model,
            max_tokens: self.max_tokens,
            endpoint: format!("{}/v1/messages", self.base_url.trim_end_matches('/')),
            system: self.system,
        }
    }
}

/// Anthropic API backend.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: String,
    system: Option<String>,
}

impl AnthropicBackend {
    pub fn builder(api_key: impl Into<String>, model: impl Into<String>) -> AnthropicBackendBuilder {
        AnthropicBackendBuilder::new(api_key, model)
    }

    fn role_to_api(role: Role) -> &'static str {
        match role {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    fn message_to_api(msg: &Message) -> ApiMessage {
        let role = Self::role_to_api(msg.role);

        // Simple case: single text part
        if let [Part::Text(text)] = msg.parts.as_slice() {
            return ApiMessage {
                role,
                content: ApiContent::Text(text.clone()),
            };
        }

        let blocks = msg
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ApiContentBlock::Text { text: text.clone() },
                Part::ToolCall(call) => ApiContentBlock::ToolUse {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    input: call.input.clone(),
                },
                Part::ToolResult(result) => Self::tool_result_to_api(result),
            })
            .collect();

        ApiMessage {
            role,
            content: ApiContent::Blocks(blocks),
        }
    }

    fn tool_result_to_api(result: &ToolResult) -> ApiContentBlock {
        match result {
            ToolResult::Success {
                tool_call_id,
                output,
            } => ApiContentBlock::ToolResult {
                tool_use_id: tool_call_id.clone(),
                content: output_to_blocks(output),
                is_error: false,
            },
            ToolResult::Failure {
                tool_call_id,
                error,
            } => ApiContentBlock::ToolResult {
                tool_use_id: tool_call_id.clone(),
                content: vec![ApiContentBlock::Text {
                    text: error.to_string(),
                }],
                is_error: true,
            },
        }
    }

    fn tool_to_api(spec: &ToolSpec) -> ApiTool {
        ApiTool {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.schema.clone(),
        }
    }

    fn response_to_message(blocks: Vec<ApiResponseBlock>) -> Message {
        let parts: Vec<Part> = blocks
            .into_iter()
            .filter_map(|block| match block {
                ApiResponseBlock::Text { text } => Some(Part::Text(text)),
                ApiResponseBlock::ToolUse { id, name, input } => {
                    Some(Part::ToolCall(ToolCall { id, name, input }))
                }
                ApiResponseBlock::Unknown => None,
            })
            .collect();

        Message {
            role: Role::Assistant,
            parts,
        }
    }

    fn build_request(&self, request: &ModelRequest<'_>) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: request
                .messages
                .iter()
                .map(Self::message_to_api)
                .collect(),
            system: self.system.clone(),
            tools: request.tools.iter().map(Self::tool_to_api).collect(),
        }
    }
}

/// Convert tool output into text blocks.
///
/// MCP text content maps onto text blocks directly; anything else is sent
/// as its JSON text.
fn output_to_blocks(output: &Value) -> Vec<ApiContentBlock> {
    let text_block = |item: &Value| match (item.get("type"), item.get("text")) {
        (Some(Value::String(kind)), Some(Value::String(text))) if kind == "text" => {
            ApiContentBlock::Text { text: text.clone() }
        }
        _ => ApiContentBlock::Text {
            text: item.to_string(),
        },
    };

    match output {
        Value::Array(items) => items.iter().map(text_block).collect(),
        Value::String(text) => vec![ApiContentBlock::Text { text: text.clone() }],
        other => vec![text_block(other)],
    }
}

impl std::fmt::Display for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anthropic({})", self.model)
    }
}

impl Backend for AnthropicBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let api_request = self.build_request(&request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let message = Self::response_to_message(api_response.content);
        let usage = Usage {
            input_tokens: api_response.usage.input_tokens,
            output_tokens: api_response.usage.output_tokens,
        };
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "model call complete"
        );

        Ok(ModelResponse { message, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolError;
    use serde_json::json;

    fn backend() -> AnthropicBackend {
        AnthropicBackend::builder("sk-test", "claude-test")
            .max_tokens(1000)
            .base_url("http://localhost:9999/")
            .build()
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(backend().endpoint, "http://localhost:9999/v1/messages");
        assert_eq!(backend().to_string(), "anthropic(claude-test)");
    }

    #[test]
    fn request_carries_transcript_and_tools() {
        let messages = vec![
            Message::user("What's the weather in Oslo?"),
            Message {
                role: Role::Assistant,
                parts: vec![
                    Part::Text("Checking.".into()),
                    Part::ToolCall(ToolCall {
                        id: "toolu_1".into(),
                        name: "get_forecast".into(),
                        input: json!({"city": "Oslo"}),
                    }),
                ],
            },
            Message::tool_results(vec![ToolResult::Success {
                tool_call_id: "toolu_1".into(),
                output: json!([{"type": "text", "text": "Rain"}]),
            }]),
        ];
        let tools = vec![ToolSpec {
            name: "get_forecast".into(),
            description: "Forecast for a city".into(),
            schema: json!({"type": "object"}),
        }];

        let request = backend().build_request(&ModelRequest {
            messages: &messages,
            tools: &tools,
        });

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "claude-test",
                "max_tokens": 1000,
                "messages": [
                    {"role": "user", "content": "What's the weather in Oslo?"},
                    {"role": "assistant", "content": [
                        {"type": "text", "text": "Checking."},
                        {"type": "tool_use", "id": "toolu_1", "name": "get_forecast", "input": {"city": "Oslo"}}
                    ]},
                    {"role": "user", "content": [
                        {"type": "tool_result", "tool_use_id": "toolu_1", "content": [
                            {"type": "text", "text": "Rain"}
                        ]}
                    ]}
                ],
                "tools": [
                    {"name": "get_forecast", "description": "Forecast for a city", "input_schema": {"type": "object"}}
                ]
            })
        );
    }

    #[test]
    fn failure_result_is_flagged() {
        let block = AnthropicBackend::tool_result_to_api(&ToolResult::Failure {
            tool_call_id: "toolu_2".into(),
            error: ToolError::Execution("boom".into()),
        });
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "tool_result",
                "tool_use_id": "toolu_2",
                "content": [{"type": "text", "text": "execution failed: boom"}],
                "is_error": true
            })
        );
    }

    #[test]
    fn non_text_output_is_sent_as_json_text() {
        let blocks = output_to_blocks(&json!([{"type": "image", "data": "AAAA"}]));
        let value = serde_json::to_value(&blocks).unwrap();
        assert_eq!(value[0]["type"], "text");
        assert_eq!(value[0]["text"], r#"{"data":"AAAA","type":"image"}"#);
    }

    #[test]
    fn response_blocks_become_parts() {
        let response: ApiResponse = serde_json::from_value(json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "toolu_3", "name": "add", "input": {"a": 1}}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 7}
        }))
        .unwrap();

        let message = AnthropicBackend::response_to_message(response.content);
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(
            message.parts,
            vec![
                Part::Text("Let me check.".into()),
                Part::ToolCall(ToolCall {
                    id: "toolu_3".into(),
                    name: "add".into(),
                    input: json!({"a": 1}),
                }),
            ]
        );
    }
}
