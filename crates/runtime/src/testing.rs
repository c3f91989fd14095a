//! Test doubles for the model backend and the tool host.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolSpec,
    Usage,
};
use crate::tools::{ToolError, ToolHost};

pub fn tool_call(id: &str, name: &str, input: Value) -> ToolCall {
    ToolCall {
        id: id.into(),
        name: name.into(),
        input,
    }
}

/// An assistant message holding a single tool-use block.
pub fn tool_use(id: &str, name: &str, input: Value) -> Message {
    Message {
        role: Role::Assistant,
        parts: vec![Part::ToolCall(tool_call(id, name, input))],
    }
}

/// Backend that replays canned responses and records every transcript it sees.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Message, ModelError>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Message>) -> Self {
        Self::from_results(responses.into_iter().map(Ok).collect())
    }

    pub fn from_results(responses: Vec<Result<Message, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.requests)
    }
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(request.messages.to_vec());
        let next = self.responses.lock().unwrap().pop_front();
        let message = next.unwrap_or_else(|| Err(ModelError::InvalidResponse("script exhausted".into())))?;
        Ok(ModelResponse {
            message,
            usage: Usage::default(),
        })
    }
}

/// Tool host with canned outputs per tool name.
#[derive(Default)]
pub struct FakeToolHost {
    outputs: HashMap<String, Result<Value, ToolError>>,
    calls: Arc<Mutex<Vec<ToolCall>>>,
    lists: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
}

impl FakeToolHost {
    pub fn with_output(mut self, name: &str, output: Value) -> Self {
        self.outputs.insert(name.into(), Ok(output));
        self
    }

    pub fn with_error(mut self, name: &str, error: ToolError) -> Self {
        self.outputs.insert(name.into(), Err(error));
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<ToolCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn list_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lists)
    }

    pub fn shutdown_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.shutdowns)
    }
}

impl ToolHost for FakeToolHost {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let mut names: Vec<&String> = self.outputs.keys().collect();
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| ToolSpec {
                name: name.clone(),
                description: format!("fake {name}"),
                schema: serde_json::json!({"type": "object"}),
            })
            .collect())
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<Value, ToolError> {
        self.calls.lock().unwrap().push(call.clone());
        self.outputs
            .get(&call.name)
            .cloned()
            .unwrap_or_else(|| Err(ToolError::Execution(format!("unknown tool {}", call.name))))
    }

    async fn shutdown(self) -> Result<(), ToolError> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
