//! Decoded tool calls and their results.
//!
//! The model sends tool arguments as a JSON string; a [`ToolCall`] is that
//! request after the string has been parsed. Which tools exist, and how they
//! run, is decided by the tools crate.

use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::message::{Message, MessageToolCall};

/// A request to execute a tool, with its arguments parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Parse the serialized arguments of a model-issued tool call.
    ///
    /// Blank argument strings decode to an empty object.
    pub fn decode(call: &MessageToolCall) -> Result<Self, ToolError> {
        let raw = call.arguments.trim();
        let arguments = if raw.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
                tool_name: call.name.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(Self {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments,
        })
    }
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Structured payload returned to the model
    pub output: serde_json::Value,
}

impl ToolResult {
    /// Turn the result into the tool message appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.call_id, self.output.to_string())
    }
}
