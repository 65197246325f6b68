//! Message and conversation-turn domain types.
//!
//! A chat request arrives as a new user message plus the visible history;
//! the history is expanded into role-tagged [`Message`]s before being sent to
//! the model together with the system prompt.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The site visitor
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (identity, knowledge, rules)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_role(Role::Tool, content)
        }
    }
}

/// A tool call embedded in an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as JSON string
    pub arguments: String,
}

/// One earlier exchange as shown in the chat widget.
///
/// Serialized as a two-element array `["user text", "assistant text" | null]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn(pub String, pub Option<String>);

impl ChatTurn {
    pub fn new(user: impl Into<String>, assistant: Option<String>) -> Self {
        Self(user.into(), assistant)
    }

    pub fn user(&self) -> &str {
        &self.0
    }

    /// The assistant's reply, if there was a non-empty one.
    pub fn assistant(&self) -> Option<&str> {
        self.1.as_deref().filter(|s| !s.is_empty())
    }
}

/// Expand history turns into role-tagged messages, preserving order.
pub fn format_history(history: &[ChatTurn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2);
    for turn in history {
        messages.push(Message::user(turn.user()));
        if let Some(reply) = turn.assistant() {
            messages.push(Message::assistant(reply));
        }
    }
    messages
}
