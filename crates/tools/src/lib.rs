//! Tools the model may invoke during a chat turn.
//!
//! The set of tools is closed: [`ToolKind`] names every declared tool, and
//! [`ToolInvocation`] carries one decoded call for each of them. Both tools
//! forward a push notification to the site owner. Notification failures are
//! reported back to the model in the result payload and never abort the turn.

pub mod notifier;
pub mod record_unknown_question;
pub mod record_user_details;

use std::sync::Arc;

use docent_core::{MessageToolCall, ToolCall, ToolDefinition, ToolError, ToolResult};
use tracing::{debug, info, warn};

pub use notifier::{Notifier, PushbulletNotifier, TracingNotifier};
pub use record_unknown_question::UnknownQuestion;
pub use record_user_details::UserDetails;

/// Every tool the model is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    RecordUserDetails,
    RecordUnknownQuestion,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::RecordUserDetails, ToolKind::RecordUnknownQuestion];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::RecordUserDetails => record_user_details::NAME,
            ToolKind::RecordUnknownQuestion => record_unknown_question::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The descriptor sent to the model.
    pub fn definition(self) -> ToolDefinition {
        let (description, parameters) = match self {
            ToolKind::RecordUserDetails => (
                record_user_details::DESCRIPTION,
                record_user_details::parameters(),
            ),
            ToolKind::RecordUnknownQuestion => (
                record_unknown_question::DESCRIPTION,
                record_unknown_question::parameters(),
            ),
        };
        ToolDefinition {
            name: self.name().to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// A decoded call to one of the declared tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    RecordUserDetails(UserDetails),
    RecordUnknownQuestion(UnknownQuestion),
}

impl ToolInvocation {
    /// Decode the arguments for `kind`. Missing required parameters and
    /// non-string values are rejected.
    pub fn decode(kind: ToolKind, arguments: serde_json::Value) -> Result<Self, ToolError> {
        let invalid = |e: serde_json::Error| ToolError::InvalidArguments {
            tool_name: kind.name().to_string(),
            reason: e.to_string(),
        };
        Ok(match kind {
            ToolKind::RecordUserDetails => {
                Self::RecordUserDetails(serde_json::from_value(arguments).map_err(invalid)?)
            }
            ToolKind::RecordUnknownQuestion => {
                Self::RecordUnknownQuestion(serde_json::from_value(arguments).map_err(invalid)?)
            }
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::RecordUserDetails(_) => ToolKind::RecordUserDetails,
            Self::RecordUnknownQuestion(_) => ToolKind::RecordUnknownQuestion,
        }
    }

    /// Text pushed to the owner when this call runs.
    pub fn notification(&self) -> String {
        match self {
            Self::RecordUserDetails(details) => details.notification(),
            Self::RecordUnknownQuestion(question) => question.notification(),
        }
    }
}

/// Routes model tool calls to their handlers.
#[derive(Clone)]
pub struct ToolDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl ToolDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Descriptors for every declared tool, in declaration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
    }

    /// Execute one model-issued call.
    ///
    /// Arguments are parsed before the name is resolved, so undecodable
    /// arguments are an error even for undeclared names. Returns `Ok(None)`
    /// for names that are not declared tools.
    pub async fn dispatch(&self, call: &MessageToolCall) -> Result<Option<ToolResult>, ToolError> {
        let decoded = ToolCall::decode(call)?;
        let Some(kind) = ToolKind::from_name(&decoded.name) else {
            warn!(tool = %decoded.name, call_id = %decoded.id, "Model requested an unknown tool, skipping");
            return Ok(None);
        };

        let invocation = ToolInvocation::decode(kind, decoded.arguments)?;
        let output = self.invoke(&invocation).await;

        Ok(Some(ToolResult {
            call_id: decoded.id,
            output,
        }))
    }

    /// Run a decoded invocation and build its result payload.
    pub async fn invoke(&self, invocation: &ToolInvocation) -> serde_json::Value {
        let tool = invocation.kind().name();
        info!(tool, "Executing tool");

        match self.notifier.notify(&invocation.notification()).await {
            Ok(()) => {
                debug!(tool, notifier = self.notifier.name(), "Notification delivered");
                serde_json::json!({ "status": "ok" })
            }
            Err(e) => {
                warn!(tool, error = %e, "Notification failed");
                serde_json::json!({ "status": "error", "error": e.to_string() })
            }
        }
    }
}
