//! `record_user_details`: a visitor wants to get in touch.

use serde::Deserialize;

pub const NAME: &str = "record_user_details";

const DEFAULT_NAME: &str = "Name not provided";
const DEFAULT_NOTES: &str = "not provided";

pub(crate) const DESCRIPTION: &str = "Use this tool to record that a user is interested in \
     being in touch and provided an email address";

pub(crate) fn parameters() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "email": {
                "type": "string",
                "description": "The email address of this user"
            },
            "name": {
                "type": "string",
                "description": "The user's name, if they provided it"
            },
            "notes": {
                "type": "string",
                "description": "Any additional information about the conversation that's worth recording to give context"
            }
        },
        "required": ["email"],
        "additionalProperties": false
    })
}

/// Contact details left by a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDetails {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UserDetails {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or(DEFAULT_NOTES)
    }

    pub fn notification(&self) -> String {
        format!(
            "Recording interest from {} with email {} and notes {}",
            self.name(),
            self.email,
            self.notes()
        )
    }
}
