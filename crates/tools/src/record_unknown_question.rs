//! `record_unknown_question`: the assistant could not answer.

use serde::Deserialize;

pub const NAME: &str = "record_unknown_question";

pub(crate) const DESCRIPTION: &str =
    "Always use this tool to record any question that couldn't be answered as you didn't know the answer";

pub(crate) fn parameters() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The question that couldn't be answered"
            }
        },
        "required": ["question"],
        "additionalProperties": false
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnknownQuestion {
    pub question: String,
}

impl UnknownQuestion {
    pub fn notification(&self) -> String {
        format!("Recording {} asked that I couldn't answer", self.question)
    }
}
