//! Identity: who the assistant speaks for, and the system prompt.
//!
//! The system prompt is rebuilt for every chat turn from the identity name
//! and the knowledge text fetched at startup. Nothing here is cached, so the
//! prompt always reflects the same immutable inputs.

use serde::{Deserialize, Serialize};

/// Name used when no identity is configured.
pub const DEFAULT_NAME: &str = "Pratik";

/// The assistant's identity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The person whose portfolio the assistant represents
    pub name: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build the system prompt around the given knowledge text.
    pub fn system_prompt(&self, knowledge: &str) -> String {
        let name = &self.name;
        format!(
            "You are acting as a portfolio assistant for {name}. You are answering questions on \
             {name}'s personal portfolio website, particularly questions related to {name}'s \
             projects, skills, and experience. \
             Provide well structured and summarized professional answers. \
             Do not entertain any questions that are not related to {name} in any way. \
             Whenever in the answer you have something from the portfolio content that has a \
             reference link, include the link in your response. \
             Use the following portfolio content to answer questions:\n\n\
             {knowledge}\n\n\
             If asked about {name}'s introduction or who they are, give a detailed answer. \
             If you do not know the answer, then record the question using your \
             record_unknown_question tool. \
             If the user is interested in getting in touch with {name} then try to get the \
             user's email and record it using your record_user_details tool."
        )
    }
}
