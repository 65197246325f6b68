//! The chat turn loop.

use std::sync::Arc;

use docent_core::{ChatTurn, Identity, Message, Provider, ProviderRequest, format_history};
use docent_knowledge::KnowledgeText;
use docent_telemetry::InteractionLogger;
use docent_tools::ToolDispatcher;
use tracing::{debug, info, warn};

/// Answer returned when the model keeps requesting tools past the round cap.
pub const TOOL_ROUNDS_EXHAUSTED_ANSWER: &str =
    "I'm sorry, I wasn't able to finish answering that. Could you try rephrasing your question?";

const DEFAULT_TEMPERATURE: f32 = 0.6;
const DEFAULT_MAX_TOOL_ROUNDS: u32 = 8;

/// Answers visitor questions about one person's portfolio.
///
/// Shared across requests behind an `Arc`; a chat turn never mutates it.
pub struct Assistant {
    /// Completion backend, normally the rotating credential pool
    provider: Arc<dyn Provider>,

    /// Model id sent with every request
    model: String,

    temperature: f32,
    top_p: Option<f32>,
    max_tokens: Option<u32>,

    /// Declared tools and their handlers
    tools: ToolDispatcher,

    /// Whose portfolio this is
    identity: Identity,

    /// Document fetched at startup
    knowledge: KnowledgeText,

    logger: InteractionLogger,

    /// Maximum tool rounds per chat turn
    max_tool_rounds: u32,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: ToolDispatcher,
        identity: Identity,
        knowledge: KnowledgeText,
        logger: InteractionLogger,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: None,
            max_tokens: None,
            tools,
            identity,
            knowledge,
            logger,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the maximum number of tool rounds per chat turn.
    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn knowledge(&self) -> &KnowledgeText {
        &self.knowledge
    }

    pub fn system_prompt(&self) -> String {
        self.identity.system_prompt(self.knowledge.as_str())
    }

    /// System prompt, then prior turns in order, then the new message.
    pub fn build_messages(&self, message: &str, history: &[ChatTurn]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(Message::system(self.system_prompt()));
        messages.extend(format_history(history));
        messages.push(Message::user(message));
        messages
    }

    fn request(&self, messages: &[Message], tools: &[docent_core::ToolDefinition]) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            tools: tools.to_vec(),
        }
    }

    /// Answer `message` given the prior conversation.
    ///
    /// Runs completion rounds until the model produces text, dispatching any
    /// requested tools in between. The finished turn is written to the
    /// interaction log; a logging failure does not affect the answer.
    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, docent_core::Error> {
        info!(history = history.len(), "Processing chat turn");

        let mut messages = self.build_messages(message, history);
        let tool_definitions = self.tools.definitions();
        let mut rounds = 0;

        let answer = loop {
            let response = self
                .provider
                .complete(self.request(&messages, &tool_definitions))
                .await?;

            if !response.requests_tools() {
                break response.message.content;
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                warn!(
                    rounds = self.max_tool_rounds,
                    "Max tool rounds reached, ending turn with fallback answer"
                );
                break TOOL_ROUNDS_EXHAUSTED_ANSWER.to_string();
            }

            debug!(
                round = rounds,
                tool_count = response.message.tool_calls.len(),
                "Executing tool calls"
            );

            let calls = response.message.tool_calls.clone();
            messages.push(response.message);

            for call in &calls {
                if let Some(result) = self.tools.dispatch(call).await? {
                    messages.push(result.into_message());
                }
            }
        };

        self.logger.record(message, &answer).await;
        Ok(answer)
    }
}
