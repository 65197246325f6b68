//! The chat orchestrator for Docent.
//!
//! A chat turn runs as a small loop:
//!
//! 1. **Build context**: system prompt (identity + knowledge), prior turns,
//!    then the new user message
//! 2. **Complete** through the rotating credential pool
//! 3. **If tool calls**: dispatch them, append results, go back to step 2
//! 4. **If text**: log the interaction and return the answer
//!
//! Tool rounds are capped so a model that keeps asking for tools cannot
//! hold a request forever.

pub mod assistant;
pub mod builder;

pub use assistant::{Assistant, TOOL_ROUNDS_EXHAUSTED_ANSWER};
pub use builder::{BuildError, build_assistant};
