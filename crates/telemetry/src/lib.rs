//! Interaction logging for Docent.
//!
//! Every completed chat turn is appended as one JSON object per line to an
//! interaction log. Logging is best effort: a failing sink is reported via
//! `tracing` and never surfaces to the caller of the chat turn.

pub mod interaction;

pub use interaction::{
    InteractionLogger, InteractionRecord, InteractionSink, JsonlFileSink, MemorySink,
};

/// Errors from an interaction sink.
#[derive(Debug, thiserror::Error)]
pub enum InteractionLogError {
    #[error("Failed to write interaction log {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to serialize interaction record: {0}")]
    Serialization(#[from] serde_json::Error),
}
