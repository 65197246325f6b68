//! # Docent Core
//!
//! Domain types, traits, and error definitions for the Docent chat backend.
//! This crate has **no framework dependencies**: it defines the message model,
//! the provider abstraction and the assistant identity that the other crates
//! implement against.

pub mod error;
pub mod identity;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, ToolError};
pub use identity::Identity;
pub use message::{ChatTurn, Message, MessageToolCall, Role, format_history};
pub use provider::{FinishReason, Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{ToolCall, ToolResult};
