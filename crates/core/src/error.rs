//! Error types for the Docent domain.
//!
//! Provider and tool failures each have their own enum; [`Error`] wraps
//! whichever of them ends a chat turn.

use thiserror::Error;

/// The top-level error type for a chat turn.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

impl Error {
    /// Whether this error means every credential in the pool is rate limited.
    pub fn is_credentials_exhausted(&self) -> bool {
        matches!(self, Error::Provider(ProviderError::CredentialsExhausted { .. }))
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("All {credentials} API credentials exhausted due to rate limits after {attempts} attempts")]
    CredentialsExhausted { credentials: usize, attempts: u32 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },

    #[error("Notification failed: {0}")]
    NotificationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 500,
            message: "Internal Server Error".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn exhausted_credentials_are_detectable() {
        let err = Error::from(ProviderError::CredentialsExhausted {
            credentials: 2,
            attempts: 4,
        });
        assert!(err.is_credentials_exhausted());
        assert!(err.to_string().contains("exhausted"));

        let other = Error::from(ProviderError::RateLimited { retry_after_secs: 5 });
        assert!(!other.is_credentials_exhausted());
    }

    #[test]
    fn tool_error_names_the_tool() {
        let err = Error::Tool(ToolError::InvalidArguments {
            tool_name: "record_user_details".into(),
            reason: "missing field `email`".into(),
        });
        assert!(err.to_string().contains("record_user_details"));
        assert!(err.to_string().contains("email"));
    }
}
