//! LLM provider implementations for Docent.
//!
//! All providers implement the `docent_core::Provider` trait. The
//! OpenAI-compatible client talks to the hosted model with a single API key;
//! the rotating provider pools one client per key and survives rate limits.

pub mod openai_compat;
pub mod rotation;

pub use openai_compat::OpenAiCompatProvider;
pub use rotation::{RetryPolicy, RotatingProvider};

use std::sync::Arc;

use docent_core::error::ProviderError;
use docent_core::provider::Provider;

/// Build the credential-rotating provider described by the configuration.
pub fn build_from_config(
    config: &docent_config::AppConfig,
) -> Result<RotatingProvider, ProviderError> {
    let client = openai_compat::http_client()?;
    let clients: Vec<Arc<dyn Provider>> = config
        .api_keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let name = format!("{}#{}", config.model.provider_name, i + 1);
            Arc::new(OpenAiCompatProvider::with_client(
                name,
                &config.model.base_url,
                key,
                client.clone(),
            )) as Arc<dyn Provider>
        })
        .collect();

    RotatingProvider::new(
        config.model.provider_name.clone(),
        clients,
        RetryPolicy::from(&config.retry),
    )
}
