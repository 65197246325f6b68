//! Assembles an [`Assistant`] from loaded configuration.

use std::sync::Arc;

use docent_config::{AppConfig, ConfigError};
use docent_core::{Identity, Provider, ProviderError, ToolError};
use docent_knowledge::{KnowledgeError, KnowledgeFetcher, KnowledgeText};
use docent_telemetry::InteractionLogger;
use docent_tools::{Notifier, PushbulletNotifier, ToolDispatcher, TracingNotifier};
use tracing::info;

use crate::assistant::Assistant;

/// Startup failures. All of them stop the process.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Notifier(#[from] ToolError),
}

/// Build the assistant: credential pool, knowledge document, notifier and
/// interaction log. Fetches the knowledge document, so this is the only
/// network call made at startup.
pub async fn build_assistant(config: &AppConfig) -> Result<Assistant, BuildError> {
    let provider = docent_providers::build_from_config(config)?;
    info!(
        provider = %config.model.provider_name,
        credentials = provider.len(),
        model = %config.model.model,
        "Credential pool ready"
    );

    let url = config
        .knowledge_url
        .as_deref()
        .ok_or(ConfigError::MissingKnowledgeUrl)?;
    let knowledge = KnowledgeFetcher::new()?.fetch(url).await?;

    let notifier = build_notifier(config)?;
    let logger = InteractionLogger::jsonl(&config.interaction_log.path);

    Ok(assemble(config, Arc::new(provider), knowledge, notifier, logger))
}

/// Pushbullet when a key is configured, log-only otherwise.
pub fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, BuildError> {
    match config.notification_key.as_deref() {
        Some(key) if !key.is_empty() => Ok(Arc::new(PushbulletNotifier::new(key)?)),
        _ => {
            info!("No notification key configured, notifications will only be logged");
            Ok(Arc::new(TracingNotifier))
        }
    }
}

/// Wire already-built parts together with the configured model settings.
pub fn assemble(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
    knowledge: KnowledgeText,
    notifier: Arc<dyn Notifier>,
    logger: InteractionLogger,
) -> Assistant {
    Assistant::new(
        provider,
        &config.model.model,
        ToolDispatcher::new(notifier),
        Identity::new(&config.agent.assistant_name),
        knowledge,
        logger,
    )
    .with_temperature(config.model.temperature)
    .with_top_p(config.model.top_p)
    .with_max_tokens(config.model.max_tokens)
    .with_max_tool_rounds(config.agent.max_tool_rounds)
}
