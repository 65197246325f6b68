//! Configuration loading, validation, and management for Docent.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`$DOCENT_CONFIG`, else `./docent.toml` if present)
//! 3. The process environment, after loading `./.env`
//!
//! Secrets (API keys, the notification key) are only ever read from the
//! environment. They are skipped when serializing and redacted in `Debug`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Credential slots, scanned in order. Unset or blank slots are skipped.
pub const CREDENTIAL_VARS: [&str; 4] = [
    "GEMINI_API_KEY_1",
    "GEMINI_API_KEY_2",
    "GEMINI_API_KEY_3",
    "GEMINI_API_KEY_4",
];
pub const KNOWLEDGE_URL_VAR: &str = "KNOWLEDGE_URL";
pub const NOTIFICATION_KEY_VAR: &str = "PUSHBULLET_API_KEY";
pub const CHAT_LOG_PATH_VAR: &str = "CHAT_LOG_PATH";
pub const CONFIG_PATH_VAR: &str = "DOCENT_CONFIG";
pub const MODEL_VAR: &str = "DOCENT_MODEL";
pub const BASE_URL_VAR: &str = "DOCENT_BASE_URL";
pub const ASSISTANT_NAME_VAR: &str = "DOCENT_ASSISTANT_NAME";
pub const HOST_VAR: &str = "DOCENT_HOST";
pub const PORT_VAR: &str = "DOCENT_PORT";

/// Settings file looked up in the working directory when `DOCENT_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "docent.toml";

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model API keys, in rotation order (environment only)
    #[serde(skip)]
    pub api_keys: Vec<String>,

    /// URL of the knowledge document injected into every system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_url: Option<String>,

    /// Push notification access token (environment only)
    #[serde(skip)]
    pub notification_key: Option<String>,

    /// Model endpoint and sampling parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Rate-limit retry and rotation policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Assistant identity and loop limits
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Interaction log configuration
    #[serde(default)]
    pub interaction_log: InteractionLogConfig,
}

/// Show whether a secret is present without revealing it.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_keys", &format_args!("[{} REDACTED]", self.api_keys.len()))
            .field("knowledge_url", &self.knowledge_url)
            .field("notification_key", &redact(&self.notification_key))
            .field("model", &self.model)
            .field("retry", &self.retry)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .field("interaction_log", &self.interaction_log)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Label used in logs for the model backend
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_provider_name() -> String {
    "gemini".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f32 {
    0.6
}
fn default_top_p() -> f32 {
    0.9
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts on one credential before rotating to the next
    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_credential: u32,

    /// Backoff after the n-th failed attempt is `base^n` seconds
    #[serde(default = "default_backoff_base")]
    pub backoff_base_secs: u64,
}

fn default_max_attempts() -> u32 {
    2
}
fn default_backoff_base() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_credential: default_max_attempts(),
            backoff_base_secs: default_backoff_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Whose portfolio the assistant represents
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Tool-call rounds allowed in a single chat turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,
}

fn default_assistant_name() -> String {
    "Pratik".into()
}
fn default_max_tool_rounds() -> u32 {
    8
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLogConfig {
    /// JSON-lines file that chat interactions are appended to
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

fn default_log_path() -> PathBuf {
    PathBuf::from("chat_logs.jsonl")
}

impl Default for InteractionLogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the settings file, and the environment.
    ///
    /// Fails if no API key or no knowledge URL is configured.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv_override() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
        }

        let config_path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a specific TOML file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        self.api_keys = CREDENTIAL_VARS.iter().filter_map(|key| var(key)).collect();
        self.notification_key = var(NOTIFICATION_KEY_VAR);

        if let Some(url) = var(KNOWLEDGE_URL_VAR) {
            self.knowledge_url = Some(url);
        }
        if let Some(path) = var(CHAT_LOG_PATH_VAR) {
            self.interaction_log.path = PathBuf::from(path);
        }
        if let Some(model) = var(MODEL_VAR) {
            self.model.model = model;
        }
        if let Some(base_url) = var(BASE_URL_VAR) {
            self.model.base_url = base_url;
        }
        if let Some(name) = var(ASSISTANT_NAME_VAR) {
            self.agent.assistant_name = name;
        }
        if let Some(host) = var(HOST_VAR) {
            self.gateway.host = host;
        }
        if let Some(port) = var(PORT_VAR) {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("{PORT_VAR} must be a port number, got {port:?}"))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        if self.knowledge_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            return Err(ConfigError::MissingKnowledgeUrl);
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.top_p <= 0.0 || self.model.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "model.top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if self.retry.max_attempts_per_credential == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts_per_credential must be at least 1".into(),
            ));
        }

        if self.retry.backoff_base_secs == 0 {
            return Err(ConfigError::ValidationError(
                "retry.backoff_base_secs must be at least 1".into(),
            ));
        }

        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_rounds must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The gateway bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            knowledge_url: None,
            notification_key: None,
            model: ModelConfig::default(),
            retry: RetryConfig::default(),
            agent: AgentConfig::default(),
            gateway: GatewayConfig::default(),
            interaction_log: InteractionLogConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("No GEMINI_API_KEY_* environment variables found. Please set at least one API key.")]
    MissingCredentials,

    #[error("Knowledge document URL not provided; set the KNOWLEDGE_URL environment variable")]
    MissingKnowledgeUrl,

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn configured(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();
        config.apply_env(env(pairs))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn defaults_follow_the_hosted_model() {
        let config = AppConfig::default();
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.model.max_tokens, 1000);
        assert_eq!(config.retry.max_attempts_per_credential, 2);
        assert_eq!(config.retry.backoff_base_secs, 2);
        assert_eq!(config.interaction_log.path, PathBuf::from("chat_logs.jsonl"));
    }

    #[test]
    fn credentials_are_collected_in_slot_order() {
        let config = configured(&[
            ("GEMINI_API_KEY_3", "key-three"),
            ("GEMINI_API_KEY_1", "key-one"),
            ("GEMINI_API_KEY_2", "   "),
            (KNOWLEDGE_URL_VAR, "https://example.com/kb.md"),
        ])
        .unwrap();
        assert_eq!(config.api_keys, vec!["key-one", "key-three"]);
    }

    #[test]
    fn missing_credentials_is_fatal() {
        let err = configured(&[(KNOWLEDGE_URL_VAR, "https://example.com/kb.md")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn missing_knowledge_url_is_fatal() {
        let err = configured(&[("GEMINI_API_KEY_1", "k")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKnowledgeUrl));
    }

    #[test]
    fn env_overrides_settings() {
        let config = configured(&[
            ("GEMINI_API_KEY_1", "k"),
            (KNOWLEDGE_URL_VAR, "https://example.com/kb.md"),
            (NOTIFICATION_KEY_VAR, "o.push"),
            (CHAT_LOG_PATH_VAR, "/var/log/docent.jsonl"),
            (MODEL_VAR, "gemini-2.0-flash"),
            (ASSISTANT_NAME_VAR, "Ada"),
            (PORT_VAR, "9090"),
        ])
        .unwrap();
        assert_eq!(config.notification_key.as_deref(), Some("o.push"));
        assert_eq!(config.interaction_log.path, PathBuf::from("/var/log/docent.jsonl"));
        assert_eq!(config.model.model, "gemini-2.0-flash");
        assert_eq!(config.agent.assistant_name, "Ada");
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = configured(&[(PORT_VAR, "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_sampling_rejected() {
        let mut config = configured(&[
            ("GEMINI_API_KEY_1", "k"),
            (KNOWLEDGE_URL_VAR, "https://example.com/kb.md"),
        ])
        .unwrap();
        config.model.top_p = 0.0;
        assert!(config.validate().is_err());
        config.model.top_p = 0.9;
        config.model.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = configured(&[
            ("GEMINI_API_KEY_1", "super-secret-key"),
            (KNOWLEDGE_URL_VAR, "https://example.com/kb.md"),
            (NOTIFICATION_KEY_VAR, "push-secret"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("push-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/docent.toml")).unwrap();
        assert_eq!(config.gateway.port, 8000);
    }

    #[test]
    fn settings_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docent.toml");
        std::fs::write(
            &path,
            r#"
knowledge_url = "https://example.com/about.md"

[model]
temperature = 0.2

[retry]
max_attempts_per_credential = 3

[agent]
assistant_name = "Grace"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.knowledge_url.as_deref(), Some("https://example.com/about.md"));
        assert!((config.model.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.retry.max_attempts_per_credential, 3);
        assert_eq!(config.agent.assistant_name, "Grace");
    }

    #[test]
    fn secrets_never_serialized() {
        let mut config = AppConfig::default();
        config.api_keys = vec!["secret".into()];
        config.notification_key = Some("push".into());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("secret"));
        assert!(!toml_str.contains("push"));
    }
}
