//! Push notifications sent by the tools.

use std::time::Duration;

use async_trait::async_trait;
use docent_core::ToolError;
use serde::Serialize;
use tracing::{debug, info};

/// Pushbullet's push creation endpoint.
pub const PUSHBULLET_ENDPOINT: &str = "https://api.pushbullet.com/v2/pushes";

/// Title carried by every notification.
pub const NOTIFICATION_TITLE: &str = "Portfolio Assistant";

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers a short text notification to the site owner.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, body: &str) -> Result<(), ToolError>;
}

#[derive(Serialize)]
struct PushNote<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    body: &'a str,
}

/// Sends notes through the Pushbullet API.
pub struct PushbulletNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PushbulletNotifier {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .map_err(|e| ToolError::NotificationFailed(e.to_string()))?;
        Ok(Self::with_client(PUSHBULLET_ENDPOINT, api_key, client))
    }

    pub fn with_client(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Notifier for PushbulletNotifier {
    fn name(&self) -> &str {
        "pushbullet"
    }

    async fn notify(&self, body: &str) -> Result<(), ToolError> {
        let note = PushNote {
            kind: "note",
            title: NOTIFICATION_TITLE,
            body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Access-Token", &self.api_key)
            .json(&note)
            .send()
            .await
            .map_err(|e| ToolError::NotificationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ToolError::NotificationFailed(format!(
                "Pushbullet returned {status}: {text}"
            )));
        }

        debug!("Pushbullet note sent");
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them.
/// Used when no Pushbullet key is configured.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn notify(&self, body: &str) -> Result<(), ToolError> {
        info!(title = NOTIFICATION_TITLE, body, "Notification");
        Ok(())
    }
}
