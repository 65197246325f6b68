//! Interaction records and the sinks they are written to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::InteractionLogError;

/// One completed chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub assistant_response: String,
}

impl InteractionRecord {
    pub fn new(user_input: impl Into<String>, assistant_response: impl Into<String>) -> Self {
        Self::at(Utc::now(), user_input, assistant_response)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        user_input: impl Into<String>,
        assistant_response: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            user_input: user_input.into(),
            assistant_response: assistant_response.into(),
        }
    }

    /// Serialize to a single JSONL line, trailing newline included.
    pub fn to_line(&self) -> Result<String, InteractionLogError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Where interaction records are written.
#[async_trait]
pub trait InteractionSink: Send + Sync {
    async fn append(&self, record: &InteractionRecord) -> Result<(), InteractionLogError>;
}

/// Appends records to a JSONL file, creating it on first write.
///
/// Appends are serialized through a mutex so concurrent chat turns never
/// interleave partial lines.
pub struct JsonlFileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> InteractionLogError {
        InteractionLogError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl InteractionSink for JsonlFileSink {
    async fn append(&self, record: &InteractionRecord) -> Result<(), InteractionLogError> {
        let line = record.to_line()?;
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Keeps records in memory. Useful for tests and dry runs.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<InteractionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl InteractionSink for MemorySink {
    async fn append(&self, record: &InteractionRecord) -> Result<(), InteractionLogError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Best-effort front end over a sink.
#[derive(Clone)]
pub struct InteractionLogger {
    sink: Arc<dyn InteractionSink>,
}

impl std::fmt::Debug for InteractionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionLogger").finish_non_exhaustive()
    }
}

impl InteractionLogger {
    pub fn new(sink: Arc<dyn InteractionSink>) -> Self {
        Self { sink }
    }

    /// Logger writing to a JSONL file at `path`.
    pub fn jsonl(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonlFileSink::new(path)))
    }

    /// Record a completed turn stamped with the current time.
    pub async fn record(&self, user_input: &str, assistant_response: &str) {
        self.record_at(Utc::now(), user_input, assistant_response).await;
    }

    /// Record a completed turn. Sink failures are logged and swallowed.
    pub async fn record_at(
        &self,
        timestamp: DateTime<Utc>,
        user_input: &str,
        assistant_response: &str,
    ) {
        let record = InteractionRecord::at(timestamp, user_input, assistant_response);
        match self.sink.append(&record).await {
            Ok(()) => debug!("Interaction logged"),
            Err(e) => warn!(error = %e, "Failed to log interaction"),
        }
    }
}
