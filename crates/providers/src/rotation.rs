//! Credential rotation: survive provider rate limits across a pool of API keys.
//!
//! Every credential gets its own provider client. On a rate limit the same
//! credential is retried with exponential backoff; once its attempts are used
//! up the pool rotates to the next credential, wrapping around. When every
//! credential has been exhausted within one request the request fails.
//!
//! The cursor naming the current credential is shared by all requests and
//! moved with an atomic compare-and-swap. Attempt counters live on the stack
//! of each `complete()` call, so concurrent requests never spend each
//! other's retry budget.

use async_trait::async_trait;
use docent_core::error::ProviderError;
use docent_core::provider::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How rate limits are retried before and across rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts on one credential before rotating to the next
    pub max_attempts_per_credential: u32,

    /// Backoff after the n-th failed attempt is `base^n` seconds
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    /// Sleep applied after the given (1-based) failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base_secs.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_credential: 2,
            backoff_base_secs: 2,
        }
    }
}

impl From<&docent_config::RetryConfig> for RetryPolicy {
    fn from(config: &docent_config::RetryConfig) -> Self {
        Self {
            max_attempts_per_credential: config.max_attempts_per_credential.max(1),
            backoff_base_secs: config.backoff_base_secs,
        }
    }
}

/// A provider that rotates through a non-empty pool of credentials.
pub struct RotatingProvider {
    name: String,
    credentials: Vec<Arc<dyn Provider>>,
    cursor: AtomicUsize,
    policy: RetryPolicy,
}

impl std::fmt::Debug for RotatingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingProvider")
            .field("name", &self.name)
            .field("credentials", &self.credentials.len())
            .field("cursor", &self.current_index())
            .field("policy", &self.policy)
            .finish()
    }
}

impl RotatingProvider {
    /// Create a pool over the given per-credential providers.
    ///
    /// Fails when `credentials` is empty.
    pub fn new(
        name: impl Into<String>,
        credentials: Vec<Arc<dyn Provider>>,
        policy: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        if credentials.is_empty() {
            return Err(ProviderError::NotConfigured(
                "No API keys found. Please set at least one API key.".into(),
            ));
        }

        Ok(Self {
            name: name.into(),
            credentials,
            cursor: AtomicUsize::new(0),
            policy,
        })
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Never true for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Index of the credential the next request will start with.
    pub fn current_index(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Advance past `index`, publishing the move unless another request
    /// already rotated away from it. Returns the index this request uses next.
    fn rotate_from(&self, index: usize) -> usize {
        let next = (index + 1) % self.credentials.len();
        let _ = self
            .cursor
            .compare_exchange(index, next, Ordering::AcqRel, Ordering::Acquire);
        next
    }
}

#[async_trait]
impl Provider for RotatingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let total = self.credentials.len();
        let mut index = self.current_index() % total;
        let mut remaining = total;
        let mut retries = 0u32;
        let mut attempts = 0u32;

        loop {
            let provider = &self.credentials[index];
            attempts += 1;

            debug!(
                provider = %provider.name(),
                credential = index,
                attempt = attempts,
                "Requesting completion"
            );

            match provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(ProviderError::RateLimited { .. }) => {
                    retries += 1;
                    warn!(
                        provider = %provider.name(),
                        credential = index,
                        retry = retries,
                        max_retries = self.policy.max_attempts_per_credential,
                        "Rate limit hit"
                    );

                    tokio::time::sleep(self.policy.backoff(retries)).await;

                    if retries >= self.policy.max_attempts_per_credential {
                        index = self.rotate_from(index);
                        retries = 0;
                        remaining -= 1;
                        info!(credential = index, remaining, "Max retries reached, rotated API key");

                        if remaining == 0 {
                            return Err(ProviderError::CredentialsExhausted {
                                credentials: total,
                                attempts,
                            });
                        }
                    }
                }
                Err(e) => {
                    warn!(provider = %provider.name(), error = %e, "Completion failed");
                    return Err(e);
                }
            }
        }
    }
}
