//! Rate-limit aware retry.
//!
//! The provider quota is per minute, so waits grow linearly with the attempt
//! number (step, 2*step, 3*step...) rather than exponentially.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::backoff::Backoff;
use tracing::warn;

use crate::clock::Clock;
use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Backoff that waits `step * n` before the n-th retry and stops after
/// `max_retries`.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    step: Duration,
    max_retries: u32,
    retries: u32,
}

impl LinearBackoff {
    pub fn new(step: Duration, max_retries: u32) -> Self {
        Self {
            step,
            max_retries,
            retries: 0,
        }
    }
}

impl Backoff for LinearBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.max_retries {
            return None;
        }
        self.retries += 1;
        Some(self.step * self.retries)
    }

    fn reset(&mut self) {
        self.retries = 0;
    }
}

/// When and how long to retry a failed provider call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base wait, multiplied by the retry number
    pub backoff_step: Duration,
    /// Errors for which a retry is worthwhile
    pub is_retryable: fn(&EmbeddingError) -> bool,
}

impl RetryPolicy {
    /// Retry on rate-limit signals and empty responses; everything else
    /// fails immediately.
    pub fn rate_limited(max_retries: u32, backoff_step: Duration) -> Self {
        Self {
            max_retries,
            backoff_step,
            is_retryable: default_retryable,
        }
    }

    /// Fresh backoff state for one logical call.
    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff::new(self.backoff_step, self.max_retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::rate_limited(3, Duration::from_secs(20))
    }
}

fn default_retryable(err: &EmbeddingError) -> bool {
    err.is_rate_limit() || matches!(err, EmbeddingError::EmptyEmbedding)
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up.
///
/// `op` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    mut op: F,
) -> Result<T, EmbeddingError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, EmbeddingError>>,
{
    let mut backoff = policy.backoff();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !(policy.is_retryable)(&e) => return Err(e),
            Err(e) => match backoff.next_backoff() {
                Some(wait) => {
                    warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        error = %e,
                        "Provider call failed, retrying"
                    );
                    clock.sleep(wait).await;
                }
                None => {
                    return Err(EmbeddingError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            },
        }
    }
}

/// Wraps an embedding model with [`retry_with_backoff`].
pub struct RetryingEmbedder<E> {
    inner: E,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl<E: EmbeddingModel> RetryingEmbedder<E> {
    pub fn new(inner: E, policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            policy,
            clock,
        }
    }
}

#[async_trait]
impl<E: EmbeddingModel> EmbeddingModel for RetryingEmbedder<E> {
    fn info(&self) -> &ModelInfo {
        self.inner.info()
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        retry_with_backoff(&self.policy, self.clock.as_ref(), |_| self.inner.embed(text)).await
    }
}
