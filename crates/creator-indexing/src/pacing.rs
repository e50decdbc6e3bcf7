//! Request pacing against the embedding provider's quota.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use creator_embeddings::Clock;
use creator_types::PacingSettings;
use tracing::info;

/// Decides how long to wait before each chunk and each provider call.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Called before chunk `index` (0-based) of `total` starts.
    async fn before_chunk(&self, index: usize, total: usize);

    /// Called before the call at `position` (0-based) within a chunk.
    async fn before_call(&self, position: usize);
}

/// Fixed delay between calls, fixed pause between chunks.
///
/// Nothing waits before the first chunk or the first call of a chunk.
pub struct FixedWindowLimiter {
    call_delay: Duration,
    chunk_pause: Duration,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    pub fn new(call_delay: Duration, chunk_pause: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            call_delay,
            chunk_pause,
            clock,
        }
    }

    pub fn from_settings(settings: &PacingSettings, clock: Arc<dyn Clock>) -> Self {
        Self::new(settings.call_delay(), settings.chunk_pause(), clock)
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn before_chunk(&self, index: usize, total: usize) {
        if index == 0 || self.chunk_pause.is_zero() {
            return;
        }
        info!(
            chunk = index + 1,
            total,
            pause_secs = self.chunk_pause.as_secs(),
            "Pausing for provider quota window"
        );
        self.clock.sleep(self.chunk_pause).await;
    }

    async fn before_call(&self, position: usize) {
        if position == 0 || self.call_delay.is_zero() {
            return;
        }
        self.clock.sleep(self.call_delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creator_embeddings::ManualClock;

    #[tokio::test]
    async fn test_no_wait_before_first_chunk_or_call() {
        let clock = Arc::new(ManualClock::new());
        let limiter = FixedWindowLimiter::new(
            Duration::from_millis(200),
            Duration::from_secs(62),
            clock.clone(),
        );

        limiter.before_chunk(0, 3).await;
        limiter.before_call(0).await;
        assert!(clock.sleeps().is_empty());

        limiter.before_call(1).await;
        limiter.before_chunk(1, 3).await;
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(200), Duration::from_secs(62)]
        );
    }

    #[tokio::test]
    async fn test_zero_durations_skip_sleep() {
        let clock = Arc::new(ManualClock::new());
        let limiter = FixedWindowLimiter::new(Duration::ZERO, Duration::ZERO, clock.clone());
        limiter.before_chunk(2, 3).await;
        limiter.before_call(5).await;
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_from_settings_defaults() {
        let clock = Arc::new(ManualClock::new());
        let limiter = FixedWindowLimiter::from_settings(&PacingSettings::default(), clock.clone());
        limiter.before_call(1).await;
        limiter.before_chunk(1, 2).await;
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(200), Duration::from_millis(62_000)]
        );
    }
}
