//! Pacing between conversation exports.
//!
//! The Slack Web API rate-limits aggressively, so the exporter pauses after
//! each conversation's full history fetch before starting the next one. The
//! policy is a trait so that an adaptive backoff could replace the fixed
//! delay without touching the export algorithm.

use std::future::Future;
use std::time::Duration;

/// Delay applied between conversation exports when nothing else is asked.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(15);

/// Policy invoked once after each conversation's history is fetched.
pub trait Pacer {
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

/// Fixed blocking-equivalent delay, the production policy.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No-op policy for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}
