//! Spacing between page crawls.
//!
//! The engine asks its limiter for a permit before every page it crawls.
//! Time spent in between (probing links, extracting) counts toward the
//! interval, so a slow page is not followed by a full extra delay.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next navigation may start
    async fn acquire(&self);
}

/// Permits are handed out at least `interval` apart
#[derive(Debug)]
pub struct FixedInterval {
    interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_permit: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedInterval {
    async fn acquire(&self) {
        let mut last = self.last_permit.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if Instant::now() < ready_at {
                ::log::trace!("Rate limited for {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// No spacing at all
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}
