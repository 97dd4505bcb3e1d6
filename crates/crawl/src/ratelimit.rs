//! Process-wide throttle flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared "the remote is throttling us" flag.
///
/// Advisory only: races between readers and the writer just mean one more or
/// one fewer request during a throttle window. Cloning shares the flag.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limited: Arc<AtomicBool>,
    /// Sleep between checks while limited.
    pause: Duration,
    /// How long the flag stays raised after [`set_limited`](Self::set_limited).
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(pause: Duration, cooldown: Duration) -> Self {
        Self {
            limited: Arc::new(AtomicBool::new(false)),
            pause,
            cooldown,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limited.load(Ordering::Acquire)
    }

    /// Raises the flag. Idempotent.
    ///
    /// The call that actually raises it also schedules the flag to drop again
    /// after the cooldown, so must run inside a Tokio runtime.
    pub fn set_limited(&self) {
        if self.limited.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::warn!(cooldown_ms = self.cooldown.as_millis() as u64, "remote is rate limiting; backing off");
        let limited = Arc::clone(&self.limited);
        let cooldown = self.cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            limited.store(false, Ordering::Release);
            tracing::info!("rate limit cooldown over; resuming");
        });
    }

    /// Sleeps until the flag is down. Returns `true` if it had to wait at all.
    pub async fn wait(&self) -> bool {
        let mut waited = false;
        while self.is_limited() {
            waited = true;
            tokio::time::sleep(self.pause).await;
        }
        waited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(10))
    }
}
