use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Longest gap a throttle will enforce.
pub const MAX_MIN_INTERVAL: Duration = Duration::from_secs(3600);

/// Minimum-gap limiter shared by every request a client issues.
///
/// The lock is held while sleeping, so waiters are released one at a time in
/// the order they arrived and each release restarts the gap.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Gaps above [`MAX_MIN_INTERVAL`] are clamped to it.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval: min_interval.min(MAX_MIN_INTERVAL),
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Resolves once the caller may fire its request.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(previous) = *last_request {
            let ready_at = previous
                .checked_add(self.min_interval)
                .unwrap_or_else(|| previous + MAX_MIN_INTERVAL);
            if ready_at > Instant::now() {
                tracing::debug!(
                    delay_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "throttling request"
                );
                sleep_until(ready_at).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}
