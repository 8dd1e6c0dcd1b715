use coindash_coingecko::MarketError;
use std::future::Future;
use std::time::Duration;

/// Caller-side policy for riding out upstream rate limits.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Upper bound on a single wait, whatever `Retry-After` says.
    pub max_wait: Duration,
    /// Adds up to 10% on top of each wait.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            max_wait: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn delay_for(&self, retry_after: Duration) -> Duration {
        let capped = retry_after.min(self.max_wait);
        if !self.jitter {
            return capped;
        }
        capped.mul_f64(1.0 + rand::random::<f64>() * 0.1)
    }
}

/// Runs `op`, sleeping and retrying only when it fails with `RateLimited`.
pub async fn retry_rate_limited<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, MarketError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(MarketError::RateLimited { retry_after }) if attempt < config.max_retries => {
                let delay = config.delay_for(retry_after);
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, waiting before retry"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn no_jitter() -> RetryConfig {
        RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn delay_is_capped() {
        let config = no_jitter();
        assert_eq!(config.delay_for(Duration::from_secs(5)), Duration::from_secs(5));
        assert_eq!(config.delay_for(Duration::from_secs(600)), Duration::from_secs(60));
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let config = RetryConfig::default();
        for _ in 0..100 {
            let delay = config.delay_for(Duration::from_secs(10));
            assert!(delay >= Duration::from_secs(10));
            assert!(delay <= Duration::from_secs(11));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_rate_limits_then_succeeds() {
        let calls = Cell::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_rate_limited(&no_jitter(), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(MarketError::RateLimited {
                        retry_after: Duration::from_secs(2),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.expect("third attempt succeeds"), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let calls = Cell::new(0);

        let result: Result<(), _> = retry_rate_limited(&no_jitter(), || {
            calls.set(calls.get() + 1);
            async {
                Err(MarketError::RateLimited {
                    retry_after: Duration::from_secs(1),
                })
            }
        })
        .await;

        assert!(result.expect_err("still limited").is_rate_limited());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let calls = Cell::new(0);

        let result: Result<(), _> = retry_rate_limited(&no_jitter(), || {
            calls.set(calls.get() + 1);
            async {
                Err(MarketError::NotFound {
                    id: "nope".to_string(),
                })
            }
        })
        .await;

        assert!(result.expect_err("not found").is_not_found());
        assert_eq!(calls.get(), 1);
    }
}
