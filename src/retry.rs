use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Initial delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    /// Set the maximum delay between retries
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset: page fragments and the translation resource (2 attempts)
    /// Delays: 250ms before the second attempt
    pub fn fragment() -> Self {
        Self::new(2, Duration::from_millis(250)).with_max_delay(Duration::from_secs(1))
    }

    /// Preset: no retries at all
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Calculate the delay for a given attempt number (0-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::fragment()
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects the error, or
/// the attempts run out. The last error is returned.
///
/// Some errors (like a 404 for a missing page) will not go away on retry, while
/// others (5xx, network) might. A `max_attempts` of 0 still makes one attempt.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = config.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!("{}: attempt {}/{} in {:?}", operation_name, attempt + 1, attempts, delay);
            sleep(delay).await;
        }

        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{}: succeeded on attempt {}/{}", operation_name, attempt + 1, attempts);
                }
                return Ok(value);
            }
            Err(e) if !should_retry(&e) => {
                debug!("{}: not retryable: {}", operation_name, e);
                return Err(e);
            }
            Err(e) if attempt + 1 >= attempts => {
                warn!("{}: giving up after {} attempts: {}", operation_name, attempts, e);
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying",
                    operation_name,
                    attempt + 1,
                    attempts,
                    e
                );
                attempt += 1;
            }
        }
    }
}
