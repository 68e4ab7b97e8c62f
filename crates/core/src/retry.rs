use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Exponential backoff configuration for upstream calls that are not the
/// mandated 522 retry-forever loop (that one lives in cinegraph-http and
/// is intentionally not parameterized this way).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn quick() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    pub fn slow() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    fn calculate_next_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let factor = if self.jitter {
            rand::thread_rng().gen_range(0.5..1.5)
        } else {
            1.0
        };
        Duration::from_secs_f64(capped * factor)
    }
}

/// Whether a given error is worth retrying at all.
pub enum RetryPolicy {
    All,
    Transient,
    Never,
}

fn should_retry(policy: &RetryPolicy, transient: bool) -> bool {
    match policy {
        RetryPolicy::All => true,
        RetryPolicy::Transient => transient,
        RetryPolicy::Never => false,
    }
}

/// Runs `op` until it succeeds, `config.max_attempts` is exhausted, or
/// `is_transient` reports the error as non-retryable.
pub async fn retry_with_backoff<T, E, F, Fut>(
    config: &RetryConfig,
    policy: RetryPolicy,
    is_transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let transient = is_transient(&err);
                attempt += 1;
                if attempt >= config.max_attempts || !should_retry(&policy, transient) {
                    return Err(err);
                }
                let delay = config.calculate_next_delay(attempt - 1);
                warn!(attempt, %err, ?delay, "retrying after transient failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Minimal circuit breaker: trips open after `failure_threshold`
/// consecutive failures, resets to half-open after `reset_timeout`.
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    reset_timeout: Duration,
    failure_count: AtomicU32,
    state: Mutex<CircuitState>,
    opened_at: Mutex<Option<Instant>>,
    success_count: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold,
            reset_timeout,
            failure_count: AtomicU32::new(0),
            state: Mutex::new(CircuitState::Closed),
            opened_at: Mutex::new(None),
            success_count: AtomicU64::new(0),
        }
    }

    pub fn can_proceed(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        match *state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let opened_at = self.opened_at.lock().unwrap();
                if let Some(at) = *opened_at {
                    if at.elapsed() >= self.reset_timeout {
                        *state = CircuitState::HalfOpen;
                        debug!(name = %self.name, "circuit breaker half-open");
                        return true;
                    }
                }
                false
            }
        }
    }

    pub fn record_success(&self) {
        self.success_count.fetch_add(1, AtomicOrdering::Relaxed);
        self.failure_count.store(0, AtomicOrdering::Relaxed);
        let mut state = self.state.lock().unwrap();
        if *state != CircuitState::Closed {
            *state = CircuitState::Closed;
            debug!(name = %self.name, "circuit breaker closed");
        }
    }

    pub fn record_failure(&self) {
        let failures = self.failure_count.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        if failures >= self.failure_threshold {
            let mut state = self.state.lock().unwrap();
            *state = CircuitState::Open;
            *self.opened_at.lock().unwrap() = Some(Instant::now());
            warn!(name = %self.name, failures, "circuit breaker opened");
        }
    }

    pub async fn execute<T, E, F, Fut>(&self, op: F) -> Result<T, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        if !self.can_proceed() {
            return Err(CoreError::CircuitBreakerOpen(self.name.clone()));
        }
        match op().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure();
                Err(CoreError::Http(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32 as StdAtomicU32;
    use std::sync::Arc;

    #[tokio::test]
    async fn retry_succeeds_on_second_attempt() {
        let calls = Arc::new(StdAtomicU32::new(0));
        let config = RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 1.0,
            jitter: false,
        };
        let calls_clone = calls.clone();
        let result: Result<u32, String> = retry_with_backoff(
            &config,
            RetryPolicy::All,
            |_| true,
            move || {
                let calls = calls_clone.clone();
                async move {
                    if calls.fetch_add(1, AtomicOrdering::SeqCst) == 0 {
                        Err("transient".to_string())
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_exhausted_returns_last_error() {
        let config = RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 1.0,
            jitter: false,
        };
        let result: Result<u32, String> =
            retry_with_backoff(&config, RetryPolicy::All, |_| true, || async {
                Err("still failing".to_string())
            })
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn circuit_breaker_opens_after_threshold() {
        let breaker = CircuitBreaker::new("test", 2, Duration::from_millis(50));
        assert!(breaker.can_proceed());
        breaker.record_failure();
        assert!(breaker.can_proceed());
        breaker.record_failure();
        assert!(!breaker.can_proceed());
    }

    #[test]
    fn circuit_breaker_half_opens_after_timeout() {
        let breaker = CircuitBreaker::new("test", 1, Duration::from_millis(10));
        breaker.record_failure();
        assert!(!breaker.can_proceed());
        std::thread::sleep(Duration::from_millis(20));
        assert!(breaker.can_proceed());
    }
}
