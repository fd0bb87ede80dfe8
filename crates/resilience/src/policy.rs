//! Retry stage wrapped by a fallback stage.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Default bound of total attempts for the retry stage (1 initial + 2
/// retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How a policy execution completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion<T> {
    /// The primary action succeeded, possibly after retries.
    Primary {
        /// Value returned by the primary action.
        value: T,
        /// Number of attempts made, including the successful one.
        attempts: u32,
    },

    /// The primary action exhausted all attempts and the fallback action
    /// succeeded instead.
    Fallback,
}

impl<T> Completion<T> {
    /// Returns true if completion came from the primary action.
    pub fn is_primary(&self) -> bool {
        matches!(self, Completion::Primary { .. })
    }
}

/// Fatal outcome: the fallback action itself failed after the primary
/// action had already exhausted its attempts.
///
/// There is no further recovery layer; callers must surface this.
#[derive(Debug, Error)]
#[error("fallback failed after {attempts} primary attempts: {fallback} (last primary error: {primary})")]
pub struct FallbackFailed<E> {
    /// Primary attempts made before falling back.
    pub attempts: u32,
    /// The last error returned by the primary action.
    pub primary: E,
    /// The error returned by the fallback action.
    pub fallback: E,
}

/// Bounded retry around a primary action, with a single fallback action as
/// the outer boundary.
///
/// The fallback only ever observes "primary failed after all attempts",
/// never individual retries. Whether to sleep between attempts is a tuning
/// knob; the default is immediate retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryWithFallback {
    max_attempts: u32,
    retry_delay: Option<Duration>,
}

impl Default for RetryWithFallback {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: None,
        }
    }
}

impl RetryWithFallback {
    /// Creates a policy with the given bound of total attempts (minimum 1).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay: None,
        }
    }

    /// Sets a delay to sleep between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Returns the bound of total attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs the primary action up to the attempt bound, then the fallback
    /// action once if every attempt failed.
    pub async fn execute<T, E, P, PF, F, FF>(
        &self,
        mut primary: P,
        fallback: F,
    ) -> Result<Completion<T>, FallbackFailed<E>>
    where
        P: FnMut() -> PF,
        PF: Future<Output = Result<T, E>>,
        F: FnOnce() -> FF,
        FF: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        let primary_err = loop {
            attempt += 1;
            match primary().await {
                Ok(value) => {
                    return Ok(Completion::Primary {
                        value,
                        attempts: attempt,
                    });
                }
                Err(e) if attempt >= self.max_attempts => break e,
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "primary action failed, retrying"
                    );
                    if let Some(delay) = self.retry_delay {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        };

        warn!(
            attempts = self.max_attempts,
            error = %primary_err,
            "primary action exhausted, invoking fallback"
        );

        match fallback().await {
            Ok(()) => Ok(Completion::Fallback),
            Err(fallback_err) => Err(FallbackFailed {
                attempts: self.max_attempts,
                primary: primary_err,
                fallback: fallback_err,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Primary action that fails `failures` times before succeeding.
    fn flaky(
        calls: Arc<AtomicU32>,
        failures: u32,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, String>> + Send>> {
        move || {
            let calls = calls.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(format!("failure {n}"))
                } else {
                    Ok(n)
                }
            })
        }
    }

    #[tokio::test]
    async fn primary_succeeds_first_attempt() {
        let policy = RetryWithFallback::default();
        let calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let fb = fallback_calls.clone();
        let result = policy
            .execute(flaky(calls.clone(), 0), move || {
                let fb = fb.clone();
                async move {
                    fb.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(
            result,
            Completion::Primary {
                value: 1,
                attempts: 1
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_recovers_within_attempt_bound() {
        let policy = RetryWithFallback::default();
        let calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        // Fails twice, succeeds on the third and final attempt.
        let fb = fallback_calls.clone();
        let result = policy
            .execute(flaky(calls.clone(), 2), move || {
                let fb = fb.clone();
                async move {
                    fb.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(
            result,
            Completion::Primary {
                value: 3,
                attempts: 3
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhaustion_invokes_fallback_exactly_once() {
        let policy = RetryWithFallback::default();
        let calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let fb = fallback_calls.clone();
        let result = policy
            .execute(flaky(calls.clone(), u32::MAX), move || {
                let fb = fb.clone();
                async move {
                    fb.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(result, Completion::Fallback);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fallback_failure_is_fatal_and_carries_both_errors() {
        let policy = RetryWithFallback::default();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<Completion<u32>, FallbackFailed<String>> = policy
            .execute(flaky(calls, u32::MAX), || async {
                Err("escalation rejected".to_string())
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.primary, "failure 3");
        assert_eq!(err.fallback, "escalation rejected");
    }

    #[tokio::test]
    async fn custom_attempt_bound() {
        let policy = RetryWithFallback::new(5);
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(flaky(calls.clone(), 4), || async { Ok(()) })
            .await
            .unwrap();

        assert!(result.is_primary());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn zero_attempt_bound_is_clamped_to_one() {
        let policy = RetryWithFallback::new(0);
        assert_eq!(policy.max_attempts(), 1);

        let calls = Arc::new(AtomicU32::new(0));
        let result = policy
            .execute(flaky(calls.clone(), 0), || async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(
            result,
            Completion::Primary {
                value: 1,
                attempts: 1
            }
        );
    }

    #[tokio::test]
    async fn retry_delay_is_applied_between_attempts() {
        tokio::time::pause();
        let policy =
            RetryWithFallback::default().with_retry_delay(Duration::from_millis(50));
        let calls = Arc::new(AtomicU32::new(0));

        let started = tokio::time::Instant::now();
        let result = policy
            .execute(flaky(calls, 2), || async { Ok(()) })
            .await
            .unwrap();

        assert!(result.is_primary());
        // Two failures -> two sleeps.
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
