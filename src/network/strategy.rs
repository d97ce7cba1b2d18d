//! Sequential candidate strategies used by discovery
//!
//! Candidates are consumed from the end of the list, one at a time. Neither
//! strategy issues concurrent requests.

use crate::error::FetchError;
use std::future::Future;
use std::time::Duration;

/// Per-candidate retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Delay multiplied by the attempt number before each retry
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn single_attempt() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

/// Try candidates until one succeeds
///
/// Returns the winning candidate with its value, or `None` once the list is
/// exhausted.
pub async fn first_success<T, F, Fut>(
    mut candidates: Vec<String>,
    policy: RetryPolicy,
    mut attempt: F,
) -> Option<(String, T)>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    while let Some(candidate) = candidates.pop() {
        match with_retry(&candidate, policy, &mut attempt).await {
            Ok(value) => return Some((candidate, value)),
            Err(e) => {
                tracing::warn!(candidate = %candidate, error = %e, "Candidate failed, trying next");
            }
        }
    }
    None
}

/// Accumulate values across candidates until `threshold` items are collected
///
/// Returns `Ok` with everything gathered once the threshold is reached, or
/// `Err` with the partial accumulation when candidates run out.
pub async fn accumulate_until<T, F, Fut>(
    mut candidates: Vec<String>,
    threshold: usize,
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<Vec<T>, Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let mut accumulated = Vec::new();

    while let Some(candidate) = candidates.pop() {
        match with_retry(&candidate, policy, &mut attempt).await {
            Ok(items) => {
                accumulated.extend(items);
                if accumulated.len() >= threshold {
                    return Ok(accumulated);
                }
            }
            Err(e) => {
                tracing::warn!(candidate = %candidate, error = %e, "Candidate failed, trying next");
            }
        }
    }
    Err(accumulated)
}

async fn with_retry<T, F, Fut>(
    candidate: &str,
    policy: RetryPolicy,
    attempt: &mut F,
) -> Result<T, FetchError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut tries = 0;
    loop {
        match attempt(candidate.to_string()).await {
            Ok(value) => return Ok(value),
            Err(e) if tries < policy.retries => {
                tries += 1;
                tracing::debug!(
                    candidate = %candidate,
                    attempt = tries,
                    error = %e,
                    "Retrying candidate"
                );
                tokio::time::sleep(policy.backoff * tries).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn candidates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_first_success_stops_at_first_winner() {
        let tried = Mutex::new(Vec::new());
        let result = first_success(
            candidates(&["a", "b", "c"]),
            RetryPolicy::single_attempt(),
            |c| {
                tried.lock().unwrap().push(c.clone());
                async move {
                    if c == "b" {
                        Ok(42)
                    } else {
                        Err(FetchError::Network("down".into()))
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Some(("b".to_string(), 42)));
        // popped from the end: c fails, b wins, a is never tried
        assert_eq!(*tried.lock().unwrap(), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_first_success_exhausted() {
        let result: Option<(String, i32)> = first_success(
            candidates(&["a", "b"]),
            RetryPolicy::single_attempt(),
            |_| async { Err(FetchError::Timeout(10)) },
        )
        .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_accumulate_until_spans_candidates() {
        let result = accumulate_until(
            candidates(&["a", "b", "c"]),
            3,
            RetryPolicy::single_attempt(),
            |c| async move { Ok(vec![format!("{c}1"), format!("{c}2")]) },
        )
        .await;

        assert_eq!(result, Ok(vec!["c1".into(), "c2".into(), "b1".into(), "b2".into()]));
    }

    #[tokio::test]
    async fn test_accumulate_until_skips_failures() {
        let result = accumulate_until(
            candidates(&["a", "b", "c"]),
            2,
            RetryPolicy::single_attempt(),
            |c| async move {
                if c == "b" {
                    Err(FetchError::Network("down".into()))
                } else {
                    Ok(vec![c])
                }
            },
        )
        .await;
        assert_eq!(result, Ok(vec!["c".to_string(), "a".to_string()]));
    }

    #[tokio::test]
    async fn test_accumulate_until_exhausted_returns_partial() {
        let result = accumulate_until(
            candidates(&["a"]),
            3,
            RetryPolicy::single_attempt(),
            |c| async move { Ok(vec![c]) },
        )
        .await;
        assert_eq!(result, Err(vec!["a".to_string()]));
    }

    #[tokio::test]
    async fn test_retry_policy_retries_candidate() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy {
            retries: 2,
            backoff: Duration::from_millis(1),
        };
        let result = first_success(candidates(&["a"]), policy, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::Network("flaky".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Some(("a".to_string(), 2)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry() {
        let calls = AtomicUsize::new(0);
        let result: Option<(String, ())> =
            first_success(candidates(&["a"]), RetryPolicy::single_attempt(), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::Network("down".into())) }
            })
            .await;

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
