//! Retry with exponential backoff for HTTP providers

use crate::LlmError;
use std::time::Duration;
use tracing::warn;

/// Outcome of a single request attempt
pub(crate) enum Attempt<T> {
    /// The request succeeded
    Done(T),
    /// Transport or server error; worth another try
    Retry(LlmError),
    /// Client-side error; retrying cannot help
    Fail(LlmError),
}

/// Backoff schedule: `base_delay * 2^(attempt - 1)` between attempts
#[derive(Debug, Clone, Copy)]
pub(crate) struct Backoff {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Backoff {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Run `request` until it succeeds, fails fatally, or attempts run out
    pub(crate) fn run<T>(
        &self,
        provider: &str,
        mut request: impl FnMut() -> Attempt<T>,
    ) -> Result<T, LlmError> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match request() {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(e) => {
                    warn!("{} request failed (attempt {}): {}", provider, attempts + 1, e);
                    last_error = Some(e);
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                std::thread::sleep(self.base_delay * 2u32.pow(attempts - 1));
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(max_retries: u32) -> Backoff {
        Backoff {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_retries_until_success() {
        let mut calls = 0;
        let result = instant(3).run("test", || {
            calls += 1;
            if calls < 3 {
                Attempt::Retry(LlmError::Communication("down".into()))
            } else {
                Attempt::Done(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_fatal_error_stops_immediately() {
        let mut calls = 0;
        let result: Result<(), _> = instant(5).run("test", || {
            calls += 1;
            Attempt::Fail(LlmError::ModelNotAvailable("x".into()))
        });
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let result: Result<(), _> = instant(2).run("test", || {
            Attempt::Retry(LlmError::Communication("still down".into()))
        });
        assert!(matches!(result, Err(LlmError::Communication(ref m)) if m == "still down"));
    }

    #[test]
    fn test_zero_retries() {
        let result: Result<(), _> = instant(0).run("test", || Attempt::Done(()));
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
