//! Bounded asynchronous wait mechanisms.
//!
//! Every suspension point in the suite (element resolution, visibility,
//! enabled state, confirmation messages) goes through these polling
//! helpers. A condition that is not met within the timeout aborts the
//! command with a [`ComprarError::Timeout`] naming what was awaited; the
//! failure propagates uncaught to the enclosing test case.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::result::{ComprarError, ComprarResult};

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll an asynchronous condition until it reports true.
///
/// The condition is checked at least once, then on every poll interval
/// until the timeout elapses. Errors from the condition propagate
/// immediately.
///
/// # Errors
///
/// Returns [`ComprarError::Timeout`] if the condition is not met in time.
pub async fn wait_until<F, Fut>(
    description: &str,
    options: WaitOptions,
    mut condition: F,
) -> ComprarResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ComprarResult<bool>>,
{
    let start = Instant::now();
    loop {
        if condition().await? {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                waited_for: description.to_string(),
            });
        }
        if start.elapsed() >= options.timeout() {
            return Err(ComprarError::Timeout {
                ms: options.timeout_ms,
                waiting_for: description.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Poll an asynchronous producer until it yields a value.
///
/// Used for element resolution: the producer scans the fallback chain and
/// returns `None` until a candidate matches.
///
/// # Errors
///
/// Returns [`ComprarError::Timeout`] if no value is produced in time.
pub async fn wait_for_some<T, F, Fut>(
    description: &str,
    options: WaitOptions,
    mut producer: F,
) -> ComprarResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ComprarResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = producer().await? {
            return Ok(value);
        }
        if start.elapsed() >= options.timeout() {
            return Err(ComprarError::Timeout {
                ms: options.timeout_ms,
                waiting_for: description.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_options_builders() {
        let options = WaitOptions::new()
            .with_timeout(2000)
            .with_poll_interval(10);
        assert_eq!(options.timeout(), Duration::from_secs(2));
        assert_eq!(options.poll_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_wait_until_immediate_success() {
        let result = wait_until("always true", WaitOptions::default(), || async { Ok(true) })
            .await
            .unwrap();
        assert_eq!(result.waited_for, "always true");
    }

    #[tokio::test]
    async fn test_wait_until_eventual_success() {
        let calls = AtomicU32::new(0);
        let options = WaitOptions::new().with_timeout(1000).with_poll_interval(5);
        let result = wait_until("third call", options, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await;
        assert!(result.is_ok());
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_wait_until_timeout() {
        let options = WaitOptions::new().with_timeout(50).with_poll_interval(5);
        let result = wait_until("never", options, || async { Ok(false) }).await;
        match result {
            Err(ComprarError::Timeout { ms, waiting_for }) => {
                assert_eq!(ms, 50);
                assert_eq!(waiting_for, "never");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_until_propagates_errors() {
        let result = wait_until("broken", WaitOptions::default(), || async {
            Err(ComprarError::PageError {
                message: "gone".to_string(),
            })
        })
        .await;
        assert!(matches!(result, Err(ComprarError::PageError { .. })));
    }

    #[tokio::test]
    async fn test_wait_for_some() {
        let calls = AtomicU32::new(0);
        let options = WaitOptions::new().with_timeout(1000).with_poll_interval(5);
        let value = wait_for_some("value", options, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(if n >= 1 { Some(42) } else { None }) }
        })
        .await
        .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_wait_for_some_timeout() {
        let options = WaitOptions::new().with_timeout(30).with_poll_interval(5);
        let result: ComprarResult<u32> =
            wait_for_some("nothing", options, || async { Ok(None) }).await;
        assert!(matches!(result, Err(ComprarError::Timeout { .. })));
    }
}
