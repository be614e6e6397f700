#![forbid(unsafe_code)]

//! Cooperative cancellation tokens.
//!
//! A [`CancellationSource`] owns the right to cancel; any number of
//! [`CancellationToken`]s observe it. The terminal host uses a token as its
//! shutdown signal: the stdin reader cancels on `quit` or end of input, and
//! the step loop sleeps on [`CancellationToken::wait_timeout`] between steps.
//!
//! # Example
//!
//! ```
//! use vlab_runtime::cancellation::CancellationSource;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(!token.is_cancelled());
//! source.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use web_time::{Duration, Instant};

/// A cloneable view of a cancellation source.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationInner>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel its tokens; call
/// [`cancel`](Self::cancel) explicitly.
pub struct CancellationSource {
    inner: Arc<CancellationInner>,
}

struct CancellationInner {
    cancelled: AtomicBool,
    notify: (Mutex<()>, Condvar),
}

impl CancellationSource {
    /// Create a new source with an uncancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationInner {
                cancelled: AtomicBool::new(false),
                notify: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    /// Obtain a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Cancel. Every token observes `is_cancelled() == true` and pending
    /// `wait_timeout` calls wake. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let (lock, cvar) = &self.inner.notify;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Block until cancellation or until `duration` elapses.
    ///
    /// Returns `true` if cancelled, `false` on timeout.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let (lock, cvar) = &self.inner.notify;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let start = Instant::now();
        loop {
            if self.is_cancelled() {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (next, _) = cvar
                .wait_timeout(guard, duration - elapsed)
                .unwrap_or_else(|e| e.into_inner());
            guard = next;
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn token_starts_uncancelled() {
        let source = CancellationSource::new();
        assert!(!source.token().is_cancelled());
        assert!(!source.is_cancelled());
    }

    #[test]
    fn cancel_reaches_every_token() {
        let source = CancellationSource::new();
        let t1 = source.token();
        let t2 = t1.clone();
        source.cancel();
        source.cancel();
        assert!(t1.is_cancelled());
        assert!(t2.is_cancelled());
    }

    #[test]
    fn drop_source_does_not_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn wait_timeout_times_out() {
        let source = CancellationSource::new();
        assert!(!source.token().wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn wait_timeout_wakes_on_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = thread::spawn(move || token.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(10));
        source.cancel();
        assert!(waiter.join().unwrap());
    }
}
