//! Single-shot background timers.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use super::lock;

/// Shared cancellation flag a sleeping timer thread waits on.
#[derive(Clone, Default)]
pub(crate) struct CancelToken(Arc<(Mutex<bool>, Condvar)>);

impl CancelToken {
    /// Flags the token and wakes the sleeper.
    pub(crate) fn cancel(&self) {
        let (flag, cvar) = &*self.0;
        *lock(flag) = true;
        cvar.notify_all();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        *lock(&self.0 .0)
    }

    /// Sleeps for `wait` or until cancelled. Returns `true` when the full
    /// wait elapsed uncancelled.
    pub(crate) fn sleep(&self, wait: Duration) -> bool {
        let (flag, cvar) = &*self.0;
        let guard = lock(flag);
        let (guard, _) = cvar
            .wait_timeout_while(guard, wait, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }
}

/// Handle to a call scheduled by [`delay`] or [`defer`].
pub struct DelayHandle<R> {
    token: CancelToken,
    handle: JoinHandle<Option<R>>,
}

impl<R> DelayHandle<R> {
    /// Stops the call if it has not started yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker. `None` if the call was cancelled or panicked.
    pub fn join(self) -> Option<R> {
        self.handle.join().ok().flatten()
    }
}

/// Runs `f` on a worker thread after `wait`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use unicore::function::delay;
///
/// let handle = delay(|| 6 * 7, Duration::from_millis(5));
/// assert_eq!(handle.join(), Some(42));
///
/// let handle = delay(|| 1, Duration::from_secs(60));
/// handle.cancel();
/// assert_eq!(handle.join(), None);
/// ```
pub fn delay<F, R>(f: F, wait: Duration) -> DelayHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let token = CancelToken::default();
    let sleeper = token.clone();
    let handle = thread::spawn(move || {
        if !sleeper.sleep(wait) {
            debug!(?wait, "delayed call cancelled");
            return None;
        }
        debug!(?wait, "delayed call running");
        Some(f())
    });
    DelayHandle { token, handle }
}

/// Runs `f` on a worker thread as soon as possible.
pub fn defer<F, R>(f: F) -> DelayHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    delay(f, Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[test]
    fn test_token_sleep_elapses() {
        let token = CancelToken::default();
        assert!(token.sleep(Duration::from_millis(1)));
    }

    #[test]
    fn test_cancel_wakes_sleeper() {
        let token = CancelToken::default();
        let sleeper = token.clone();
        let start = Instant::now();
        let t = thread::spawn(move || sleeper.sleep(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(10));
        token.cancel();
        assert!(!t.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_defer_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handle = defer(move || h.fetch_add(1, Ordering::SeqCst));
        assert_eq!(handle.join(), Some(0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancelled_delay_never_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handle = delay(
            move || h.fetch_add(1, Ordering::SeqCst),
            Duration::from_secs(30),
        );
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.join(), None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
