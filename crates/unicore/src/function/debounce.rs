//! Trailing-edge debounce.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::lock;
use super::timer::CancelToken;

/// Options for [`Debounce::with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Quiet period before the pending call runs.
    pub wait: Duration,
    /// Upper bound on how long a burst can postpone the call, measured from
    /// its first call.
    pub max_wait: Option<Duration>,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(100),
            max_wait: None,
        }
    }
}

struct State<A> {
    pending: Option<A>,
    generation: u64,
    token: Option<CancelToken>,
    burst_start: Option<Instant>,
}

impl<A> State<A> {
    /// Drops the pending timer and invalidates any thread still holding it.
    fn reset(&mut self) -> Option<A> {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation += 1;
        self.burst_start = None;
        self.pending.take()
    }
}

struct Inner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    options: DebounceOptions,
    state: Mutex<State<A>>,
}

impl<A> Inner<A> {
    fn fire(&self, generation: u64) {
        let args = {
            let mut state = lock(&self.state);
            if state.generation != generation {
                return;
            }
            state.token = None;
            state.burst_start = None;
            state.pending.take()
        };
        if let Some(args) = args {
            debug!("debounced call running");
            (self.func)(args);
        }
    }
}

/// A debounced function: each [`call`](Debounce::call) replaces the pending
/// arguments and restarts the quiet period; the wrapped function runs once,
/// on a timer thread, with the last arguments.
///
/// Cloning gives another handle to the same debouncer.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use unicore::function::debounce;
///
/// let last = Arc::new(AtomicI64::new(0));
/// let seen = Arc::clone(&last);
/// let save = debounce(move |n: i64| seen.store(n, Ordering::SeqCst), Duration::from_secs(60));
/// save.call(1);
/// save.call(2);
/// assert!(save.is_pending());
/// assert!(save.flush());
/// assert_eq!(last.load(Ordering::SeqCst), 2);
/// ```
pub struct Debounce<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for Debounce<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Send + 'static> Debounce<A> {
    pub fn new(f: impl Fn(A) + Send + Sync + 'static, wait: Duration) -> Self {
        Self::with_options(
            f,
            DebounceOptions {
                wait,
                max_wait: None,
            },
        )
    }

    pub fn with_options(f: impl Fn(A) + Send + Sync + 'static, options: DebounceOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(f),
                options,
                state: Mutex::new(State {
                    pending: None,
                    generation: 0,
                    token: None,
                    burst_start: None,
                }),
            }),
        }
    }

    /// Schedules a call with `args`, superseding any pending one.
    pub fn call(&self, args: A) {
        let now = Instant::now();
        let mut state = lock(&self.inner.state);
        if let Some(token) = state.token.take() {
            token.cancel();
        }
        state.generation += 1;
        let generation = state.generation;
        let burst_start = *state.burst_start.get_or_insert(now);
        let options = self.inner.options;
        let wait = match options.max_wait {
            Some(max) => options
                .wait
                .min(max.saturating_sub(now.duration_since(burst_start))),
            None => options.wait,
        };
        state.pending = Some(args);
        let token = CancelToken::default();
        state.token = Some(token.clone());

        let inner = Arc::clone(&self.inner);
        debug!(generation, ?wait, "debounce timer restarted");
        thread::spawn(move || {
            if token.sleep(wait) {
                inner.fire(generation);
            }
        });
    }

    /// Drops the pending call, if any.
    pub fn cancel(&self) {
        let dropped = lock(&self.inner.state).reset();
        if dropped.is_some() {
            debug!("debounced call cancelled");
        }
    }

    /// Runs the pending call now on the calling thread. Returns whether there
    /// was one.
    pub fn flush(&self) -> bool {
        let pending = lock(&self.inner.state).reset();
        match pending {
            Some(args) => {
                debug!("debounced call flushed");
                (self.inner.func)(args);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.inner.state).pending.is_some()
    }
}

/// Shorthand for [`Debounce::new`].
pub fn debounce<A: Send + 'static>(
    f: impl Fn(A) + Send + Sync + 'static,
    wait: Duration,
) -> Debounce<A> {
    Debounce::new(f, wait)
}
