//! Call-count and call-rate guards.
//!
//! Every wrapper keeps its counter or cache behind a `Mutex`, so the
//! returned closures are `Send + Sync` whenever the wrapped function is.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use super::lock;

/// Runs `f` on the first call only; later calls return `None`.
///
/// # Example
///
/// ```
/// use unicore::function::once;
///
/// let init = once(|n: i32| n * 10);
/// assert_eq!(init(1), Some(10));
/// assert_eq!(init(2), None);
/// ```
pub fn once<A, R, F>(f: F) -> impl Fn(A) -> Option<R>
where
    F: Fn(A) -> R,
{
    let called = Mutex::new(false);
    move |args| {
        {
            let mut called = lock(&called);
            if *called {
                return None;
            }
            *called = true;
        }
        Some(f(args))
    }
}

/// Runs `f` on the first call and returns that result on every call.
///
/// Concurrent first calls block until the one running `f` finishes.
pub fn once_cached<A, R, F>(f: F) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
    R: Clone,
{
    let cached: Mutex<Option<R>> = Mutex::new(None);
    move |args| {
        let mut cached = lock(&cached);
        cached.get_or_insert_with(|| f(args)).clone()
    }
}

/// Runs `f` for the first `n - 1` calls, then returns `None`.
///
/// # Example
///
/// ```
/// use unicore::function::before;
///
/// let greet = before(3, |name: &str| format!("hi {name}"));
/// assert_eq!(greet("a").as_deref(), Some("hi a"));
/// assert_eq!(greet("b").as_deref(), Some("hi b"));
/// assert_eq!(greet("c"), None);
/// ```
pub fn before<A, R, F>(n: usize, f: F) -> impl Fn(A) -> Option<R>
where
    F: Fn(A) -> R,
{
    let limit = n.saturating_sub(1);
    let calls = Mutex::new(0usize);
    move |args| {
        {
            let mut calls = lock(&calls);
            if *calls >= limit {
                return None;
            }
            *calls += 1;
        }
        Some(f(args))
    }
}

/// Returns `None` until the `n`th call, then runs `f` on every call.
/// `n` of 0 or 1 runs from the first call.
pub fn after<A, R, F>(n: usize, f: F) -> impl Fn(A) -> Option<R>
where
    F: Fn(A) -> R,
{
    let threshold = n.max(1);
    let calls = Mutex::new(0usize);
    move |args| {
        let ready = {
            let mut calls = lock(&calls);
            *calls = calls.saturating_add(1);
            *calls >= threshold
        };
        ready.then(|| f(args))
    }
}

/// Caches results per argument.
///
/// The cache lock is not held while `f` runs, so a memoized function may
/// call itself; two threads racing on the same new key may both compute it.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use unicore::function::memoize;
///
/// let calls = AtomicUsize::new(0);
/// let square = memoize(|n: &u64| {
///     calls.fetch_add(1, Ordering::SeqCst);
///     n * n
/// });
/// assert_eq!(square(4), 16);
/// assert_eq!(square(4), 16);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub fn memoize<A, R, F>(f: F) -> impl Fn(A) -> R
where
    A: Hash + Eq + Clone,
    R: Clone,
    F: Fn(&A) -> R,
{
    let cache: Mutex<HashMap<A, R>> = Mutex::new(HashMap::new());
    move |args| {
        if let Some(hit) = lock(&cache).get(&args) {
            return hit.clone();
        }
        let value = f(&args);
        lock(&cache).insert(args, value.clone());
        value
    }
}

/// Runs `f` at most once per `wait`; calls inside the window get the last
/// result again.
pub fn throttle<A, R, F>(f: F, wait: Duration) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
    R: Clone,
{
    let last: Mutex<Option<(Instant, R)>> = Mutex::new(None);
    move |args| {
        let mut last = lock(&last);
        let now = Instant::now();
        match &*last {
            Some((at, result)) if now.duration_since(*at) <= wait => result.clone(),
            _ => {
                debug!(?wait, "throttled call running");
                let result = f(args);
                *last = Some((now, result.clone()));
                result
            }
        }
    }
}
