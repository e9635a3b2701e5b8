//! Function combinators.
//!
//! Stateful wrappers ([`debounce`], [`throttle`], [`once`], [`before`],
//! [`after`], [`memoize`]) keep their state behind a `Mutex` and work with
//! any `Send` payload. Timers ([`Debounce`], [`delay`], [`defer`]) run on
//! their own thread and can be cancelled. Arity-changing combinators
//! ([`curry`], [`partial`], [`rearg`], ...) operate on dynamic
//! [`Func`](unicore_value::Func) values.

mod compose;
mod curry;
mod debounce;
mod guard;
mod timer;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use compose::{
    compose, conjoin, disjoin, flow, flow_right, iterated, juxtapose, negate, over_every,
    over_some, wrap, Predicate, Step,
};
pub use curry::{
    ary, curry, curry_right, flip, over_args, partial, partial_right, rearg, spread, unary,
    Curried, Curry,
};
pub use debounce::{debounce, Debounce, DebounceOptions};
pub use guard::{after, before, memoize, once, once_cached, throttle};
pub use timer::{defer, delay, DelayHandle};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
