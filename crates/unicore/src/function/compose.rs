//! Pure combinators over Rust closures.
//!
//! Lists of functions are taken as `Vec<F>`; mix different closures by
//! boxing them (`Box<dyn Fn(T) -> T>` is itself an `Fn`).

/// Boxed unary function, for building heterogeneous pipelines.
pub type Step<'a, T> = Box<dyn Fn(T) -> T + 'a>;

/// Boxed predicate.
pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Applies `funcs` left to right. No functions gives the identity.
///
/// # Example
///
/// ```
/// use unicore::function::{flow, Step};
///
/// let steps: Vec<Step<String>> = vec![
///     Box::new(|name: String| format!("Hello {name}")),
///     Box::new(|s: String| s + "!"),
/// ];
/// assert_eq!(flow(steps)("World".to_string()), "Hello World!");
/// ```
pub fn flow<T, F>(funcs: Vec<F>) -> impl Fn(T) -> T
where
    F: Fn(T) -> T,
{
    move |value| funcs.iter().fold(value, |acc, f| f(acc))
}

/// Applies `funcs` right to left.
pub fn flow_right<T, F>(funcs: Vec<F>) -> impl Fn(T) -> T
where
    F: Fn(T) -> T,
{
    move |value| funcs.iter().rev().fold(value, |acc, f| f(acc))
}

/// Mathematical composition: `compose([f, g])(x) == f(g(x))`.
///
/// # Example
///
/// ```
/// use unicore::function::{compose, Step};
///
/// let steps: Vec<Step<i64>> = vec![Box::new(|x: i64| x + 1), Box::new(|x: i64| x * 2)];
/// assert_eq!(compose(steps)(3), 7);
/// ```
pub fn compose<T, F>(funcs: Vec<F>) -> impl Fn(T) -> T
where
    F: Fn(T) -> T,
{
    flow_right(funcs)
}

pub fn negate<T: ?Sized, F>(pred: F) -> impl Fn(&T) -> bool
where
    F: Fn(&T) -> bool,
{
    move |value: &T| !pred(value)
}

/// Hands `f` to `wrapper` on every call.
///
/// # Example
///
/// ```
/// use unicore::function::wrap;
///
/// let add = |(a, b): (i32, i32)| a + b;
/// let plus_one = wrap(add, |f, args| f(args) + 1);
/// assert_eq!(plus_one((1, 2)), 4);
/// ```
pub fn wrap<A, R, F, W>(f: F, wrapper: W) -> impl Fn(A) -> R
where
    W: Fn(&F, A) -> R,
{
    move |args| wrapper(&f, args)
}

/// `iterated(f)(x, n)` applies `f` to `x` `n` times.
pub fn iterated<T, F>(f: F) -> impl Fn(T, usize) -> T
where
    F: Fn(T) -> T,
{
    move |value, n| (0..n).fold(value, |acc, _| f(acc))
}

/// Calls every function with the same argument and collects the results.
///
/// # Example
///
/// ```
/// use unicore::function::juxtapose;
///
/// let ends: Vec<Box<dyn Fn(&str) -> Option<char>>> = vec![
///     Box::new(|s: &str| s.chars().next()),
///     Box::new(|s: &str| s.chars().last()),
/// ];
/// assert_eq!(juxtapose(ends)("hello"), [Some('h'), Some('o')]);
/// ```
pub fn juxtapose<A: ?Sized, R, F>(funcs: Vec<F>) -> impl Fn(&A) -> Vec<R>
where
    F: Fn(&A) -> R,
{
    move |value: &A| funcs.iter().map(|f| f(value)).collect()
}

/// True when every predicate holds for the value. No predicates is true.
pub fn over_every<T: ?Sized, P>(preds: Vec<P>) -> impl Fn(&T) -> bool
where
    P: Fn(&T) -> bool,
{
    move |value: &T| preds.iter().all(|p| p(value))
}

/// True when some predicate holds for the value.
pub fn over_some<T: ?Sized, P>(preds: Vec<P>) -> impl Fn(&T) -> bool
where
    P: Fn(&T) -> bool,
{
    move |value: &T| preds.iter().any(|p| p(value))
}

/// True when every element passes every predicate.
///
/// # Example
///
/// ```
/// use unicore::function::{conjoin, Predicate};
///
/// let preds: Vec<Predicate<i64>> = vec![Box::new(|n: &i64| *n > 0), Box::new(|n: &i64| n % 2 == 0)];
/// let check = conjoin(preds);
/// assert!(check(&[2, 4]));
/// assert!(!check(&[2, 3]));
/// ```
pub fn conjoin<T, P>(preds: Vec<P>) -> impl Fn(&[T]) -> bool
where
    P: Fn(&T) -> bool,
{
    move |items: &[T]| items.iter().all(|x| preds.iter().all(|p| p(x)))
}

/// True when every element passes at least one predicate.
pub fn disjoin<T, P>(preds: Vec<P>) -> impl Fn(&[T]) -> bool
where
    P: Fn(&T) -> bool,
{
    move |items: &[T]| items.iter().all(|x| preds.iter().any(|p| p(x)))
}
