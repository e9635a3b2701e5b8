//! Small general-purpose utilities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

pub use crate::array::{max_value, max_value_by, min_value, min_value_by};

/// Hands out process-unique ids: `prefix1`, `prefix2`, ...
///
/// The counter is shared by every prefix.
///
/// # Example
///
/// ```
/// use unicore::utils::IdCounter;
///
/// let ids = IdCounter::new();
/// assert_eq!(ids.next("user_"), "user_1");
/// assert_eq!(ids.next(""), "2");
/// ```
#[derive(Debug, Default)]
pub struct IdCounter {
    last: AtomicU64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, prefix: &str) -> String {
        let id = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}{id}")
    }
}

/// Collects `f(0)`, `f(1)`, ..., `f(n - 1)`.
pub fn times<T>(n: usize, f: impl FnMut(usize) -> T) -> Vec<T> {
    (0..n).map(f).collect()
}

pub fn identity<T>(value: T) -> T {
    value
}

/// A function that always returns a clone of `value`.
pub fn constant<T: Clone>(value: T) -> impl Fn() -> T {
    move || value.clone()
}

pub fn noop() {}

/// Passes `value` to `f` for its side effect and returns it.
pub fn tap<T>(value: T, f: impl FnOnce(&T)) -> T {
    f(&value);
    value
}

/// A random integer in `min..=max`. Bounds given in the wrong order are
/// swapped.
pub fn random(min: i64, max: i64) -> i64 {
    random_with(min, max, &mut rand::thread_rng())
}

pub fn random_with<R: Rng + ?Sized>(min: i64, max: i64, rng: &mut R) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Milliseconds since the Unix epoch.
pub fn now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

pub fn some<T>(items: &[T], pred: impl FnMut(&T) -> bool) -> bool {
    items.iter().any(pred)
}

pub fn every<T>(items: &[T], pred: impl FnMut(&T) -> bool) -> bool {
    items.iter().all(pred)
}

/// Run-length encodes `s` as `<count><char>` pairs, with runs split at 9 so
/// every count is a single digit.
///
/// # Example
///
/// ```
/// use unicore::utils::compress;
///
/// assert_eq!(compress("aaabbbccc"), "3a3b3c");
/// assert_eq!(compress("aaaaaaaaaaa"), "9a2a");
/// ```
pub fn compress(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let mut count = 1;
        while count < 9 && chars.peek() == Some(&c) {
            chars.next();
            count += 1;
        }
        out.push_str(&count.to_string());
        out.push(c);
    }
    out
}

/// Reverses [`compress`]. Counts may span several digits; a char with no
/// count before it expands to nothing.
pub fn decompress(s: &str) -> String {
    let mut out = String::new();
    let mut count: usize = 0;
    for c in s.chars() {
        match c.to_digit(10) {
            Some(d) => count = count.saturating_mul(10).saturating_add(d as usize),
            None => {
                out.extend(std::iter::repeat(c).take(count));
                count = 0;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_id_counter_unique_across_threads() {
        let ids = Arc::new(IdCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..25).map(|_| ids.next("id")).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<String> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn test_times_and_tap() {
        assert_eq!(times(3, |i| i * 2), [0, 2, 4]);
        assert!(times(0, |i| i).is_empty());
        let mut seen = 0;
        let v = tap(5, |x| seen = *x);
        assert_eq!((v, seen), (5, 5));
    }

    #[test]
    fn test_constant_identity() {
        let k = constant("x".to_string());
        assert_eq!(k(), "x");
        assert_eq!(k(), "x");
        assert_eq!(identity(3), 3);
        noop();
    }

    #[test]
    fn test_random_is_inclusive_and_seeded() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..200 {
            let n = random_with(1, 3, &mut rng);
            assert!((1..=3).contains(&n));
        }
        assert_eq!(random_with(5, 5, &mut rng), 5);
        let swapped = random_with(10, 0, &mut rng);
        assert!((0..=10).contains(&swapped));
        let mut a = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(random_with(0, 1000, &mut a), random_with(0, 1000, &mut b));
    }

    #[test]
    fn test_now_is_recent() {
        // 2020-01-01 in ms.
        assert!(now() > 1_577_836_800_000);
    }

    #[test]
    fn test_some_every() {
        assert!(some(&[1, 2, 3], |x| *x > 2));
        assert!(!some::<i32>(&[], |_| true));
        assert!(every(&[1, 2, 3], |x| *x > 0));
        assert!(every::<i32>(&[], |_| false));
    }

    #[test]
    fn test_compress_round_trip_cases() {
        assert_eq!(compress(""), "");
        assert_eq!(compress("abc"), "1a1b1c");
        assert_eq!(decompress("2a3b4c"), "aabbbcccc");
        assert_eq!(decompress("12x"), "xxxxxxxxxxxx");
        assert_eq!(decompress("a"), "");
        let s = "zzzzzzzzzzzzzzzzzzzzq";
        assert_eq!(decompress(&compress(s)), s);
    }
}
