//! Array helpers.
//!
//! Everything here is generic over the element type and returns a fresh
//! `Vec`; the functions in [`in_place`] are the only ones that mutate their
//! input. Counts larger than the input clamp to its length. Set-like helpers
//! (`uniq`, `union`, `intersection`, `difference`) keep first-occurrence order
//! and only need `PartialEq`, so they work on [`Value`](unicore_value::Value)s.

mod dynamic;
mod flatten;
pub mod in_place;

use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

pub use dynamic::{compact, first_args, flatten_args, index_by_key, last_args, pluck};
pub use flatten::{flatten, Depth};
pub use in_place::{fill, pull, push, sort_in_place, splice};

pub fn first<T: Clone>(items: &[T]) -> Option<T> {
    items.first().cloned()
}

/// The first `n` items; `n <= 0` gives an empty vec.
pub fn first_n<T: Clone>(items: &[T], n: i64) -> Vec<T> {
    items[..clamp(n, items.len())].to_vec()
}

pub fn last<T: Clone>(items: &[T]) -> Option<T> {
    items.last().cloned()
}

/// The last `n` items; `n <= 0` gives an empty vec.
pub fn last_n<T: Clone>(items: &[T], n: i64) -> Vec<T> {
    items[items.len() - clamp(n, items.len())..].to_vec()
}

/// Everything but the last `n` items.
pub fn initial<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[..items.len().saturating_sub(n)].to_vec()
}

/// Everything but the first `n` items.
pub fn rest<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[n.min(items.len())..].to_vec()
}

fn clamp(n: i64, len: usize) -> usize {
    if n <= 0 {
        0
    } else {
        (n as u64).min(len as u64) as usize
    }
}

pub fn without<T: Clone + PartialEq>(items: &[T], values: &[T]) -> Vec<T> {
    items.iter().filter(|x| !values.contains(x)).cloned().collect()
}

pub fn filter<T: Clone>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
    items.iter().filter(|x| predicate(*x)).cloned().collect()
}

pub fn reject<T: Clone>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
    items.iter().filter(|x| !predicate(*x)).cloned().collect()
}

/// Splits into `(matching, rest)`, preserving order on both sides.
pub fn partition<T: Clone>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> (Vec<T>, Vec<T>) {
    let mut yes = Vec::new();
    let mut no = Vec::new();
    for item in items {
        if predicate(item) {
            yes.push(item.clone());
        } else {
            no.push(item.clone());
        }
    }
    (yes, no)
}

/// First item the predicate accepts.
///
/// Items whose predicate fails are skipped; see [`find_strict`] to stop at
/// the first failure instead.
///
/// # Example
///
/// ```
/// use unicore::array::find;
///
/// let words = ["7", "x", "12"];
/// let big = find(&words, |w| w.parse::<i32>().map(|n| n > 10));
/// assert_eq!(big, Some("12"));
/// ```
pub fn find<T: Clone, E>(items: &[T], mut predicate: impl FnMut(&T) -> Result<bool, E>) -> Option<T> {
    items
        .iter()
        .find(|x| matches!(predicate(*x), Ok(true)))
        .cloned()
}

pub fn find_strict<T: Clone, E>(
    items: &[T],
    mut predicate: impl FnMut(&T) -> Result<bool, E>,
) -> Result<Option<T>, E> {
    for item in items {
        if predicate(item)? {
            return Ok(Some(item.clone()));
        }
    }
    Ok(None)
}

pub fn find_index<T>(items: &[T], predicate: impl FnMut(&T) -> bool) -> Option<usize> {
    items.iter().position(predicate)
}

pub fn index_of<T: PartialEq>(items: &[T], value: &T) -> Option<usize> {
    items.iter().position(|x| x == value)
}

pub fn last_index_of<T: PartialEq>(items: &[T], value: &T) -> Option<usize> {
    items.iter().rposition(|x| x == value)
}

pub fn contains<T: PartialEq>(items: &[T], value: &T) -> bool {
    items.contains(value)
}

/// Splits into chunks of `size`; the last chunk holds the remainder.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Error::validation("chunk size must be positive"));
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Transposes rows into columns, truncating to the shortest row.
pub fn zip<T: Clone, A: AsRef<[T]>>(arrays: &[A]) -> Vec<Vec<T>> {
    let width = arrays.iter().map(|a| a.as_ref().len()).min().unwrap_or(0);
    (0..width)
        .map(|i| arrays.iter().map(|a| a.as_ref()[i].clone()).collect())
        .collect()
}

/// Inverse of [`zip`].
pub fn unzip<T: Clone, A: AsRef<[T]>>(tuples: &[A]) -> Vec<Vec<T>> {
    zip(tuples)
}

pub fn uniq<T: Clone + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

pub fn union<T: Clone + PartialEq, A: AsRef<[T]>>(arrays: &[A]) -> Vec<T> {
    let all: Vec<T> = arrays.iter().flat_map(|a| a.as_ref().iter().cloned()).collect();
    uniq(&all)
}

/// Items of the first array present in every other, deduplicated.
pub fn intersection<T: Clone + PartialEq, A: AsRef<[T]>>(arrays: &[A]) -> Vec<T> {
    let Some((head, others)) = arrays.split_first() else {
        return Vec::new();
    };
    let common: Vec<T> = head
        .as_ref()
        .iter()
        .filter(|x| others.iter().all(|o| o.as_ref().contains(x)))
        .cloned()
        .collect();
    uniq(&common)
}

/// Items of `items` present in none of `others`.
pub fn difference<T: Clone + PartialEq, A: AsRef<[T]>>(items: &[T], others: &[A]) -> Vec<T> {
    items
        .iter()
        .filter(|x| !others.iter().any(|o| o.as_ref().contains(x)))
        .cloned()
        .collect()
}

/// Indexes items by key; later items win.
pub fn index_by<T: Clone, K: Hash + Eq>(items: &[T], mut key: impl FnMut(&T) -> K) -> IndexMap<K, T> {
    items.iter().map(|x| (key(x), x.clone())).collect()
}

/// Counts items per key, skipping items whose key function fails.
pub fn count_by<T, K: Hash + Eq, E>(
    items: &[T],
    mut key: impl FnMut(&T) -> Result<K, E>,
) -> IndexMap<K, usize> {
    let mut counts = IndexMap::new();
    for k in items.iter().filter_map(|x| key(x).ok()) {
        *counts.entry(k).or_insert(0) += 1;
    }
    counts
}

pub fn count_by_strict<T, K: Hash + Eq, E>(
    items: &[T],
    mut key: impl FnMut(&T) -> Result<K, E>,
) -> Result<IndexMap<K, usize>, E> {
    let mut counts = IndexMap::new();
    for item in items {
        *counts.entry(key(item)?).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Groups items per key, skipping items whose key function fails.
pub fn group_by<T: Clone, K: Hash + Eq, E>(
    items: &[T],
    mut key: impl FnMut(&T) -> Result<K, E>,
) -> IndexMap<K, Vec<T>> {
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        if let Ok(k) = key(item) {
            groups.entry(k).or_default().push(item.clone());
        }
    }
    groups
}

pub fn group_by_strict<T: Clone, K: Hash + Eq, E>(
    items: &[T],
    mut key: impl FnMut(&T) -> Result<K, E>,
) -> Result<IndexMap<K, Vec<T>>, E> {
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(item)?).or_default().push(item.clone());
    }
    Ok(groups)
}

/// Stable sort by a derived key; incomparable keys keep their order.
pub fn sort_by<T: Clone, K: PartialOrd>(items: &[T], mut key: impl FnMut(&T) -> K) -> Vec<T> {
    let mut keyed: Vec<(K, T)> = items.iter().map(|x| (key(x), x.clone())).collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, x)| x).collect()
}

/// Left fold; without `initial` the first item seeds the accumulator.
pub fn reduce<T: Clone>(items: &[T], mut f: impl FnMut(T, &T) -> T, initial: Option<T>) -> Option<T> {
    let mut iter = items.iter();
    let mut acc = match initial {
        Some(init) => init,
        None => iter.next()?.clone(),
    };
    for item in iter {
        acc = f(acc, item);
    }
    Some(acc)
}

/// Integers from `start` towards `stop` (exclusive) by `step`.
///
/// With `stop` omitted the range runs from `0` to `start`.
///
/// # Example
///
/// ```
/// use unicore::array::range;
///
/// assert_eq!(range(4, None, 1).unwrap(), vec![0, 1, 2, 3]);
/// assert_eq!(range(5, Some(0), -2).unwrap(), vec![5, 3, 1]);
/// assert!(range(0, Some(3), 0).is_err());
/// ```
pub fn range(start: i64, stop: Option<i64>, step: i64) -> Result<Vec<i64>> {
    if step == 0 {
        return Err(Error::validation("range step must not be zero"));
    }
    let (start, stop) = match stop {
        Some(stop) => (start, stop),
        None => (0, start),
    };
    let mut out = Vec::new();
    let mut cur = start;
    while (step > 0 && cur < stop) || (step < 0 && cur > stop) {
        out.push(cur);
        cur = match cur.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(out)
}

/// Largest item; the first one wins ties.
pub fn max_value<T: Clone + PartialOrd>(items: &[T]) -> Option<T> {
    max_value_by(items, |x| x.clone())
}

pub fn max_value_by<T: Clone, K: PartialOrd>(items: &[T], key: impl FnMut(&T) -> K) -> Option<T> {
    extreme_by(items, key, Ordering::Greater)
}

/// Smallest item; the first one wins ties.
pub fn min_value<T: Clone + PartialOrd>(items: &[T]) -> Option<T> {
    min_value_by(items, |x| x.clone())
}

pub fn min_value_by<T: Clone, K: PartialOrd>(items: &[T], key: impl FnMut(&T) -> K) -> Option<T> {
    extreme_by(items, key, Ordering::Less)
}

fn extreme_by<T: Clone, K: PartialOrd>(
    items: &[T],
    mut key: impl FnMut(&T) -> K,
    wanted: Ordering,
) -> Option<T> {
    let mut iter = items.iter();
    let first = iter.next()?;
    let mut best = (key(first), first);
    for item in iter {
        let k = key(item);
        if k.partial_cmp(&best.0) == Some(wanted) {
            best = (k, item);
        }
    }
    Some(best.1.clone())
}

/// Median of two sorted arrays by binary search over the smaller one.
///
/// Returns `None` when both are empty or the inputs are not sorted.
pub fn find_median_sorted_arrays(a: &[f64], b: &[f64]) -> Option<f64> {
    let (small, large) = if a.len() > b.len() { (b, a) } else { (a, b) };
    let (m, n) = (small.len(), large.len());
    let total = m + n;
    if total == 0 {
        return None;
    }
    let half = (total + 1) / 2;
    let (mut lo, mut hi) = (0usize, m);
    while lo <= hi {
        let i = (lo + hi) / 2;
        let j = half - i;
        let left_small = if i == 0 { f64::NEG_INFINITY } else { small[i - 1] };
        let right_small = if i == m { f64::INFINITY } else { small[i] };
        let left_large = if j == 0 { f64::NEG_INFINITY } else { large[j - 1] };
        let right_large = if j == n { f64::INFINITY } else { large[j] };

        if left_small <= right_large && left_large <= right_small {
            let left = left_small.max(left_large);
            if total % 2 == 1 {
                return Some(left);
            }
            return Some((left + right_small.min(right_large)) / 2.0);
        } else if left_small > right_large {
            if i == 0 {
                return None;
            }
            hi = i - 1;
        } else {
            lo = i + 1;
        }
    }
    None
}

/// Shuffled copy (Fisher-Yates).
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::thread_rng())
}

pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// One random item, `None` when empty.
pub fn sample<T: Clone>(items: &[T]) -> Option<T> {
    sample_with(items, &mut rand::thread_rng())
}

pub fn sample_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    items.choose(rng).cloned()
}

/// `n` distinct positions drawn without replacement, clamped to the length.
pub fn sample_size<T: Clone>(items: &[T], n: i64) -> Vec<T> {
    sample_size_with(items, n, &mut rand::thread_rng())
}

pub fn sample_size_with<T: Clone, R: Rng + ?Sized>(items: &[T], n: i64, rng: &mut R) -> Vec<T> {
    items
        .choose_multiple(rng, clamp(n, items.len()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_first_last() {
        let xs = [1, 2, 3];
        assert_eq!(first(&xs), Some(1));
        assert_eq!(last(&xs), Some(3));
        assert_eq!(first::<i32>(&[]), None);
        assert_eq!(first_n(&xs, 2), vec![1, 2]);
        assert_eq!(first_n(&xs, 10), vec![1, 2, 3]);
        assert_eq!(first_n(&xs, 0), Vec::<i32>::new());
        assert_eq!(first_n(&xs, -3), Vec::<i32>::new());
        assert_eq!(last_n(&xs, 2), vec![2, 3]);
        assert_eq!(last_n(&xs, 7), vec![1, 2, 3]);
    }

    #[test]
    fn test_initial_rest() {
        let xs = [1, 2, 3, 4];
        assert_eq!(initial(&xs, 1), vec![1, 2, 3]);
        assert_eq!(initial(&xs, 4), Vec::<i32>::new());
        assert_eq!(initial(&xs, 9), Vec::<i32>::new());
        assert_eq!(rest(&xs, 1), vec![2, 3, 4]);
        assert_eq!(rest(&xs, 9), Vec::<i32>::new());
    }

    #[test]
    fn test_filters() {
        let xs = [1, 2, 3, 4, 5];
        assert_eq!(filter(&xs, |x| x % 2 == 1), vec![1, 3, 5]);
        assert_eq!(reject(&xs, |x| x % 2 == 1), vec![2, 4]);
        assert_eq!(partition(&xs, |x| *x > 3), (vec![4, 5], vec![1, 2, 3]));
        assert_eq!(without(&xs, &[2, 5]), vec![1, 3, 4]);
    }

    #[test]
    fn test_find_skips_errors() {
        let xs = ["a", "3", "5"];
        assert_eq!(find(&xs, |s| s.parse::<i32>().map(|n| n > 4)), Some("5"));
        assert_eq!(find(&xs, |s| s.parse::<i32>().map(|n| n > 9)), None);
        assert!(find_strict(&xs, |s| s.parse::<i32>().map(|n| n > 4)).is_err());
        assert_eq!(find_index(&xs, |s| *s == "3"), Some(1));
    }

    #[test]
    fn test_indexes() {
        let xs = [1, 2, 1, 3];
        assert_eq!(index_of(&xs, &1), Some(0));
        assert_eq!(last_index_of(&xs, &1), Some(2));
        assert_eq!(last_index_of(&xs, &9), None);
        assert!(contains(&xs, &3));
    }

    #[test]
    fn test_chunk() {
        assert_eq!(chunk(&[1, 2, 3, 4, 5], 2).unwrap(), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert_eq!(chunk::<i32>(&[], 3).unwrap(), Vec::<Vec<i32>>::new());
        assert!(matches!(chunk(&[1], 0), Err(Error::Validation(_))));
    }

    #[test]
    fn test_zip_unzip() {
        let zipped = zip(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8]]);
        assert_eq!(zipped, vec![vec![1, 4, 7], vec![2, 5, 8]]);
        assert_eq!(unzip(&zipped), vec![vec![1, 2], vec![4, 5], vec![7, 8]]);
        assert_eq!(zip::<i32, Vec<i32>>(&[]), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn test_set_ops_keep_order() {
        assert_eq!(uniq(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert_eq!(union(&[vec![3, 1], vec![2, 3], vec![4]]), vec![3, 1, 2, 4]);
        assert_eq!(intersection(&[vec![3, 1, 2, 1], vec![1, 2], vec![2, 1, 9]]), vec![1, 2]);
        assert_eq!(intersection::<i32, Vec<i32>>(&[]), Vec::<i32>::new());
        assert_eq!(difference(&[1, 2, 3, 4], &[vec![2], vec![4, 5]]), vec![1, 3]);
    }

    #[test]
    fn test_grouping() {
        let words = ["one", "two", "three", "four"];
        let by_len = group_by(&words, |w| Ok::<_, ()>(w.len()));
        assert_eq!(by_len[&3], vec!["one", "two"]);
        assert_eq!(by_len.keys().copied().collect::<Vec<_>>(), vec![3, 5, 4]);

        let counts = count_by(&words, |w| Ok::<_, ()>(w.len()));
        assert_eq!(counts[&3], 2);

        let idx = index_by(&words, |w| w.len());
        assert_eq!(idx[&3], "two");
    }

    #[test]
    fn test_grouping_skips_failures() {
        let raw = ["1", "x", "1", "2"];
        let counts = count_by(&raw, |s| s.parse::<i32>());
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&1], 2);
        let groups = group_by(&raw, |s| s.parse::<i32>());
        assert_eq!(groups[&2], vec!["2"]);
        assert!(group_by_strict(&raw, |s| s.parse::<i32>()).is_err());
        assert!(count_by_strict(&raw, |s| s.parse::<i32>()).is_err());
    }

    #[test]
    fn test_sort_by_is_stable() {
        let xs = [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        assert_eq!(sort_by(&xs, |x| x.0), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_reduce() {
        assert_eq!(reduce(&[1, 2, 3, 4], |acc, x| acc + x, None), Some(10));
        assert_eq!(reduce(&[1, 2, 3], |acc, x| acc * x, Some(10)), Some(60));
        assert_eq!(reduce::<i32>(&[], |acc, x| acc + x, None), None);
        assert_eq!(reduce::<i32>(&[], |acc, x| acc + x, Some(5)), Some(5));
    }

    #[test]
    fn test_range() {
        assert_eq!(range(3, None, 1).unwrap(), vec![0, 1, 2]);
        assert_eq!(range(1, Some(10), 3).unwrap(), vec![1, 4, 7]);
        assert_eq!(range(3, Some(1), 1).unwrap(), Vec::<i64>::new());
        assert_eq!(range(0, Some(-3), -1).unwrap(), vec![0, -1, -2]);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(max_value(&[3, 9, 2]), Some(9));
        assert_eq!(min_value(&[3.5, -1.0, 2.0]), Some(-1.0));
        assert_eq!(max_value::<i32>(&[]), None);
        let people = [("a", 30), ("b", 40), ("c", 40)];
        assert_eq!(max_value_by(&people, |p| p.1), Some(("b", 40)));
        assert_eq!(min_value_by(&people, |p| p.1), Some(("a", 30)));
    }

    #[test]
    fn test_median() {
        assert_eq!(find_median_sorted_arrays(&[1.0, 3.0], &[2.0]), Some(2.0));
        assert_eq!(find_median_sorted_arrays(&[1.0, 2.0], &[3.0, 4.0]), Some(2.5));
        assert_eq!(find_median_sorted_arrays(&[], &[5.0]), Some(5.0));
        assert_eq!(find_median_sorted_arrays(&[], &[]), None);
    }

    #[test]
    fn test_random_helpers_are_seedable() {
        let xs: Vec<i32> = (0..20).collect();
        let a = shuffle_with(&xs, &mut Xoshiro256StarStar::seed_from_u64(7));
        let b = shuffle_with(&xs, &mut Xoshiro256StarStar::seed_from_u64(7));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, xs);

        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        assert!(xs.contains(&sample_with(&xs, &mut rng).unwrap()));
        assert_eq!(sample_with::<i32, _>(&[], &mut rng), None);

        let picked = sample_size_with(&xs, 5, &mut rng);
        assert_eq!(picked.len(), 5);
        assert_eq!(uniq(&picked).len(), 5);
        assert_eq!(sample_size_with(&xs, 50, &mut rng).len(), 20);
        assert!(sample_size_with(&xs, 0, &mut rng).is_empty());
    }
}
