//! String helpers.
//!
//! Positions and lengths count `char`s, not bytes, so multi-byte text
//! slices the way it reads.

mod format;
mod pattern;

use unicore_value::Value;

pub use format::{
    dedent_text, deburr, escape, lines, number_format, pad, pad_end, pad_start, prune, repeat,
    series_phrase, series_phrase_serial, slugify, split, truncate, unescape, NumberFormat,
    Separator, TruncateOptions,
};
pub use pattern::{
    clean, highlight_matches, mask_sensitive, normalize_whitespace, regex_extract,
    regex_extract_all, regex_find_all, regex_replace, regex_replace_with, regex_test,
    strip_tags, words,
};

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `n`th char, or `s.len()` past the end.
fn byte_at(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Resolves a possibly negative char position against `len`, clamped.
fn resolve(pos: i64, len: usize) -> usize {
    let len_i = len as i64;
    let pos = if pos < 0 { (len_i + pos).max(0) } else { pos.min(len_i) };
    pos as usize
}

pub fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

/// `s[start..end]` by char, with negative positions counted from the end.
///
/// # Example
///
/// ```
/// use unicore::string::slice;
///
/// assert_eq!(slice("héllo", 1, Some(3)), "él");
/// assert_eq!(slice("héllo", -3, None), "llo");
/// assert_eq!(slice("héllo", 4, Some(2)), "");
/// ```
pub fn slice(s: &str, start: i64, end: Option<i64>) -> String {
    let len = char_len(s);
    let start = resolve(start, len);
    let end = end.map_or(len, |e| resolve(e, len));
    if start >= end {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

/// Replaces every occurrence of `find`.
pub fn replace_all(s: &str, find: &str, replacement: &str) -> String {
    s.replace(find, replacement)
}

/// Splits into chunks of `size` chars. A zero size gives `s` whole.
pub fn chop(s: &str, size: usize) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![s.to_string()];
    }
    let chars: Vec<char> = s.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Like [`chop`], but the short chunk (if any) comes first.
///
/// # Example
///
/// ```
/// use unicore::string::chop_right;
///
/// assert_eq!(chop_right("abcdefg", 3), ["a", "bcd", "efg"]);
/// ```
pub fn chop_right(s: &str, size: usize) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![s.to_string()];
    }
    let chars: Vec<char> = s.chars().collect();
    let rem = chars.len() % size;
    let mut out = Vec::new();
    if rem > 0 {
        out.push(chars[..rem].iter().collect());
    }
    out.extend(chars[rem..].chunks(size).map(|c| c.iter().collect()));
    out
}

pub fn chars(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}

/// Text before the first `sep`; all of `s` when `sep` is empty or absent.
pub fn substr_left<'a>(s: &'a str, sep: &str) -> &'a str {
    if sep.is_empty() {
        return s;
    }
    s.find(sep).map_or(s, |i| &s[..i])
}

/// Text before the last `sep`.
pub fn substr_left_end<'a>(s: &'a str, sep: &str) -> &'a str {
    if sep.is_empty() {
        return s;
    }
    s.rfind(sep).map_or(s, |i| &s[..i])
}

/// Text after the first `sep`.
pub fn substr_right<'a>(s: &'a str, sep: &str) -> &'a str {
    if sep.is_empty() {
        return s;
    }
    s.find(sep).map_or(s, |i| &s[i + sep.len()..])
}

/// Text after the last `sep`.
pub fn substr_right_end<'a>(s: &'a str, sep: &str) -> &'a str {
    if sep.is_empty() {
        return s;
    }
    s.rfind(sep).map_or(s, |i| &s[i + sep.len()..])
}

fn shift_first(s: &str, delta: i32) -> String {
    s.chars()
        .next()
        .and_then(|c| (c as u32).checked_add_signed(delta))
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_default()
}

/// The code point before the first char of `s`; empty if there is none.
pub fn predecessor(s: &str) -> String {
    shift_first(s, -1)
}

/// The code point after the first char of `s`; empty if there is none.
pub fn successor(s: &str) -> String {
    shift_first(s, 1)
}

pub fn surround(s: &str, wrapper: &str) -> String {
    format!("{wrapper}{s}{wrapper}")
}

/// Wraps `s` in `wrapper` (usually `"`); an empty wrapper leaves it bare.
pub fn quote(s: &str, wrapper: &str) -> String {
    surround(s, wrapper)
}

/// Strips one matching pair of quotes.
///
/// With `quote_char`, only that character counts. Otherwise `'`, `"` and
/// `` ` `` are recognised.
///
/// # Example
///
/// ```
/// use unicore::string::unquote;
///
/// assert_eq!(unquote("\"hi\"", None), "hi");
/// assert_eq!(unquote("'hi\"", None), "'hi\"");
/// assert_eq!(unquote("*hi*", Some('*')), "hi");
/// ```
pub fn unquote(s: &str, quote_char: Option<char>) -> String {
    let mut it = s.chars();
    let (Some(first), Some(last)) = (it.next(), it.next_back()) else {
        return s.to_string();
    };
    let quoted = first == last
        && match quote_char {
            Some(q) => first == q,
            None => matches!(first, '\'' | '"' | '`'),
        };
    if quoted {
        it.collect()
    } else {
        s.to_string()
    }
}

/// Whether `sub` occurs in `s` at or after char position `pos`. An empty
/// `sub` always does.
pub fn has_substr(s: &str, sub: &str, pos: usize) -> bool {
    if sub.is_empty() {
        return true;
    }
    if pos > char_len(s) {
        return false;
    }
    s[byte_at(s, pos)..].contains(sub)
}

/// Non-overlapping occurrences of `sub`; an empty `sub` matches between
/// every pair of chars and at both ends.
pub fn count_substr(s: &str, sub: &str) -> usize {
    if sub.is_empty() {
        return char_len(s) + 1;
    }
    s.matches(sub).count()
}

/// Escapes regex metacharacters.
pub fn escape_reg_exp(s: &str) -> String {
    regex::escape(s)
}

pub fn ensure_starts_with(s: &str, prefix: &str) -> String {
    if s.starts_with(prefix) {
        s.to_string()
    } else {
        format!("{prefix}{s}")
    }
}

pub fn ensure_ends_with(s: &str, suffix: &str) -> String {
    if s.ends_with(suffix) {
        s.to_string()
    } else {
        format!("{s}{suffix}")
    }
}

/// Trims whitespace, or any of the chars in `chars` when given.
pub fn trim<'a>(s: &'a str, chars: Option<&str>) -> &'a str {
    trim_end(trim_start(s, chars), chars)
}

pub fn trim_start<'a>(s: &'a str, chars: Option<&str>) -> &'a str {
    match chars {
        None => s.trim_start(),
        Some(set) => s.trim_start_matches(|c: char| set.contains(c)),
    }
}

pub fn trim_end<'a>(s: &'a str, chars: Option<&str>) -> &'a str {
    match chars {
        None => s.trim_end(),
        Some(set) => s.trim_end_matches(|c: char| set.contains(c)),
    }
}

/// Inserts `sub` at char position `index`, clamped to `0..=len`.
pub fn insert_substr(s: &str, index: i64, sub: &str) -> String {
    let idx = byte_at(s, index.clamp(0, char_len(s) as i64) as usize);
    let mut out = String::with_capacity(s.len() + sub.len());
    out.push_str(&s[..idx]);
    out.push_str(sub);
    out.push_str(&s[idx..]);
    out
}

/// Whether `s` has `prefix` at char `position` (clamped).
pub fn starts_with(s: &str, prefix: &str, position: i64) -> bool {
    let pos = position.clamp(0, char_len(s) as i64) as usize;
    s[byte_at(s, pos)..].starts_with(prefix)
}

/// Whether `s`, cut at char `position` (default: its end), ends with
/// `suffix`.
pub fn ends_with(s: &str, suffix: &str, position: Option<i64>) -> bool {
    let len = char_len(s);
    let pos = position.map_or(len, |p| p.clamp(0, len as i64) as usize);
    s[..byte_at(s, pos)].ends_with(suffix)
}

/// Joins the display form of `items`; `Null` items join as empty strings.
pub fn join(items: &[Value], sep: &str) -> String {
    items
        .iter()
        .map(|v| match v {
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_and_slice() {
        assert_eq!(reverse("añb"), "bña");
        assert_eq!(slice("abcdef", 2, Some(-1)), "cde");
        assert_eq!(slice("abc", 0, Some(99)), "abc");
        assert_eq!(slice("abc", -99, Some(1)), "a");
    }

    #[test]
    fn test_chop() {
        assert_eq!(chop("abcdefg", 3), ["abc", "def", "g"]);
        assert_eq!(chop("abc", 0), ["abc"]);
        assert!(chop("", 2).is_empty());
        assert_eq!(chop_right("abcdef", 3), ["abc", "def"]);
    }

    #[test]
    fn test_substr_family() {
        assert_eq!(substr_left("a.b.c", "."), "a");
        assert_eq!(substr_left_end("a.b.c", "."), "a.b");
        assert_eq!(substr_right("a.b.c", "."), "b.c");
        assert_eq!(substr_right_end("a.b.c", "."), "c");
        assert_eq!(substr_right("abc", "x"), "abc");
        assert_eq!(substr_left("abc", ""), "abc");
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(predecessor("b"), "a");
        assert_eq!(successor("az"), "b");
        assert_eq!(successor(""), "");
        assert_eq!(predecessor("\u{0}"), "");
    }

    #[test]
    fn test_quotes() {
        assert_eq!(quote("x", "\""), "\"x\"");
        assert_eq!(quote("x", ""), "x");
        assert_eq!(surround("x", "**"), "**x**");
        assert_eq!(unquote("`x`", None), "x");
        assert_eq!(unquote("\"", None), "\"");
        assert_eq!(unquote("'x'", Some('"')), "'x'");
    }

    #[test]
    fn test_substr_counts() {
        assert!(has_substr("hello", "ll", 1));
        assert!(!has_substr("hello", "he", 1));
        assert!(has_substr("hello", "", 99));
        assert!(!has_substr("hé", "x", 5));
        assert_eq!(count_substr("aaaa", "aa"), 2);
        assert_eq!(count_substr("ab", ""), 3);
    }

    #[test]
    fn test_ensure_and_trim() {
        assert_eq!(ensure_starts_with("path", "/"), "/path");
        assert_eq!(ensure_starts_with("/path", "/"), "/path");
        assert_eq!(ensure_ends_with("file", ".rs"), "file.rs");
        assert_eq!(trim("--x--", Some("-")), "x");
        assert_eq!(trim_start("  x ", None), "x ");
        assert_eq!(trim_end("xab", Some("ba")), "x");
        assert_eq!(trim("x", Some("")), "x");
    }

    #[test]
    fn test_positions() {
        assert_eq!(insert_substr("héllo", 2, "X"), "héXllo");
        assert_eq!(insert_substr("ab", -5, "X"), "Xab");
        assert_eq!(insert_substr("ab", 9, "X"), "abX");
        assert!(starts_with("abc", "bc", 1));
        assert!(!starts_with("abc", "bc", 0));
        assert!(ends_with("abc", "b", Some(2)));
        assert!(ends_with("abc", "bc", None));
    }

    #[test]
    fn test_join() {
        let items = [Value::from("a"), Value::Null, Value::from(3)];
        assert_eq!(join(&items, "-"), "a--3");
    }
}
