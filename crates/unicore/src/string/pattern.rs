//! Regex-driven string helpers.
//!
//! Patterns use the `regex` crate syntax; flags go inline (`(?i)`, `(?m)`,
//! `(?s)`) and replacement strings refer to groups as `$1` / `${name}`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{Error, Result};

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::validation(format!("invalid pattern: {e}")))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

pub(crate) fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// All matches of `pattern`.
///
/// A pattern with exactly one capture group yields that group instead of
/// the whole match (empty when the group did not take part).
pub fn regex_find_all(s: &str, pattern: &str) -> Result<Vec<String>> {
    let re = compile(pattern)?;
    let single_group = re.captures_len() == 2;
    Ok(re
        .captures_iter(s)
        .map(|caps| {
            let m = if single_group { caps.get(1) } else { caps.get(0) };
            m.map_or_else(String::new, |m| m.as_str().to_string())
        })
        .collect())
}

pub fn regex_test(s: &str, pattern: &str) -> Result<bool> {
    Ok(compile(pattern)?.is_match(s))
}

/// Replaces every match with `replacement` (`$1` expands groups).
pub fn regex_replace(s: &str, pattern: &str, replacement: &str) -> Result<String> {
    Ok(compile(pattern)?.replace_all(s, replacement).into_owned())
}

/// Replaces every match with `f(captures)`.
pub fn regex_replace_with(
    s: &str,
    pattern: &str,
    mut f: impl FnMut(&Captures<'_>) -> String,
) -> Result<String> {
    Ok(compile(pattern)?
        .replace_all(s, |caps: &Captures<'_>| f(caps))
        .into_owned())
}

fn check_group(re: &Regex, group: usize) -> Result<()> {
    if group >= re.captures_len() {
        return Err(Error::validation(format!("no such group: {group}")));
    }
    Ok(())
}

/// Group `group` (0 for the whole match) of the first match.
///
/// # Example
///
/// ```
/// use unicore::string::regex_extract;
///
/// let found = regex_extract("order #123 and #456", r"#(\d+)", 1).unwrap();
/// assert_eq!(found.as_deref(), Some("123"));
/// assert_eq!(regex_extract("none", r"#(\d+)", 1).unwrap(), None);
/// ```
pub fn regex_extract(s: &str, pattern: &str, group: usize) -> Result<Option<String>> {
    let re = compile(pattern)?;
    check_group(&re, group)?;
    Ok(re
        .captures(s)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().to_string()))
}

/// Group `group` of every match; non-participating groups are skipped.
pub fn regex_extract_all(s: &str, pattern: &str, group: usize) -> Result<Vec<String>> {
    let re = compile(pattern)?;
    check_group(&re, group)?;
    Ok(re
        .captures_iter(s)
        .filter_map(|caps| caps.get(group).map(|m| m.as_str().to_string()))
        .collect())
}

/// Removes anything shaped like `<...>`.
pub fn strip_tags(s: &str) -> String {
    tag_regex().replace_all(s, "").into_owned()
}

/// Replaces each match with `mask` repeated once per character matched.
///
/// # Example
///
/// ```
/// use unicore::string::mask_sensitive;
///
/// assert_eq!(
///     mask_sensitive("card 4111-1111", r"\d{4}-\d{4}", '*').unwrap(),
///     "card *********"
/// );
/// ```
pub fn mask_sensitive(s: &str, pattern: &str, mask: char) -> Result<String> {
    regex_replace_with(s, pattern, |caps| {
        let n = caps.get(0).map_or(0, |m| m.as_str().chars().count());
        std::iter::repeat(mask).take(n).collect()
    })
}

/// Wraps each match in `start` / `end`.
pub fn highlight_matches(s: &str, pattern: &str, start: &str, end: &str) -> Result<String> {
    regex_replace_with(s, pattern, |caps| {
        format!("{start}{}{end}", caps.get(0).map_or("", |m| m.as_str()))
    })
}

/// Collapses whitespace runs to one space and trims.
pub fn clean(s: &str) -> String {
    whitespace_regex().replace_all(s, " ").trim().to_string()
}

pub use self::clean as normalize_whitespace;

/// Splits `s` into words.
///
/// Without a pattern, words are runs of lowercase letters with an optional
/// leading capital, all-caps runs (an acronym stops before a capitalized
/// word: `XMLHttp` gives `XML`, `Http`), and digit runs. With a pattern, `s`
/// is split on it and empty pieces are dropped.
///
/// # Example
///
/// ```
/// use unicore::string::words;
///
/// assert_eq!(words("XMLHttpRequest v2", None).unwrap(), ["XML", "Http", "Request", "v", "2"]);
/// assert_eq!(words("a-b--c", Some("-+")).unwrap(), ["a", "b", "c"]);
/// ```
pub fn words(s: &str, pattern: Option<&str>) -> Result<Vec<String>> {
    if let Some(pattern) = pattern {
        let re = compile(pattern)?;
        return Ok(re
            .split(s)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect());
    }
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match word_at(&chars, i) {
            Some(end) => {
                out.push(chars[i..end].iter().collect());
                i = end;
            }
            None => i += 1,
        }
    }
    Ok(out)
}

/// End of the word starting at `i`, if one does.
fn word_at(chars: &[char], i: usize) -> Option<usize> {
    let upper_run = chars[i..].iter().take_while(|c| c.is_ascii_uppercase()).count();
    // Acronym directly followed by a capitalized word.
    if upper_run >= 2 && chars.get(i + upper_run).is_some_and(|c| c.is_ascii_lowercase()) {
        return Some(i + upper_run - 1);
    }
    let start = if upper_run > 0 { i + 1 } else { i };
    let lower_run = chars[start..].iter().take_while(|c| c.is_ascii_lowercase()).count();
    if lower_run > 0 {
        return Some(start + lower_run);
    }
    let digit_run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
    (digit_run > 0).then_some(i + digit_run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_find_all() {
        assert_eq!(regex_find_all("a1b22c", r"\d+").unwrap(), ["1", "22"]);
        assert_eq!(regex_find_all("k=v; x=y", r"(\w)=").unwrap(), ["k", "x"]);
        assert!(regex_find_all("x", "(").is_err());
    }

    #[test]
    fn test_regex_replace_and_test() {
        assert_eq!(regex_replace("2024-01", r"(\d+)-(\d+)", "$2/$1").unwrap(), "01/2024");
        assert!(regex_test("Hello", "(?i)^hello$").unwrap());
        assert!(!regex_test("Hello", "^hello$").unwrap());
    }

    #[test]
    fn test_regex_extract_all() {
        assert_eq!(regex_extract_all("#1 #22", r"#(\d+)", 1).unwrap(), ["1", "22"]);
        assert!(regex_extract_all("#1", r"#(\d+)", 2).is_err());
        assert_eq!(regex_extract("abc", "b", 0).unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_strip_and_clean() {
        assert_eq!(strip_tags("<p>Hi <b>there</b></p>"), "Hi there");
        assert_eq!(clean("  a \t\n b  "), "a b");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_highlight_and_mask() {
        assert_eq!(
            highlight_matches("a cat and a hat", r"\wat", "[", "]").unwrap(),
            "a [cat] and a [hat]"
        );
        assert_eq!(mask_sensitive("pin: 1234", r"\d", '#').unwrap(), "pin: ####");
    }

    #[test]
    fn test_words_default() {
        assert_eq!(words("helloWorld", None).unwrap(), ["hello", "World"]);
        assert_eq!(words("fred, barney, & pebbles", None).unwrap(), ["fred", "barney", "pebbles"]);
        assert_eq!(words("HTML5", None).unwrap(), ["5"]);
        assert!(words("", None).unwrap().is_empty());
    }
}
