//! Loose conversions from dynamic values to booleans and numbers.

use regex::RegexBuilder;
use unicore_value::Value;

use crate::error::{Error, Result};

const TRUE_WORDS: &[&str] = &["true", "1", "yes", "on"];
const FALSE_WORDS: &[&str] = &["false", "0", "no", "off"];

/// Reads a boolean out of a value.
///
/// Strings are trimmed and matched case-insensitively against
/// `true/1/yes/on` and `false/0/no/off`; anything else (including the empty
/// string) is `None`. Non-strings use truthiness.
///
/// # Example
///
/// ```
/// use unicore::object::to_boolean;
/// use unicore_value::Value;
///
/// assert_eq!(to_boolean(&Value::from(" Yes ")), Some(true));
/// assert_eq!(to_boolean(&Value::from("off")), Some(false));
/// assert_eq!(to_boolean(&Value::from("maybe")), None);
/// assert_eq!(to_boolean(&Value::from(0)), Some(false));
/// ```
pub fn to_boolean(value: &Value) -> Option<bool> {
    let Value::Str(s) = value else {
        return Some(value.truthy());
    };
    let lower = s.trim().to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// [`to_boolean`] with extra case-insensitive regex patterns, tried before
/// the built-in words (true patterns first).
pub fn to_boolean_with(
    value: &Value,
    true_patterns: &[&str],
    false_patterns: &[&str],
) -> Result<Option<bool>> {
    if let Value::Str(s) = value {
        let s = s.trim();
        for (patterns, verdict) in [(true_patterns, true), (false_patterns, false)] {
            for pattern in patterns {
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::validation(format!("invalid pattern: {e}")))?;
                if re.is_match(s) {
                    return Ok(Some(verdict));
                }
            }
        }
    }
    Ok(to_boolean(value))
}

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Converts to `f64`, rounding to `precision` decimal places when given.
///
/// Ties round to even. A negative precision floors to that many integer
/// places (`-2` floors to hundreds). Unparseable input is `None`.
///
/// # Example
///
/// ```
/// use unicore::object::to_number;
/// use unicore_value::Value;
///
/// assert_eq!(to_number(&Value::from("1234.5678"), Some(0)), Some(1235.0));
/// assert_eq!(to_number(&Value::from("1234.5678"), Some(2)), Some(1234.57));
/// assert_eq!(to_number(&Value::from(1234), Some(-2)), Some(1200.0));
/// assert_eq!(to_number(&Value::from("x"), None), None);
/// ```
pub fn to_number(value: &Value, precision: Option<i32>) -> Option<f64> {
    let num = parse_float(value)?;
    let Some(precision) = precision else {
        return Some(num);
    };
    if !num.is_finite() {
        return Some(num);
    }
    if precision >= 0 {
        let factor = 10f64.powi(precision);
        Some((num * factor).round_ties_even() / factor)
    } else {
        let factor = 10f64.powi(-precision);
        Some((num / factor).floor() * factor)
    }
}

/// Truncates toward zero; anything unconvertible (or non-finite) is `0`.
pub fn to_integer(value: &Value) -> i64 {
    match parse_float(value) {
        Some(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Parses an integer in `radix` (2 to 36).
///
/// Without a radix, numbers truncate and strings are read as decimal unless
/// they carry a `0x` prefix. Radix `0` auto-detects `0x`, `0o` and `0b`
/// prefixes. Underscores between digits are accepted. Anything else is
/// `None`.
///
/// # Example
///
/// ```
/// use unicore::object::parse_int;
/// use unicore_value::Value;
///
/// assert_eq!(parse_int(&Value::from("5"), None), Some(5));
/// assert_eq!(parse_int(&Value::from("12"), Some(8)), Some(10));
/// assert_eq!(parse_int(&Value::from("0x1F"), None), Some(31));
/// assert_eq!(parse_int(&Value::from("x"), None), None);
/// ```
pub fn parse_int(value: &Value, radix: Option<u32>) -> Option<i64> {
    let text = match (value, radix) {
        (Value::Bool(b), _) => return Some(i64::from(*b)),
        (Value::Int(i), None) => return Some(*i),
        (Value::Float(f), None) => return f.is_finite().then(|| f.trunc() as i64),
        (Value::Str(s), _) => s.trim().to_string(),
        (Value::Int(_) | Value::Float(_), Some(_)) => value.to_string(),
        _ => return None,
    };
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    let (radix, digits) = match radix {
        None => match strip_prefix_ci(body, "0x") {
            Some(rest) => (16, rest),
            None => (10, body),
        },
        Some(0) => {
            if let Some(rest) = strip_prefix_ci(body, "0x") {
                (16, rest)
            } else if let Some(rest) = strip_prefix_ci(body, "0o") {
                (8, rest)
            } else if let Some(rest) = strip_prefix_ci(body, "0b") {
                (2, rest)
            } else {
                (10, body)
            }
        }
        Some(r @ 2..=36) => match r {
            16 => (16, strip_prefix_ci(body, "0x").unwrap_or(body)),
            8 => (8, strip_prefix_ci(body, "0o").unwrap_or(body)),
            2 => (2, strip_prefix_ci(body, "0b").unwrap_or(body)),
            _ => (r, body),
        },
        Some(_) => return None,
    };
    if digits.is_empty()
        || digits.starts_with(['+', '-'])
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = i64::from_str_radix(&cleaned, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_boolean() {
        assert_eq!(to_boolean(&Value::from("TRUE")), Some(true));
        assert_eq!(to_boolean(&Value::from("1")), Some(true));
        assert_eq!(to_boolean(&Value::from("No")), Some(false));
        assert_eq!(to_boolean(&Value::from("   ")), None);
        assert_eq!(to_boolean(&Value::Null), Some(false));
        assert_eq!(to_boolean(&Value::empty_list()), Some(false));
        assert_eq!(to_boolean(&Value::from(2.5)), Some(true));
    }

    #[test]
    fn test_to_boolean_with_patterns() {
        let v = Value::from("Affirmative");
        assert_eq!(to_boolean_with(&v, &["^affirm"], &[]).unwrap(), Some(true));
        assert_eq!(to_boolean_with(&v, &[], &["^AFF"]).unwrap(), Some(false));
        assert_eq!(to_boolean_with(&v, &[], &[]).unwrap(), None);
        assert!(to_boolean_with(&v, &["("], &[]).is_err());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::from(" 3.5 "), None), Some(3.5));
        assert_eq!(to_number(&Value::from(2.5), Some(0)), Some(2.0));
        assert_eq!(to_number(&Value::from(3.5), Some(0)), Some(4.0));
        assert_eq!(to_number(&Value::from(true), None), Some(1.0));
        assert_eq!(to_number(&Value::from(1999), Some(-3)), Some(1000.0));
        assert_eq!(to_number(&Value::Null, None), None);
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(to_integer(&Value::from(3.7)), 3);
        assert_eq!(to_integer(&Value::from(-3.7)), -3);
        assert_eq!(to_integer(&Value::from("42")), 42);
        assert_eq!(to_integer(&Value::from("invalid")), 0);
        assert_eq!(to_integer(&Value::from(f64::NAN)), 0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(&Value::from(true), Some(16)), Some(1));
        assert_eq!(parse_int(&Value::from(7.9), None), Some(7));
        assert_eq!(parse_int(&Value::from("-0x10"), None), Some(-16));
        assert_eq!(parse_int(&Value::from("ff"), Some(16)), Some(255));
        assert_eq!(parse_int(&Value::from("0b101"), Some(0)), Some(5));
        assert_eq!(parse_int(&Value::from("0o17"), Some(0)), Some(15));
        assert_eq!(parse_int(&Value::from("1_000"), None), Some(1000));
        assert_eq!(parse_int(&Value::from("1__0"), None), None);
        assert_eq!(parse_int(&Value::from("10"), Some(1)), None);
        assert_eq!(parse_int(&Value::from("z"), Some(36)), Some(35));
        assert_eq!(parse_int(&Value::from(""), None), None);
        assert_eq!(parse_int(&Value::empty_list(), None), None);
    }
}
