//! Path grammar.
//!
//! ```text
//! path     := segment ('.' segment | '[' bracket ']')*
//! segment  := (char | '\' any)*          digits-only segments become ints
//! bracket  := int | literal | raw
//! literal  := quoted string | True | False | int | '(' literal (',' literal)* ','? ')'
//! ```

use unicore_value::{is_int_literal, Key, Value, ValueError};

use crate::error::PathError;

/// Longest path string accepted by [`try_parse_path`].
pub const MAX_PATH_STRING_LENGTH: usize = 4096;

/// Deepest path accepted by [`try_parse_path`] and [`validate_path`].
pub const MAX_PATH_DEPTH: usize = 256;

/// Parses a path string into segments.
///
/// # Example
///
/// ```
/// use unicore_path::parse_path;
/// use unicore_value::Key;
///
/// assert_eq!(
///     parse_path("a.b[2].c"),
///     vec![Key::from("a"), Key::from("b"), Key::Int(2), Key::from("c")]
/// );
/// assert_eq!(parse_path(r"a\.b"), vec![Key::from("a.b")]);
/// assert_eq!(
///     parse_path("m[ (2,) ]"),
///     vec![Key::from("m"), Key::Tuple(vec![Key::Int(2)])]
/// );
/// ```
pub fn parse_path(path: &str) -> Vec<Key> {
    let chars: Vec<char> = path.chars().collect();
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    let flush = |buf: &mut String, parts: &mut Vec<Key>| {
        if !buf.is_empty() {
            let token = std::mem::take(buf);
            parts.push(plain_segment(token));
        }
    };

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 1;
                if let Some(c) = chars.get(i) {
                    buf.push(*c);
                }
            }
            '.' => flush(&mut buf, &mut parts),
            '[' => {
                flush(&mut buf, &mut parts);
                let mut j = i + 1;
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                let token: String = chars[i + 1..j.min(chars.len())].iter().collect();
                let token = token.trim();
                if !token.is_empty() {
                    parts.push(bracket_segment(token));
                }
                i = j;
            }
            c => buf.push(c),
        }
        i += 1;
    }
    flush(&mut buf, &mut parts);
    parts
}

/// Like [`parse_path`], but rejects overly long inputs.
pub fn try_parse_path(path: &str) -> Result<Vec<Key>, PathError> {
    if path.len() > MAX_PATH_STRING_LENGTH {
        return Err(PathError::TooLong(format!(
            "{} bytes exceeds {MAX_PATH_STRING_LENGTH}",
            path.len()
        )));
    }
    let parts = parse_path(path);
    validate_path(&parts)?;
    Ok(parts)
}

/// Rejects paths deeper than [`MAX_PATH_DEPTH`].
pub fn validate_path(parts: &[Key]) -> Result<(), PathError> {
    if parts.len() > MAX_PATH_DEPTH {
        return Err(PathError::TooLong(format!(
            "{} segments exceeds {MAX_PATH_DEPTH}",
            parts.len()
        )));
    }
    Ok(())
}

/// Formats segments for diagnostics: `a[0].b`.
///
/// Not a round-trip inverse of [`parse_path`].
pub fn format_path(parts: &[Key]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        match part {
            Key::Str(s) => {
                if i > 0 {
                    out.push('.');
                }
                for c in s.chars() {
                    if matches!(c, '.' | '[' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            other => {
                out.push('[');
                out.push_str(&other.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn plain_segment(token: String) -> Key {
    if is_int_literal(&token) {
        if let Ok(i) = token.parse() {
            return Key::Int(i);
        }
    }
    Key::Str(token)
}

fn bracket_segment(token: &str) -> Key {
    match parse_literal(token) {
        Some(Key::Null) | None => plain_segment(token.to_string()),
        Some(key) => key,
    }
}

/// Evaluates the small literal subset allowed inside brackets.
fn parse_literal(token: &str) -> Option<Key> {
    let mut reader = LiteralReader {
        chars: token.chars().collect(),
        pos: 0,
    };
    let key = reader.literal()?;
    reader.skip_ws();
    (reader.pos == reader.chars.len()).then_some(key)
}

struct LiteralReader {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralReader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn literal(&mut self) -> Option<Key> {
        self.skip_ws();
        match self.peek()? {
            '\'' | '"' => self.quoted(),
            '(' => self.tuple(),
            c if c == '-' || c == '+' || c.is_ascii_digit() => self.int(),
            c if c.is_alphabetic() => self.word(),
            _ => None,
        }
    }

    fn quoted(&mut self) -> Option<Key> {
        let quote = self.peek()?;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.peek()?;
            self.pos += 1;
            match c {
                '\\' => {
                    let escaped = self.peek()?;
                    self.pos += 1;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                c if c == quote => return Some(Key::Str(out)),
                c => out.push(c),
            }
        }
    }

    fn int(&mut self) -> Option<Key> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        // Floats and other numeric forms are not keys.
        if self.peek().is_some_and(|c| c == '.' || c == 'e' || c == 'E' || c == 'j') {
            return None;
        }
        text.parse().ok().map(Key::Int)
    }

    fn word(&mut self) -> Option<Key> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Key::Bool(true)),
            "False" => Some(Key::Bool(false)),
            "None" => Some(Key::Null),
            _ => None,
        }
    }

    fn tuple(&mut self) -> Option<Key> {
        self.pos += 1;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek()? == ')' {
                self.pos += 1;
                break;
            }
            items.push(self.literal()?);
            self.skip_ws();
            match self.peek()? {
                ',' => {
                    saw_comma = true;
                    self.pos += 1;
                }
                ')' => {
                    self.pos += 1;
                    break;
                }
                _ => return None,
            }
        }
        // `(1)` is a parenthesized int, not a tuple.
        if items.len() == 1 && !saw_comma {
            return items.pop();
        }
        Some(Key::Tuple(items))
    }
}

/// Anything usable as a path.
///
/// Strings are parsed, sequences of keys are taken as-is, and a single key
/// (including a composite [`Key::Tuple`]) is a one-segment path.
pub trait IntoPath {
    fn into_path(self) -> Vec<Key>;
}

impl IntoPath for &str {
    fn into_path(self) -> Vec<Key> {
        parse_path(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Vec<Key> {
        parse_path(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Vec<Key> {
        parse_path(self)
    }
}

impl IntoPath for Key {
    fn into_path(self) -> Vec<Key> {
        vec![self]
    }
}

impl IntoPath for i64 {
    fn into_path(self) -> Vec<Key> {
        vec![Key::Int(self)]
    }
}

impl IntoPath for i32 {
    fn into_path(self) -> Vec<Key> {
        vec![Key::Int(self as i64)]
    }
}

impl IntoPath for usize {
    fn into_path(self) -> Vec<Key> {
        vec![Key::Int(self as i64)]
    }
}

impl IntoPath for Vec<Key> {
    fn into_path(self) -> Vec<Key> {
        self
    }
}

impl IntoPath for &[Key] {
    fn into_path(self) -> Vec<Key> {
        self.to_vec()
    }
}

impl IntoPath for &Vec<Key> {
    fn into_path(self) -> Vec<Key> {
        self.clone()
    }
}

impl<const N: usize> IntoPath for [Key; N] {
    fn into_path(self) -> Vec<Key> {
        self.to_vec()
    }
}

/// Reads a path out of a dynamic value: strings are parsed, lists give one
/// segment per element, any other hashable value is a single segment.
pub fn path_from_value(value: &Value) -> Result<Vec<Key>, ValueError> {
    match value {
        Value::Str(s) => Ok(parse_path(s)),
        Value::List(items) => items.borrow().iter().map(Key::try_from).collect(),
        other => Ok(vec![Key::try_from(other)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Key {
        Key::from(v)
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(parse_path("a.b.c"), vec![s("a"), s("b"), s("c")]);
        assert_eq!(parse_path(""), Vec::<Key>::new());
        assert_eq!(parse_path("a..b"), vec![s("a"), s("b")]);
    }

    #[test]
    fn test_parse_digits_become_ints() {
        assert_eq!(parse_path("a.0.b"), vec![s("a"), Key::Int(0), s("b")]);
        assert_eq!(parse_path("a.-1"), vec![s("a"), Key::Int(-1)]);
        assert_eq!(parse_path("a.1x"), vec![s("a"), s("1x")]);
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(parse_path("a[0]"), vec![s("a"), Key::Int(0)]);
        assert_eq!(parse_path("a[  2  ].c"), vec![s("a"), Key::Int(2), s("c")]);
        assert_eq!(parse_path("a[ two ].c"), vec![s("a"), s("two"), s("c")]);
        assert_eq!(parse_path("a['x.y']"), vec![s("a"), s("x.y")]);
        assert_eq!(parse_path("a[\"q\"]"), vec![s("a"), s("q")]);
        assert_eq!(parse_path("a[]"), vec![s("a")]);
        assert_eq!(parse_path("a[-3]"), vec![s("a"), Key::Int(-3)]);
    }

    #[test]
    fn test_parse_bracket_literals() {
        assert_eq!(parse_path("[True]"), vec![Key::Bool(true)]);
        assert_eq!(parse_path("[None]"), vec![s("None")]);
        assert_eq!(parse_path("[1.5]"), vec![s("1.5")]);
        assert_eq!(
            parse_path("[(1, 'b')]"),
            vec![Key::Tuple(vec![Key::Int(1), s("b")])]
        );
        assert_eq!(parse_path("[()]"), vec![Key::Tuple(vec![])]);
        assert_eq!(parse_path("[(7)]"), vec![Key::Int(7)]);
    }

    #[test]
    fn test_parse_escapes() {
        assert_eq!(parse_path(r"a\.b.c"), vec![s("a.b"), s("c")]);
        assert_eq!(parse_path(r"a\[0]"), vec![s("a[0]")]);
        assert_eq!(parse_path(r"trailing\"), vec![s("trailing")]);
    }

    #[test]
    fn test_parse_unclosed_bracket() {
        assert_eq!(parse_path("a[0"), vec![s("a"), Key::Int(0)]);
    }

    #[test]
    fn test_try_parse_path_limits() {
        let deep = vec!["a"; MAX_PATH_DEPTH + 1].join(".");
        assert!(matches!(try_parse_path(&deep), Err(PathError::TooLong(_))));
        let long = "x".repeat(MAX_PATH_STRING_LENGTH + 1);
        assert!(matches!(try_parse_path(&long), Err(PathError::TooLong(_))));
        assert_eq!(try_parse_path("a.b"), Ok(vec![s("a"), s("b")]));
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&parse_path("a[0].b")), "a[0].b");
        assert_eq!(format_path(&[s("a.b")]), r"a\.b");
        assert_eq!(format_path(&[Key::Tuple(vec![Key::Int(1), s("x")])]), "[(1, 'x')]");
    }

    #[test]
    fn test_into_path() {
        assert_eq!(3i64.into_path(), vec![Key::Int(3)]);
        let tuple = Key::Tuple(vec![s("a"), s("b")]);
        assert_eq!(tuple.clone().into_path(), vec![tuple]);
        assert_eq!(vec![s("a.b")].into_path(), vec![s("a.b")]);
    }

    #[test]
    fn test_path_from_value() {
        assert_eq!(
            path_from_value(&Value::from("a[1]")),
            Ok(vec![s("a"), Key::Int(1)])
        );
        assert_eq!(
            path_from_value(&Value::list_from([Value::from("a.b"), Value::from(2)])),
            Ok(vec![s("a.b"), Key::Int(2)])
        );
        assert_eq!(path_from_value(&Value::from(5)), Ok(vec![Key::Int(5)]));
        assert!(path_from_value(&Value::empty_map()).is_err());
    }
}
