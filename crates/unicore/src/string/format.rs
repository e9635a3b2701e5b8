//! Padding, shortening, phrasing and formatting.

use std::sync::OnceLock;

use regex::Regex;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// `n` characters of `fill` repeated cyclically (space when `fill` is
/// empty).
fn cycle(fill: &str, n: usize) -> String {
    let fill = if fill.is_empty() { " " } else { fill };
    fill.chars().cycle().take(n).collect()
}

/// Centers `s` in `length` characters, extra padding going right.
///
/// # Example
///
/// ```
/// use unicore::string::pad;
///
/// assert_eq!(pad("abc", 8, "_-"), "_-abc_-_");
/// assert_eq!(pad("abc", 2, " "), "abc");
/// ```
pub fn pad(s: &str, length: usize, fill: &str) -> String {
    let len = char_len(s);
    if len >= length {
        return s.to_string();
    }
    let total = length - len;
    let left = total / 2;
    format!("{}{s}{}", cycle(fill, left), cycle(fill, total - left))
}

/// Left-pads to `length`. The fill is cut from the end of its repetition.
pub fn pad_start(s: &str, length: usize, fill: &str) -> String {
    let len = char_len(s);
    if len >= length {
        return s.to_string();
    }
    let count = length - len;
    let fill_len = char_len(fill).max(1);
    let big = cycle(fill, count.div_ceil(fill_len) * fill_len);
    let skip = char_len(&big) - count;
    format!("{}{s}", big.chars().skip(skip).collect::<String>())
}

pub fn pad_end(s: &str, length: usize, fill: &str) -> String {
    let len = char_len(s);
    if len >= length {
        return s.to_string();
    }
    format!("{s}{}", cycle(fill, length - len))
}

/// Where [`truncate`] may cut.
#[derive(Debug, Clone)]
pub enum Separator {
    Str(String),
    Regex(Regex),
}

#[derive(Debug, Clone)]
pub struct TruncateOptions {
    /// Maximum length of the result, omission included.
    pub length: usize,
    pub omission: String,
    /// Cut at the last separator before the limit instead of at a character.
    pub separator: Option<Separator>,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            length: 30,
            omission: "...".to_string(),
            separator: None,
        }
    }
}

/// Shortens `s` to `options.length` characters, omission included.
///
/// Without a separator, trailing non-alphanumerics are dropped from the
/// kept head before the omission is appended.
///
/// # Example
///
/// ```
/// use unicore::string::{truncate, Separator, TruncateOptions};
///
/// let text = "hi-diddly-ho there, neighborino";
/// assert_eq!(truncate(text, &TruncateOptions::default()), "hi-diddly-ho there, neighbo...");
/// let opts = TruncateOptions {
///     length: 24,
///     separator: Some(Separator::Str(" ".into())),
///     ..Default::default()
/// };
/// assert_eq!(truncate(text, &opts), "hi-diddly-ho there,...");
/// ```
pub fn truncate(s: &str, options: &TruncateOptions) -> String {
    if char_len(s) <= options.length {
        return s.to_string();
    }
    let omission_len = char_len(&options.omission);
    if omission_len > options.length {
        return take_chars(&options.omission, options.length);
    }
    let mut head = take_chars(s, options.length - omission_len);
    match &options.separator {
        Some(Separator::Str(sep)) if !sep.is_empty() => {
            if let Some(idx) = head.rfind(sep.as_str()) {
                head.truncate(idx);
            }
        }
        Some(Separator::Regex(re)) => {
            if let Some(m) = re.find_iter(&head).last() {
                let start = m.start();
                head.truncate(start);
            }
        }
        _ => trim_non_alnum_end(&mut head),
    }
    head + &options.omission
}

fn trim_non_alnum_end(head: &mut String) {
    while head.chars().last().is_some_and(|c| !c.is_alphanumeric()) {
        head.pop();
    }
}

/// Shortens `s` to at most `length` characters at a word boundary, then
/// appends `omission`.
///
/// A custom omission longer than `length` leaves `s` untouched.
///
/// # Example
///
/// ```
/// use unicore::string::prune;
///
/// assert_eq!(prune("Fe fi fo fum", 8, "..."), "Fe fi...");
/// assert_eq!(prune("short", 10, "..."), "short");
/// ```
pub fn prune(s: &str, length: usize, omission: &str) -> String {
    if omission != "..." && char_len(omission) > length {
        return s.to_string();
    }
    if char_len(s) <= length {
        return s.to_string();
    }
    let mut head = take_chars(s, length);
    if let Some(idx) = head.rfind(' ') {
        head.truncate(idx);
    }
    trim_non_alnum_end(&mut head);
    head + omission
}

/// Joins `items` as a phrase: `a, b and c`. Empty items are skipped.
pub fn series_phrase(items: &[&str], sep: &str, last_sep: &str) -> String {
    let parts: Vec<&str> = items.iter().copied().filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{}{last_sep}{last}", init.join(sep)),
    }
}

/// [`series_phrase`] with a serial comma: `a, b, and c`.
///
/// Two items are always joined with ` and `. When `last_sep` does not
/// already start with `sep`'s punctuation, it is prefixed with it.
pub fn series_phrase_serial(items: &[&str], sep: &str, last_sep: &str) -> String {
    let parts: Vec<&str> = items.iter().copied().filter(|s| !s.is_empty()).collect();
    if parts.len() == 2 {
        return format!("{} and {}", parts[0], parts[1]);
    }
    let lead = sep.trim_end();
    let last_sep = if !last_sep.trim().is_empty() && !last_sep.trim_start().starts_with(lead) {
        format!("{lead}{last_sep}")
    } else {
        last_sep.to_string()
    };
    series_phrase(&parts, sep, &last_sep)
}

/// `s` repeated `n` times; non-positive `n` gives an empty string.
pub fn repeat(s: &str, n: i64) -> String {
    s.repeat(usize::try_from(n).unwrap_or(0))
}

/// Separators used by [`number_format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub precision: usize,
    pub decimal_sep: String,
    pub thousands_sep: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 0,
            decimal_sep: ".".to_string(),
            thousands_sep: ",".to_string(),
        }
    }
}

/// Formats `value` with grouped thousands. Non-finite values give `""`.
///
/// # Example
///
/// ```
/// use unicore::string::{number_format, NumberFormat};
///
/// assert_eq!(number_format(1234567.891, &NumberFormat::default()), "1,234,568");
/// let de = NumberFormat { precision: 2, decimal_sep: ",".into(), thousands_sep: ".".into() };
/// assert_eq!(number_format(-1234.5, &de), "-1.234,50");
/// ```
pub fn number_format(value: f64, format: &NumberFormat) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.*}", format.precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(&format.thousands_sep);
        }
        grouped.push(*d);
    }
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push_str(&format.decimal_sep);
        out.push_str(frac);
    }
    out
}

fn deburr_char(c: char) -> Option<&'static str> {
    Some(match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'Æ' => "Ae",
        'Ç' => "C",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'Ð' => "D",
        'Ñ' => "N",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        '×' | '÷' => " ",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'Ý' => "Y",
        'Þ' => "Th",
        'ß' => "ss",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ð' => "d",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'þ' => "th",
        _ => return None,
    })
}

/// Replaces Latin-1 Supplement letters with their basic Latin forms.
pub fn deburr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match deburr_char(c) {
            Some(plain) => out.push_str(plain),
            None => out.push(c),
        }
    }
    out
}

fn slug_strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9a-z\u{80}-\u{FFFF} ]+").unwrap())
}

/// Lowercase, accent-free words joined by `delimiter`.
///
/// # Example
///
/// ```
/// use unicore::string::slugify;
///
/// assert_eq!(slugify("Crème Brûlée's Recipe!", "-"), "creme-brulees-recipe");
/// ```
pub fn slugify(s: &str, delimiter: &str) -> String {
    let text: String = deburr(s)
        .to_lowercase()
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '`' | '\u{2019}'))
        .collect();
    let text = slug_strip_regex().replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(delimiter)
}

/// HTML-escapes `& < > " ' \``.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape`]; `&amp;` is decoded last.
pub fn unescape(s: &str) -> String {
    s.replace("&#39;", "'")
        .replace("&#96;", "`")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Removes the whitespace prefix common to every non-blank line. Lines made
/// only of spaces and tabs become empty.
///
/// # Example
///
/// ```
/// use unicore::string::dedent_text;
///
/// assert_eq!(dedent_text("    a\n      b\n  \n    c\n"), "a\n  b\n\nc\n");
/// ```
pub fn dedent_text(s: &str) -> String {
    let lines: Vec<&str> = s.split('\n').collect();
    let is_blank = |line: &str| line.chars().all(|c| c == ' ' || c == '\t');
    let mut margin: Option<&str> = None;
    for line in lines.iter().filter(|l| !is_blank(l)) {
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let indent = &line[..indent_len];
        margin = Some(match margin {
            None => indent,
            Some(m) => {
                let common = m
                    .bytes()
                    .zip(indent.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                &m[..common]
            }
        });
    }
    let margin = margin.unwrap_or("");
    lines
        .iter()
        .map(|&line| {
            if is_blank(line) {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits `s` on `sep`; no separator splits on whitespace and an empty one
/// into characters.
pub fn split(s: &str, sep: Option<&str>) -> Vec<String> {
    match sep {
        None => s.split_whitespace().map(str::to_string).collect(),
        Some("") => s.chars().map(String::from).collect(),
        Some(sep) => s.split(sep).map(str::to_string).collect(),
    }
}

/// Splits `s` into its lines; `\r\n` and `\r` count as line breaks and a
/// trailing break does not produce an empty last line.
pub fn lines(s: &str) -> Vec<String> {
    let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
    let mut out: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    if out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out
}
