use regex::Regex;
use unicore_value::Value;

use crate::error::SanitizeError;

/// Limits applied by [`sanitize_string`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Maximum length in characters after trimming; `None` or `Some(0)`
    /// disables the check.
    pub max_length: Option<usize>,
    /// Body of a regex character class, e.g. `a-zA-Z0-9 _-`.
    pub allowed_chars: Option<String>,
}

impl SanitizeOptions {
    pub fn max_length(max_length: usize) -> Self {
        SanitizeOptions {
            max_length: Some(max_length),
            allowed_chars: None,
        }
    }
}

/// Trims `value` and checks it against `options`.
///
/// # Example
///
/// ```
/// use unicore_template::{sanitize_string, SanitizeError, SanitizeOptions};
///
/// let opts = SanitizeOptions {
///     max_length: Some(5),
///     allowed_chars: Some("a-z".to_string()),
/// };
/// assert_eq!(sanitize_string("  abc ", &opts).unwrap(), "abc");
/// assert_eq!(sanitize_string("abcdef", &opts), Err(SanitizeError::TooLong(5)));
/// assert_eq!(sanitize_string("ab1", &opts), Err(SanitizeError::InvalidCharacters));
/// ```
pub fn sanitize_string(value: &str, options: &SanitizeOptions) -> Result<String, SanitizeError> {
    let value = value.trim();
    if let Some(max) = options.max_length.filter(|m| *m > 0) {
        if value.chars().count() > max {
            return Err(SanitizeError::TooLong(max));
        }
    }
    if let Some(allowed) = options.allowed_chars.as_deref().filter(|a| !a.is_empty()) {
        let re = Regex::new(&format!("^[{allowed}]*$"))
            .map_err(|e| SanitizeError::InvalidPattern(e.to_string()))?;
        if !re.is_match(value) {
            return Err(SanitizeError::InvalidCharacters);
        }
    }
    Ok(value.to_string())
}

/// [`sanitize_string`] for dynamic values; anything but a string is rejected.
pub fn sanitize_value(value: &Value, options: &SanitizeOptions) -> Result<String, SanitizeError> {
    match value {
        Value::Str(s) => sanitize_string(s, options),
        _ => Err(SanitizeError::NotAString),
    }
}
