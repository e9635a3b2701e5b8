//! Security helpers: rate limiting, audit logging and input validation.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use time::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};
use unicore_value::{Func, Value};

use crate::error::{Error, Result, SecurityError};
use crate::function::lock;

pub use unicore_template::{sanitize_string, sanitize_value, SanitizeOptions};

/// Default log file for [`AuditLogger::default`].
pub const DEFAULT_AUDIT_LOG: &str = "unicore_audit.log";

/// Allows at most `max_calls` within any sliding `window`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use unicore::security::RateLimiter;
///
/// let limiter = RateLimiter::new(2, Duration::from_secs(60));
/// assert!(limiter.check().is_ok());
/// assert!(limiter.check().is_ok());
/// assert!(limiter.check().is_err());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<Vec<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Records a call, or fails with [`Error::RateLimited`] when the window
    /// is full. A rejected call is not recorded.
    pub fn check(&self) -> Result<()> {
        let now = Instant::now();
        let mut calls = lock(&self.calls);
        calls.retain(|t| now.duration_since(*t) < self.window);
        if calls.len() >= self.max_calls {
            warn!(
                max_calls = self.max_calls,
                window = ?self.window,
                "rate limit exceeded"
            );
            return Err(Error::RateLimited);
        }
        calls.push(now);
        Ok(())
    }

    /// Runs `f` if the limiter admits the call.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        self.check()?;
        Ok(f())
    }

    /// Calls currently counted against the window.
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        lock(&self.calls)
            .iter()
            .filter(|t| now.duration_since(**t) < self.window)
            .count()
    }
}

/// Appends timestamped security events to a file.
///
/// Each line reads `YYYY-MM-DD HH:MM:SS - EVENT: details`, stamped in UTC.
/// Writes are serialized; every event is also emitted as a `tracing` info
/// event.
#[derive(Debug)]
pub struct AuditLogger {
    path: PathBuf,
    guard: Mutex<()>,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_LOG)
    }
}

impl AuditLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&self, event: &str, details: &str) -> io::Result<()> {
        let entry = format!("{} - {event}: {details}\n", timestamp()?);
        let _guard = lock(&self.guard);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        info!(event, details, path = %self.path.display(), "audit event");
        Ok(())
    }
}

fn timestamp() -> io::Result<String> {
    let format = format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        .map_err(io::Error::other)?;
    OffsetDateTime::now_utc()
        .format(&format)
        .map_err(io::Error::other)
}

/// Checks that `value` has one of the `expected` type names (as reported by
/// [`Value::type_name`]).
///
/// # Example
///
/// ```
/// use unicore::security::validate_type;
/// use unicore_value::Value;
///
/// assert!(validate_type(&Value::from(1), &["int", "float"], "limit").is_ok());
/// let err = validate_type(&Value::from("x"), &["int"], "limit").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "input validation failed: Invalid type for limit. Expected int, got str"
/// );
/// ```
pub fn validate_type<'a>(value: &'a Value, expected: &[&str], param: &str) -> Result<&'a Value> {
    let got = value.type_name();
    if expected.contains(&got) {
        return Ok(value);
    }
    warn!(param, got, "input validation failed");
    Err(SecurityError::InputValidation(format!(
        "Invalid type for {param}. Expected {}, got {got}",
        expected.join(" | ")
    ))
    .into())
}

/// Checks that `value` is a function.
pub fn validate_callable<'a>(value: &'a Value, param: &str) -> Result<&'a Func> {
    value.as_func().ok_or_else(|| {
        warn!(param, got = value.type_name(), "input validation failed");
        SecurityError::InputValidation(format!("{param} must be callable")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_rate_limiter_window_slides() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check().is_ok());
        assert_eq!(limiter.check(), Err(Error::RateLimited));
        thread::sleep(Duration::from_millis(40));
        assert!(limiter.check().is_ok());
        assert_eq!(limiter.in_window(), 1);
    }

    #[test]
    fn test_rate_limiter_run() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        let err = limiter.run(|| 1).unwrap_err();
        assert!(err.is_security());
        assert_eq!(RateLimiter::default().run(|| 5), Ok(5));
    }

    #[test]
    fn test_rate_limiter_shared_across_threads() {
        let limiter = std::sync::Arc::new(RateLimiter::new(5, Duration::from_secs(60)));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = std::sync::Arc::clone(&limiter);
                thread::spawn(move || limiter.check().is_ok())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp().unwrap();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }

    #[test]
    fn test_validate_callable() {
        let f = Value::func(|_| Ok(Value::Null));
        assert!(validate_callable(&f, "cb").is_ok());
        let err = validate_callable(&Value::from(3), "cb").unwrap_err();
        assert_eq!(
            err,
            Error::Security(SecurityError::InputValidation("cb must be callable".into()))
        );
    }

    #[test]
    fn test_validate_type_lists_expected() {
        let err = validate_type(&Value::Null, &["list", "map"], "items").unwrap_err();
        assert!(err.to_string().contains("Expected list | map, got null"));
    }
}
