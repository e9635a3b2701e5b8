//! Audit logging, rate limiting and validation through the public API.

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::init_tracing;
use unicore::security::{sanitize_string, validate_type, SanitizeOptions};
use unicore::{AuditLogger, Error, RateLimiter, Value};

#[test]
fn test_audit_log_appends_lines() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::new(dir.path().join("audit.log"));
    logger.log("LOGIN", "user=ada").unwrap();
    logger.log("DENIED", "path=__class__").unwrap();

    let text = fs::read_to_string(logger.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - LOGIN: user=ada"));
    assert!(lines[1].ends_with(" - DENIED: path=__class__"));
    // "YYYY-MM-DD HH:MM:SS" prefix.
    assert_eq!(lines[0].as_bytes()[4], b'-');
    assert_eq!(lines[0].as_bytes()[19], b' ');
}

#[test]
fn test_audit_log_concurrent_writers() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Arc::new(AuditLogger::new(dir.path().join("audit.log")));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for j in 0..10 {
                    logger.log("EVENT", &format!("{i}-{j}")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let text = fs::read_to_string(logger.path()).unwrap();
    assert_eq!(text.lines().count(), 40);
    assert!(text.lines().all(|l| l.contains(" - EVENT: ")));
}

#[test]
fn test_audit_log_missing_directory_errors() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::new(dir.path().join("missing").join("audit.log"));
    assert!(logger.log("X", "y").is_err());
}

#[test]
fn test_rate_limiter_recovers_after_window() {
    init_tracing();
    let limiter = RateLimiter::new(2, Duration::from_millis(30));
    assert!(limiter.check().is_ok());
    assert!(limiter.check().is_ok());
    assert_eq!(limiter.check(), Err(Error::RateLimited));
    thread::sleep(Duration::from_millis(60));
    assert!(limiter.check().is_ok());
}

#[test]
fn test_validation_errors_are_security_errors() {
    let err = validate_type(&Value::from("x"), &["int"], "limit").unwrap_err();
    assert!(err.is_security());
    let too_long = sanitize_string("abcdef", &SanitizeOptions::max_length(3));
    assert!(too_long.is_err());
    assert_eq!(
        sanitize_string("  ok  ", &SanitizeOptions::default()).unwrap(),
        "ok"
    );
}
