//! Shared helpers for the integration suites.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use unicore::Value;

/// Installs a fmt subscriber once per test binary; `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}
