//! Utility toolkit over dynamic [`Value`]s and plain Rust collections.
//!
//! - [`array`]: generic collection helpers plus a few `Value`-only ones
//! - [`object`]: keyed access, deep merge, conversions
//! - [`string`]: text manipulation and regex helpers
//! - [`function`]: combinators, debounce/throttle, currying
//! - [`security`]: rate limiting, audit logging, input validation
//! - [`chain`]: a fluent wrapper over a name → function [`registry`]
//!
//! Deep path access lives in [`unicore_path`] and templating in
//! [`unicore_template`]; both are re-exported here.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use unicore::{get, merge, Value};
//!
//! let merged = merge(&[
//!     Value::from(json!({"a": {"b": [1, 2]}})),
//!     Value::from(json!({"c": true})),
//! ]);
//! assert_eq!(get(&merged, "a.b[1]", Value::Null).unwrap(), Value::from(2));
//! ```

pub mod array;
pub mod chain;
pub mod error;
pub mod function;
pub mod object;
pub mod registry;
pub mod security;
pub mod string;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use chain::{chain, Applied, Chain};
pub use error::{Error, Result, SecurityError};
pub use object::{defaults_deep, merge, merge_with, MergeCustomizer};
pub use registry::{Builtin, Registry};
pub use security::{AuditLogger, RateLimiter};
pub use unicore_path::{
    at, get, has, invoke_path, parse_path, set, set_with, try_get, unset, update, update_with,
    IntoPath, PathError,
};
pub use unicore_template::{template, Template, TemplateError};
pub use unicore_value::{clone, clone_deep, is_equal, Func, Key, Map, Object, Value, ValueError};
pub use utils::IdCounter;

pub use unicore_path;
pub use unicore_template;
pub use unicore_value;
