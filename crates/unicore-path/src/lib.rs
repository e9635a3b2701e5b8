//! Deep path access over unicore values.
//!
//! Paths are written as dotted/bracketed strings (`"a[0].b"`), given as a
//! list of [`Key`](unicore_value::Key)s, or as a single key. Reads are soft:
//! a miss yields a default. Restricted introspection names are rejected.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use unicore_path::{get, has, set, unset};
//! use unicore_value::Value;
//!
//! let doc = Value::from(json!({"a": [{"b": 1}]}));
//! set(&doc, "a[0].c", Value::from(2)).unwrap();
//! assert!(has(&doc, "a.0.c"));
//! assert!(unset(&doc, "a[0].b"));
//! assert_eq!(get(&doc, "a[0]", Value::Null).unwrap(), Value::from(json!({"c": 2})));
//! ```

pub mod access;
pub mod container;
pub mod error;
pub mod mutate;
pub mod parse;
pub mod restricted;

pub use access::{at, get, has, invoke_path, try_get};
pub use container::{resolve_index, Children, Container, MAX_LIST_PADDING};
pub use error::PathError;
pub use mutate::{set, set_with, unset, update, update_with};
pub use parse::{
    format_path, parse_path, path_from_value, try_parse_path, validate_path, IntoPath,
    MAX_PATH_DEPTH, MAX_PATH_STRING_LENGTH,
};
pub use restricted::{is_restricted, is_restricted_name, RESTRICTED_KEYS};
