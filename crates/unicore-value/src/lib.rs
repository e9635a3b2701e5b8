//! unicore-value - the dynamic value tree shared by the unicore crates.
//!
//! Containers are reference-counted handles, so values can share children and
//! form cycles the same way objects do in a dynamic language. Every deep
//! operation in this workspace is written against [`Value`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use unicore_value::{clone_deep, Value};
//!
//! let doc = Value::from(json!({"a": [{"b": 1}]}));
//! let copy = clone_deep(&doc);
//! assert_eq!(doc, copy);
//! assert!(!doc.same(&copy));
//! ```

pub mod clone;
pub mod equal;
pub mod error;
pub mod json;
pub mod key;
pub mod order;
pub mod types;
pub mod value;

// Re-exports for convenience
pub use clone::{clone, clone_deep, clone_deep_with, clone_with, CloneCustomizer};
pub use equal::deep_equal;
pub use error::ValueError;
pub use key::{is_int_literal, Key};
pub use order::{compare, compare_total};
pub use types::{
    is_array, is_boolean, is_empty, is_equal, is_finite, is_function, is_instance, is_integer,
    is_map, is_match, is_nan, is_null, is_number, is_object, is_string, is_undefined,
};
pub use value::{Attrs, Func, Map, Object, Shared, Value};
