//! unicore-template - a deliberately small template language.
//!
//! Interpolation `<%= expr %>` accepts a variable followed by attribute
//! lookups and a handful of string methods; `<% if name %>` blocks test
//! truthiness. Anything that reaches for introspection attributes is
//! rejected before rendering.

pub mod engine;
pub mod error;
pub mod sanitize;

pub use engine::{template, Template, TemplateOptions, DEFAULT_MAX_TEMPLATE_LENGTH, SAFE_METHODS};
pub use error::{SanitizeError, TemplateError};
pub use sanitize::{sanitize_string, sanitize_value, SanitizeOptions};
