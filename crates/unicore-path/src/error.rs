use thiserror::Error;
use unicore_value::{Key, ValueError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A restricted introspection name was used as a path segment.
    #[error("access to restricted key '{0}'")]
    AccessDenied(String),

    #[error("cannot assign into a value of type '{0}'")]
    NotContainer(&'static str),

    #[error("invalid list index: {0}")]
    InvalidIndex(Key),

    #[error("path too long: {0}")]
    TooLong(String),

    #[error(transparent)]
    Value(#[from] ValueError),
}
