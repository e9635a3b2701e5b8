use thiserror::Error;

/// Errors raised while converting, hashing or calling dynamic values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("unhashable type: '{0}'")]
    Unhashable(&'static str),

    #[error("object of type '{0}' is not JSON serializable")]
    NotSerializable(&'static str),

    #[error("circular reference detected")]
    Cycle,

    #[error("'{0}' object is not callable")]
    NotCallable(&'static str),

    #[error("{name}() takes {expected} positional arguments but {given} were given")]
    Arity {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("expected {expected}, got {got}")]
    Type {
        expected: &'static str,
        got: &'static str,
    },

    #[error("{0}")]
    Thrown(String),
}

impl ValueError {
    /// Shorthand for an error raised from inside a user function.
    pub fn thrown(message: impl Into<String>) -> Self {
        ValueError::Thrown(message.into())
    }
}
