use thiserror::Error;
use unicore_path::PathError;
use unicore_template::{SanitizeError, TemplateError};
use unicore_value::ValueError;

/// Rejections raised by the security helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SecurityError {
    #[error("input validation failed: {0}")]
    InputValidation(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("sanitization failed: {0}")]
    Sanitization(#[from] SanitizeError),

    #[error("access to restricted key '{0}'")]
    AccessDenied(String),

    #[error("Potentially dangerous pattern detected")]
    DangerousPattern,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("no callable function named '{0}'")]
    UnknownFunction(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether the error is a security rejection rather than bad input.
    pub fn is_security(&self) -> bool {
        match self {
            Error::Security(_) | Error::RateLimited => true,
            Error::Path(PathError::AccessDenied(_)) => true,
            Error::Template(e) => e.is_security(),
            _ => false,
        }
    }
}

impl From<SanitizeError> for Error {
    fn from(e: SanitizeError) -> Self {
        Error::Security(SecurityError::Sanitization(e))
    }
}

/// Surfaces an [`Error`] raised inside a [`Func`](unicore_value::Func) body.
impl From<Error> for ValueError {
    fn from(e: Error) -> Self {
        match e {
            Error::Value(inner) => inner,
            other => ValueError::thrown(other.to_string()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_security() {
        assert!(Error::RateLimited.is_security());
        assert!(Error::from(PathError::AccessDenied("__class__".into())).is_security());
        assert!(Error::from(TemplateError::DangerousPattern).is_security());
        assert!(Error::from(SanitizeError::TooLong(3)).is_security());
        assert!(!Error::from(TemplateError::UnclosedIf).is_security());
        assert!(!Error::validation("bad").is_security());
        assert!(!Error::from(PathError::NotContainer("int")).is_security());
    }

    #[test]
    fn test_messages() {
        assert_eq!(Error::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            Error::UnknownFunction("nope".into()).to_string(),
            "no callable function named 'nope'"
        );
        assert_eq!(
            Error::from(SanitizeError::NotAString).to_string(),
            "sanitization failed: Value must be a string"
        );
    }

    #[test]
    fn test_into_value_error() {
        let e: ValueError = Error::validation("boom").into();
        assert_eq!(e, ValueError::thrown("boom"));
        let e: ValueError = Error::Value(ValueError::Cycle).into();
        assert_eq!(e, ValueError::Cycle);
    }
}
