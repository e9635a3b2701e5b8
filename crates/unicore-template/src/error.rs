use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SanitizeError {
    #[error("Value must be a string")]
    NotAString,

    #[error("String exceeds maximum length of {0}")]
    TooLong(usize),

    #[error("String contains invalid characters")]
    InvalidCharacters,

    #[error("invalid character class: {0}")]
    InvalidPattern(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Potentially dangerous template pattern detected")]
    DangerousPattern,

    #[error("access to restricted attribute '{0}'")]
    RestrictedAttribute(String),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("{0}")]
    Context(String),

    #[error("Invalid expression: '{0}'")]
    InvalidExpression(String),

    #[error("Invalid condition: '{0}'")]
    InvalidCondition(String),

    #[error("Name '{0}' is not defined.")]
    Name(String),

    #[error("Attribute '{0}' not found.")]
    Attribute(String),

    #[error("Method '{method}' is not allowed on object of type '{type_name}'.")]
    MethodNotAllowed {
        method: String,
        type_name: &'static str,
    },

    #[error("Unknown tag '{0}'.")]
    UnknownTag(String),

    #[error("Unmatched 'endif' found.")]
    UnmatchedEndif,

    #[error("Unclosed 'if' statement detected.")]
    UnclosedIf,
}

impl TemplateError {
    /// Rejections raised by the security guards rather than by bad syntax.
    pub fn is_security(&self) -> bool {
        matches!(
            self,
            TemplateError::DangerousPattern
                | TemplateError::RestrictedAttribute(_)
                | TemplateError::Sanitize(_)
        )
    }
}
