use thiserror::Error;

/// Rule violations raised by use cases. Anything that is not a `DomainError`
/// is treated as an internal failure by the presentation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "BAD_REQUEST",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::InvalidTransition { .. } => "CONFLICT",
            DomainError::NotFound(_) => "NOT_FOUND",
        }
    }
}

/// Accepts `http://` and `https://` URLs with a non-empty host part.
pub fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(r) => {
            let host = r.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !r.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
