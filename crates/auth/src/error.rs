use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The request cannot be signed as given (bad method, path, query or body).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AuthError {
    pub(crate) fn unsupported_method(method: &str) -> Self {
        Self::InvalidInput(format!(
            "unsupported method '{method}', expected GET, POST, PUT or DELETE"
        ))
    }

    pub(crate) fn invalid_path(path: &str, reason: &str) -> Self {
        Self::InvalidInput(format!("invalid path '{path}': {reason}"))
    }

    pub(crate) fn invalid_query(query: &str, reason: &str) -> Self {
        Self::InvalidInput(format!("invalid query '{query}': {reason}"))
    }

    pub(crate) fn body_serialization(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("body cannot be serialized: {err}"))
    }

    /// Returns true if this error was caused by the caller's request input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
