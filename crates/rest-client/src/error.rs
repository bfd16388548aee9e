//! Transport-level errors.
//!
//! Venue-specific error bodies are not interpreted here; a non-2xx response
//! keeps its raw body in [`RestError::HttpError`] for the caller to decode.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpError {
        status: u16,
        /// Raw response body.
        message: String,
    },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// A 2xx body that is not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Parse(String),

    /// Client or request could not be constructed (bad URL, bad header value).
    #[error("invalid request: {0}")]
    RequestBuild(String),
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();

        match err.status() {
            _ if err.is_timeout() => Self::Timeout,
            _ if err.is_builder() => Self::RequestBuild(message),
            _ if err.is_decode() => Self::Parse(message),
            Some(status) => Self::HttpError {
                status: status.as_u16(),
                message,
            },
            None => Self::Connection(message),
        }
    }
}
