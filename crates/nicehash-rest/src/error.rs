//! NiceHash REST API error types.

use auth::AuthError;
use rest_client::RestError;
use thiserror::Error;

/// Errors that can occur when interacting with the NiceHash REST API.
#[derive(Debug, Error)]
pub enum NicehashRestError {
    /// REST client error (network, timeout, etc.).
    #[error("REST client error: {0}")]
    Rest(RestError),

    /// Authentication or signing error.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// An authenticated call was attempted before the server time was fetched.
    #[error("server time not synchronized, call sync_time() first")]
    TimeNotSynchronized,

    /// NiceHash API error (returned by the server).
    #[error("NiceHash API error {code} (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// NiceHash error code.
        code: i64,
        /// Error message.
        message: String,
    },
}

impl NicehashRestError {
    /// Parse a NiceHash API error response.
    ///
    /// NiceHash returns errors in the format:
    /// `{"error_id": "...", "errors": [{"code": 2000, "message": "..."}]}`
    ///
    /// Bodies that do not match are kept as a plain HTTP error.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ApiErrorEnvelope {
            errors: Vec<ApiErrorEntry>,
        }

        #[derive(serde::Deserialize)]
        struct ApiErrorEntry {
            code: i64,
            message: String,
        }

        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) if !envelope.errors.is_empty() => {
                let first = &envelope.errors[0];
                Self::Api {
                    status,
                    code: first.code,
                    message: first.message.clone(),
                }
            }
            _ => Self::Rest(RestError::HttpError {
                status,
                message: body.to_string(),
            }),
        }
    }
}

impl From<RestError> for NicehashRestError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::HttpError { status, message } => Self::from_api_response(status, &message),
            other => Self::Rest(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"error_id":"e1","errors":[{"code":2000,"message":"Invalid session"}]}"#;
        match NicehashRestError::from_api_response(401, body) {
            NicehashRestError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(code, 2000);
                assert_eq!(message, "Invalid session");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_kept_as_http_error() {
        let err = NicehashRestError::from_api_response(502, "Bad Gateway");
        assert!(matches!(
            err,
            NicehashRestError::Rest(RestError::HttpError { status: 502, .. })
        ));
    }

    #[test]
    fn test_empty_errors_kept_as_http_error() {
        let err = NicehashRestError::from_api_response(400, r#"{"errors":[]}"#);
        assert!(matches!(err, NicehashRestError::Rest(_)));
    }

    #[test]
    fn test_rest_error_conversion_classifies_http_errors() {
        let err: NicehashRestError = RestError::HttpError {
            status: 404,
            message: r#"{"errors":[{"code":5054,"message":"Order not found"}]}"#.into(),
        }
        .into();
        assert!(matches!(err, NicehashRestError::Api { code: 5054, .. }));

        let err: NicehashRestError = RestError::Timeout.into();
        assert!(matches!(err, NicehashRestError::Rest(RestError::Timeout)));
    }
}
