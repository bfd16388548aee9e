//! Workflow error types.

use auth::AuthError;
use nicehash_rest::NicehashRestError;
use thiserror::Error;

/// Errors that stop a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// REST API error.
    #[error("REST API error: {0}")]
    Rest(#[from] NicehashRestError),

    /// Credential loading error.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A response lacked a field the next step needs.
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),

    /// A response field could not be read as a number.
    #[error("field '{field}' is not a decimal: {value}")]
    InvalidDecimal {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// Unknown workflow name on the command line.
    #[error("unknown workflow '{0}', expected 'hashpower' or 'exchange'")]
    UnknownWorkflow(String),
}
