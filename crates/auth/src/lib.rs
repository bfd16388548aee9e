//! Authentication and request signing for the NiceHash REST API.
//!
//! This crate provides secure credential management and request signing
//! for authenticated API calls.
//!
//! # Features
//!
//! - **Secure Credentials**: API secrets are wrapped in `SecretString` to prevent
//!   accidental logging and ensure memory is zeroed on drop.
//! - **Request Normalization**: paths with embedded queries are split, explicit
//!   query parameters merged and encoded, bodies held as the exact bytes sent.
//! - **HMAC-SHA256 Signing**: digest over the NUL-joined canonical message,
//!   returned as the `X-Auth` value `apiKey:hexDigest`.
//! - **Environment Loading**: Credentials can be loaded from environment variables
//!   or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiCredentials, Body, RequestDescriptor, RequestSigner};
//!
//! let credentials = ApiCredentials::from_env()?;
//! let signer = RequestSigner::new(&credentials);
//!
//! let request = RequestDescriptor::new("POST", "/main/api/v2/pool")
//!     .with_body(Body::json(&pool)?);
//! let signed = signer.authenticate(&request, &timestamp_ms.to_string())?;
//!
//! for (name, value) in signed.headers.pairs() {
//!     // attach to the outgoing request
//! }
//! ```

mod canonical;
mod credentials;
mod error;
mod headers;
mod nonce;
mod query;
mod request;
mod signer;

pub use canonical::{CanonicalMessage, SEPARATOR};
pub use credentials::{ApiCredentials, API_KEY_VAR, API_SECRET_VAR, ORGANIZATION_ID_VAR};
pub use error::AuthError;
pub use headers::{AuthHeaders, X_AUTH, X_NONCE, X_ORGANIZATION_ID, X_TIME};
pub use nonce::generate_nonce;
pub use query::{split_path_query, Query, QueryParams};
pub use request::{Body, RequestDescriptor, ResolvedRequest, SUPPORTED_METHODS};
pub use signer::{RequestSigner, SignedRequest};
