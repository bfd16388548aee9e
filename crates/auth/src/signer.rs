//! HMAC-SHA256 request signing for the NiceHash API.

use crate::canonical::CanonicalMessage;
use crate::credentials::ApiCredentials;
use crate::error::AuthError;
use crate::headers::AuthHeaders;
use crate::nonce::generate_nonce;
use crate::request::{RequestDescriptor, ResolvedRequest};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// A request ready to send: the exact components that were signed plus the
/// authentication headers.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub request: ResolvedRequest,
    pub headers: AuthHeaders,
}

/// Request signer for authenticated NiceHash API calls.
///
/// Holds no mutable state; one signer may be shared across threads.
pub struct RequestSigner<'a> {
    credentials: &'a ApiCredentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self { credentials }
    }

    /// Sign a message and return the hex-encoded digest.
    ///
    /// This computes HMAC-SHA256 of the message using the secret key
    /// and returns the result as a lowercase hex string.
    pub fn sign_message(&self, message: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.credentials.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");

        mac.update(message);
        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }

    /// Build the canonical message for a request.
    pub fn canonical_message(
        &self,
        request: &RequestDescriptor,
        timestamp: &str,
        nonce: &str,
    ) -> Result<CanonicalMessage, AuthError> {
        let resolved = request.resolve()?;
        Ok(CanonicalMessage::build(
            self.credentials,
            &resolved,
            timestamp,
            nonce,
        ))
    }

    /// Compute the `X-Auth` value (`apiKey:digest`) for a request.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidInput` if the request cannot be resolved.
    pub fn sign(
        &self,
        request: &RequestDescriptor,
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, AuthError> {
        let resolved = request.resolve()?;
        Ok(self.sign_resolved(&resolved, timestamp, nonce))
    }

    /// Compute the `X-Auth` value for an already resolved request.
    pub fn sign_resolved(&self, request: &ResolvedRequest, timestamp: &str, nonce: &str) -> String {
        let message = CanonicalMessage::build(self.credentials, request, timestamp, nonce);
        format!(
            "{}:{}",
            self.credentials.api_key(),
            self.sign_message(message.as_bytes())
        )
    }

    /// Resolve, sign with a fresh nonce, and build the full header set.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidInput` if the request cannot be resolved.
    pub fn authenticate(
        &self,
        request: &RequestDescriptor,
        timestamp: &str,
    ) -> Result<SignedRequest, AuthError> {
        let resolved = request.resolve()?;
        let nonce = generate_nonce();
        let auth = self.sign_resolved(&resolved, timestamp, &nonce);

        let organization_id = match self.credentials.organization_id() {
            "" => None,
            org => Some(org.to_string()),
        };

        Ok(SignedRequest {
            request: resolved,
            headers: AuthHeaders {
                time: timestamp.to_string(),
                nonce,
                auth,
                organization_id,
            },
        })
    }
}
