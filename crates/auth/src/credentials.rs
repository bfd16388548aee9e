//! Secure API credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the API secret
//! and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "NICEHASH_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "NICEHASH_API_SECRET";
/// Environment variable holding the organization id.
pub const ORGANIZATION_ID_VAR: &str = "NICEHASH_ORGANIZATION_ID";

/// API credentials for authenticated requests.
///
/// The secret is only ever used as HMAC keying material. It is wrapped in
/// `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    secret_key: SecretString,
    organization_id: String,
}

impl ApiCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `NICEHASH_API_KEY` - The API key (public)
    /// - `NICEHASH_API_SECRET` - The API secret (private)
    /// - `NICEHASH_ORGANIZATION_ID` - Organization id (optional, empty if unset)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if the key or secret is not set.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| AuthError::MissingEnvVar(API_KEY_VAR.into()))?;

        let secret_key = std::env::var(API_SECRET_VAR)
            .map_err(|_| AuthError::MissingEnvVar(API_SECRET_VAR.into()))?;

        let organization_id = std::env::var(ORGANIZATION_ID_VAR).unwrap_or_default();

        Ok(Self::new(api_key, secret_key, organization_id))
    }

    /// Create credentials from explicit values.
    ///
    /// An empty `organization_id` means the requests are not scoped to an
    /// organization.
    pub fn new(api_key: String, secret_key: String, organization_id: String) -> Self {
        Self {
            api_key,
            secret_key: SecretString::from(secret_key),
            organization_id,
        }
    }

    /// Get the API key (public, safe to log).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the organization id, empty when unscoped.
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Expose the secret key for signing.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = ApiCredentials::new("my_api_key".into(), "my_secret".into(), "my_org".into());
        assert_eq!(creds.api_key(), "my_api_key");
        assert_eq!(creds.expose_secret(), "my_secret");
        assert_eq!(creds.organization_id(), "my_org");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ApiCredentials::new(
            "my_api_key".into(),
            "super_secret_key".into(),
            String::new(),
        );
        let debug_str = format!("{:?}", creds);

        assert!(debug_str.contains("my_api_key"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
