//! Authentication header set attached to every signed request.

/// Header carrying the timestamp used in signing.
pub const X_TIME: &str = "X-Time";
/// Header carrying the nonce used in signing.
pub const X_NONCE: &str = "X-Nonce";
/// Header carrying `apiKey:digest`.
pub const X_AUTH: &str = "X-Auth";
/// Header carrying the organization id.
pub const X_ORGANIZATION_ID: &str = "X-Organization-Id";

/// Values for the authentication headers of one request.
///
/// `time` and `nonce` are the exact strings that went into the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub time: String,
    pub nonce: String,
    pub auth: String,
    /// `None` when the credentials are not scoped to an organization.
    pub organization_id: Option<String>,
}

impl AuthHeaders {
    /// Header `(name, value)` pairs in a fixed order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            (X_TIME, self.time.as_str()),
            (X_NONCE, self.nonce.as_str()),
            (X_AUTH, self.auth.as_str()),
        ];
        if let Some(org) = &self.organization_id {
            pairs.push((X_ORGANIZATION_ID, org.as_str()));
        }
        pairs
    }
}
