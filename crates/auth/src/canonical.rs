//! Canonical message construction.
//!
//! The digest is computed over the request components joined by a single
//! NUL byte, in this order:
//!
//! ```text
//! apiKey \0 time \0 nonce \0 "" \0 orgId \0 "" \0 method \0 path [\0 query] [\0 body]
//! ```
//!
//! The two empty segments are reserved by the protocol and always occupy
//! their position. The query and body segments are omitted entirely when the
//! request has none, which is distinct from an empty query or empty body.

use crate::credentials::ApiCredentials;
use crate::request::ResolvedRequest;

/// Segment separator.
pub const SEPARATOR: u8 = 0;

/// The exact bytes the authentication digest is computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalMessage {
    bytes: Vec<u8>,
}

impl CanonicalMessage {
    /// Build the canonical message for a resolved request.
    pub fn build(
        credentials: &ApiCredentials,
        request: &ResolvedRequest,
        timestamp: &str,
        nonce: &str,
    ) -> Self {
        let mut segments: Vec<&str> = vec![
            credentials.api_key(),
            timestamp,
            nonce,
            "",
            credentials.organization_id(),
            "",
            &request.method,
            &request.path,
        ];

        if let Some(query) = &request.query {
            segments.push(query);
        }
        if let Some(body) = &request.body {
            segments.push(body);
        }

        Self::from_segments(&segments)
    }

    fn from_segments(segments: &[&str]) -> Self {
        let capacity = segments.iter().map(|s| s.len() + 1).sum();
        let mut bytes = Vec::with_capacity(capacity);

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                bytes.push(SEPARATOR);
            }
            bytes.extend_from_slice(segment.as_bytes());
        }

        Self { bytes }
    }

    /// The joined bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Split back into segments (for diagnostics and tests).
    pub fn segments(&self) -> Vec<&[u8]> {
        self.bytes.split(|b| *b == SEPARATOR).collect()
    }
}
