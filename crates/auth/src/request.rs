//! Request description and normalization prior to signing.

use crate::error::AuthError;
use crate::query::{split_path_query, Query, QueryParams};
use serde::Serialize;

/// HTTP methods accepted by the API.
pub const SUPPORTED_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// Request body, held as the exact string that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    /// Use `body` verbatim.
    pub fn raw(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Serialize `value` to compact JSON.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidInput` if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, AuthError> {
        serde_json::to_string(value)
            .map(Self)
            .map_err(AuthError::body_serialization)
    }

    /// The body string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An outgoing request as supplied by the caller.
///
/// `path` may carry an embedded query (`/orders?market=X`); it is split off
/// and merged with any explicit query during [`RequestDescriptor::resolve`].
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: String,
    path: String,
    query: Option<Query>,
    body: Option<Body>,
}

impl RequestDescriptor {
    /// Describe a request with no explicit query and no body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// Attach an explicit query.
    pub fn with_query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Validate and normalize into the exact strings to sign and send.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidInput` for an unsupported method, or for a
    /// path or query that a URL parser would rewrite before sending.
    pub fn resolve(&self) -> Result<ResolvedRequest, AuthError> {
        validate_method(&self.method)?;

        let (path, embedded) = split_path_query(&self.path);
        validate_path(path)?;
        if let Some(embedded) = embedded {
            validate_query(embedded)?;
        }

        let query = match (embedded, &self.query) {
            (None, None) => None,
            (Some(embedded), None) => Some(embedded.to_string()),
            (None, Some(explicit)) => Some(explicit.encode()),
            (Some(embedded), Some(explicit)) => {
                let mut merged = QueryParams::parse(embedded);
                merged.merge(explicit.clone().into_params());
                Some(merged.encode())
            }
        };
        if let Some(query) = &query {
            validate_query(query)?;
        }

        Ok(ResolvedRequest {
            method: self.method.clone(),
            path: path.to_string(),
            query,
            body: self.body.as_ref().map(|b| b.as_str().to_string()),
        })
    }
}

/// A validated request whose components are exactly what gets signed and
/// transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Method, in the caller's spelling.
    pub method: String,
    /// Path without query.
    pub path: String,
    /// Encoded query, `None` when the request has no query at all.
    pub query: Option<String>,
    /// Body string, `None` when the request has no body.
    pub body: Option<String>,
}

fn validate_method(method: &str) -> Result<(), AuthError> {
    if SUPPORTED_METHODS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
    {
        Ok(())
    } else {
        Err(AuthError::unsupported_method(method))
    }
}

/// Accept `/`-separated RFC 3986 `pchar`s, with well-formed `%XX` escapes.
///
/// Dot segments (`.`, `..`, `%2e`, ...) are refused since URL parsers
/// collapse them and the server would see a different path than was signed.
fn validate_path(path: &str) -> Result<(), AuthError> {
    if !path.starts_with('/') {
        return Err(AuthError::invalid_path(path, "must start with '/'"));
    }

    scan_escaped(path, is_path_char).map_err(|reason| AuthError::invalid_path(path, &reason))?;

    if path.split('/').any(is_dot_segment) {
        return Err(AuthError::invalid_path(path, "dot segments not allowed"));
    }

    Ok(())
}

/// Accept query characters that are sent unchanged (no `#`, no spaces).
fn validate_query(query: &str) -> Result<(), AuthError> {
    scan_escaped(query, is_query_char).map_err(|reason| AuthError::invalid_query(query, &reason))
}

fn scan_escaped(input: &str, allowed: fn(u8) -> bool) -> Result<(), String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err("malformed percent escape".to_string());
            }
            i += 3;
            continue;
        }
        if !allowed(b) {
            return Err(format!("character {:?} not allowed", char::from(b)));
        }
        i += 1;
    }

    Ok(())
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn is_path_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'/'
        )
}

// `'` is percent-encoded in queries of http(s) URLs, so it is refused here.
fn is_query_char(b: u8) -> bool {
    b != b'\'' && (is_path_char(b) || b == b'?')
}
