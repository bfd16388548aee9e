//! Per-request nonce generation.

use uuid::Uuid;

/// Generate a fresh nonce.
///
/// Nonces are random (v4) UUIDs drawn from the operating system's secure
/// random source, so concurrent callers never need to coordinate.
pub fn generate_nonce() -> String {
    Uuid::new_v4().to_string()
}
