//! NiceHash API response types.
//!
//! Domain payloads (pools, orders, accounts, order books) are passed through
//! as `serde_json::Value`; only the server time is typed.

use serde::Deserialize;

/// Response from GET /api/v2/time.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTimeResponse {
    #[serde(rename = "serverTime")]
    pub server_time: i64,
}
