//! Minimal async HTTP layer for JSON APIs.
//!
//! [`RestClient`] sends a method, path, pre-encoded query and pre-serialized
//! body exactly as given, with caller-supplied headers. Keeping bytes
//! untouched lets a signing layer above it sign what actually goes on the wire.
//!
//! ```rust,ignore
//! use rest_client::{Method, RestClient};
//! use serde_json::Value;
//!
//! let client = RestClient::with_default_timeout("https://api2.nicehash.com")?;
//! let time: Value = client.get("/api/v2/time", None).await?;
//! let pool: Value = client
//!     .request(Method::POST, "/main/api/v2/pool", None, Some(body), &headers)
//!     .await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::RestError;
pub use reqwest::Method;
