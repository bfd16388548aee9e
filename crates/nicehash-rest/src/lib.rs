//! NiceHash REST API client.
//!
//! This crate provides a client for the NiceHash REST API with:
//!
//! - **Time synchronization**: keeps the server/local clock offset used for
//!   every signed timestamp
//! - **Request signing**: `X-Time`, `X-Nonce`, `X-Auth` and
//!   `X-Organization-Id` headers on every private call
//! - **Hashpower and pool management**: create, update and cancel orders,
//!   create and delete pools
//! - **Exchange orders**: place and cancel limit orders
//! - **Error handling**: NiceHash error envelopes parsed into typed errors
//!
//! Payloads are returned as `serde_json::Value`.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use common::NicehashEnvironment;
//! use nicehash_rest::NicehashRestClient;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let client = NicehashRestClient::with_environment(credentials, NicehashEnvironment::Test)?;
//!
//! // Required before any signed call
//! client.sync_time().await?;
//!
//! let accounts = client.get_accounts().await?;
//! ```

mod client;
mod error;
mod responses;

pub use client::{NicehashRestClient, DEFAULT_LOCALE};
pub use error::NicehashRestError;
pub use responses::ServerTimeResponse;
