//! Generic REST client wrapper around reqwest.

use crate::error::RestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Generic REST client for making HTTP requests.
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "https://api2.nicehash.com")
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new REST client with default timeout.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a plain GET request with no extra headers.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<T, RestError> {
        self.request(Method::GET, path, query, None, &[]).await
    }

    /// Make a request and decode the JSON response.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Request path (e.g., "/api/v2/time")
    /// * `query` - Optional encoded query string (without leading '?'), sent as-is
    /// * `body` - Optional body, sent byte-for-byte as JSON
    /// * `headers` - Additional headers
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path, query);
        tracing::debug!(method = %method, url = %url, has_body = body.is_some(), "HTTP request");

        let mut request = self.client.request(method, &url);

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Build a full URL from path and optional query string.
    ///
    /// A present but empty query still produces a trailing `?` so the
    /// transmitted target matches what was signed.
    fn build_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.base_url, path, q),
            None => format!("{}{}", self.base_url, path),
        }
    }

    /// Handle HTTP response and deserialize JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, RestError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let json = if body.trim().is_empty() {
                "null"
            } else {
                body.as_str()
            };
            serde_json::from_str(json).map_err(|e| {
                tracing::warn!(body = %body, error = %e, "Failed to parse response");
                RestError::Parse(e.to_string())
            })
        } else {
            let body = response.text().await.unwrap_or_default();

            Err(RestError::HttpError {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
