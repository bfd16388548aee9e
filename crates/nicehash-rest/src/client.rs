//! NiceHash REST API client.

use crate::error::NicehashRestError;
use crate::responses::ServerTimeResponse;
use auth::{ApiCredentials, Body, Query, QueryParams, RequestDescriptor, RequestSigner};
use common::NicehashEnvironment;
use rest_client::{Method, RestClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Request timeout for NiceHash API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Default value of the `X-User-Lang` header.
pub const DEFAULT_LOCALE: &str = "en";

const USER_AGENT: &str = "nicehash-rust-client";
const X_REQUEST_ID: &str = "X-Request-Id";
const X_USER_LANG: &str = "X-User-Lang";
const X_USER_AGENT: &str = "X-User-Agent";

/// NiceHash REST API client with authentication support.
pub struct NicehashRestClient {
    client: RestClient,
    credentials: ApiCredentials,
    locale: String,
    /// Offset between server clock and local clock (server - local).
    time_offset_ms: AtomicI64,
    time_synced: AtomicBool,
}

impl NicehashRestClient {
    /// Create a new NiceHash REST client for production.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials) -> Result<Self, NicehashRestError> {
        Self::with_environment(credentials, NicehashEnvironment::Production)
    }

    /// Create a new NiceHash REST client for a specific environment.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_environment(
        credentials: ApiCredentials,
        environment: NicehashEnvironment,
    ) -> Result<Self, NicehashRestError> {
        Self::with_base_url(credentials, environment.rest_base_url())
    }

    /// Create a new NiceHash REST client against an explicit host.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: ApiCredentials,
        base_url: &str,
    ) -> Result<Self, NicehashRestError> {
        let client = RestClient::new(base_url, REQUEST_TIMEOUT)?;

        Ok(Self {
            client,
            credentials,
            locale: DEFAULT_LOCALE.to_string(),
            time_offset_ms: AtomicI64::new(0),
            time_synced: AtomicBool::new(false),
        })
    }

    /// Set the locale sent in `X-User-Lang`.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Get the API key (for logging/debugging).
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Returns true once `sync_time` has succeeded.
    pub fn is_time_synced(&self) -> bool {
        self.time_synced.load(Ordering::Acquire)
    }

    /// Offset between the server clock and the local clock in milliseconds.
    pub fn time_offset_ms(&self) -> i64 {
        self.time_offset_ms.load(Ordering::Acquire)
    }

    /// Get the current server timestamp adjusted for time offset.
    pub fn server_timestamp_ms(&self) -> i64 {
        local_time_ms() + self.time_offset_ms()
    }

    // ========================================================================
    // Time Synchronization
    // ========================================================================

    /// Synchronize with NiceHash server time.
    ///
    /// GET /api/v2/time (public)
    ///
    /// Stores `serverTime - localTime` as the offset used for every signed
    /// request. Must be called before any authenticated call.
    pub async fn sync_time(&self) -> Result<ServerTimeResponse, NicehashRestError> {
        let before = Instant::now();
        let response: ServerTimeResponse = self.client.get("/api/v2/time", None).await?;
        let rtt = before.elapsed().as_millis() as u64;

        let local_time = local_time_ms();
        let offset = response.server_time - local_time;

        self.time_offset_ms.store(offset, Ordering::Release);
        self.time_synced.store(true, Ordering::Release);

        tracing::info!(
            server_time = response.server_time,
            local_time = local_time,
            offset_ms = offset,
            rtt_ms = rtt,
            "Time synchronized with NiceHash server"
        );

        Ok(response)
    }

    // ========================================================================
    // Request Envelope
    // ========================================================================

    /// Send a signed request.
    ///
    /// `path` may include an embedded query string; it is merged with
    /// `query` before signing. The body is transmitted exactly as signed.
    ///
    /// # Errors
    /// - `TimeNotSynchronized` if `sync_time` has not succeeded yet
    /// - `Auth` if the request cannot be signed (bad method or path)
    /// - `Api` / `Rest` for server and transport failures
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<Query>,
        body: Option<Body>,
    ) -> Result<T, NicehashRestError> {
        if !self.is_time_synced() {
            return Err(NicehashRestError::TimeNotSynchronized);
        }

        let mut descriptor = RequestDescriptor::new(method.as_str(), path);
        if let Some(query) = query {
            descriptor = descriptor.with_query(query);
        }
        if let Some(body) = body {
            descriptor = descriptor.with_body(body);
        }

        let timestamp = self.server_timestamp_ms().to_string();
        let signed = RequestSigner::new(&self.credentials).authenticate(&descriptor, &timestamp)?;

        let mut headers = signed.headers.pairs();
        headers.push((X_REQUEST_ID, signed.headers.nonce.as_str()));
        headers.push((X_USER_LANG, self.locale.as_str()));
        headers.push((X_USER_AGENT, USER_AGENT));

        tracing::debug!(
            method = %method,
            path = %signed.request.path,
            query = ?signed.request.query,
            nonce = %signed.headers.nonce,
            "Signed request"
        );

        let response = self
            .client
            .request(
                method,
                &signed.request.path,
                signed.request.query.as_deref(),
                signed.request.body.as_deref(),
                &headers,
            )
            .await?;

        Ok(response)
    }

    /// Signed GET.
    pub async fn get(&self, path: &str, query: Option<Query>) -> Result<Value, NicehashRestError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Signed POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, NicehashRestError> {
        let body = Body::json(body)?;
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// Signed PUT with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, NicehashRestError> {
        let body = Body::json(body)?;
        self.request(Method::PUT, path, None, Some(body)).await
    }

    /// Unsigned GET for public endpoints.
    async fn public_get(
        &self,
        path: &str,
        query: Option<QueryParams>,
    ) -> Result<Value, NicehashRestError> {
        let query = query.map(|q| q.encode());
        Ok(self.client.get(path, query.as_deref()).await?)
    }

    /// Signed DELETE.
    pub async fn delete(
        &self,
        path: &str,
        query: Option<Query>,
    ) -> Result<Value, NicehashRestError> {
        self.request(Method::DELETE, path, query, None).await
    }

    // ========================================================================
    // Public Endpoints
    // ========================================================================

    /// GET /main/api/v2/mining/algorithms
    pub async fn get_algorithms(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/mining/algorithms", None).await
    }

    /// GET /main/api/v2/public/simplemultialgo/info
    pub async fn get_multialgo_info(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/simplemultialgo/info", None)
            .await
    }

    /// GET /main/api/v2/public/currencies
    pub async fn get_currencies(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/currencies", None).await
    }

    /// Hashpower markets per algorithm.
    ///
    /// GET /main/api/v2/mining/markets/
    pub async fn get_markets(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/mining/markets/", None).await
    }

    /// GET /main/api/v2/public/stats/global/current/
    pub async fn get_current_global_stats(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/stats/global/current/", None)
            .await
    }

    /// GET /main/api/v2/public/stats/global/24h/
    pub async fn get_global_stats_24(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/stats/global/24h/", None)
            .await
    }

    /// Active hashpower orders of all users.
    ///
    /// GET /main/api/v2/public/orders/
    pub async fn get_active_orders(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/orders/", None).await
    }

    /// Order limits and prices per algorithm.
    ///
    /// GET /main/api/v2/public/buy/info/
    pub async fn buy_info(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/main/api/v2/public/buy/info/", None).await
    }

    /// GET /exchange/api/v2/info/status
    pub async fn get_exchange_info(&self) -> Result<Value, NicehashRestError> {
        self.public_get("/exchange/api/v2/info/status", None).await
    }

    /// GET /exchange/api/v2/orderbook
    pub async fn get_exchange_orderbook(
        &self,
        market: &str,
        limit: u32,
    ) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([("market", market.to_string()), ("limit", limit.to_string())]);

        tracing::debug!(market = %market, limit = limit, "Fetching order book");

        self.public_get("/exchange/api/v2/orderbook", Some(query)).await
    }

    /// Recent public trades of a market.
    ///
    /// GET /exchange/api/v2/trades
    pub async fn get_exchange_trades(&self, market: &str) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([("market", market)]);
        self.public_get("/exchange/api/v2/trades", Some(query)).await
    }

    /// Candlesticks between two epoch-second bounds; `resolution` in minutes.
    ///
    /// GET /exchange/api/v2/candlesticks
    pub async fn get_candlesticks(
        &self,
        market: &str,
        from_s: i64,
        to_s: i64,
        resolution: u32,
    ) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([
            ("market", market.to_string()),
            ("from", from_s.to_string()),
            ("to", to_s.to_string()),
            ("resolution", resolution.to_string()),
        ]);
        self.public_get("/exchange/api/v2/candlesticks", Some(query))
            .await
    }

    // ========================================================================
    // Accounting
    // ========================================================================

    /// GET /main/api/v2/accounting/accounts
    pub async fn get_accounts(&self) -> Result<Value, NicehashRestError> {
        self.get("/main/api/v2/accounting/accounts", None).await
    }

    /// GET /main/api/v2/accounting/account2/{currency}
    pub async fn get_account(&self, currency: &str) -> Result<Value, NicehashRestError> {
        self.get(&format!("/main/api/v2/accounting/account2/{currency}"), None)
            .await
    }

    // ========================================================================
    // Pools
    // ========================================================================

    /// Create a mining pool.
    ///
    /// POST /main/api/v2/pool
    pub async fn create_pool<B: Serialize + ?Sized>(
        &self,
        pool: &B,
    ) -> Result<Value, NicehashRestError> {
        let response = self.post("/main/api/v2/pool", pool).await?;
        tracing::info!(pool_id = %response["id"], "Pool created");
        Ok(response)
    }

    /// One page of the caller's pools.
    ///
    /// GET /main/api/v2/pools/
    pub async fn get_my_pools(&self, page: u32, size: u32) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([("page", page.to_string()), ("size", size.to_string())]);
        self.get("/main/api/v2/pools/", Some(query.into())).await
    }

    /// Delete a mining pool.
    ///
    /// DELETE /main/api/v2/pool/{id}
    pub async fn delete_pool(&self, pool_id: &str) -> Result<Value, NicehashRestError> {
        let response = self
            .delete(&format!("/main/api/v2/pool/{pool_id}"), None)
            .await?;
        tracing::info!(pool_id = %pool_id, "Pool deleted");
        Ok(response)
    }

    // ========================================================================
    // Hashpower Orders
    // ========================================================================

    /// The caller's active orders for an algorithm and market, newest first.
    ///
    /// GET /main/api/v2/hashpower/myOrders
    pub async fn get_my_active_orders(
        &self,
        algorithm: &str,
        market: &str,
        limit: u32,
    ) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([
            ("algorithm", algorithm.to_string()),
            ("status", "ACTIVE".to_string()),
            ("ts", self.server_timestamp_ms().to_string()),
            ("op", "LT".to_string()),
            ("limit", limit.to_string()),
            ("market", market.to_string()),
        ]);
        self.get("/main/api/v2/hashpower/myOrders", Some(query.into()))
            .await
    }

    /// Place a hashpower order.
    ///
    /// POST /main/api/v2/hashpower/order
    pub async fn create_hashpower_order<B: Serialize + ?Sized>(
        &self,
        order: &B,
    ) -> Result<Value, NicehashRestError> {
        let response = self.post("/main/api/v2/hashpower/order", order).await?;
        tracing::info!(order_id = %response["id"], "Hashpower order placed");
        Ok(response)
    }

    /// Change the price and speed limit of a hashpower order.
    ///
    /// POST /main/api/v2/hashpower/order/{id}/updatePriceAndLimit
    pub async fn update_price_and_limit<B: Serialize + ?Sized>(
        &self,
        order_id: &str,
        update: &B,
    ) -> Result<Value, NicehashRestError> {
        let path = format!("/main/api/v2/hashpower/order/{order_id}/updatePriceAndLimit");
        let response = self.post(&path, update).await?;
        tracing::info!(order_id = %order_id, "Hashpower order updated");
        Ok(response)
    }

    /// Add `amount` BTC to an order's budget.
    ///
    /// POST /main/api/v2/hashpower/order/{id}/refill/
    pub async fn refill_hashpower_order(
        &self,
        order_id: &str,
        amount: &str,
    ) -> Result<Value, NicehashRestError> {
        let path = format!("/main/api/v2/hashpower/order/{order_id}/refill/");
        let response = self.post(&path, &json!({ "amount": amount })).await?;
        tracing::info!(order_id = %order_id, amount = %amount, "Hashpower order refilled");
        Ok(response)
    }

    /// Change only the price of an order.
    ///
    /// `algorithm` is the algorithm's entry from [`Self::get_algorithms`]; its
    /// market factors are sent along with the price.
    pub async fn set_price_hashpower_order(
        &self,
        order_id: &str,
        price: &str,
        algorithm: &Value,
    ) -> Result<Value, NicehashRestError> {
        let update = json!({
            "marketFactor": algorithm["marketFactor"],
            "displayMarketFactor": algorithm["displayMarketFactor"],
            "price": price,
        });
        self.update_price_and_limit(order_id, &update).await
    }

    /// Change only the speed limit of an order.
    pub async fn set_limit_hashpower_order(
        &self,
        order_id: &str,
        limit: &str,
        algorithm: &Value,
    ) -> Result<Value, NicehashRestError> {
        let update = json!({
            "marketFactor": algorithm["marketFactor"],
            "displayMarketFactor": algorithm["displayMarketFactor"],
            "limit": limit,
        });
        self.update_price_and_limit(order_id, &update).await
    }

    /// Cancel a hashpower order.
    ///
    /// DELETE /main/api/v2/hashpower/order/{id}
    pub async fn cancel_hashpower_order(&self, order_id: &str) -> Result<Value, NicehashRestError> {
        let response = self
            .delete(&format!("/main/api/v2/hashpower/order/{order_id}"), None)
            .await?;
        tracing::info!(order_id = %order_id, "Hashpower order canceled");
        Ok(response)
    }

    // ========================================================================
    // Exchange Orders
    // ========================================================================

    /// Place an exchange order; parameters travel in the query string.
    ///
    /// POST /exchange/api/v2/order
    pub async fn create_exchange_order(
        &self,
        params: QueryParams,
    ) -> Result<Value, NicehashRestError> {
        tracing::info!(
            market = params.get("market").unwrap_or_default(),
            side = params.get("side").unwrap_or_default(),
            order_type = params.get("type").unwrap_or_default(),
            "Placing exchange order"
        );

        let response: Value = self
            .request(
                Method::POST,
                "/exchange/api/v2/order",
                Some(params.into()),
                None,
            )
            .await?;

        tracing::info!(order_id = %response["orderId"], "Exchange order placed");
        Ok(response)
    }

    /// Place a limit order.
    pub async fn create_exchange_limit_order(
        &self,
        market: &str,
        side: &str,
        quantity: &str,
        price: &str,
    ) -> Result<Value, NicehashRestError> {
        self.create_exchange_order(QueryParams::from([
            ("market", market),
            ("side", side),
            ("type", "limit"),
            ("quantity", quantity),
            ("price", price),
        ]))
        .await
    }

    /// Buy at market; `sec_quantity` is spent in the secondary currency.
    pub async fn create_exchange_buy_market_order(
        &self,
        market: &str,
        sec_quantity: &str,
    ) -> Result<Value, NicehashRestError> {
        self.create_exchange_order(QueryParams::from([
            ("market", market),
            ("side", "buy"),
            ("type", "market"),
            ("secQuantity", sec_quantity),
        ]))
        .await
    }

    /// Sell `quantity` of the primary currency at market.
    pub async fn create_exchange_sell_market_order(
        &self,
        market: &str,
        quantity: &str,
    ) -> Result<Value, NicehashRestError> {
        self.create_exchange_order(QueryParams::from([
            ("market", market),
            ("side", "sell"),
            ("type", "market"),
            ("quantity", quantity),
        ]))
        .await
    }

    /// GET /exchange/api/v2/myOrders
    pub async fn get_my_exchange_orders(&self, market: &str) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([("market", market)]);
        self.get("/exchange/api/v2/myOrders", Some(query.into())).await
    }

    /// GET /exchange/api/v2/myTrades
    pub async fn get_my_exchange_trades(&self, market: &str) -> Result<Value, NicehashRestError> {
        let query = QueryParams::from([("market", market)]);
        self.get("/exchange/api/v2/myTrades", Some(query.into())).await
    }

    /// Cancel an exchange order.
    ///
    /// DELETE /exchange/api/v2/order
    pub async fn cancel_exchange_order(
        &self,
        market: &str,
        order_id: &str,
    ) -> Result<Value, NicehashRestError> {
        let params = QueryParams::from([("market", market), ("orderId", order_id)]);
        let response = self
            .delete("/exchange/api/v2/order", Some(params.into()))
            .await?;
        tracing::info!(market = %market, order_id = %order_id, "Exchange order canceled");
        Ok(response)
    }
}

impl std::fmt::Debug for NicehashRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NicehashRestClient")
            .field("base_url", &self.client.base_url())
            .field("api_key", &self.credentials.api_key())
            .field("locale", &self.locale)
            .field("time_offset_ms", &self.time_offset_ms())
            .finish()
    }
}

fn local_time_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn credentials() -> ApiCredentials {
        ApiCredentials::new("AK".into(), "SECRET".into(), "ORG".into())
    }

    async fn synced_client(server: &mut ServerGuard) -> NicehashRestClient {
        let server_time = local_time_ms() + 3_600_000;
        server
            .mock("GET", "/api/v2/time")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "serverTime": server_time }).to_string())
            .create_async()
            .await;

        let client = NicehashRestClient::with_base_url(credentials(), &server.url()).unwrap();
        client.sync_time().await.unwrap();
        client
    }

    /// Respond with the authentication headers the server received.
    fn echo_auth_headers(request: &mockito::Request) -> Vec<u8> {
        let header = |name: &str| {
            request
                .header(name)
                .first()
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        json!({
            "time": header("x-time"),
            "nonce": header("x-nonce"),
            "auth": header("x-auth"),
            "requestId": header("x-request-id"),
            "target": request.path_and_query(),
        })
        .to_string()
        .into_bytes()
    }

    fn assert_signature(echo: &Value, request: RequestDescriptor) {
        let creds = credentials();
        let time = echo["time"].as_str().unwrap();
        let nonce = echo["nonce"].as_str().unwrap();
        let expected = RequestSigner::new(&creds).sign(&request, time, nonce).unwrap();
        assert_eq!(echo["auth"].as_str().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_sync_time_sets_offset() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        assert!(client.is_time_synced());
        let offset = client.time_offset_ms();
        assert!((3_595_000..=3_605_000).contains(&offset), "offset {offset}");

        let skew = client.server_timestamp_ms() - local_time_ms();
        assert!((3_595_000..=3_605_000).contains(&skew), "skew {skew}");
    }

    #[tokio::test]
    async fn test_signed_request_requires_time_sync() {
        // Nothing listens here; the call must fail before any I/O.
        let client = NicehashRestClient::with_base_url(credentials(), "http://127.0.0.1:9").unwrap();

        let err = client.get_accounts().await.unwrap_err();
        assert!(matches!(err, NicehashRestError::TimeNotSynchronized));
    }

    #[tokio::test]
    async fn test_signed_post_headers_and_signature() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await.with_locale("de");

        let pool = json!({
            "algorithm": "SCRYPT",
            "name": "my pool",
            "stratumPort": "3456",
        });

        let mock = server
            .mock("POST", "/main/api/v2/pool")
            .match_header("content-type", "application/json")
            .match_header("x-organization-id", "ORG")
            .match_header("x-user-lang", "de")
            .match_header("x-auth", Matcher::Regex("^AK:[0-9a-f]{64}$".into()))
            .match_header("x-time", Matcher::Regex(r"^\d+$".into()))
            .match_body(Matcher::Exact(pool.to_string()))
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        let echo = client.create_pool(&pool).await.unwrap();
        mock.assert_async().await;

        assert_eq!(echo["nonce"], echo["requestId"]);
        let time: i64 = echo["time"].as_str().unwrap().parse().unwrap();
        assert!((time - client.server_timestamp_ms()).abs() < 5_000);

        assert_signature(
            &echo,
            RequestDescriptor::new("POST", "/main/api/v2/pool")
                .with_body(Body::json(&pool).unwrap()),
        );
    }

    #[tokio::test]
    async fn test_cancel_exchange_order_signs_query() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let mock = server
            .mock("DELETE", "/exchange/api/v2/order")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("market".into(), "LTCBTC".into()),
                Matcher::UrlEncoded("orderId".into(), "o-1".into()),
            ]))
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        let echo = client.cancel_exchange_order("LTCBTC", "o-1").await.unwrap();
        mock.assert_async().await;

        assert_signature(
            &echo,
            RequestDescriptor::new("DELETE", "/exchange/api/v2/order?market=LTCBTC&orderId=o-1"),
        );
    }

    #[tokio::test]
    async fn test_embedded_path_query_sent_and_signed() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let mock = server
            .mock("GET", "/exchange/api/v2/orderbook")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("aa".into(), "1".into()),
                Matcher::UrlEncoded("market".into(), "LTCBTC".into()),
            ]))
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        let echo = client
            .get(
                "/exchange/api/v2/orderbook?aa=1",
                Some(QueryParams::from([("market", "LTCBTC")]).into()),
            )
            .await
            .unwrap();
        mock.assert_async().await;

        assert_signature(
            &echo,
            RequestDescriptor::new("GET", "/exchange/api/v2/orderbook").with_query("aa=1&market=LTCBTC"),
        );
    }

    #[tokio::test]
    async fn test_public_endpoint_unsigned() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/main/api/v2/mining/algorithms")
            .match_header("x-auth", Matcher::Missing)
            .match_header("x-nonce", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"miningAlgorithms":[{"algorithm":"SCRYPT"}]}"#)
            .create_async()
            .await;

        // Public endpoints work without a time sync.
        let client = NicehashRestClient::with_base_url(credentials(), &server.url()).unwrap();
        let response = client.get_algorithms().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response["miningAlgorithms"][0]["algorithm"], "SCRYPT");
    }

    #[tokio::test]
    async fn test_orderbook_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/exchange/api/v2/orderbook")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("market".into(), "LTCBTC".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"sell":[["0.01","2"]],"buy":[]}"#)
            .create_async()
            .await;

        let client = NicehashRestClient::with_base_url(credentials(), &server.url()).unwrap();
        let book = client.get_exchange_orderbook("LTCBTC", 100).await.unwrap();

        mock.assert_async().await;
        assert_eq!(book["sell"][0][0], "0.01");
    }

    #[tokio::test]
    async fn test_api_error_parsed() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        server
            .mock("DELETE", "/main/api/v2/hashpower/order/abc")
            .with_status(404)
            .with_body(r#"{"error_id":"x","errors":[{"code":5054,"message":"Order not found"}]}"#)
            .create_async()
            .await;

        let err = client.cancel_hashpower_order("abc").await.unwrap_err();
        match err {
            NicehashRestError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, 5054);
                assert_eq!(message, "Order not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_sending() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let err = client.delete_pool("bad id").await.unwrap_err();
        assert!(matches!(err, NicehashRestError::Auth(e) if e.is_invalid_input()));
    }

    #[tokio::test]
    async fn test_signed_target_matches_received_target() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        for target in [
            "/main/api/v2/mining/external/3Ab:x@y/rigs2/",
            "/main/api/v2/a.b/c?x=%20y&z=a/b?c",
            "/exchange/api/v2/trades?from=2019-01-01T00:00:00Z",
        ] {
            let echo = client.get(target, None).await.unwrap();
            assert_eq!(echo["target"], target);
            assert_signature(&echo, RequestDescriptor::new("GET", target));
        }
    }

    #[tokio::test]
    async fn test_rewritable_targets_rejected_before_sending() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        for target in [
            "/main/api/v2/x/../pool",
            "/main/api/v2/%2e%2e/pool",
            "/main/api/v2/./pool",
            "/a?k=1#frag",
        ] {
            let err = client.get(target, None).await.unwrap_err();
            assert!(
                matches!(&err, NicehashRestError::Auth(e) if e.is_invalid_input()),
                "{target}: {err:?}"
            );
        }

        let err = client
            .get("/a", Some(Query::from("k=1#frag")))
            .await
            .unwrap_err();
        assert!(matches!(err, NicehashRestError::Auth(_)));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_signed_put() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;
        let body = json!({"name": "rig"});

        let mock = server
            .mock("PUT", "/main/api/v2/mining/rig")
            .match_body(Matcher::Exact(body.to_string()))
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        let echo = client.put("/main/api/v2/mining/rig", &body).await.unwrap();
        mock.assert_async().await;

        assert_signature(
            &echo,
            RequestDescriptor::new("PUT", "/main/api/v2/mining/rig")
                .with_body(Body::json(&body).unwrap()),
        );
    }

    #[tokio::test]
    async fn test_public_endpoint_paths() {
        let mut server = Server::new_async().await;
        let client = NicehashRestClient::with_base_url(credentials(), &server.url()).unwrap();

        let paths = [
            "/main/api/v2/public/simplemultialgo/info",
            "/main/api/v2/public/currencies",
            "/main/api/v2/mining/markets/",
            "/main/api/v2/public/stats/global/current/",
            "/main/api/v2/public/stats/global/24h/",
            "/main/api/v2/public/orders/",
            "/main/api/v2/public/buy/info/",
            "/exchange/api/v2/info/status",
        ];
        let mut mocks = Vec::new();
        for path in paths {
            mocks.push(
                server
                    .mock("GET", path)
                    .match_header("x-auth", Matcher::Missing)
                    .with_status(200)
                    .with_body(json!({ "path": path }).to_string())
                    .create_async()
                    .await,
            );
        }

        let responses = [
            client.get_multialgo_info().await.unwrap(),
            client.get_currencies().await.unwrap(),
            client.get_markets().await.unwrap(),
            client.get_current_global_stats().await.unwrap(),
            client.get_global_stats_24().await.unwrap(),
            client.get_active_orders().await.unwrap(),
            client.buy_info().await.unwrap(),
            client.get_exchange_info().await.unwrap(),
        ];

        for (response, path) in responses.iter().zip(paths) {
            assert_eq!(response["path"], path);
        }
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_trades_and_candlesticks_queries() {
        let mut server = Server::new_async().await;
        let client = NicehashRestClient::with_base_url(credentials(), &server.url()).unwrap();

        let trades = server
            .mock("GET", "/exchange/api/v2/trades")
            .match_query(Matcher::UrlEncoded("market".into(), "LTCBTC".into()))
            .match_header("x-auth", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let candles = server
            .mock("GET", "/exchange/api/v2/candlesticks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("market".into(), "LTCBTC".into()),
                Matcher::UrlEncoded("from".into(), "1561896404".into()),
                Matcher::UrlEncoded("to".into(), "1567080464".into()),
                Matcher::UrlEncoded("resolution".into(), "60".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        client.get_exchange_trades("LTCBTC").await.unwrap();
        client
            .get_candlesticks("LTCBTC", 1561896404, 1567080464, 60)
            .await
            .unwrap();

        trades.assert_async().await;
        candles.assert_async().await;
    }

    #[tokio::test]
    async fn test_my_active_orders_signed_query() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let mock = server
            .mock("GET", "/main/api/v2/hashpower/myOrders")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("algorithm".into(), "X16R".into()),
                Matcher::UrlEncoded("status".into(), "ACTIVE".into()),
                Matcher::UrlEncoded("op".into(), "LT".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("market".into(), "EU".into()),
                Matcher::Regex(r"ts=\d+".into()),
            ]))
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body_from_request(echo_auth_headers)
            .create_async()
            .await;

        let echo = client.get_my_active_orders("X16R", "EU", 10).await.unwrap();
        mock.assert_async().await;

        let target = echo["target"].as_str().unwrap().to_string();
        assert_signature(&echo, RequestDescriptor::new("GET", target));
    }

    #[tokio::test]
    async fn test_private_listing_queries() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let pools = server
            .mock("GET", "/main/api/v2/pools/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "0".into()),
                Matcher::UrlEncoded("size".into(), "10".into()),
            ]))
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body(r#"{"list":[]}"#)
            .create_async()
            .await;
        let orders = server
            .mock("GET", "/exchange/api/v2/myOrders")
            .match_query(Matcher::UrlEncoded("market".into(), "LTCBTC".into()))
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let trades = server
            .mock("GET", "/exchange/api/v2/myTrades")
            .match_query(Matcher::UrlEncoded("market".into(), "LTCBTC".into()))
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let account = server
            .mock("GET", "/main/api/v2/accounting/account2/BTC")
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body(r#"{"currency":"BTC"}"#)
            .create_async()
            .await;

        client.get_my_pools(0, 10).await.unwrap();
        client.get_my_exchange_orders("LTCBTC").await.unwrap();
        client.get_my_exchange_trades("LTCBTC").await.unwrap();
        let btc = client.get_account("BTC").await.unwrap();

        pools.assert_async().await;
        orders.assert_async().await;
        trades.assert_async().await;
        account.assert_async().await;
        assert_eq!(btc["currency"], "BTC");
    }

    #[tokio::test]
    async fn test_hashpower_order_adjustments() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;
        let algorithm = json!({
            "algorithm": "X16R",
            "marketFactor": "1000000000000",
            "displayMarketFactor": "TH",
        });

        let refill = server
            .mock("POST", "/main/api/v2/hashpower/order/o-1/refill/")
            .match_body(Matcher::Json(json!({"amount": "0.005"})))
            .with_status(200)
            .with_body(r#"{"id":"o-1"}"#)
            .create_async()
            .await;
        let set_price = server
            .mock("POST", "/main/api/v2/hashpower/order/o-1/updatePriceAndLimit")
            .match_body(Matcher::Json(json!({
                "marketFactor": "1000000000000",
                "displayMarketFactor": "TH",
                "price": "0.234",
            })))
            .with_status(200)
            .with_body(r#"{"id":"o-1"}"#)
            .create_async()
            .await;
        let set_limit = server
            .mock("POST", "/main/api/v2/hashpower/order/o-1/updatePriceAndLimit")
            .match_body(Matcher::Json(json!({
                "marketFactor": "1000000000000",
                "displayMarketFactor": "TH",
                "limit": "2.12",
            })))
            .with_status(200)
            .with_body(r#"{"id":"o-1"}"#)
            .create_async()
            .await;

        client.refill_hashpower_order("o-1", "0.005").await.unwrap();
        client
            .set_price_hashpower_order("o-1", "0.234", &algorithm)
            .await
            .unwrap();
        client
            .set_limit_hashpower_order("o-1", "2.12", &algorithm)
            .await
            .unwrap();

        refill.assert_async().await;
        set_price.assert_async().await;
        set_limit.assert_async().await;
    }

    async fn mock_exchange_order(server: &mut ServerGuard, params: &[(&str, &str)]) -> mockito::Mock {
        let matchers = params
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect();
        server
            .mock("POST", "/exchange/api/v2/order")
            .match_query(Matcher::AllOf(matchers))
            .match_header("x-auth", Matcher::Regex("^AK:".into()))
            .with_status(200)
            .with_body(r#"{"orderId":"ex-1"}"#)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_exchange_order_kinds() {
        let mut server = Server::new_async().await;
        let client = synced_client(&mut server).await;

        let limit = mock_exchange_order(
            &mut server,
            &[("side", "sell"), ("type", "limit"), ("quantity", "10"), ("price", "0.1")],
        )
        .await;
        let market_buy = mock_exchange_order(
            &mut server,
            &[("side", "buy"), ("type", "market"), ("secQuantity", "0.1")],
        )
        .await;
        let market_sell = mock_exchange_order(
            &mut server,
            &[("side", "sell"), ("type", "market"), ("quantity", "0.2")],
        )
        .await;

        client
            .create_exchange_limit_order("LTCBTC", "sell", "10", "0.1")
            .await
            .unwrap();
        client
            .create_exchange_buy_market_order("LTCBTC", "0.1")
            .await
            .unwrap();
        let sold = client
            .create_exchange_sell_market_order("LTCBTC", "0.2")
            .await
            .unwrap();

        limit.assert_async().await;
        market_buy.assert_async().await;
        market_sell.assert_async().await;
        assert_eq!(sold["orderId"], "ex-1");
    }
}
