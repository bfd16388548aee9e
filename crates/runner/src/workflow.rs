//! Sample workflows against the NiceHash API.
//!
//! Each workflow is a fixed sequence of steps. A step runs only if every
//! earlier step succeeded; the first error ends the workflow.

use crate::config::{ExchangeConfig, HashpowerConfig};
use crate::error::WorkflowError;
use nicehash_rest::NicehashRestClient;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, info};

/// Workflow selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Pool and hashpower order lifecycle.
    Hashpower,
    /// Exchange limit order lifecycle.
    Exchange,
}

impl FromStr for Workflow {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashpower" => Ok(Self::Hashpower),
            "exchange" => Ok(Self::Exchange),
            _ => Err(WorkflowError::UnknownWorkflow(s.to_string())),
        }
    }
}

/// Ids created by the hashpower workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashpowerOutcome {
    pub pool_id: String,
    pub order_id: String,
}

/// Market and id of the order placed by the exchange workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub market: String,
    pub order_id: String,
}

/// Create a pool, place a hashpower order on it, amend the order, then
/// cancel the order and delete the pool.
pub async fn run_hashpower(
    client: &NicehashRestClient,
    config: &HashpowerConfig,
) -> Result<HashpowerOutcome, WorkflowError> {
    // Server time (required before any signed call)
    let time = client.sync_time().await?;
    info!(server_time = time.server_time, "Server time");

    // Algorithm settings
    let algorithms = client.get_algorithms().await?;
    let algo = find_algorithm(&algorithms, &config.algorithm)?;
    let market_factor = field(algo, "marketFactor")?.clone();
    let display_market_factor = field(algo, "displayMarketFactor")?.clone();
    let min_speed_limit = field(algo, "minSpeedLimit")?.clone();
    debug!(algorithm = %algo, "Algorithm settings");

    // Create pool
    let pool = client
        .create_pool(&json!({
            "algorithm": config.algorithm,
            "name": config.pool_name,
            "username": config.pool_username,
            "password": config.pool_password,
            "stratumHostname": config.stratum_hostname,
            "stratumPort": config.stratum_port.to_string(),
        }))
        .await?;
    let pool_id = id_field(&pool, "id")?;
    debug!(pool = %pool, "New pool");

    // Create order
    let order = client
        .create_hashpower_order(&json!({
            "algorithm": config.algorithm,
            "amount": config.amount.to_string(),
            "displayMarketFactor": display_market_factor,
            "limit": min_speed_limit,
            "market": config.market,
            "marketFactor": market_factor,
            "poolId": pool_id,
            "price": config.price.to_string(),
            "type": "STANDARD",
        }))
        .await?;
    let order_id = id_field(&order, "id")?;
    debug!(order = %order, "New order");

    // Update order price and limit
    let updated = client
        .update_price_and_limit(
            &order_id,
            &json!({
                "displayMarketFactor": display_market_factor,
                "marketFactor": market_factor,
                "limit": config.updated_limit.to_string(),
                "price": config.updated_price.to_string(),
            }),
        )
        .await?;
    debug!(order = %updated, "Updated order");

    // Cancel order
    let canceled = client.cancel_hashpower_order(&order_id).await?;
    debug!(response = %canceled, "Canceled order");

    // Delete pool
    let deleted = client.delete_pool(&pool_id).await?;
    debug!(response = %deleted, "Deleted pool");

    Ok(HashpowerOutcome { pool_id, order_id })
}

/// Place a limit buy at the best ask of a market, then cancel it.
pub async fn run_exchange(
    client: &NicehashRestClient,
    config: &ExchangeConfig,
) -> Result<ExchangeOutcome, WorkflowError> {
    // Server time (required before any signed call)
    let time = client.sync_time().await?;
    info!(server_time = time.server_time, "Server time");

    // Exchange settings
    let exchange_info = client.get_exchange_info().await?;
    let symbols = exchange_info["symbols"]
        .as_array()
        .ok_or(WorkflowError::MissingField("symbols"))?;
    let market = match &config.market {
        Some(wanted) => symbols.iter().find(|s| s["symbol"] == wanted.as_str()),
        None => symbols.first(),
    }
    .ok_or(WorkflowError::MissingField("symbols"))?;
    let symbol = field(market, "symbol")?
        .as_str()
        .ok_or(WorkflowError::MissingField("symbol"))?
        .to_string();
    let min_amount = decimal_field(market, "secMinAmount")?;
    info!(market = %symbol, min_amount = %min_amount, "Exchange market");

    // Balances
    let accounts = client.get_accounts().await?;
    debug!(accounts = %accounts, "Accounts");

    // Order book
    let book = client
        .get_exchange_orderbook(&symbol, config.orderbook_limit)
        .await?;
    let best_ask = book["sell"]
        .get(0)
        .and_then(|level| level.get(0))
        .ok_or(WorkflowError::MissingField("sell"))
        .and_then(|price| to_decimal("sell", price))?;
    info!(market = %symbol, best_ask = %best_ask, "Order book");

    // Buy with limit order
    let quantity = (min_amount * config.quantity_multiplier).normalize();
    let order = client
        .create_exchange_limit_order(
            &symbol,
            "buy",
            &quantity.to_string(),
            &best_ask.to_string(),
        )
        .await?;
    let order_id = id_field(&order, "orderId")?;
    debug!(order = %order, "New order");

    // Cancel order
    let canceled = client.cancel_exchange_order(&symbol, &order_id).await?;
    debug!(response = %canceled, "Canceled order");

    Ok(ExchangeOutcome {
        market: symbol,
        order_id,
    })
}

fn find_algorithm<'a>(algorithms: &'a Value, name: &str) -> Result<&'a Value, WorkflowError> {
    algorithms["miningAlgorithms"]
        .as_array()
        .and_then(|list| {
            list.iter().find(|a| {
                a["algorithm"]
                    .as_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
        })
        .ok_or(WorkflowError::MissingField("miningAlgorithms"))
}

fn field<'a>(value: &'a Value, name: &'static str) -> Result<&'a Value, WorkflowError> {
    match value.get(name) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(WorkflowError::MissingField(name)),
    }
}

/// Read an id that the API may return as a string or a number.
fn id_field(value: &Value, name: &'static str) -> Result<String, WorkflowError> {
    match field(value, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(WorkflowError::MissingField(name)),
    }
}

fn decimal_field(value: &Value, name: &'static str) -> Result<Decimal, WorkflowError> {
    to_decimal(name, field(value, name)?)
}

fn to_decimal(name: &'static str, value: &Value) -> Result<Decimal, WorkflowError> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| WorkflowError::InvalidDecimal {
            field: name,
            value: raw,
        })
}
