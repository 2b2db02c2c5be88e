//! Bracket market orders through the Alpaca trading API.

use async_trait::async_trait;
use market_data_ingestor::providers::alpaca_rest::AlpacaCredentials;
use reqwest::{Client, header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{ExecutionError, ExecutionReport, OrderExecutor, validate_intent};
use crate::{analysis::TradeSide, decision::OrderIntent};

const PAPER_BASE_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_BASE_URL: &str = "https://api.alpaca.markets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingEnvironment {
    #[default]
    Paper,
    Live,
}

impl TradingEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            TradingEnvironment::Paper => PAPER_BASE_URL,
            TradingEnvironment::Live => LIVE_BASE_URL,
        }
    }
}

#[derive(Debug, Serialize)]
struct TakeProfit {
    limit_price: String,
}

#[derive(Debug, Serialize)]
struct StopLoss {
    stop_price: String,
}

#[derive(Debug, Serialize)]
struct BracketOrderRequest<'a> {
    symbol: &'a str,
    qty: String,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: &'static str,
    time_in_force: &'static str,
    order_class: &'static str,
    take_profit: TakeProfit,
    stop_loss: StopLoss,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
}

/// Alpaca takes 4 decimals below $1 and 2 at or above it.
fn format_price(price: f64) -> String {
    if price < 1.0 {
        format!("{price:.4}")
    } else {
        format!("{price:.2}")
    }
}

impl<'a> BracketOrderRequest<'a> {
    fn from_intent(intent: &'a OrderIntent) -> Self {
        Self {
            symbol: &intent.symbol,
            qty: intent.volume.to_string(),
            side: match intent.side {
                TradeSide::Buy => "buy",
                TradeSide::Sell => "sell",
            },
            order_type: "market",
            time_in_force: "gtc",
            order_class: "bracket",
            take_profit: TakeProfit {
                limit_price: format_price(intent.take_profit),
            },
            stop_loss: StopLoss {
                stop_price: format_price(intent.stop_loss),
            },
        }
    }
}

pub struct AlpacaOrderExecutor {
    client: Client,
    orders_url: String,
}

impl AlpacaOrderExecutor {
    pub fn new(
        credentials: &AlpacaCredentials,
        environment: TradingEnvironment,
    ) -> Result<Self, ExecutionError> {
        Self::with_base_url(credentials, environment.base_url())
    }

    pub fn with_base_url(
        credentials: &AlpacaCredentials,
        base_url: &str,
    ) -> Result<Self, ExecutionError> {
        let mut headers = header::HeaderMap::new();
        for (name, secret) in [
            ("APCA-API-KEY-ID", &credentials.key_id),
            ("APCA-API-SECRET-KEY", &credentials.secret_key),
        ] {
            let mut value = header::HeaderValue::from_str(secret.expose_secret())
                .map_err(|e| ExecutionError::Setup(format!("{name}: {e}")))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            orders_url: format!("{}/v2/orders", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl OrderExecutor for AlpacaOrderExecutor {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn submit(&self, intent: &OrderIntent) -> Result<ExecutionReport, ExecutionError> {
        validate_intent(intent)?;

        let response = self
            .client
            .post(&self.orders_url)
            .json(&BracketOrderRequest::from_intent(intent))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ExecutionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: OrderResponse = response.json().await?;
        tracing::info!(order_id = %order.id, symbol = %intent.symbol, "alpaca order accepted");
        Ok(ExecutionReport {
            success: true,
            broker_order_id: Some(order.id),
        })
    }
}
