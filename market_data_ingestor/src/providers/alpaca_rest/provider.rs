use async_trait::async_trait;
use chrono::{Duration, Utc};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use secrecy::ExposeSecret;
use snafu::ResultExt;

use crate::{
    models::{
        asset::AssetClass,
        bar::{Bar, normalize_bars},
        timeframe::TimeFrame,
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, InvalidApiKeySnafu, MarketDataSource, ProviderError,
        ProviderInitError, ReqwestSnafu, ValidationSnafu,
        alpaca_rest::{
            AlpacaCredentials,
            params::{AlpacaBarsParams, construct_params},
            response::AlpacaResponse,
        },
    },
};

const STOCK_BARS_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";
const CRYPTO_BARS_URL: &str = "https://data.alpaca.markets/v1beta3/crypto/us/bars";

/// Alpaca allows at most 10k bars per page.
const MAX_PAGE_LIMIT: u32 = 10_000;

pub struct AlpacaProvider {
    client: Client,
    limiter: DefaultDirectRateLimiter,
    params: AlpacaBarsParams,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider from an explicit key pair.
    ///
    /// Requests are throttled to the free-plan budget of 200 calls per minute.
    pub fn new(
        credentials: &AlpacaCredentials,
        params: AlpacaBarsParams,
    ) -> Result<Self, ProviderInitError> {
        let mut key_id = header::HeaderValue::from_str(credentials.key_id.expose_secret())
            .context(InvalidApiKeySnafu)?;
        key_id.set_sensitive(true);
        let mut secret = header::HeaderValue::from_str(credentials.secret_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        secret.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("APCA-API-KEY-ID", key_id);
        headers.insert("APCA-API-SECRET-KEY", secret);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            limiter: RateLimiter::direct(Quota::per_minute(nonzero!(200u32))),
            params,
        })
    }

    /// How far back to ask for data so `count` bars survive market closures,
    /// weekends and holidays.
    fn lookback(timeframe: &TimeFrame, count: u32) -> Duration {
        let span = timeframe.approx_duration() * i32::try_from(count).unwrap_or(i32::MAX);
        std::cmp::max(span * 4, Duration::days(7))
    }
}

#[async_trait]
impl MarketDataSource for AlpacaProvider {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        timeframe: &TimeFrame,
        count: u32,
    ) -> Result<Vec<Bar>, ProviderError> {
        if count == 0 {
            return ValidationSnafu {
                message: "bar count must be at least 1",
            }
            .fail();
        }

        let asset_class = AssetClass::infer(symbol);
        let url = match asset_class {
            AssetClass::UsEquity => STOCK_BARS_URL,
            AssetClass::Crypto => CRYPTO_BARS_URL,
        };
        let start = Utc::now() - Self::lookback(timeframe, count);

        let mut collected: Vec<Bar> = Vec::new();
        let mut next_page_token: Option<String> = None;

        // Newest first: stop as soon as enough bars are in hand.
        loop {
            let remaining = count.saturating_sub(collected.len() as u32);
            let query = construct_params(
                symbol,
                asset_class,
                timeframe,
                start,
                remaining.min(MAX_PAGE_LIMIT),
                &self.params,
                next_page_token.as_deref(),
            );

            self.limiter.until_ready().await;
            let response = self
                .client
                .get(url)
                .query(&query)
                .send()
                .await
                .context(ReqwestSnafu)?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    message: format!("{status}: {body}"),
                }
                .fail();
            }

            let page = response
                .json::<AlpacaResponse>()
                .await
                .context(ReqwestSnafu)?;

            if let Some(mut by_symbol) = page.bars {
                if let Some(bars) = by_symbol.shift_remove(symbol) {
                    collected.extend(bars.into_iter().map(Bar::from));
                }
            }

            match page.next_page_token {
                Some(token) if (collected.len() as u32) < count => next_page_token = Some(token),
                _ => break,
            }
        }

        collected.truncate(count as usize);
        tracing::debug!(symbol, bars = collected.len(), "alpaca bars fetched");
        Ok(normalize_bars(collected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_has_a_one_week_floor() {
        let tf = TimeFrame::minutes(1).unwrap();
        assert_eq!(AlpacaProvider::lookback(&tf, 100), Duration::days(7));
    }

    #[test]
    fn lookback_scales_with_daily_bars() {
        assert_eq!(
            AlpacaProvider::lookback(&TimeFrame::day(), 100),
            Duration::days(400)
        );
    }
}
