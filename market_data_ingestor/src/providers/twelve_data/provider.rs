use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::{
    models::{
        bar::{Bar, normalize_bars},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, DecodeSnafu, MarketDataSource, ProviderError,
        ProviderInitError, ReqwestSnafu, ValidationSnafu,
        twelve_data::response::{TimeSeriesProblem, TimeSeriesResponse},
    },
};

const BASE_URL: &str = "https://api.twelvedata.com/time_series";

/// TwelveData caps `outputsize` at 5000 rows.
const MAX_OUTPUT_SIZE: u32 = 5000;

pub struct TwelveDataProvider {
    client: Client,
    api_key: SecretString,
}

impl TwelveDataProvider {
    pub fn new(api_key: SecretString) -> Result<Self, ProviderInitError> {
        let client = Client::builder().build().context(ClientBuildSnafu)?;
        Ok(Self { client, api_key })
    }

    fn validate(timeframe: &TimeFrame, count: u32) -> Result<(), ProviderError> {
        let supported = match timeframe.unit {
            TimeFrameUnit::Minute => [1, 5, 15, 30, 45].contains(&timeframe.amount),
            TimeFrameUnit::Hour => [1, 2, 4, 8].contains(&timeframe.amount),
            TimeFrameUnit::Day | TimeFrameUnit::Week => true,
            TimeFrameUnit::Month => timeframe.amount == 1,
        };
        if !supported {
            return ValidationSnafu {
                message: format!("TwelveData has no {} interval", timeframe.to_twelve_data()),
            }
            .fail();
        }
        if count == 0 || count > MAX_OUTPUT_SIZE {
            return ValidationSnafu {
                message: format!("outputsize must be within 1..={MAX_OUTPUT_SIZE}, got {count}"),
            }
            .fail();
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataSource for TwelveDataProvider {
    fn name(&self) -> &'static str {
        "twelve_data"
    }

    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        timeframe: &TimeFrame,
        count: u32,
    ) -> Result<Vec<Bar>, ProviderError> {
        Self::validate(timeframe, count)?;

        let query = [
            ("symbol", symbol.to_string()),
            ("interval", timeframe.to_twelve_data()),
            ("outputsize", count.to_string()),
            ("timezone", "UTC".to_string()),
            ("apikey", self.api_key.expose_secret().to_string()),
        ];

        let response = self
            .client
            .get(BASE_URL)
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

        let body = response
            .json::<TimeSeriesResponse>()
            .await
            .context(ReqwestSnafu)?;

        let bars = match body.into_bars() {
            Ok(bars) => bars,
            Err(TimeSeriesProblem::Api(message)) => return ApiSnafu { message }.fail(),
            Err(TimeSeriesProblem::Decode(message)) => return DecodeSnafu { message }.fail(),
        };

        tracing::debug!(symbol, bars = bars.len(), "twelve data bars fetched");
        Ok(normalize_bars(bars))
    }
}
