//! Provider abstraction for market data sources.
//!
//! This module defines the [`MarketDataSource`] trait, the single interface the
//! trading pipeline uses to pull recent OHLCV bars from a vendor (Alpaca,
//! TwelveData, or a test double).
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`Box<dyn MarketDataSource>`) so the vendor can be picked from configuration
//! at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{bar::Bar, timeframe::TimeFrame};
//! use market_data_ingestor::providers::{MarketDataSource, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl MarketDataSource for MyProvider {
//!     fn name(&self) -> &'static str {
//!         "mine"
//!     }
//!
//!     async fn fetch_recent_bars(
//!         &self,
//!         _symbol: &str,
//!         _timeframe: &TimeFrame,
//!         _count: u32,
//!     ) -> Result<Vec<Bar>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod twelve_data;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::Bar, timeframe::TimeFrame};

/// Trait for fetching the most recent bars of one symbol.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short vendor name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches up to `count` of the most recent bars for `symbol`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Bar>)` - chronological, one bar per timestamp. Empty (not an
    ///   error) when the vendor has no data for the window.
    /// * `Err(ProviderError)` - transport, API or validation failure.
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        timeframe: &TimeFrame,
        count: u32,
    ) -> Result<Vec<Bar>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `MarketDataSource` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., invalid API key).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded into bars.
    #[snafu(display("Malformed provider response: {message}"))]
    Decode {
        message: String,
        backtrace: Backtrace,
    },
}
