//! Market data models and vendor sources for the trading assistant.
//!
//! * [`models`]: the canonical [`Bar`](models::bar::Bar), [`TimeFrame`](models::timeframe::TimeFrame)
//!   and [`AssetClass`](models::asset::AssetClass) types.
//! * [`providers`]: the [`MarketDataSource`](providers::MarketDataSource) trait plus the
//!   Alpaca and TwelveData REST implementations.

pub mod models;
pub mod providers;
