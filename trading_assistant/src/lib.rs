//! LLM-assisted trading signal pipeline.
//!
//! Each cycle pulls recent bars from a
//! [`MarketDataSource`](market_data_ingestor::providers::MarketDataSource),
//! enriches them with SMA/RSI/MACD ([`indicators`]), renders the newest row
//! into a prompt ([`snapshot`], [`prompt`]), asks a
//! [`RecommendationEngine`](engine::RecommendationEngine), decodes the answer
//! ([`analysis`]), applies the confidence gate ([`decision`]) and hands any
//! resulting order to an [`OrderExecutor`](execution::OrderExecutor).
//! [`trading_loop`] drives the cycle; [`assembly`] wires it from [`config`].

pub mod analysis;
pub mod assembly;
pub mod config;
pub mod decision;
pub mod engine;
pub mod execution;
pub mod indicators;
pub mod journal;
pub mod prompt;
pub mod snapshot;
pub mod trading_loop;
