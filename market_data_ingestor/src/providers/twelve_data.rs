//! TwelveData `time_series` REST source (`api.twelvedata.com`).

pub mod provider;
pub mod response;

pub use provider::TwelveDataProvider;
