use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{asset::AssetClass, timeframe::TimeFrame};

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Sip,
    #[default]
    Iex,
    Otc,
}

impl Feed {
    fn as_str(&self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Alpaca-specific knobs for a recent-bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    /// Stock feed; ignored for crypto. Free accounts only get `iex`.
    #[serde(default)]
    pub feed: Feed,
}

/// Build the query string for one page of a newest-first bars request.
pub(crate) fn construct_params(
    symbol: &str,
    asset_class: AssetClass,
    timeframe: &TimeFrame,
    start: DateTime<Utc>,
    limit: u32,
    extra: &AlpacaBarsParams,
    page_token: Option<&str>,
) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbols".to_string(), symbol.to_string()),
        ("timeframe".to_string(), timeframe.to_alpaca()),
        (
            "start".to_string(),
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        ("limit".to_string(), limit.to_string()),
        ("sort".to_string(), "desc".to_string()),
    ];
    if asset_class == AssetClass::UsEquity {
        query.push(("feed".to_string(), extra.feed.as_str().to_string()));
    }
    if let Some(token) = page_token {
        query.push(("page_token".to_string(), token.to_string()));
    }
    query
}
