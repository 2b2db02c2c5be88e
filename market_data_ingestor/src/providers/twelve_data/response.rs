use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::bar::Bar;

/// Raw `time_series` body. Success and error bodies share the endpoint, so
/// everything except `status` is optional.
#[derive(Deserialize, Debug)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<TwelveDataValue>>,
}

/// One row of `values`. TwelveData sends every number as a string.
#[derive(Deserialize, Debug)]
pub struct TwelveDataValue {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    /// Absent for forex and some indices.
    #[serde(default)]
    pub volume: Option<String>,
}

/// Why a body could not be turned into bars.
#[derive(Debug, PartialEq)]
pub enum TimeSeriesProblem {
    /// `status = "error"`; carries the vendor's code and message.
    Api(String),
    /// A row had an unparseable number or timestamp.
    Decode(String),
}

impl TimeSeriesResponse {
    /// Convert the body into bars in vendor order (newest first). A body with
    /// no `values` is an empty series.
    pub fn into_bars(self) -> Result<Vec<Bar>, TimeSeriesProblem> {
        if self.status.as_deref() == Some("error") {
            return Err(TimeSeriesProblem::Api(format!(
                "{}: {}",
                self.code.unwrap_or_default(),
                self.message.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        self.values
            .unwrap_or_default()
            .into_iter()
            .map(TwelveDataValue::into_bar)
            .collect()
    }
}

impl TwelveDataValue {
    fn into_bar(self) -> Result<Bar, TimeSeriesProblem> {
        let volume = match self.volume.as_deref() {
            Some(v) => number("volume", v)?,
            None => 0.0,
        };
        Ok(Bar::new(
            parse_datetime(&self.datetime)?,
            number("open", &self.open)?,
            number("high", &self.high)?,
            number("low", &self.low)?,
            number("close", &self.close)?,
            volume,
        ))
    }
}

fn number(field: &str, raw: &str) -> Result<f64, TimeSeriesProblem> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| TimeSeriesProblem::Decode(format!("{field} `{raw}` is not a number")))
}

/// Intraday rows look like `2025-01-02 15:31:00`, daily and slower rows like
/// `2025-01-02`. Requests ask for `timezone=UTC`.
fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, TimeSeriesProblem> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimeSeriesProblem::Decode(format!("datetime `{raw}` is not recognised")))
}
