use std::{fmt, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// Bar interval expressed as amount × unit (e.g. 5 × Minute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Result<Self, TimeFrameError> {
        Self::validate(amount, unit)?;
        Ok(Self { amount, unit })
    }

    pub fn minutes(amount: u32) -> Result<Self, TimeFrameError> {
        Self::new(amount, TimeFrameUnit::Minute)
    }

    pub fn hours(amount: u32) -> Result<Self, TimeFrameError> {
        Self::new(amount, TimeFrameUnit::Hour)
    }

    pub fn day() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Day,
        }
    }

    pub fn week() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Week,
        }
    }

    pub fn months(amount: u32) -> Result<Self, TimeFrameError> {
        Self::new(amount, TimeFrameUnit::Month)
    }

    fn validate(amount: u32, unit: TimeFrameUnit) -> Result<(), TimeFrameError> {
        match unit {
            TimeFrameUnit::Minute if !(1..=59).contains(&amount) => {
                Err(TimeFrameError::InvalidAmount {
                    unit,
                    message: "Minute units can only be used with amounts between 1-59.".into(),
                })
            }
            TimeFrameUnit::Hour if !(1..=23).contains(&amount) => {
                Err(TimeFrameError::InvalidAmount {
                    unit,
                    message: "Hour units can only be used with amounts 1-23".into(),
                })
            }
            TimeFrameUnit::Day | TimeFrameUnit::Week if amount != 1 => {
                Err(TimeFrameError::InvalidAmount {
                    unit,
                    message: "Day and Week units can only be used with amount 1".into(),
                })
            }
            TimeFrameUnit::Month if ![1, 2, 3, 6, 12].contains(&amount) => {
                Err(TimeFrameError::InvalidAmount {
                    unit,
                    message: "Month units can only be used with amount 1, 2, 3, 6 and 12".into(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Nominal length of one bar. Months count as 30 days; only used to size
    /// lookback windows, never for bucketing.
    pub fn approx_duration(&self) -> Duration {
        let amount = i64::from(self.amount);
        match self.unit {
            TimeFrameUnit::Minute => Duration::minutes(amount),
            TimeFrameUnit::Hour => Duration::hours(amount),
            TimeFrameUnit::Day => Duration::days(amount),
            TimeFrameUnit::Week => Duration::weeks(amount),
            TimeFrameUnit::Month => Duration::days(30 * amount),
        }
    }

    /// Alpaca market data notation (`5Min`, `1Hour`, `1Day`, `1Week`, `3Month`).
    pub fn to_alpaca(&self) -> String {
        let unit = match self.unit {
            TimeFrameUnit::Minute => "Min",
            TimeFrameUnit::Hour => "Hour",
            TimeFrameUnit::Day => "Day",
            TimeFrameUnit::Week => "Week",
            TimeFrameUnit::Month => "Month",
        };
        format!("{}{unit}", self.amount)
    }

    /// TwelveData `interval` notation (`5min`, `1h`, `1day`, `1week`, `1month`).
    pub fn to_twelve_data(&self) -> String {
        let unit = match self.unit {
            TimeFrameUnit::Minute => "min",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "day",
            TimeFrameUnit::Week => "week",
            TimeFrameUnit::Month => "month",
        };
        format!("{}{unit}", self.amount)
    }
}

/// Display/parse for config and CLI ergonomics.
///
/// Display uses the short form (`5m`, `1h`, `1D`, `1W`, `6M`). Parsing accepts
/// that form plus the long vendor spellings: `1min`, `15min`, `4h`, `1hour`,
/// `1d`, `1day`, `1week`, `1month`. A single `m` is minutes and a single `M`
/// is months; every other unit is case-insensitive.
impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TimeFrameError::InvalidInput {
                message: format!("timeframe `{s}` has no unit"),
            })?;
        let (digits, unit) = s.split_at(split);
        let amount: u32 = digits.parse().map_err(|_| TimeFrameError::InvalidInput {
            message: format!("timeframe `{s}` has no amount"),
        })?;

        let unit = match unit {
            "m" => TimeFrameUnit::Minute,
            "M" => TimeFrameUnit::Month,
            other => match other.to_ascii_lowercase().as_str() {
                "min" | "mins" | "minute" | "minutes" => TimeFrameUnit::Minute,
                "h" | "hr" | "hour" | "hours" => TimeFrameUnit::Hour,
                "d" | "day" | "days" => TimeFrameUnit::Day,
                "w" | "wk" | "week" | "weeks" => TimeFrameUnit::Week,
                "mo" | "month" | "months" => TimeFrameUnit::Month,
                _ => {
                    return Err(TimeFrameError::InvalidInput {
                        message: format!("Invalid timeframe unit: {unit}"),
                    });
                }
            },
        };
        Self::new(amount, unit)
    }
}

impl Serialize for TimeFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeFrame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
