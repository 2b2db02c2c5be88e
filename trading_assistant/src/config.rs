//! Typed `trading_assistant.toml`.
//!
//! Every section and key except `trading.symbol` has a default. Unknown keys
//! are rejected so typos surface at startup instead of silently falling back.

use std::{path::Path, time::Duration};

use market_data_ingestor::{
    models::{asset::AssetClass, timeframe::TimeFrame},
    providers::alpaca_rest::Feed,
};
use serde::Deserialize;
use shared_utils::config::{ConfigError, load_toml, parse_toml};

use crate::{
    decision::DEFAULT_CONFIDENCE_THRESHOLD,
    engine::ChatBackend,
    execution::TradingEnvironment,
    indicators::WARMUP_BARS,
    trading_loop::TradingSettings,
};

pub const DEFAULT_CONFIG_PATH: &str = "trading_assistant.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub trading: TradingConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TradingConfig {
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: TimeFrame,
    #[serde(default = "default_bar_count")]
    pub bar_count: u32,
    #[serde(default = "default_fixed_volume")]
    pub fixed_volume: f64,
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    #[serde(default)]
    pub trend_check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataProviderKind {
    #[default]
    TwelveData,
    Alpaca,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketDataConfig {
    #[serde(default)]
    pub provider: MarketDataProviderKind,
    /// Env var holding the TwelveData key. Alpaca always uses the
    /// `APCA_API_KEY_ID`/`APCA_API_SECRET_KEY` pair.
    #[serde(default = "default_market_data_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub feed: Feed,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            provider: MarketDataProviderKind::default(),
            api_key_env: default_market_data_key_env(),
            feed: Feed::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_backend")]
    pub backend: ChatBackend,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer key variable; unset or empty means no auth header.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    #[default]
    Paper,
    Alpaca,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub broker: BrokerKind,
    /// Only read when `broker = "alpaca"`.
    #[serde(default)]
    pub environment: TradingEnvironment,
    #[serde(default)]
    pub journal_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_timeframe() -> TimeFrame {
    TradingSettings::default().timeframe
}

fn default_bar_count() -> u32 {
    100
}

fn default_fixed_volume() -> f64 {
    0.01
}

fn default_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_cycle_interval_secs() -> u64 {
    60
}

fn default_market_data_key_env() -> String {
    "TWELVE_DATA_API_KEY".to_string()
}

fn default_backend() -> ChatBackend {
    ChatBackend::Ollama
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "deepseek-r1:14b".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.trading;
        if t.symbol.trim().is_empty() {
            return Err(ConfigError::invalid("trading.symbol", "must not be empty"));
        }
        if !(0.0..=1.0).contains(&t.confidence_threshold) {
            return Err(ConfigError::invalid(
                "trading.confidence_threshold",
                format!("must be within [0, 1], got {}", t.confidence_threshold),
            ));
        }
        if !(t.fixed_volume.is_finite() && t.fixed_volume > 0.0) {
            return Err(ConfigError::invalid(
                "trading.fixed_volume",
                format!("must be positive, got {}", t.fixed_volume),
            ));
        }
        if (t.bar_count as usize) < WARMUP_BARS {
            return Err(ConfigError::invalid(
                "trading.bar_count",
                format!("must be at least {WARMUP_BARS}, got {}", t.bar_count),
            ));
        }
        if t.cycle_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "trading.cycle_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.execution.broker == BrokerKind::Alpaca {
            self.validate_bracket_orders()?;
        }
        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "engine.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Alpaca only takes bracket orders for whole-share equity quantities.
    fn validate_bracket_orders(&self) -> Result<(), ConfigError> {
        let t = &self.trading;
        if AssetClass::infer(t.symbol.trim()) == AssetClass::Crypto {
            return Err(ConfigError::invalid(
                "execution.broker",
                format!("alpaca bracket orders are not available for crypto pair {}", t.symbol),
            ));
        }
        if t.fixed_volume.fract() != 0.0 {
            return Err(ConfigError::invalid(
                "trading.fixed_volume",
                format!(
                    "alpaca bracket orders need a whole share quantity, got {}",
                    t.fixed_volume
                ),
            ));
        }
        Ok(())
    }

    pub fn trading_settings(&self) -> TradingSettings {
        let t = &self.trading;
        TradingSettings {
            symbol: t.symbol.trim().to_string(),
            timeframe: t.timeframe,
            bar_count: t.bar_count,
            fixed_volume: t.fixed_volume,
            cycle_interval: Duration::from_secs(t.cycle_interval_secs),
            trend_check: t.trend_check,
        }
    }
}
