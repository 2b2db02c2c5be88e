use std::io::Write;

use shared_utils::config::ConfigError;
use trading_assistant::{
    config::{AppConfig, BrokerKind, MarketDataProviderKind},
    engine::ChatBackend,
};

#[test]
fn sample_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/trading_assistant.toml");
    let config = AppConfig::load(path).unwrap();

    assert_eq!(config.trading.symbol, "BTC/USD");
    assert_eq!(config.trading.timeframe.to_string(), "1m");
    assert_eq!(config.market_data.provider, MarketDataProviderKind::TwelveData);
    assert_eq!(config.engine.backend, ChatBackend::Ollama);
    assert_eq!(config.execution.broker, BrokerKind::Paper);
    assert_eq!(
        config.execution.journal_path.as_deref(),
        Some("cycle_outcomes.jsonl")
    );
}

#[test]
fn file_values_are_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[trading]\nsymbol = \"AAPL\"\nconfidence_threshold = -0.5").unwrap();

    match AppConfig::load(file.path()) {
        Err(ConfigError::Invalid { field, .. }) => {
            assert_eq!(field, "trading.confidence_threshold")
        }
        other => panic!("expected invalid threshold, got {other:?}"),
    }
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AppConfig::load(dir.path().join("absent.toml")),
        Err(ConfigError::Read { .. })
    ));
}
