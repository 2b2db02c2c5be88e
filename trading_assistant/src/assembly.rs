//! Startup wiring: config + environment secrets → a ready [`TradingLoop`].
//!
//! Every failure here is fatal. Clients are built once and shared by all
//! cycles.

use std::{sync::Arc, time::Duration};

use market_data_ingestor::providers::{
    MarketDataSource, ProviderInitError,
    alpaca_rest::{AlpacaBarsParams, AlpacaCredentials, AlpacaProvider},
    twelve_data::TwelveDataProvider,
};
use shared_utils::env::{MissingEnvVarError, get_optional_secret_var, get_secret_var};
use thiserror::Error;

use crate::{
    config::{AppConfig, BrokerKind, MarketDataProviderKind},
    decision::DecisionGate,
    engine::{ChatBackend, ChatEngine, ChatEngineConfig, EngineError, RecommendationEngine},
    execution::{AlpacaOrderExecutor, ExecutionError, OrderExecutor, PaperExecutor},
    journal::CycleJournal,
    trading_loop::TradingLoop,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    MissingSecret(#[from] MissingEnvVarError),

    #[error("could not create market data source: {0}")]
    MarketData(#[from] ProviderInitError),

    #[error("could not create recommendation engine: {0}")]
    Engine(#[from] EngineError),

    #[error("could not create order executor: {0}")]
    Executor(#[from] ExecutionError),
}

pub fn build_source(config: &AppConfig) -> Result<Arc<dyn MarketDataSource>, StartupError> {
    let md = &config.market_data;
    let source: Arc<dyn MarketDataSource> = match md.provider {
        MarketDataProviderKind::TwelveData => {
            Arc::new(TwelveDataProvider::new(get_secret_var(&md.api_key_env)?)?)
        }
        MarketDataProviderKind::Alpaca => {
            let credentials = AlpacaCredentials::from_env()?;
            Arc::new(AlpacaProvider::new(
                &credentials,
                AlpacaBarsParams { feed: md.feed },
            )?)
        }
    };
    Ok(source)
}

pub fn build_engine(config: &AppConfig) -> Result<Arc<dyn RecommendationEngine>, StartupError> {
    let e = &config.engine;
    let api_key = match (&e.api_key_env, e.backend) {
        (Some(var), _) => get_optional_secret_var(var),
        (None, ChatBackend::OpenAiCompatible) => get_optional_secret_var("OPENAI_API_KEY"),
        (None, ChatBackend::Ollama) => None,
    };
    if e.backend == ChatBackend::OpenAiCompatible && api_key.is_none() {
        tracing::warn!(
            base_url = %e.base_url,
            "no API key for the openai backend; sending unauthenticated requests"
        );
    }

    let engine = ChatEngine::new(ChatEngineConfig {
        backend: e.backend,
        base_url: e.base_url.clone(),
        model: e.model.clone(),
        api_key,
        timeout: Duration::from_secs(e.timeout_secs),
        temperature: e.temperature,
    })?;
    Ok(Arc::new(engine))
}

pub fn build_executor(config: &AppConfig) -> Result<Arc<dyn OrderExecutor>, StartupError> {
    let executor: Arc<dyn OrderExecutor> = match config.execution.broker {
        BrokerKind::Paper => Arc::new(PaperExecutor::new()),
        BrokerKind::Alpaca => {
            let credentials = AlpacaCredentials::from_env()?;
            Arc::new(AlpacaOrderExecutor::new(
                &credentials,
                config.execution.environment,
            )?)
        }
    };
    Ok(executor)
}

pub fn build_trading_loop(config: &AppConfig) -> Result<TradingLoop, StartupError> {
    let source = build_source(config)?;
    let engine = build_engine(config)?;
    let executor = build_executor(config)?;

    tracing::info!(
        source = source.name(),
        engine = engine.name(),
        executor = executor.name(),
        "components ready"
    );

    let mut trading_loop = TradingLoop::new(config.trading_settings(), source, engine, executor)
        .with_gate(DecisionGate::new(config.trading.confidence_threshold));
    if let Some(path) = &config.execution.journal_path {
        trading_loop = trading_loop.with_journal(CycleJournal::new(path));
    }
    Ok(trading_loop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_and_ollama_need_no_secrets() {
        let config = AppConfig::from_toml_str("[trading]\nsymbol = \"AAPL\"\n").unwrap();
        assert_eq!(build_executor(&config).unwrap().name(), "paper");
        assert_eq!(build_engine(&config).unwrap().name(), "deepseek-r1:14b");
    }

    #[test]
    fn missing_market_data_key_is_fatal() {
        let config = AppConfig::from_toml_str(
            "[trading]\nsymbol = \"AAPL\"\n[market_data]\napi_key_env = \"TRADING_ASSISTANT_TEST_UNSET_KEY\"\n",
        )
        .unwrap();
        assert!(matches!(
            build_source(&config),
            Err(StartupError::MissingSecret(_))
        ));
    }
}
