#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use market_data_ingestor::{
    models::{bar::Bar, timeframe::TimeFrame},
    providers::{ApiSnafu, MarketDataSource, ProviderError},
};
use trading_assistant::{
    decision::OrderIntent,
    engine::{EngineError, RecommendationEngine},
    execution::{ExecutionError, ExecutionReport, OrderExecutor},
    trading_loop::TradingSettings,
};

/// 60 one-minute closes rising linearly from 40000 to 40590.
pub fn linear_uptrend() -> Vec<Bar> {
    bars_from_closes(&(0..60).map(|i| 40_000.0 + 10.0 * i as f64).collect::<Vec<_>>())
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(start + Duration::minutes(i as i64), c, c + 5.0, c - 5.0, c, 3.0))
        .collect()
}

pub fn settings() -> TradingSettings {
    TradingSettings {
        symbol: "BTC/USD".into(),
        fixed_volume: 0.01,
        ..TradingSettings::default()
    }
}

/// Source that always returns the same bars, or always fails.
pub struct StaticSource {
    bars: Option<Vec<Bar>>,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(bars: Vec<Bar>) -> Arc<Self> {
        Arc::new(Self {
            bars: Some(bars),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            bars: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MarketDataSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_recent_bars(
        &self,
        _symbol: &str,
        _timeframe: &TimeFrame,
        _count: u32,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.bars {
            Some(bars) => Ok(bars.clone()),
            None => ApiSnafu {
                message: "vendor down",
            }
            .fail(),
        }
    }
}

/// Engine that replays canned answers and records the prompts it saw.
pub struct ScriptedEngine {
    recommendations: Mutex<VecDeque<Result<String, EngineError>>>,
    trends: Mutex<VecDeque<Result<String, EngineError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn answering(answer: &str) -> Arc<Self> {
        Self::with(vec![Ok(answer.to_string())], vec![])
    }

    pub fn with(
        recommendations: Vec<Result<String, EngineError>>,
        trends: Vec<Result<String, EngineError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            recommendations: Mutex::new(recommendations.into()),
            trends: Mutex::new(trends.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn next(
        &self,
        queue: &Mutex<VecDeque<Result<String, EngineError>>>,
        prompt: &str,
    ) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(EngineError::EmptyResponse))
    }
}

#[async_trait]
impl RecommendationEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_recommendation(&self, prompt: &str) -> Result<String, EngineError> {
        self.next(&self.recommendations, prompt)
    }

    async fn request_trend_analysis(&self, prompt: &str) -> Result<String, EngineError> {
        self.next(&self.trends, prompt)
    }
}

/// Broker that rejects everything.
pub struct RejectingExecutor {
    pub attempts: AtomicUsize,
}

impl RejectingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl OrderExecutor for RejectingExecutor {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn submit(&self, _intent: &OrderIntent) -> Result<ExecutionReport, ExecutionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ExecutionError::Rejected {
            status: 403,
            message: "insufficient buying power".into(),
        })
    }
}

pub fn analysis_json(recommendation: &str, confidence: f64) -> String {
    analysis_json_with_levels(recommendation, confidence, "40184.10000", "40995.90000")
}

/// Levels are passed as the text the prompt printed them with.
pub fn analysis_json_with_levels(
    recommendation: &str,
    confidence: f64,
    stop_loss: &str,
    take_profit: &str,
) -> String {
    format!(
        r#"{{"recommendation": "{recommendation}", "confidence": {confidence},
            "reasoning": "MACD above signal with rising averages",
            "risk_level": "MEDIO", "suggested_sl": {stop_loss}, "suggested_tp": {take_profit}}}"#
    )
}
