//! The periodic fetch → enrich → ask → decide → execute cycle.
//!
//! A cycle walks the stages in [`Stage`] order. Any failure ends the cycle
//! early with a [`CycleOutcome::Skipped`] naming the failing stage; the loop
//! itself never stops on a cycle failure. Only an external shutdown signal
//! ends [`TradingLoop::run`], and it is honoured between cycles.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use market_data_ingestor::{
    models::timeframe::{TimeFrame, TimeFrameUnit},
    providers::MarketDataSource,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::Instrument;

use crate::{
    analysis::{self, Analysis, SchemaError, TrendAnalysis},
    decision::{DecisionGate, OrderIntent},
    engine::{EngineError, RecommendationEngine},
    execution::{ExecutionError, ExecutionReport, OrderExecutor},
    indicators::{self, EnrichedBar, WARMUP_BARS},
    journal::CycleJournal,
    prompt,
    snapshot::{self, TrendSnapshot},
};

pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Fetching,
    Enriching,
    Snapshotting,
    RequestingAnalysis,
    Parsing,
    Deciding,
    Executing,
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("no market data for {symbol}: {detail}")]
    DataUnavailable { symbol: String, detail: String },

    #[error("{bars} bars are not enough to warm up the indicators (need {required})")]
    IndicatorWarmupIncomplete { bars: usize, required: usize },

    #[error(transparent)]
    EngineCallFailure(#[from] EngineError),

    #[error(transparent)]
    SchemaError(#[from] SchemaError),

    #[error(transparent)]
    ExecutionFailure(#[from] ExecutionError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::DataUnavailable { .. } => Stage::Fetching,
            CycleError::IndicatorWarmupIncomplete { .. } => Stage::Enriching,
            CycleError::EngineCallFailure(_) => Stage::RequestingAnalysis,
            CycleError::SchemaError(_) => Stage::Parsing,
            CycleError::ExecutionFailure(_) => Stage::Executing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Skipped { stage: Stage, error: String },
    NoAction { reason: String },
    Submitted { intent: OrderIntent, report: ExecutionReport },
}

/// Everything one cycle produced. Journaled and printed by `once`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_started_at: DateTime<Utc>,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendAnalysis>,
    pub outcome: CycleOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradingSettings {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub bar_count: u32,
    pub fixed_volume: f64,
    pub cycle_interval: Duration,
    /// Also ask for a trend-change reading each cycle. Informational only.
    pub trend_check: bool,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            symbol: "BTC/USD".to_string(),
            timeframe: TimeFrame {
                amount: 1,
                unit: TimeFrameUnit::Minute,
            },
            bar_count: 100,
            fixed_volume: 0.01,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            trend_check: false,
        }
    }
}

pub struct TradingLoop {
    settings: TradingSettings,
    source: Arc<dyn MarketDataSource>,
    engine: Arc<dyn RecommendationEngine>,
    executor: Arc<dyn OrderExecutor>,
    gate: DecisionGate,
    journal: Option<CycleJournal>,
}

/// Partial results a cycle keeps even when a later stage fails.
#[derive(Default)]
struct CycleFindings {
    analysis: Option<Analysis>,
    trend: Option<TrendAnalysis>,
}

impl TradingLoop {
    pub fn new(
        settings: TradingSettings,
        source: Arc<dyn MarketDataSource>,
        engine: Arc<dyn RecommendationEngine>,
        executor: Arc<dyn OrderExecutor>,
    ) -> Self {
        Self {
            settings,
            source,
            engine,
            executor,
            gate: DecisionGate::default(),
            journal: None,
        }
    }

    pub fn with_gate(mut self, gate: DecisionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_journal(mut self, journal: CycleJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn settings(&self) -> &TradingSettings {
        &self.settings
    }

    /// Runs one full cycle. Never fails: problems end up in the outcome.
    pub async fn run_cycle(&self) -> CycleReport {
        let started = Utc::now();
        let span = tracing::info_span!(
            "cycle",
            symbol = %self.settings.symbol,
            cycle_started_at = %started.to_rfc3339()
        );

        async {
            let mut findings = CycleFindings::default();
            let outcome = match self.execute_cycle(&mut findings).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    let stage = err.stage();
                    if stage == Stage::Executing {
                        tracing::error!(?stage, error = %err, "order execution failed");
                    } else {
                        tracing::warn!(?stage, error = %err, "cycle skipped");
                    }
                    CycleOutcome::Skipped {
                        stage,
                        error: err.to_string(),
                    }
                }
            };
            tracing::debug!(stage = ?Stage::Idle, "cycle finished");

            let report = CycleReport {
                cycle_started_at: started,
                symbol: self.settings.symbol.clone(),
                analysis: findings.analysis,
                trend: findings.trend,
                outcome,
            };
            if let Some(journal) = &self.journal {
                if let Err(err) = journal.append(&report).await {
                    tracing::warn!(error = %err, "could not journal cycle outcome");
                }
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn execute_cycle(
        &self,
        findings: &mut CycleFindings,
    ) -> Result<CycleOutcome, CycleError> {
        let symbol = self.settings.symbol.as_str();
        let enriched = self.fetch_enriched().await?;

        tracing::debug!(stage = ?Stage::Snapshotting);
        let snap = snapshot::build_snapshot(&enriched, symbol).map_err(|_| {
            CycleError::IndicatorWarmupIncomplete {
                bars: 0,
                required: WARMUP_BARS,
            }
        })?;

        if self.settings.trend_check {
            findings.trend = self.trend_check(&enriched).await;
        }

        tracing::debug!(stage = ?Stage::RequestingAnalysis);
        let request = prompt::recommendation_prompt(&snap);
        tracing::debug!(prompt = %request, "recommendation prompt");
        let raw = self.engine.request_recommendation(&request).await?;

        tracing::debug!(stage = ?Stage::Parsing);
        let analysis = analysis::parse_analysis(&raw)?;
        tracing::info!(
            recommendation = ?analysis.recommendation,
            confidence = analysis.confidence,
            risk = ?analysis.risk_level,
            "analysis received"
        );
        findings.analysis = Some(analysis.clone());

        tracing::debug!(stage = ?Stage::Deciding);
        let Some(intent) = self
            .gate
            .decide(&analysis, symbol, self.settings.fixed_volume)
        else {
            let reason = self.gate.explain_no_action(&analysis);
            tracing::info!(%reason, "no order this cycle");
            return Ok(CycleOutcome::NoAction { reason });
        };

        tracing::debug!(stage = ?Stage::Executing, executor = self.executor.name());
        let report = self.executor.submit(&intent).await?;
        tracing::info!(
            side = ?intent.side,
            volume = intent.volume,
            order_id = report.broker_order_id.as_deref().unwrap_or("-"),
            "order submitted"
        );
        Ok(CycleOutcome::Submitted { intent, report })
    }

    async fn fetch_enriched(&self) -> Result<Vec<EnrichedBar>, CycleError> {
        let symbol = self.settings.symbol.as_str();

        tracing::debug!(stage = ?Stage::Fetching, source = self.source.name());
        let bars = self
            .source
            .fetch_recent_bars(symbol, &self.settings.timeframe, self.settings.bar_count)
            .await
            .map_err(|e| CycleError::DataUnavailable {
                symbol: symbol.to_string(),
                detail: e.to_string(),
            })?;
        if bars.is_empty() {
            return Err(CycleError::DataUnavailable {
                symbol: symbol.to_string(),
                detail: "source returned no bars".to_string(),
            });
        }

        tracing::debug!(stage = ?Stage::Enriching, bars = bars.len());
        let enriched = indicators::enrich(&bars);
        if enriched.is_empty() {
            return Err(CycleError::IndicatorWarmupIncomplete {
                bars: bars.len(),
                required: WARMUP_BARS,
            });
        }
        Ok(enriched)
    }

    async fn request_trend(&self, trend: &TrendSnapshot) -> Result<TrendAnalysis, CycleError> {
        let request = prompt::trend_prompt(trend);
        tracing::debug!(prompt = %request, "trend prompt");
        let raw = self.engine.request_trend_analysis(&request).await?;
        Ok(analysis::parse_trend(&raw)?)
    }

    /// Best-effort trend reading inside a cycle. Failures are logged only.
    async fn trend_check(&self, enriched: &[EnrichedBar]) -> Option<TrendAnalysis> {
        let trend = snapshot::build_trend_snapshot(enriched, &self.settings.symbol).ok()?;
        match self.request_trend(&trend).await {
            Ok(reading) => {
                tracing::info!(
                    trend_change = reading.trend_change,
                    direction = ?reading.direction,
                    "trend reading"
                );
                Some(reading)
            }
            Err(err) => {
                tracing::warn!(error = %err, "trend check failed");
                None
            }
        }
    }

    /// One-shot trend-change analysis over the latest two enriched rows.
    pub async fn trend_once(&self) -> Result<TrendAnalysis, CycleError> {
        let enriched = self.fetch_enriched().await?;
        // A single enriched row means exactly WARMUP_BARS bars came in.
        let trend = snapshot::build_trend_snapshot(&enriched, &self.settings.symbol).map_err(
            |_| CycleError::IndicatorWarmupIncomplete {
                bars: WARMUP_BARS,
                required: WARMUP_BARS + 1,
            },
        )?;
        self.request_trend(&trend).await
    }

    /// Runs cycles until `shutdown` turns true, sleeping the configured
    /// interval between them. Returns the number of cycles run.
    ///
    /// The signal is checked only between cycles, so an in-flight cycle
    /// always completes. A dropped sender also stops the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut cycles = 0;
        tracing::info!(
            symbol = %self.settings.symbol,
            timeframe = %self.settings.timeframe,
            interval_secs = self.settings.cycle_interval.as_secs(),
            threshold = self.gate.threshold(),
            "trading loop started"
        );

        'cycles: loop {
            if *shutdown.borrow() {
                break;
            }
            self.run_cycle().await;
            cycles += 1;
            if *shutdown.borrow() {
                break;
            }

            let next_cycle = tokio::time::Instant::now() + self.settings.cycle_interval;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(next_cycle) => break,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break 'cycles;
                        }
                    }
                }
            }
        }

        tracing::info!(cycles, "trading loop stopped");
        cycles
    }
}
