//! Confidence gate between an [`Analysis`] and the broker.

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, TradeSide};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// An order the gate decided to place. Consumed by an
/// [`OrderExecutor`](crate::execution::OrderExecutor) right away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: TradeSide,
    pub volume: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionGate {
    threshold: f64,
}

impl Default for DecisionGate {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl DecisionGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// HOLD never trades. BUY/SELL trade only when confidence is strictly
    /// above the threshold; levels are copied from the analysis unchanged.
    pub fn decide(&self, analysis: &Analysis, symbol: &str, volume: f64) -> Option<OrderIntent> {
        let side = analysis.recommendation.side()?;
        if analysis.confidence <= self.threshold {
            return None;
        }
        Some(OrderIntent {
            symbol: symbol.to_string(),
            side,
            volume,
            stop_loss: analysis.suggested_stop_loss,
            take_profit: analysis.suggested_take_profit,
        })
    }

    /// Human-readable reason `decide` returned `None`.
    pub fn explain_no_action(&self, analysis: &Analysis) -> String {
        match analysis.recommendation.side() {
            None => "recommendation is HOLD".to_string(),
            Some(_) => format!(
                "confidence {:.2} does not exceed threshold {:.2}",
                analysis.confidence, self.threshold
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Recommendation, RiskLevel};

    fn analysis(recommendation: Recommendation, confidence: f64) -> Analysis {
        Analysis {
            recommendation,
            confidence,
            reasoning: String::new(),
            risk_level: RiskLevel::Low,
            suggested_stop_loss: 95.0,
            suggested_take_profit: 110.0,
        }
    }

    #[test]
    fn hold_never_trades() {
        let gate = DecisionGate::default();
        assert_eq!(gate.decide(&analysis(Recommendation::Hold, 0.99), "X", 1.0), None);
        assert_eq!(
            gate.explain_no_action(&analysis(Recommendation::Hold, 0.99)),
            "recommendation is HOLD"
        );
    }

    #[test]
    fn threshold_is_strict() {
        let gate = DecisionGate::default();
        assert_eq!(gate.decide(&analysis(Recommendation::Buy, 0.70), "X", 1.0), None);
        assert_eq!(gate.decide(&analysis(Recommendation::Sell, 0.70), "X", 1.0), None);
        assert!(gate.decide(&analysis(Recommendation::Buy, 0.71), "X", 1.0).is_some());
    }

    #[test]
    fn intent_copies_levels_and_volume() {
        let intent = DecisionGate::new(0.5)
            .decide(&analysis(Recommendation::Sell, 0.8), "EUR/USD", 0.01)
            .unwrap();
        assert_eq!(
            intent,
            OrderIntent {
                symbol: "EUR/USD".into(),
                side: TradeSide::Sell,
                volume: 0.01,
                stop_loss: 95.0,
                take_profit: 110.0,
            }
        );
    }

    #[test]
    fn decision_is_pure() {
        let gate = DecisionGate::default();
        let a = analysis(Recommendation::Buy, 0.9);
        assert_eq!(gate.decide(&a, "X", 2.0), gate.decide(&a, "X", 2.0));
    }
}
