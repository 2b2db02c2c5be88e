//! Strict decoding of engine answers.
//!
//! The whole answer (after trimming whitespace) must be one JSON object.
//! Nothing is salvaged from prose or code fences around it. Unknown extra
//! keys are ignored.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{Analysis, TrendAnalysis, vocabulary};

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("answer is not valid JSON: {0}")]
    NotJson(String),

    #[error("answer is JSON but not an object")]
    NotAnObject,

    #[error("answer has the wrong shape: {0}")]
    Shape(String),

    #[error("unknown recommendation `{0}`")]
    InvalidRecommendation(String),

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("unknown risk level `{0}`")]
    InvalidRiskLevel(String),

    #[error("unknown trend direction `{0}`")]
    InvalidDirection(String),

    #[error("direction must be present exactly when trend_change is true (trend_change = {trend_change})")]
    DirectionMismatch { trend_change: bool },

    #[error("{field} must be a positive price, got {value}")]
    InvalidPrice { field: &'static str, value: f64 },
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    recommendation: String,
    confidence: f64,
    reasoning: String,
    risk_level: String,
    #[serde(alias = "suggested_sl")]
    suggested_stop_loss: f64,
    #[serde(alias = "suggested_tp")]
    suggested_take_profit: f64,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    trend_change: bool,
    #[serde(default)]
    direction: Option<String>,
    reasoning: String,
}

fn object(raw: &str) -> Result<Value, SchemaError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| SchemaError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(SchemaError::NotAnObject);
    }
    Ok(value)
}

fn price(field: &'static str, value: f64) -> Result<f64, SchemaError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SchemaError::InvalidPrice { field, value })
    }
}

/// Decode a recommendation answer.
///
/// `suggested_sl`/`suggested_tp` are accepted as spellings of the two level
/// fields. Labels go through the alias table, so `COMPRAR` reads as BUY.
pub fn parse_analysis(raw: &str) -> Result<Analysis, SchemaError> {
    let value = object(raw)?;
    let raw: RawAnalysis =
        serde_json::from_value(value).map_err(|e| SchemaError::Shape(e.to_string()))?;

    let recommendation = vocabulary::recommendation(&raw.recommendation)
        .ok_or(SchemaError::InvalidRecommendation(raw.recommendation))?;
    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(SchemaError::ConfidenceOutOfRange(raw.confidence));
    }
    let risk_level = vocabulary::risk_level(&raw.risk_level)
        .ok_or(SchemaError::InvalidRiskLevel(raw.risk_level))?;

    Ok(Analysis {
        recommendation,
        confidence: raw.confidence,
        reasoning: raw.reasoning,
        risk_level,
        suggested_stop_loss: price("suggested_stop_loss", raw.suggested_stop_loss)?,
        suggested_take_profit: price("suggested_take_profit", raw.suggested_take_profit)?,
    })
}

/// Decode a trend-change answer. A null or blank `direction` counts as absent.
pub fn parse_trend(raw: &str) -> Result<TrendAnalysis, SchemaError> {
    let value = object(raw)?;
    let raw: RawTrend =
        serde_json::from_value(value).map_err(|e| SchemaError::Shape(e.to_string()))?;

    let direction = raw
        .direction
        .filter(|d| !d.trim().is_empty())
        .map(|d| vocabulary::side(&d).ok_or(SchemaError::InvalidDirection(d)))
        .transpose()?;

    if raw.trend_change != direction.is_some() {
        return Err(SchemaError::DirectionMismatch {
            trend_change: raw.trend_change,
        });
    }

    Ok(TrendAnalysis {
        trend_change: raw.trend_change,
        direction,
        reasoning: raw.reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Recommendation, RiskLevel, TradeSide};

    fn answer(recommendation: &str, confidence: f64) -> String {
        format!(
            r#"{{"recommendation": "{recommendation}", "confidence": {confidence},
                "reasoning": "momentum", "risk_level": "MEDIUM",
                "suggested_stop_loss": 99.0, "suggested_take_profit": 101.0}}"#
        )
    }

    #[test]
    fn decodes_a_well_formed_answer() {
        let analysis = parse_analysis(&answer("BUY", 0.85)).unwrap();
        assert_eq!(analysis.recommendation, Recommendation::Buy);
        assert_eq!(analysis.confidence, 0.85);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.reasoning, "momentum");
        assert_eq!(analysis.suggested_stop_loss, 99.0);
        assert_eq!(analysis.suggested_take_profit, 101.0);
    }

    #[test]
    fn confidence_bounds_are_inclusive() {
        assert!(parse_analysis(&answer("HOLD", 0.0)).is_ok());
        assert!(parse_analysis(&answer("HOLD", 1.0)).is_ok());
        assert_eq!(
            parse_analysis(&answer("BUY", 1.5)),
            Err(SchemaError::ConfidenceOutOfRange(1.5))
        );
        assert_eq!(
            parse_analysis(&answer("BUY", -0.1)),
            Err(SchemaError::ConfidenceOutOfRange(-0.1))
        );
    }

    #[test]
    fn rejects_unknown_recommendation() {
        assert_eq!(
            parse_analysis(&answer("INVALID", 0.9)),
            Err(SchemaError::InvalidRecommendation("INVALID".into()))
        );
    }

    #[test]
    fn rejects_prose_and_non_objects() {
        assert!(matches!(
            parse_analysis("I think you should buy"),
            Err(SchemaError::NotJson(_))
        ));
        assert!(matches!(
            parse_analysis("```json\n{}\n```"),
            Err(SchemaError::NotJson(_))
        ));
        assert_eq!(parse_analysis("[1, 2]"), Err(SchemaError::NotAnObject));
        assert_eq!(parse_analysis("\"BUY\""), Err(SchemaError::NotAnObject));
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = r#"{"recommendation": "BUY", "reasoning": "x", "risk_level": "LOW",
                      "suggested_stop_loss": 1.0, "suggested_take_profit": 2.0}"#;
        match parse_analysis(raw) {
            Err(SchemaError::Shape(msg)) => assert!(msg.contains("confidence"), "{msg}"),
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_confidence_as_string() {
        let raw = answer("BUY", 0.5).replace("0.5", "\"0.5\"");
        assert!(matches!(parse_analysis(&raw), Err(SchemaError::Shape(_))));
    }

    #[test]
    fn tolerates_extra_fields_and_whitespace() {
        let raw = r#"
            {"recommendation": "SELL", "confidence": 0.4, "reasoning": "",
             "risk_level": "high", "suggested_stop_loss": 10.5,
             "suggested_take_profit": 9.5, "horizon": "1h", "notes": [1, 2]}
        "#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.recommendation, Recommendation::Sell);
        assert_eq!(analysis.risk_level, RiskLevel::High);
    }

    #[test]
    fn accepts_spanish_labels_and_short_level_keys() {
        let raw = r#"{"recommendation": "COMPRAR", "confidence": 0.85,
                      "reasoning": "cruce alcista", "risk_level": "BAJO",
                      "suggested_sl": 40184.1, "suggested_tp": 40995.9}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.recommendation, Recommendation::Buy);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.suggested_stop_loss, 40184.1);
        assert_eq!(analysis.suggested_take_profit, 40995.9);
    }

    #[test]
    fn rejects_non_positive_levels() {
        let raw = answer("BUY", 0.9).replace("99.0", "0");
        assert_eq!(
            parse_analysis(&raw),
            Err(SchemaError::InvalidPrice {
                field: "suggested_stop_loss",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_unknown_risk_level() {
        let raw = answer("BUY", 0.9).replace("MEDIUM", "EXTREME");
        assert_eq!(
            parse_analysis(&raw),
            Err(SchemaError::InvalidRiskLevel("EXTREME".into()))
        );
    }

    mod trend {
        use super::*;

        #[test]
        fn change_with_direction() {
            let trend =
                parse_trend(r#"{"trend_change": true, "direction": "SELL", "reasoning": "cross"}"#)
                    .unwrap();
            assert!(trend.trend_change);
            assert_eq!(trend.direction, Some(TradeSide::Sell));
            assert_eq!(trend.reasoning, "cross");
        }

        #[test]
        fn no_change_without_direction() {
            for raw in [
                r#"{"trend_change": false, "reasoning": "flat"}"#,
                r#"{"trend_change": false, "direction": null, "reasoning": "flat"}"#,
                r#"{"trend_change": false, "direction": "", "reasoning": "flat"}"#,
            ] {
                let trend = parse_trend(raw).unwrap();
                assert!(!trend.trend_change);
                assert_eq!(trend.direction, None);
            }
        }

        #[test]
        fn direction_must_match_trend_change() {
            assert_eq!(
                parse_trend(r#"{"trend_change": true, "reasoning": "?"}"#),
                Err(SchemaError::DirectionMismatch { trend_change: true })
            );
            assert_eq!(
                parse_trend(r#"{"trend_change": false, "direction": "BUY", "reasoning": "?"}"#),
                Err(SchemaError::DirectionMismatch {
                    trend_change: false
                })
            );
        }

        #[test]
        fn reasoning_is_required() {
            match parse_trend(r#"{"trend_change": false}"#) {
                Err(SchemaError::Shape(msg)) => assert!(msg.contains("reasoning"), "{msg}"),
                other => panic!("expected shape error, got {other:?}"),
            }
        }

        #[test]
        fn trend_change_must_be_boolean() {
            assert!(matches!(
                parse_trend(r#"{"trend_change": "yes", "direction": "BUY"}"#),
                Err(SchemaError::Shape(_))
            ));
        }

        #[test]
        fn rejects_hold_as_direction() {
            assert_eq!(
                parse_trend(r#"{"trend_change": true, "direction": "HOLD", "reasoning": "?"}"#),
                Err(SchemaError::InvalidDirection("HOLD".into()))
            );
        }
    }
}
