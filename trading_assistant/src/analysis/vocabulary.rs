//! Label tables for engine answers.
//!
//! English is canonical; Spanish labels are aliases. Matching ignores ASCII
//! case and surrounding whitespace.

use super::{Recommendation, RiskLevel, TradeSide};

const RECOMMENDATIONS: &[(&str, Recommendation)] = &[
    ("BUY", Recommendation::Buy),
    ("SELL", Recommendation::Sell),
    ("HOLD", Recommendation::Hold),
    ("COMPRAR", Recommendation::Buy),
    ("VENDER", Recommendation::Sell),
    ("MANTENER", Recommendation::Hold),
];

const RISK_LEVELS: &[(&str, RiskLevel)] = &[
    ("LOW", RiskLevel::Low),
    ("MEDIUM", RiskLevel::Medium),
    ("HIGH", RiskLevel::High),
    ("BAJO", RiskLevel::Low),
    ("MEDIO", RiskLevel::Medium),
    ("ALTO", RiskLevel::High),
];

const SIDES: &[(&str, TradeSide)] = &[
    ("BUY", TradeSide::Buy),
    ("SELL", TradeSide::Sell),
    ("COMPRAR", TradeSide::Buy),
    ("VENDER", TradeSide::Sell),
];

fn lookup<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    let label = label.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|&(_, value)| value)
}

pub(super) fn recommendation(label: &str) -> Option<Recommendation> {
    lookup(RECOMMENDATIONS, label)
}

pub(super) fn risk_level(label: &str) -> Option<RiskLevel> {
    lookup(RISK_LEVELS, label)
}

pub(super) fn side(label: &str) -> Option<TradeSide> {
    lookup(SIDES, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_and_spanish_map_to_the_same_values() {
        assert_eq!(recommendation("buy"), Some(Recommendation::Buy));
        assert_eq!(recommendation("COMPRAR"), Some(Recommendation::Buy));
        assert_eq!(recommendation("Vender"), Some(Recommendation::Sell));
        assert_eq!(recommendation(" mantener "), Some(Recommendation::Hold));
        assert_eq!(risk_level("medio"), Some(RiskLevel::Medium));
        assert_eq!(risk_level("HIGH"), Some(RiskLevel::High));
        assert_eq!(side("comprar"), Some(TradeSide::Buy));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(recommendation("INVALID"), None);
        assert_eq!(recommendation(""), None);
        assert_eq!(risk_level("EXTREME"), None);
        assert_eq!(side("HOLD"), None);
    }
}
