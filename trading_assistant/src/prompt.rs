//! Deterministic prompt text for the recommendation engine.
//!
//! Field order and precision are fixed: prices at 5 decimals, indicators at 2.
//! The same snapshot always renders to the same bytes.

use std::fmt::Write as _;

use crate::snapshot::{Snapshot, TrendSnapshot};

fn write_readings(out: &mut String, snap: &Snapshot) {
    let _ = writeln!(out, "- Price: {:.5}", snap.close);
    let _ = writeln!(out, "- RSI: {:.2}", snap.rsi);
    let _ = writeln!(out, "- MACD: {:.2}", snap.macd);
    let _ = writeln!(out, "- MACD signal: {:.2}", snap.signal);
    let _ = writeln!(out, "- SMA 20: {:.2}", snap.sma_20);
    let _ = writeln!(out, "- SMA 50: {:.2}", snap.sma_50);
}

/// Prompt asking for a BUY/SELL/HOLD recommendation on the latest readings.
pub fn recommendation_prompt(snap: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Analyze this market data for {} and give a trading recommendation.",
        snap.symbol
    );
    out.push('\n');
    out.push_str("Current data:\n");
    write_readings(&mut out, snap);
    out.push('\n');
    out.push_str(
        "Answer with a single JSON object and nothing else, exactly in this shape:\n",
    );
    out.push_str("{\n");
    out.push_str("  \"recommendation\": \"BUY\" | \"SELL\" | \"HOLD\",\n");
    out.push_str("  \"confidence\": <number between 0 and 1>,\n");
    out.push_str("  \"reasoning\": \"<short explanation>\",\n");
    out.push_str("  \"risk_level\": \"LOW\" | \"MEDIUM\" | \"HIGH\",\n");
    let _ = writeln!(
        out,
        "  \"suggested_stop_loss\": {:.5},",
        snap.suggested_stop_loss()
    );
    let _ = writeln!(
        out,
        "  \"suggested_take_profit\": {:.5}",
        snap.suggested_take_profit()
    );
    out.push_str("}\n");
    out.push_str("The levels above are for BUY. For SELL use these instead:\n");
    let _ = writeln!(
        out,
        "  \"suggested_stop_loss\": {:.5},",
        snap.short_stop_loss()
    );
    let _ = writeln!(
        out,
        "  \"suggested_take_profit\": {:.5}",
        snap.short_take_profit()
    );
    out.push_str("For HOLD either pair is fine.\n");
    out
}

/// Prompt asking whether the trend changed between the last two rows.
pub fn trend_prompt(trend: &TrendSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Decide whether the trend of {} changed between the two readings below.",
        trend.current.symbol
    );
    out.push('\n');
    out.push_str("Previous data:\n");
    write_readings(&mut out, &trend.previous);
    out.push('\n');
    out.push_str("Current data:\n");
    write_readings(&mut out, &trend.current);
    out.push('\n');
    out.push_str(
        "Answer with a single JSON object and nothing else, exactly in this shape:\n",
    );
    out.push_str("{\n");
    out.push_str("  \"trend_change\": true | false,\n");
    out.push_str("  \"direction\": \"BUY\" | \"SELL\",\n");
    out.push_str("  \"reasoning\": \"<short explanation>\"\n");
    out.push_str("}\n");
    out.push_str("Include \"direction\" only when \"trend_change\" is true.\n");
    out
}
