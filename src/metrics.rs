//! Derived aggregates over a block selection.
//!
//! Everything here is a pure projection: same selection in, same numbers
//! out, no state, no failure modes. Empty selection is a fully specified
//! input, not an error.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{self, Category, Exposure, StrategyBlock};

/// Net directional read of the whole selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureLabel {
    Hedged,
    Long,
    Short,
    Neutral,
    /// Empty selection; renders as the em-dash placeholder.
    None,
}

impl ExposureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureLabel::Hedged => "Hedged",
            ExposureLabel::Long => "Long",
            ExposureLabel::Short => "Short",
            ExposureLabel::Neutral => "Neutral",
            ExposureLabel::None => "—",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
        }
    }

    /// Thresholds: >60 High, >30 Medium, else Low.
    pub fn from_pct(risk_pct: u8) -> Self {
        if risk_pct > 60 {
            RiskLabel::High
        } else if risk_pct > 30 {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }
}

/// One row of the capital-allocation breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub id: &'static str,
    pub percent: u8,
}

/// The full aggregate the strategy widget displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyMetrics {
    pub total_yield_pct: f64,
    pub exposure: ExposureLabel,
    pub risk_pct: u8,
    pub risk_label: RiskLabel,
    pub allocations: Vec<Allocation>,
    pub max_leverage: Option<f64>,
    pub protocol_count: usize,
}

impl StrategyMetrics {
    /// What an empty selection shows: placeholders across the board.
    pub fn empty() -> Self {
        Self {
            total_yield_pct: 0.0,
            exposure: ExposureLabel::None,
            risk_pct: 0,
            risk_label: RiskLabel::Low,
            allocations: Vec::new(),
            max_leverage: None,
            protocol_count: 0,
        }
    }
}

/// Resolve ids against the catalog (unknown ids drop out) and compute.
pub fn compute_for_ids<S: AsRef<str>>(ids: &[S]) -> StrategyMetrics {
    compute(&catalog::resolve(ids))
}

/// Compute display aggregates for an already-resolved selection.
pub fn compute(selected: &[&'static StrategyBlock]) -> StrategyMetrics {
    if selected.is_empty() {
        return StrategyMetrics::empty();
    }

    let has = |id: &str| selected.iter().any(|b| b.id == id);
    let long_count = selected.iter().filter(|b| b.exposure == Exposure::Long).count();
    let short_count = selected.iter().filter(|b| b.exposure == Exposure::Short).count();
    let neutral_count = selected.iter().filter(|b| b.exposure == Exposure::Neutral).count();
    let is_hedged = long_count > 0 && short_count > 0;
    let all_neutral = neutral_count == selected.len();

    // Yield: static contributions plus composition bonuses. The two bonus
    // families are independent; within a family the rules are strict else-if
    // and never stack.
    let base_yield: f64 = selected.iter().map(|b| b.yield_pct).sum();
    let mut bonus = 0.0;
    if has("perp-long") && has("perp-short") {
        bonus += 3.0; // funding-rate arbitrage
    } else if has("spot-long") && has("perp-short") {
        bonus += 4.0; // basis trade
    }
    if has("lend") && has("borrow") {
        bonus += 6.0; // recursive lending
    } else if has("borrow") && (has("lp-pool") || has("yield-farm")) {
        bonus += 3.0; // leveraged yield
    }
    let total_yield_pct = base_yield + bonus;

    let exposure = if is_hedged {
        ExposureLabel::Hedged
    } else if long_count > 0 {
        ExposureLabel::Long
    } else if short_count > 0 {
        ExposureLabel::Short
    } else {
        ExposureLabel::Neutral
    };

    // Capital-weighted risk, discounted when the book is hedged or fully
    // neutral, rounded and capped at 100.
    let total_weight: f64 = selected.iter().map(|b| b.capital_weight).sum();
    let weighted_risk: f64 = if total_weight > 0.0 {
        selected
            .iter()
            .map(|b| b.risk_score * (b.capital_weight / total_weight))
            .sum()
    } else {
        0.0
    };
    let multiplier = if is_hedged {
        0.4
    } else if all_neutral {
        0.7
    } else {
        1.0
    };
    let risk_pct = ((weighted_risk * multiplier).round() as u64).min(100) as u8;
    let risk_label = RiskLabel::from_pct(risk_pct);

    let allocations = selected
        .iter()
        .map(|b| Allocation {
            id: b.id,
            percent: if total_weight > 0.0 {
                ((b.capital_weight / total_weight) * 100.0).round() as u8
            } else {
                0
            },
        })
        .collect();

    let max_leverage = selected
        .iter()
        .map(|b| b.capital_efficiency)
        .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |a| a.max(e))));

    let categories: HashSet<Category> = selected.iter().map(|b| b.category).collect();

    StrategyMetrics {
        total_yield_pct,
        exposure,
        risk_pct,
        risk_label,
        allocations,
        max_leverage,
        protocol_count: categories.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_for(ids: &[&str]) -> StrategyMetrics {
        compute_for_ids(ids)
    }

    // Synthetic block for threshold tests; the real catalog tops out at
    // risk 70 so the cap and the exact label boundaries need manufactured
    // inputs.
    fn leak_block(risk_score: f64, exposure: Exposure) -> &'static StrategyBlock {
        Box::leak(Box::new(StrategyBlock {
            id: "synthetic",
            label: "Synthetic",
            category: Category::Spot,
            risk_score,
            capital_weight: 10.0,
            yield_pct: 0.0,
            exposure,
            capital_efficiency: 1.0,
        }))
    }

    #[test]
    fn test_basis_trade_numbers() {
        // spot-long + perp-short: the canonical hedged carry book.
        let m = metrics_for(&["spot-long", "perp-short"]);
        assert_eq!(m.exposure, ExposureLabel::Hedged);
        assert_eq!(m.total_yield_pct, 10.0); // base 0 + 6, basis bonus +4
        // weighted risk (25*50 + 65*20)/70 ≈ 36.43, hedge discount 0.4 → 15
        assert_eq!(m.risk_pct, 15);
        assert_eq!(m.risk_label, RiskLabel::Low);
        assert_eq!(m.allocations.len(), 2);
        assert_eq!(m.allocations[0], Allocation { id: "spot-long", percent: 71 });
        assert_eq!(m.allocations[1], Allocation { id: "perp-short", percent: 29 });
        assert_eq!(m.max_leverage, Some(5.0));
        assert_eq!(m.protocol_count, 2);
    }

    #[test]
    fn test_lending_pair_numbers() {
        let m = metrics_for(&["lend", "borrow"]);
        assert_eq!(m.exposure, ExposureLabel::Neutral);
        // base 4 + (-7) = -3, recursive-lending bonus +6
        assert_eq!(m.total_yield_pct, 3.0);
        // weighted risk (10*40 + 40*30)/70 ≈ 22.86, neutral discount 0.7 → 16
        assert_eq!(m.risk_pct, 16);
        assert_eq!(m.risk_label, RiskLabel::Low);
        assert_eq!(m.max_leverage, Some(3.0));
        // Both blocks are lending-category.
        assert_eq!(m.protocol_count, 1);
    }

    #[test]
    fn test_empty_selection() {
        let m = metrics_for(&[]);
        assert_eq!(m, StrategyMetrics::empty());
        assert_eq!(m.exposure.as_str(), "—");
        assert_eq!(m.risk_pct, 0);
        assert!(m.allocations.is_empty());
        assert_eq!(m.max_leverage, None);
        assert_eq!(m.protocol_count, 0);
    }

    #[test]
    fn test_unknown_ids_filtered() {
        let with_junk = metrics_for(&["spot-long", "not-a-block", "perp-short"]);
        let clean = metrics_for(&["spot-long", "perp-short"]);
        assert_eq!(with_junk, clean);
        // All-junk behaves exactly like empty.
        assert_eq!(metrics_for(&["wat", "also-wat"]), StrategyMetrics::empty());
    }

    #[test]
    fn test_perp_family_else_if() {
        // Both perp legs present: funding bonus wins, basis bonus must not
        // stack even though spot-long + perp-short is also present.
        let m = metrics_for(&["spot-long", "perp-long", "perp-short"]);
        let base = 0.0 + (-6.0) + 6.0;
        assert_eq!(m.total_yield_pct, base + 3.0);
    }

    #[test]
    fn test_lending_family_else_if() {
        // lend + borrow + lp-pool: recursive lending wins, leveraged-yield
        // bonus must not stack.
        let m = metrics_for(&["lend", "borrow", "lp-pool"]);
        let base = 4.0 + (-7.0) + 10.0;
        assert_eq!(m.total_yield_pct, base + 6.0);

        // Without lend, borrow + pool falls through to the +3 rule.
        let m = metrics_for(&["borrow", "lp-pool"]);
        assert_eq!(m.total_yield_pct, -7.0 + 10.0 + 3.0);
        let m = metrics_for(&["borrow", "yield-farm"]);
        assert_eq!(m.total_yield_pct, -7.0 + 15.0 + 3.0);
    }

    #[test]
    fn test_bonus_families_independent() {
        // Basis pair plus lending pair: +4 and +6 both apply.
        let m = metrics_for(&["spot-long", "perp-short", "lend", "borrow"]);
        let base = 0.0 + 6.0 + 4.0 + (-7.0);
        assert_eq!(m.total_yield_pct, base + 4.0 + 6.0);

        // Funding pair plus lending pair: +3 and +6.
        let m = metrics_for(&["perp-long", "perp-short", "lend", "borrow"]);
        let base = -6.0 + 6.0 + 4.0 + (-7.0);
        assert_eq!(m.total_yield_pct, base + 3.0 + 6.0);
    }

    #[test]
    fn test_exposure_directions() {
        assert_eq!(metrics_for(&["spot-long"]).exposure, ExposureLabel::Long);
        assert_eq!(metrics_for(&["perp-short"]).exposure, ExposureLabel::Short);
        assert_eq!(metrics_for(&["lend"]).exposure, ExposureLabel::Neutral);
        // Neutral blocks don't hedge anything; a lone directional leg wins.
        assert_eq!(metrics_for(&["spot-long", "lend"]).exposure, ExposureLabel::Long);
        assert_eq!(metrics_for(&["perp-short", "lend"]).exposure, ExposureLabel::Short);
    }

    #[test]
    fn test_risk_label_thresholds() {
        let cases = [
            (30.0, RiskLabel::Low),
            (31.0, RiskLabel::Medium),
            (60.0, RiskLabel::Medium),
            (61.0, RiskLabel::High),
        ];
        for (risk, expected) in cases {
            let m = compute(&[leak_block(risk, Exposure::Long)]);
            assert_eq!(m.risk_pct, risk as u8);
            assert_eq!(m.risk_label, expected, "risk {} mislabelled", risk);
        }
    }

    #[test]
    fn test_risk_capped_at_100() {
        let m = compute(&[leak_block(250.0, Exposure::Long)]);
        assert_eq!(m.risk_pct, 100);
        assert_eq!(m.risk_label, RiskLabel::High);
    }

    #[test]
    fn test_hedge_discount_beats_neutral_discount() {
        // A hedged book gets 0.4 even when neutral blocks dominate the count.
        let m = metrics_for(&["spot-long", "perp-short", "lend", "lp-pool", "yield-farm"]);
        assert_eq!(m.exposure, ExposureLabel::Hedged);
        // weights 50+20+40+35+35 = 180
        let weighted: f64 =
            (25.0 * 50.0 + 65.0 * 20.0 + 10.0 * 40.0 + 30.0 * 35.0 + 40.0 * 35.0) / 180.0;
        assert_eq!(m.risk_pct, (weighted * 0.4).round() as u8);
    }

    #[test]
    fn test_allocations_track_selection_order() {
        let m = metrics_for(&["yield-farm", "spot-long", "borrow"]);
        let ids: Vec<&str> = m.allocations.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["yield-farm", "spot-long", "borrow"]);
        // weights 35/50/30, total 115
        assert_eq!(m.allocations[0].percent, 30);
        assert_eq!(m.allocations[1].percent, 43);
        assert_eq!(m.allocations[2].percent, 26);
    }

    #[test]
    fn test_max_leverage_is_max() {
        assert_eq!(metrics_for(&["lend"]).max_leverage, Some(1.0));
        assert_eq!(metrics_for(&["lend", "borrow"]).max_leverage, Some(3.0));
        assert_eq!(metrics_for(&["lend", "perp-long"]).max_leverage, Some(5.0));
    }

    #[test]
    fn test_protocol_count_distinct() {
        assert_eq!(metrics_for(&["perp-long", "perp-short"]).protocol_count, 1);
        assert_eq!(
            metrics_for(&["spot-long", "perp-short", "lend", "lp-pool", "yield-farm"])
                .protocol_count,
            5
        );
    }
}
