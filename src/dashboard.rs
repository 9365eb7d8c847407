//! Portfolio dashboard mock (walkthrough phase 04).
//!
//! The dashboard is illustrative: positions, totals and the health factor
//! are fixed display data, not derived from any live book. The only
//! arithmetic is the health gauge projection.

use serde::Serialize;

/// Health factor at which the gauge reads full.
pub const HEALTH_SCALE_MAX: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub name: &'static str,
    pub pnl_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_value_usd: f64,
    pub pnl_today_usd: f64,
    pub net_apy_pct: f64,
    pub health_factor: f64,
    pub positions: Vec<Position>,
    pub protocols: Vec<&'static str>,
}

impl DashboardSnapshot {
    /// The numbers the walkthrough shows.
    pub fn sample() -> Self {
        Self {
            total_value_usd: 10_450.0,
            pnl_today_usd: 450.0,
            net_apy_pct: 14.2,
            health_factor: 1.82,
            positions: vec![
                Position { name: "ETH Spot Long", pnl_pct: 12.4 },
                Position { name: "ETH Perp Short", pnl_pct: 6.2 },
                Position { name: "USDC Lend", pnl_pct: 4.0 },
                Position { name: "LP Pool (ETH/USDC)", pnl_pct: 10.1 },
            ],
            protocols: vec!["Hyperliquid", "Derive", "Morpho", "Aerodrome"],
        }
    }

    /// Gauge fill for this snapshot's health factor.
    pub fn health_gauge(&self) -> f64 {
        health_gauge(self.health_factor)
    }

    pub fn best_position(&self) -> Option<&Position> {
        self.positions
            .iter()
            .max_by(|a, b| a.pnl_pct.total_cmp(&b.pnl_pct))
    }

    pub fn worst_position(&self) -> Option<&Position> {
        self.positions
            .iter()
            .min_by(|a, b| a.pnl_pct.total_cmp(&b.pnl_pct))
    }
}

/// Health-factor gauge fill: health / 2.5, clamped to [0,1]. 1.0 sits at
/// liquidation, 2.5 pins the bar.
pub fn health_gauge(health_factor: f64) -> f64 {
    (health_factor / HEALTH_SCALE_MAX).max(0.0).min(1.0)
}
