//! Static strategy-block catalog.
//!
//! Blocks are compile-time data: each one is a single DeFi action archetype
//! (spot buy, perp short, lend, ...) carrying illustrative risk/yield numbers.
//! Composition happens by selecting ids; nothing in the catalog is mutable.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Venue category a block executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spot,
    Perps,
    Lending,
    Pool,
    Yield,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spot => "spot",
            Category::Perps => "perps",
            Category::Lending => "lending",
            Category::Pool => "pool",
            Category::Yield => "yield",
        }
    }
}

/// Directional market bias of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Long,
    Short,
    Neutral,
}

impl Exposure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exposure::Long => "long",
            Exposure::Short => "short",
            Exposure::Neutral => "neutral",
        }
    }
}

/// One selectable strategy building block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyBlock {
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    /// Inherent risk, 0-100.
    pub risk_score: f64,
    /// Relative capital allocation weight; only meaningful against the other
    /// selected blocks' weights.
    pub capital_weight: f64,
    /// Signed APY contribution in percent.
    pub yield_pct: f64,
    pub exposure: Exposure,
    /// Effective leverage of the block (1x, 3x, 5x, ...).
    pub capital_efficiency: f64,
}

/// The full catalog, in display order.
pub const CATALOG: &[StrategyBlock] = &[
    StrategyBlock {
        id: "spot-long",
        label: "Spot Buy",
        category: Category::Spot,
        risk_score: 25.0,
        capital_weight: 50.0,
        yield_pct: 0.0,
        exposure: Exposure::Long,
        capital_efficiency: 1.0,
    },
    StrategyBlock {
        id: "perp-long",
        label: "Perp Long",
        category: Category::Perps,
        risk_score: 70.0,
        capital_weight: 20.0,
        yield_pct: -6.0,
        exposure: Exposure::Long,
        capital_efficiency: 5.0,
    },
    StrategyBlock {
        id: "perp-short",
        label: "Perp Short",
        category: Category::Perps,
        risk_score: 65.0,
        capital_weight: 20.0,
        yield_pct: 6.0,
        exposure: Exposure::Short,
        capital_efficiency: 5.0,
    },
    StrategyBlock {
        id: "lend",
        label: "Lend USDC",
        category: Category::Lending,
        risk_score: 10.0,
        capital_weight: 40.0,
        yield_pct: 4.0,
        exposure: Exposure::Neutral,
        capital_efficiency: 1.0,
    },
    StrategyBlock {
        id: "borrow",
        label: "Borrow",
        category: Category::Lending,
        risk_score: 40.0,
        capital_weight: 30.0,
        yield_pct: -7.0,
        exposure: Exposure::Neutral,
        capital_efficiency: 3.0,
    },
    StrategyBlock {
        id: "lp-pool",
        label: "LP Pool",
        category: Category::Pool,
        risk_score: 30.0,
        capital_weight: 35.0,
        yield_pct: 10.0,
        exposure: Exposure::Neutral,
        capital_efficiency: 2.0,
    },
    StrategyBlock {
        id: "yield-farm",
        label: "Yield Farm",
        category: Category::Yield,
        risk_score: 40.0,
        capital_weight: 35.0,
        yield_pct: 15.0,
        exposure: Exposure::Neutral,
        capital_efficiency: 2.0,
    },
];

/// Look up a block by id.
pub fn find(id: &str) -> Option<&'static StrategyBlock> {
    CATALOG.iter().find(|b| b.id == id)
}

/// Map an ordered id list to catalog blocks, dropping ids the catalog does
/// not know. Selection order is preserved. This is the display layer's
/// contract: user-driven input never fails, it just resolves to less.
pub fn resolve<S: AsRef<str>>(ids: &[S]) -> Vec<&'static StrategyBlock> {
    ids.iter().filter_map(|id| find(id.as_ref())).collect()
}

/// SHA-256 over the canonical JSON encoding of the catalog. Logged once per
/// run so replays can prove they ran against the same table.
pub fn fingerprint() -> String {
    let json = serde_json::to_string(CATALOG).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}

// =============================================================================
// Strategy templates (preset selections)
// =============================================================================

/// A named preset selection with a one-line pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub blurb: &'static str,
    pub blocks: &'static [&'static str],
}

pub const TEMPLATES: &[StrategyTemplate] = &[
    StrategyTemplate {
        id: "basis",
        name: "Basis Trade",
        blurb: "Spot long + perp short = delta neutral. Earn funding rate yield with minimal directional risk.",
        blocks: &["spot-long", "perp-short"],
    },
    StrategyTemplate {
        id: "protected-farm",
        name: "Protected Farm",
        blurb: "Yield farming hedged with a perp short. Keep the harvest, shed the price swings.",
        blocks: &["yield-farm", "perp-short"],
    },
    StrategyTemplate {
        id: "yield-stack",
        name: "Yield Stack",
        blurb: "Combine lending + LP pool for stacked passive yield from two sources.",
        blocks: &["lend", "lp-pool"],
    },
    StrategyTemplate {
        id: "leveraged-yield",
        name: "Leveraged Yield",
        blurb: "Borrow against collateral to farm yield. Higher returns but amplified risk.",
        blocks: &["borrow", "yield-farm"],
    },
];

pub fn find_template(id: &str) -> Option<&'static StrategyTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
