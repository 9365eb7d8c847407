//! Protocol directory for the constellation section.
//!
//! A static registry of integrated venues with a category filter. Filtering
//! dims non-matching cards rather than removing them, so the operations here
//! report match/non-match instead of producing a reduced list — plus the
//! reduced list for consumers that want it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Spot,
    Perps,
    Options,
    Yield,
}

impl NodeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Spot => "spot",
            NodeCategory::Perps => "perps",
            NodeCategory::Options => "options",
            NodeCategory::Yield => "yield",
        }
    }
}

/// Directory filter; `All` matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    All,
    Spot,
    Perps,
    Options,
    Yield,
}

impl CategoryFilter {
    pub fn matches(&self, category: NodeCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Spot => category == NodeCategory::Spot,
            CategoryFilter::Perps => category == NodeCategory::Perps,
            CategoryFilter::Options => category == NodeCategory::Options,
            CategoryFilter::Yield => category == NodeCategory::Yield,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Spot => "Spot / Swaps",
            CategoryFilter::Perps => "Perps",
            CategoryFilter::Options => "Options",
            CategoryFilter::Yield => "Yield",
        }
    }
}

pub const FILTERS: &[CategoryFilter] = &[
    CategoryFilter::All,
    CategoryFilter::Spot,
    CategoryFilter::Perps,
    CategoryFilter::Options,
    CategoryFilter::Yield,
];

/// One integrated protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolNode {
    pub id: &'static str,
    pub name: &'static str,
    pub category: NodeCategory,
    pub chains: &'static [&'static str],
    pub actions: &'static [&'static str],
}

pub const NODES: &[ProtocolNode] = &[
    // Spot / swaps
    ProtocolNode {
        id: "uniswap",
        name: "Uniswap",
        category: NodeCategory::Spot,
        chains: &["Base", "Arbitrum", "Optimism"],
        actions: &["Swap", "Pool", "Liquidity"],
    },
    ProtocolNode {
        id: "soroswap",
        name: "Soroswap",
        category: NodeCategory::Spot,
        chains: &["Stellar"],
        actions: &["Swap", "Pool"],
    },
    ProtocolNode {
        id: "aquarius",
        name: "Aquarius",
        category: NodeCategory::Spot,
        chains: &["Stellar"],
        actions: &["Swap", "Liquidity Rewards"],
    },
    ProtocolNode {
        id: "aerodrome",
        name: "Aerodrome",
        category: NodeCategory::Spot,
        chains: &["Base"],
        actions: &["Swap", "Pool", "Liquidity"],
    },
    ProtocolNode {
        id: "hyperliquid-spot",
        name: "HyperLiquid Spot",
        category: NodeCategory::Spot,
        chains: &["Hyperliquid"],
        actions: &["Spot Trading"],
    },
    ProtocolNode {
        id: "aster-spot",
        name: "Aster Spot",
        category: NodeCategory::Spot,
        chains: &["BNB"],
        actions: &["Spot Trading"],
    },
    // Perps
    ProtocolNode {
        id: "hyperliquid",
        name: "Hyperliquid",
        category: NodeCategory::Perps,
        chains: &["Hyperliquid"],
        actions: &["Long", "Short", "50x Leverage"],
    },
    ProtocolNode {
        id: "avantis",
        name: "Avantis",
        category: NodeCategory::Perps,
        chains: &["Base"],
        actions: &["Perps", "Leverage Trading"],
    },
    ProtocolNode {
        id: "aster-perp",
        name: "Aster",
        category: NodeCategory::Perps,
        chains: &["BNB"],
        actions: &["Perps", "Leverage Trading"],
    },
    // Options
    ProtocolNode {
        id: "derive",
        name: "Derive",
        category: NodeCategory::Options,
        chains: &["Derive"],
        actions: &["Options", "Structured Products"],
    },
    // Yield
    ProtocolNode {
        id: "morpho",
        name: "Morpho",
        category: NodeCategory::Yield,
        chains: &["Base", "Optimism"],
        actions: &["Optimized Lending", "Yield"],
    },
    ProtocolNode {
        id: "blend",
        name: "Blend",
        category: NodeCategory::Yield,
        chains: &["Stellar"],
        actions: &["Lend", "Borrow", "Yield"],
    },
    ProtocolNode {
        id: "katana",
        name: "Katana",
        category: NodeCategory::Yield,
        chains: &["Katana"],
        actions: &["Yield Farming", "LP"],
    },
];

/// Nodes matching the filter, in directory order.
pub fn filter(filter: CategoryFilter) -> Vec<&'static ProtocolNode> {
    NODES.iter().filter(|n| filter.matches(n.category)).collect()
}

/// How many nodes a filter would light up.
pub fn count(filter: CategoryFilter) -> usize {
    NODES.iter().filter(|n| filter.matches(n.category)).count()
}

/// Every chain named anywhere in the directory, deduplicated, in first-seen
/// order.
pub fn distinct_chains() -> Vec<&'static str> {
    let mut chains: Vec<&'static str> = Vec::new();
    for node in NODES {
        for chain in node.chains {
            if !chains.contains(chain) {
                chains.push(chain);
            }
        }
    }
    chains
}
