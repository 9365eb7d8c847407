//! Scroll-phase controller for the walkthrough section.
//!
//! Scroll progress arrives as a continuous fraction, once per animation
//! frame. It quantizes to one of four phases, and downstream widgets only
//! hear about *changes* — re-emitting the current phase would re-render four
//! widget trees per frame.

use serde::Serialize;

/// Display metadata for one walkthrough phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub tag: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub accent: &'static str,
}

pub const PHASES: &[PhaseInfo] = &[
    PhaseInfo {
        tag: "01",
        title: "Deposit Collateral",
        description: "Start with what you have. Deposit ETH, BTC, or USDC into your Vanna margin account.",
        accent: "#703AE6",
    },
    PhaseInfo {
        tag: "02",
        title: "Borrow 10x Credit",
        description: "Vanna multiplies your capital up to 10x through undercollateralized credit.",
        accent: "#FC5457",
    },
    PhaseInfo {
        tag: "03",
        title: "Deploy Anywhere",
        description: "Trade perps, provide liquidity, yield farm — all from one account.",
        accent: "#3B82F6",
    },
    PhaseInfo {
        tag: "04",
        title: "Manage Everything",
        description: "One dashboard. Track positions, health factor, and optimize in real-time.",
        accent: "#8D61EB",
    },
];

/// Quantize scroll progress to a phase index in 0..=3.
///
/// Input is clamped to [0,1] first; producers do not guarantee it (rubber-band
/// overscroll goes past both ends, and NaN collapses to 0 via the clamp).
/// The 3.99 multiplier keeps progress == 1.0 inside phase 3 instead of
/// producing an out-of-range 4. A plain ×4 with a min() looks equivalent but
/// moves the last boundary from 3/3.99 to 0.75 — see the pinning test below.
pub fn compute_phase(progress: f64) -> u8 {
    let clamped = progress.max(0.0).min(1.0);
    ((clamped * 3.99).floor() as u8).min(3)
}

/// Emitted when the quantized phase actually moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseChange {
    pub from: u8,
    pub to: u8,
    pub progress: f64,
}

/// Notify-on-change wrapper around [`compute_phase`].
///
/// Holds the last recorded phase and suppresses duplicate emissions: feeding
/// the same progress (or any progress quantizing to the current phase) any
/// number of times produces no further notifications. Jump input is fine —
/// the computed phase never depends on history, only the suppression does.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: u8,
    transitions: u64,
}

impl PhaseTracker {
    /// Starts at phase 0, matching the section's initial render.
    pub fn new() -> Self {
        Self { current: 0, transitions: 0 }
    }

    pub fn observe(&mut self, progress: f64) -> Option<PhaseChange> {
        let next = compute_phase(progress);
        if next == self.current {
            return None;
        }
        let change = PhaseChange { from: self.current, to: next, progress };
        self.current = next;
        self.transitions += 1;
        Some(change)
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    /// Count of emitted changes. For a monotone 0→1 sweep this is exactly 3.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Content fade envelope
// =============================================================================

// Opacity keypoints: fade in over the first 5% of the section, hold, fade
// out over the last 8%.
const OPACITY_KEYS: &[(f64, f64)] = &[(0.0, 0.0), (0.05, 1.0), (0.92, 1.0), (1.0, 0.0)];

/// Piecewise-linear content opacity over scroll progress, clamped to [0,1].
pub fn content_opacity(progress: f64) -> f64 {
    let p = progress.max(0.0).min(1.0);
    let mut prev = OPACITY_KEYS[0];
    for &key in &OPACITY_KEYS[1..] {
        if p <= key.0 {
            let span = key.0 - prev.0;
            if span <= 0.0 {
                return key.1;
            }
            let t = (p - prev.0) / span;
            return prev.1 + (key.1 - prev.1) * t;
        }
        prev = key;
    }
    OPACITY_KEYS[OPACITY_KEYS.len() - 1].1
}
