//! Session state machine for the scripted walkthrough.
//!
//! One `Session` owns every interactive surface of the page — scroll phase,
//! deposit simulator, leverage calculator, strategy composer — and advances
//! only by applying [`SessionEvent`]s. The reducer is total and synchronous:
//! no event errors, no event touches a clock, so a recorded script replays
//! to the same snapshot and the same fingerprint every time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::composer::Composer;
use crate::config::Config;
use crate::metrics::StrategyMetrics;
use crate::phase::{PhaseChange, PhaseTracker};
use crate::simulator::{DepositSim, LeverageCalc};

// =============================================================================
// Events
// =============================================================================

/// Everything a visitor can do to the page, as replayable data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Scroll { progress: f64 },
    SelectAsset { index: usize },
    SetDeposit { amount: f64 },
    ConfirmDeposit,
    SetLeverage { value: u8 },
    ToggleBlock { id: String },
    ApplyTemplate { id: String },
    ClearBlocks,
}

/// What applying one event produced, for the driver to log.
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    pub phase_change: Option<PhaseChange>,
    pub metrics: Option<StrategyMetrics>,
}

// =============================================================================
// Session
// =============================================================================

pub struct Session {
    id: String,
    tick: u64,
    tracker: PhaseTracker,
    deposit: DepositSim,
    calc: LeverageCalc,
    composer: Composer,
}

impl Session {
    /// Fresh session in the state the page first renders: phase 0, the
    /// featured template selected, deposit and leverage seeded from config.
    pub fn new(id: &str, cfg: &Config) -> Self {
        let mut calc = LeverageCalc::new();
        calc.set_leverage(cfg.leverage);
        Self {
            id: id.to_string(),
            tick: 0,
            tracker: PhaseTracker::new(),
            deposit: DepositSim::new(cfg.deposit_usd, cfg.asset_index),
            calc,
            composer: Composer::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scroll samples advance the session clock; widget events happen
    /// "inside" the current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tracker(&self) -> &PhaseTracker {
        &self.tracker
    }

    pub fn deposit(&self) -> &DepositSim {
        &self.deposit
    }

    pub fn calc(&self) -> &LeverageCalc {
        &self.calc
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Apply one event. Composer mutations return the recomputed metrics so
    /// the driver can log them; scroll samples return a change only when the
    /// quantized phase actually moved.
    pub fn apply(&mut self, event: &SessionEvent) -> SessionOutcome {
        match event {
            SessionEvent::Scroll { progress } => {
                self.tick += 1;
                SessionOutcome {
                    phase_change: self.tracker.observe(*progress),
                    metrics: None,
                }
            }
            SessionEvent::SelectAsset { index } => {
                self.deposit.select_asset(*index);
                SessionOutcome::default()
            }
            SessionEvent::SetDeposit { amount } => {
                self.deposit.set_amount(*amount);
                SessionOutcome::default()
            }
            SessionEvent::ConfirmDeposit => {
                self.deposit.confirm();
                SessionOutcome::default()
            }
            SessionEvent::SetLeverage { value } => {
                self.calc.set_leverage(*value);
                SessionOutcome::default()
            }
            SessionEvent::ToggleBlock { id } => {
                self.composer.toggle(id);
                SessionOutcome {
                    phase_change: None,
                    metrics: Some(self.composer.metrics()),
                }
            }
            SessionEvent::ApplyTemplate { id } => {
                self.composer.apply_template(id);
                SessionOutcome {
                    phase_change: None,
                    metrics: Some(self.composer.metrics()),
                }
            }
            SessionEvent::ClearBlocks => {
                self.composer.clear();
                SessionOutcome {
                    phase_change: None,
                    metrics: Some(self.composer.metrics()),
                }
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let metrics = self.composer.metrics();
        SessionSnapshot {
            tick: self.tick,
            phase: self.tracker.current(),
            asset: self.deposit.asset().symbol.to_string(),
            deposit_usd: self.deposit.amount_usd(),
            deposited: self.deposit.is_deposited(),
            leverage: self.calc.leverage(),
            selection: self.composer.selection().to_vec(),
            total_yield_pct: metrics.total_yield_pct,
            risk_pct: metrics.risk_pct,
            exposure: metrics.exposure.as_str().to_string(),
        }
    }

    pub fn fingerprint(&self) -> String {
        self.snapshot().fingerprint()
    }
}

/// Run a whole script through a fresh session.
pub fn replay(id: &str, cfg: &Config, events: &[SessionEvent]) -> Session {
    let mut session = Session::new(id, cfg);
    for event in events {
        session.apply(event);
    }
    session
}

// =============================================================================
// Snapshot
// =============================================================================

/// Observable state at a point in the walkthrough. This is what gets
/// persisted and what the fingerprint is computed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub phase: u8,
    pub asset: String,
    pub deposit_usd: f64,
    pub deposited: bool,
    pub leverage: u8,
    pub selection: Vec<String>,
    pub total_yield_pct: f64,
    pub risk_pct: u8,
    pub exposure: String,
}

impl SessionSnapshot {
    /// SHA-256 over the canonical JSON encoding. Sessions that applied the
    /// same script report the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            deposit_usd: 1000.0,
            asset_index: 0,
            leverage: 5,
            session_ticks: 240,
            scroll_jitter: 0.004,
            sqlite_path: String::new(),
            persist_every_ticks: 24,
            seed: 7,
            log_every_ticks: 12,
        }
    }

    fn sample_script() -> Vec<SessionEvent> {
        vec![
            SessionEvent::Scroll { progress: 0.1 },
            SessionEvent::SetDeposit { amount: 1800.0 },
            SessionEvent::ConfirmDeposit,
            SessionEvent::Scroll { progress: 0.4 },
            SessionEvent::SetLeverage { value: 8 },
            SessionEvent::ToggleBlock { id: "lend".to_string() },
            SessionEvent::Scroll { progress: 0.8 },
            SessionEvent::Scroll { progress: 1.0 },
        ]
    }

    #[test]
    fn test_new_session_matches_first_render() {
        let session = Session::new("s-1", &test_config());
        let snap = session.snapshot();

        assert_eq!(snap.tick, 0);
        assert_eq!(snap.phase, 0);
        assert_eq!(snap.asset, "ETH");
        assert_eq!(snap.deposit_usd, 1000.0);
        assert!(!snap.deposited);
        assert_eq!(snap.leverage, 5);
        assert_eq!(snap.selection, vec!["spot-long", "perp-short"]);
        assert_eq!(snap.exposure, "Hedged");
        assert_eq!(snap.total_yield_pct, 10.0);
        assert_eq!(snap.risk_pct, 15);
    }

    #[test]
    fn test_scroll_advances_tick_and_dedups() {
        let mut session = Session::new("s-1", &test_config());

        let out = session.apply(&SessionEvent::Scroll { progress: 0.5 });
        let change = out.phase_change.unwrap();
        assert_eq!(change.from, 0);
        assert_eq!(change.to, 1);
        assert_eq!(session.tick(), 1);

        // Same progress again: clock advances, no duplicate notification
        let out = session.apply(&SessionEvent::Scroll { progress: 0.5 });
        assert!(out.phase_change.is_none());
        assert_eq!(session.tick(), 2);
    }

    #[test]
    fn test_full_sweep_yields_three_transitions() {
        let mut session = Session::new("s-1", &test_config());
        for i in 0..=100 {
            session.apply(&SessionEvent::Scroll { progress: i as f64 / 100.0 });
        }
        assert_eq!(session.tracker().transitions(), 3);
        assert_eq!(session.tracker().current(), 3);
    }

    #[test]
    fn test_widget_events_mutate_state() {
        let mut session = Session::new("s-1", &test_config());

        session.apply(&SessionEvent::SetDeposit { amount: 2500.0 });
        session.apply(&SessionEvent::SelectAsset { index: 2 });
        session.apply(&SessionEvent::ConfirmDeposit);
        let snap = session.snapshot();
        assert_eq!(snap.deposit_usd, 2500.0);
        assert_eq!(snap.asset, "USDC");
        assert!(snap.deposited);

        // Editing after confirmation resets the deposited flag
        session.apply(&SessionEvent::SetDeposit { amount: 3000.0 });
        assert!(!session.snapshot().deposited);

        // Leverage clamps to the slider range
        session.apply(&SessionEvent::SetLeverage { value: 12 });
        assert_eq!(session.snapshot().leverage, 10);
    }

    #[test]
    fn test_toggle_reports_metrics() {
        let mut session = Session::new("s-1", &test_config());

        let out = session.apply(&SessionEvent::ToggleBlock { id: "lend".to_string() });
        let m = out.metrics.unwrap();
        assert_eq!(m.total_yield_pct, 14.0, "basis pair plus lend keeps the +4 bonus");
        assert_eq!(m.risk_pct, 11);
        assert_eq!(m.protocol_count, 3);

        // Toggling the same block off restores the featured numbers
        let out = session.apply(&SessionEvent::ToggleBlock { id: "lend".to_string() });
        let m = out.metrics.unwrap();
        assert_eq!(m.total_yield_pct, 10.0);
        assert_eq!(m.risk_pct, 15);
    }

    #[test]
    fn test_clear_blocks_empties_composer() {
        let mut session = Session::new("s-1", &test_config());
        let out = session.apply(&SessionEvent::ClearBlocks);
        let m = out.metrics.unwrap();
        assert_eq!(m.total_yield_pct, 0.0);
        assert_eq!(session.snapshot().exposure, "—");
        assert!(session.snapshot().selection.is_empty());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let cfg = test_config();
        let script = sample_script();

        let a = replay("s-1", &cfg, &script);
        let b = replay("s-1", &cfg, &script);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.snapshot(), b.snapshot());

        // A longer script lands on a different fingerprint
        let mut longer = script.clone();
        longer.push(SessionEvent::ToggleBlock { id: "yield-farm".to_string() });
        let c = replay("s-1", &cfg, &longer);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_shape_and_sensitivity() {
        let mut session = Session::new("s-1", &test_config());
        let before = session.fingerprint();
        assert_eq!(before.len(), 64);
        assert!(before.chars().all(|c| c.is_ascii_hexdigit()));

        session.apply(&SessionEvent::SetLeverage { value: 9 });
        assert_ne!(session.fingerprint(), before);
    }

    #[test]
    fn test_event_wire_format() {
        let event = SessionEvent::ToggleBlock { id: "lend".to_string() };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"toggle_block","id":"lend"}"#);

        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);

        let bare: SessionEvent = serde_json::from_str(r#"{"type":"confirm_deposit"}"#).unwrap();
        assert_eq!(bare, SessionEvent::ConfirmDeposit);
    }
}
