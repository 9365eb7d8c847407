//! Scripted walkthrough driver: sweeps scroll progress 0→1 with seeded
//! jitter, interleaves deposit/leverage/composer interactions along the way,
//! persists snapshots on a fixed cadence, and verifies at shutdown that the
//! recorded script replays to the same fingerprint.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vannasim::catalog;
use vannasim::config::Config;
use vannasim::logging::{self, log, obj, v_str, Domain, Level, ProfileScope};
use vannasim::session::{self, Session, SessionEvent};
use vannasim::simulator::LEVERAGE_MAX;
use vannasim::storage::SessionStore;

/// Build the event script for one session. Scroll samples follow the tick
/// ramp with bounded jitter, forced monotone so the sweep crosses each phase
/// boundary exactly once. Widget interactions fire at fixed fractions of the
/// session so any SESSION_TICKS setting tells the same story.
fn build_script(cfg: &Config, rng: &mut StdRng) -> Vec<SessionEvent> {
    let ticks = cfg.session_ticks.max(2);
    let landmark = |f: f64| (ticks as f64 * f) as u64;

    let deposit_at = landmark(0.15);
    let confirm_at = landmark(0.20);
    let leverage_at = landmark(0.40);
    let template_at = landmark(0.55);
    let farm_toggle_at = landmark(0.62);
    let lend_toggle_at = landmark(0.70);
    let basis_at = landmark(0.80);

    let deposit_amount = rng.gen_range(5u32..=50) as f64 * 100.0;
    let leverage = rng.gen_range(6..=LEVERAGE_MAX);
    // A negative SCROLL_JITTER would invert the sample range
    let jitter_bound = cfg.scroll_jitter.abs();

    let mut events = Vec::new();
    let mut last_progress = 0.0_f64;
    for tick in 0..ticks {
        let base = cfg.progress_at(tick);
        let jitter = rng.gen_range(-jitter_bound..=jitter_bound);
        let mut progress = (base + jitter).clamp(0.0, 1.0);
        if tick == 0 {
            progress = 0.0;
        }
        if tick == ticks - 1 {
            progress = 1.0;
        }
        progress = progress.max(last_progress);
        last_progress = progress;
        events.push(SessionEvent::Scroll { progress });

        if tick == deposit_at {
            events.push(SessionEvent::SelectAsset { index: 0 });
            events.push(SessionEvent::SetDeposit { amount: deposit_amount });
        }
        if tick == confirm_at {
            events.push(SessionEvent::ConfirmDeposit);
        }
        if tick == leverage_at {
            events.push(SessionEvent::SetLeverage { value: leverage });
        }
        if tick == template_at {
            events.push(SessionEvent::ApplyTemplate { id: "protected-farm".to_string() });
        }
        if tick == farm_toggle_at {
            events.push(SessionEvent::ToggleBlock { id: "yield-farm".to_string() });
        }
        if tick == lend_toggle_at {
            events.push(SessionEvent::ToggleBlock { id: "lend".to_string() });
        }
        if tick == basis_at {
            events.push(SessionEvent::ApplyTemplate { id: "basis".to_string() });
        }
    }
    events
}

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let session_id = format!("w-{}", cfg.seed);

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("msg", v_str("walkthrough starting")),
            ("session_id", v_str(&session_id)),
            ("config_hash", v_str(&cfg.config_hash())),
            ("catalog_fingerprint", v_str(&catalog::fingerprint())),
            ("config", serde_json::to_value(&cfg).unwrap_or_default()),
        ]),
    );

    let mut store = SessionStore::new(&cfg.sqlite_path)?;
    store.init()?;

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let script = build_script(&cfg, &mut rng);
    let mut session = Session::new(&session_id, &cfg);

    let log_every = cfg.log_every_ticks.max(1);
    let persist_every = cfg.persist_every_ticks.max(1);

    {
        let _scope = ProfileScope::new("walkthrough", "run_script");
        for event in &script {
            let outcome = session.apply(event);

            if let SessionEvent::Scroll { progress } = event {
                logging::agg_increment("scroll_sample");
                if session.tick() % log_every == 0 {
                    logging::log_scroll_sample(
                        &session_id,
                        session.tick(),
                        *progress,
                        session.tracker().current(),
                    );
                }
                if session.tick() % persist_every == 0 {
                    store.persist(&session.snapshot())?;
                    logging::agg_increment("persist");
                    logging::log_snapshot_persisted(&session_id, session.tick(), &session.fingerprint());
                }
                logging::tick_aggregator();
            }

            if let Some(change) = outcome.phase_change {
                logging::agg_increment("phase_change");
                logging::log_phase_change(&session_id, change.from, change.to, change.progress);
            }

            match event {
                SessionEvent::ConfirmDeposit => {
                    let deposit = session.deposit();
                    logging::log_deposit(
                        &session_id,
                        deposit.asset().symbol,
                        deposit.amount_usd(),
                        deposit.credit_line(),
                    );
                }
                SessionEvent::ToggleBlock { id } => {
                    logging::agg_increment("toggle");
                    let selected = session.composer().selection().iter().any(|s| s == id);
                    logging::log_toggle(&session_id, id, selected, session.composer().selection().len());
                }
                SessionEvent::ApplyTemplate { id } => {
                    let applied = session.composer().active_template() == Some(id.as_str());
                    logging::log_template(&session_id, id, applied);
                }
                _ => {}
            }

            if let Some(metrics) = &outcome.metrics {
                logging::log_metrics(
                    &session_id,
                    metrics.exposure.as_str(),
                    metrics.total_yield_pct,
                    metrics.risk_pct,
                    metrics.risk_label.as_str(),
                    metrics.protocol_count,
                );
            }
        }
    }

    // Final state always lands in the store, whatever the cadence
    store.persist(&session.snapshot())?;

    // Replay the recorded script and confirm the run is reproducible
    let replayed = session::replay(&session_id, &cfg, &script);
    let live_print = session.fingerprint();
    let replay_print = replayed.fingerprint();
    log(
        Level::Info,
        Domain::Session,
        "replay_check",
        obj(&[
            ("result", v_str(if live_print == replay_print { "pass" } else { "fail" })),
            ("fingerprint", v_str(&live_print)),
        ]),
    );
    if live_print != replay_print {
        anyhow::bail!("replay fingerprint mismatch: {} vs {}", live_print, replay_print);
    }

    let final_metrics = session.composer().metrics();
    logging::log_walkthrough_summary(
        session.tick(),
        session.tracker().transitions(),
        session.tracker().current(),
        store.count()?,
        final_metrics.total_yield_pct,
        final_metrics.risk_pct,
    );
    logging::flush_aggregator();
    Ok(())
}
