//! Traces the phase schedule for a fixed-step scroll sweep: one line per
//! emitted transition plus a tail summary. STEPS controls the resolution;
//! any value lands on the same four phases because the sweep is monotone.

use std::env;

use vannasim::phase::{compute_phase, content_opacity, PhaseTracker, PHASES};

fn main() {
    let steps: u64 = env::var("STEPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(400);
    let steps = steps.max(1);

    let mut tracker = PhaseTracker::new();
    for i in 0..=steps {
        let progress = i as f64 / steps as f64;
        if let Some(change) = tracker.observe(progress) {
            let info = &PHASES[change.to as usize];
            println!(
                "{:>9.5}  phase {} -> {}  [{}] {:<20} opacity {:.2}",
                change.progress,
                change.from,
                change.to,
                info.tag,
                info.title,
                content_opacity(change.progress),
            );
        }
    }

    println!(
        "steps={} final_phase={} transitions={}",
        steps,
        tracker.current(),
        tracker.transitions(),
    );

    // A monotone 0..=1 sweep crosses each boundary exactly once
    if tracker.transitions() != 3 || tracker.current() != compute_phase(1.0) {
        eprintln!(
            "sweep invariant broken: transitions={} final={}",
            tracker.transitions(),
            tracker.current()
        );
        std::process::exit(1);
    }
}
