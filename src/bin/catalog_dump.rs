//! Dumps every static data table the page renders from — strategy catalog,
//! templates, protocol constellation, dashboard sample, vault yield bars —
//! as one JSON document. Pass a path to write a file, otherwise stdout.

use serde_json::json;
use std::env;
use std::fs;

use vannasim::constellation::{self, CategoryFilter};
use vannasim::{catalog, dashboard, vault};

fn main() {
    let payload = json!({
        "catalog": {
            "fingerprint": catalog::fingerprint(),
            "blocks": catalog::CATALOG,
            "templates": catalog::TEMPLATES,
        },
        "phases": vannasim::phase::PHASES,
        "constellation": {
            "nodes": constellation::NODES,
            "chains": constellation::distinct_chains(),
            "counts": {
                "all": constellation::count(CategoryFilter::All),
                "spot": constellation::count(CategoryFilter::Spot),
                "perps": constellation::count(CategoryFilter::Perps),
                "options": constellation::count(CategoryFilter::Options),
                "yield": constellation::count(CategoryFilter::Yield),
            },
        },
        "dashboard": dashboard::DashboardSnapshot::sample(),
        "vault": {
            "bars": vault::YIELD_BARS,
            "total_yield_pct": vault::total_yield_pct(),
            "comparison": vault::COMPARISON,
        },
    });

    let pretty = serde_json::to_string_pretty(&payload).unwrap_or_default();
    match env::args().nth(1) {
        Some(path) => {
            if let Err(err) = fs::write(&path, &pretty) {
                eprintln!("failed to write {}: {}", path, err);
                std::process::exit(1);
            }
            println!("wrote static dump {}", path);
        }
        None => println!("{}", pretty),
    }
}
