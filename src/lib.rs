//! Core engine for the Vanna landing-page walkthrough: scroll phasing,
//! strategy math, deposit simulation, and deterministic session replay.
//!
//! Everything here is synchronous and total. Each interactive surface of the
//! page is a small state machine over static catalog data, so a scripted run
//! (see the walkthrough driver in `main.rs`) produces the same snapshots,
//! the same metrics, and the same fingerprints on every machine.

pub mod catalog;
pub mod composer;
pub mod config;
pub mod constellation;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod phase;
pub mod session;
pub mod simulator;
pub mod storage;
pub mod vault;
