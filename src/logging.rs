//! Structured logging for the walkthrough engine.
//!
//! Design goals:
//! 1. Multi-level granularity (TRACE → FATAL)
//! 2. Domain-specific categories for filtering
//! 3. Summarization-friendly periodic checkpoints
//! 4. Replay/audit support via deterministic sequence numbers and state hashes

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Scroll,    // Progress samples, phase transitions
    Composer,  // Block toggles, template application
    Simulator, // Deposit flow, leverage math
    Session,   // Event application, fingerprints
    Storage,   // Snapshot persistence
    System,    // Startup, shutdown, summaries
    Profile,   // Performance profiling
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Scroll => "scroll",
            Domain::Composer => "composer",
            Domain::Simulator => "simulator",
            Domain::Session => "session",
            Domain::Storage => "storage",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // Check LOG_DOMAINS env var (comma-separated list or "all")
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Sequence counter for ordering
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static PROFILE_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
    metrics: Mutex<BufWriter<File>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let base = std::env::var("LOG_DIR").unwrap_or_else(|_| "out/runs".to_string());
        let mut run_dir = PathBuf::from(base);
        run_dir.push(&run_id);
        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
        }
        let events_path = run_dir.join("events.jsonl");
        let trace_path = run_dir.join("trace.jsonl");
        let metrics_path = run_dir.join("metrics.jsonl");
        let manifest_path = run_dir.join("manifest.json");

        let _ = std::fs::write(
            manifest_path,
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
                "log_dir": run_dir.to_string_lossy(),
            })
            .to_string(),
        );

        let events = File::create(events_path).unwrap_or_else(|err| {
            eprintln!("[log] failed to create events log: {}", err);
            File::create("/tmp/vannasim-events.jsonl").expect("events fallback")
        });
        let trace = File::create(trace_path).unwrap_or_else(|err| {
            eprintln!("[log] failed to create trace log: {}", err);
            File::create("/tmp/vannasim-trace.jsonl").expect("trace fallback")
        });
        let metrics = File::create(metrics_path).unwrap_or_else(|err| {
            eprintln!("[log] failed to create metrics log: {}", err);
            File::create("/tmp/vannasim-metrics.jsonl").expect("metrics fallback")
        });

        RunContext {
            run_id,
            events: Mutex::new(BufWriter::new(events)),
            trace: Mutex::new(BufWriter::new(trace)),
            metrics: Mutex::new(BufWriter::new(metrics)),
        }
    })
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["session_id", "phase", "block_id", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds (for replay correlation)
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    let min_level = Level::from_env();
    if level < min_level || !domain.is_enabled() {
        return;
    }

    emit_record(level, domain.as_str(), event, fields);
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));

    let line = Value::Object(entry).to_string();
    if event.starts_with("metrics.") {
        write_line(&ctx.metrics, &line);
    }
    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    println!("{}", line);
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_scroll_sample(session_id: &str, tick: u64, progress: f64, phase: u8) {
    log(
        Level::Trace,
        Domain::Scroll,
        "scroll_sample",
        obj(&[
            ("session_id", v_str(session_id)),
            ("tick", json!(tick)),
            ("progress", v_num(progress)),
            ("phase", json!(phase)),
        ]),
    );
}

pub fn log_phase_change(session_id: &str, from: u8, to: u8, progress: f64) {
    log(
        Level::Info,
        Domain::Scroll,
        "phase_change",
        obj(&[
            ("session_id", v_str(session_id)),
            ("from", json!(from)),
            ("to", json!(to)),
            ("progress", v_num(progress)),
        ]),
    );
}

pub fn log_toggle(session_id: &str, block_id: &str, selected: bool, count: usize) {
    log(
        Level::Info,
        Domain::Composer,
        "toggle",
        obj(&[
            ("session_id", v_str(session_id)),
            ("block_id", v_str(block_id)),
            ("selected", json!(selected)),
            ("count", json!(count)),
        ]),
    );
}

pub fn log_template(session_id: &str, template_id: &str, applied: bool) {
    log(
        Level::Info,
        Domain::Composer,
        "template",
        obj(&[
            ("session_id", v_str(session_id)),
            ("template_id", v_str(template_id)),
            ("applied", json!(applied)),
        ]),
    );
}

pub fn log_metrics(
    session_id: &str,
    exposure: &str,
    total_yield_pct: f64,
    risk_pct: u8,
    risk_label: &str,
    protocol_count: usize,
) {
    log(
        Level::Info,
        Domain::Composer,
        "metrics.strategy",
        obj(&[
            ("session_id", v_str(session_id)),
            ("exposure", v_str(exposure)),
            ("total_yield_pct", v_num(total_yield_pct)),
            ("risk_pct", json!(risk_pct)),
            ("risk_label", v_str(risk_label)),
            ("protocol_count", json!(protocol_count)),
        ]),
    );
}

pub fn log_deposit(session_id: &str, asset: &str, amount_usd: f64, credit_line: f64) {
    log(
        Level::Info,
        Domain::Simulator,
        "deposit_confirmed",
        obj(&[
            ("session_id", v_str(session_id)),
            ("asset", v_str(asset)),
            ("amount_usd", v_num(amount_usd)),
            ("credit_line", v_num(credit_line)),
        ]),
    );
}

pub fn log_snapshot_persisted(session_id: &str, tick: u64, fingerprint: &str) {
    log(
        Level::Info,
        Domain::Storage,
        "snapshot_persisted",
        obj(&[
            ("session_id", v_str(session_id)),
            ("tick", json!(tick)),
            ("fingerprint", v_str(fingerprint)),
        ]),
    );
}

/// Session summary on shutdown
pub fn log_walkthrough_summary(
    ticks: u64,
    transitions: u64,
    final_phase: u8,
    snapshots: u64,
    total_yield_pct: f64,
    risk_pct: u8,
) {
    log(
        Level::Info,
        Domain::System,
        "walkthrough_summary",
        obj(&[
            ("ticks", json!(ticks)),
            ("transitions", json!(transitions)),
            ("final_phase", json!(final_phase)),
            ("snapshots", json!(snapshots)),
            ("total_yield_pct", v_num(total_yield_pct)),
            ("risk_pct", json!(risk_pct)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Profiling scope that emits structured timing on drop.
pub struct ProfileScope {
    domain: Domain,
    label: &'static str,
    context: Option<Map<String, Value>>,
    started: Instant,
    enabled: bool,
}

impl ProfileScope {
    pub fn new(_module: &'static str, label: &'static str) -> Self {
        let enabled = Self::should_sample();
        Self {
            domain: Domain::Profile,
            label,
            context: None,
            started: Instant::now(),
            enabled,
        }
    }

    pub fn with_context(
        _module: &'static str,
        label: &'static str,
        fields: &[(&str, Value)],
    ) -> Self {
        let enabled = Self::should_sample();
        Self {
            domain: Domain::Profile,
            label,
            context: if enabled { Some(obj(fields)) } else { None },
            started: Instant::now(),
            enabled,
        }
    }

    fn should_sample() -> bool {
        std::env::var("PROFILE_SAMPLE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|p| {
                if p >= 1.0 {
                    true
                } else if p <= 0.0 {
                    false
                } else {
                    let seq = PROFILE_SEQ.fetch_add(1, Ordering::SeqCst);
                    let bucket = (seq % 10_000) as f64 / 10_000.0;
                    bucket < p
                }
            })
            .unwrap_or(true)
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut fields = self.context.take().unwrap_or_default();
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed_ms));
        log(Level::Trace, self.domain, "profile", fields);
    }
}

// =============================================================================
// Log Aggregator for Periodic Summaries
// =============================================================================

static AGGREGATOR: OnceLock<Mutex<LogAggregator>> = OnceLock::new();

fn get_aggregator() -> &'static Mutex<LogAggregator> {
    AGGREGATOR.get_or_init(|| Mutex::new(LogAggregator::new()))
}

struct LogAggregator {
    scroll_samples: u64,
    phase_changes: u64,
    toggles: u64,
    persists: u64,
    last_flush: Instant,
    flush_interval_secs: u64,
}

impl LogAggregator {
    fn new() -> Self {
        Self {
            scroll_samples: 0,
            phase_changes: 0,
            toggles: 0,
            persists: 0,
            last_flush: Instant::now(),
            flush_interval_secs: std::env::var("LOG_FLUSH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    fn increment(&mut self, event: &str) {
        match event {
            "scroll_sample" => self.scroll_samples += 1,
            "phase_change" => self.phase_changes += 1,
            "toggle" => self.toggles += 1,
            "persist" => self.persists += 1,
            _ => {}
        }
    }

    fn drain(&mut self) -> (u64, u64, u64, u64) {
        let result = (
            self.scroll_samples,
            self.phase_changes,
            self.toggles,
            self.persists,
        );
        self.scroll_samples = 0;
        self.phase_changes = 0;
        self.toggles = 0;
        self.persists = 0;
        self.last_flush = Instant::now();
        result
    }

    fn maybe_flush(&mut self) -> Option<(u64, u64, u64, u64)> {
        if self.last_flush.elapsed().as_secs() >= self.flush_interval_secs {
            Some(self.drain())
        } else {
            None
        }
    }
}

fn emit_aggregated(counts: (u64, u64, u64, u64)) {
    let (samples, changes, toggles, persists) = counts;
    log(
        Level::Info,
        Domain::System,
        "aggregated_stats",
        obj(&[
            ("scroll_samples", json!(samples)),
            ("phase_changes", json!(changes)),
            ("toggles", json!(toggles)),
            ("persists", json!(persists)),
        ]),
    );
}

/// Call periodically to emit aggregated stats
pub fn tick_aggregator() {
    if let Ok(mut agg) = get_aggregator().lock() {
        if let Some(counts) = agg.maybe_flush() {
            emit_aggregated(counts);
        }
    }
}

/// Force-emit aggregated stats regardless of the flush interval.
///
/// Scripted walkthroughs finish in well under the flush window, so the
/// driver calls this once on shutdown.
pub fn flush_aggregator() {
    if let Ok(mut agg) = get_aggregator().lock() {
        emit_aggregated(agg.drain());
    }
}

/// Increment a counter in the aggregator
pub fn agg_increment(event: &str) {
    if let Ok(mut agg) = get_aggregator().lock() {
        agg.increment(event);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_domain_labels() {
        assert_eq!(Domain::Scroll.as_str(), "scroll");
        assert_eq!(Domain::Composer.as_str(), "composer");
        assert_eq!(Domain::Storage.as_str(), "storage");
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }

    #[test]
    fn test_split_fields_promotes_known_keys() {
        let fields = obj(&[
            ("session_id", v_str("s-1")),
            ("block_id", v_str("perp-short")),
            ("detail", v_num(1.0)),
        ]);
        let (top, data) = split_fields(fields);
        assert!(top.contains_key("session_id"));
        assert!(top.contains_key("block_id"));
        assert!(data.contains_key("detail"));
        assert!(!data.contains_key("session_id"));
    }
}
