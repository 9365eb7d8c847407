use serde::Serialize;
use sha2::{Digest, Sha256};

/// Runtime knobs for the scripted walkthrough. Every field has an env
/// override so CI and local runs can reshape a session without rebuilds.
#[derive(Clone, Serialize)]
pub struct Config {
    pub deposit_usd: f64,
    pub asset_index: usize,
    pub leverage: u8,
    pub session_ticks: u64,
    pub scroll_jitter: f64,
    pub sqlite_path: String,
    pub persist_every_ticks: u64,
    pub seed: u64,
    pub log_every_ticks: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            deposit_usd: std::env::var("DEPOSIT_USD").ok().and_then(|v| v.parse().ok()).unwrap_or(1000.0),
            asset_index: std::env::var("ASSET_INDEX").ok().and_then(|v| v.parse().ok()).unwrap_or(0),
            leverage: std::env::var("LEVERAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(5),
            session_ticks: std::env::var("SESSION_TICKS").ok().and_then(|v| v.parse().ok()).unwrap_or(240),
            scroll_jitter: std::env::var("SCROLL_JITTER").ok().and_then(|v| v.parse().ok()).unwrap_or(0.004),
            sqlite_path: std::env::var("SQLITE_PATH").unwrap_or_else(|_| "./walkthrough.sqlite".to_string()),
            persist_every_ticks: std::env::var("PERSIST_EVERY_TICKS").ok().and_then(|v| v.parse().ok()).unwrap_or(24),
            seed: std::env::var("SEED").ok().and_then(|v| v.parse().ok()).unwrap_or(7),
            log_every_ticks: std::env::var("LOG_EVERY_TICKS").ok().and_then(|v| v.parse().ok()).unwrap_or(12),
        }
    }

    /// Base scroll progress for a tick. The last tick of a session lands
    /// exactly on 1.0 so every sweep touches both endpoints.
    pub fn progress_at(&self, tick: u64) -> f64 {
        if self.session_ticks <= 1 {
            return 1.0;
        }
        let span = (self.session_ticks - 1) as f64;
        (tick as f64 / span).min(1.0)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Stable identity for a parameter set. Hashes the canonical JSON
    /// encoding so runs with identical knobs report identical hashes.
    pub fn config_hash(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
