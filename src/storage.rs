use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::session::SessionSnapshot;

/// SQLite-backed archive of session snapshots. One row per persisted tick;
/// the fingerprint column lets replays be checked against recorded runs
/// without rehydrating the whole snapshot.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS snapshots (
                tick INTEGER NOT NULL,
                phase INTEGER NOT NULL,
                asset TEXT NOT NULL,
                deposit_usd REAL NOT NULL,
                deposited INTEGER NOT NULL,
                leverage INTEGER NOT NULL,
                selection TEXT NOT NULL,
                total_yield_pct REAL NOT NULL,
                risk_pct INTEGER NOT NULL,
                exposure TEXT NOT NULL,
                fingerprint TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    pub fn persist(&mut self, snap: &SessionSnapshot) -> Result<()> {
        let selection = serde_json::to_string(&snap.selection)?;
        self.conn.execute(
            "INSERT INTO snapshots (tick, phase, asset, deposit_usd, deposited, leverage,
                                    selection, total_yield_pct, risk_pct, exposure, fingerprint)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                snap.tick as i64,
                snap.phase,
                snap.asset,
                snap.deposit_usd,
                snap.deposited,
                snap.leverage,
                selection,
                snap.total_yield_pct,
                snap.risk_pct,
                snap.exposure,
                snap.fingerprint(),
            ],
        )?;
        Ok(())
    }

    pub fn load_last(&self) -> Result<Option<SessionSnapshot>> {
        let row = self
            .conn
            .query_row(
                "SELECT tick, phase, asset, deposit_usd, deposited, leverage, selection,
                        total_yield_pct, risk_pct, exposure
                 FROM snapshots ORDER BY rowid DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, u8>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, bool>(4)?,
                        row.get::<_, u8>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, f64>(7)?,
                        row.get::<_, u8>(8)?,
                        row.get::<_, String>(9)?,
                    ))
                },
            )
            .optional()?;

        let Some((tick, phase, asset, deposit_usd, deposited, leverage, selection_json,
                  total_yield_pct, risk_pct, exposure)) = row
        else {
            return Ok(None);
        };

        let selection: Vec<String> = serde_json::from_str(&selection_json)?;
        Ok(Some(SessionSnapshot {
            tick: tick as u64,
            phase,
            asset,
            deposit_usd,
            deposited,
            leverage,
            selection,
            total_yield_pct,
            risk_pct,
            exposure,
        }))
    }

    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}
