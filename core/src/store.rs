//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Kernels never touch the store; the engine writes their results.

use crate::{error::SimResult, types::RunId};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// One cached susceptibility measurement, keyed by `beta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SusceptibilityRecord {
    pub beta: f64,
    pub susceptibility: f64,
    pub nsteps: u64,
    pub size: usize,
    pub run_id: RunId,
    pub recorded_at: String,
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the simulation database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO run (run_id, seed, version, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, now_rfc3339()],
        )?;
        Ok(())
    }

    pub fn run_seed(&self, run_id: &str) -> SimResult<Option<u64>> {
        let seed = self
            .conn
            .query_row("SELECT seed FROM run WHERE run_id = ?1", params![run_id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        Ok(seed.map(|s| s as u64))
    }

    // ── Susceptibility cache ───────────────────────────────────

    /// Insert or replace the record for `beta`.
    pub fn upsert_susceptibility(
        &self,
        run_id: &str,
        beta: f64,
        susceptibility: f64,
        nsteps: u64,
        size: usize,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO susceptibility (beta, susceptibility, nsteps, size, run_id, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(beta) DO UPDATE SET
                susceptibility = excluded.susceptibility,
                nsteps         = excluded.nsteps,
                size           = excluded.size,
                run_id         = excluded.run_id,
                recorded_at    = excluded.recorded_at",
            params![beta, susceptibility, nsteps as i64, size as i64, run_id, now_rfc3339()],
        )?;
        log::info!("Susceptibility cached: beta={beta:.3} chi={susceptibility:.3} (run {run_id})");
        Ok(())
    }

    /// The whole cache, ordered by `beta`.
    pub fn all_susceptibilities(&self) -> SimResult<Vec<SusceptibilityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT beta, susceptibility, nsteps, size, run_id, recorded_at
             FROM susceptibility ORDER BY beta ASC",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(SusceptibilityRecord {
                    beta:           row.get(0)?,
                    susceptibility: row.get(1)?,
                    nsteps:         row.get::<_, i64>(2)? as u64,
                    size:           row.get::<_, i64>(3)? as usize,
                    run_id:         row.get(4)?,
                    recorded_at:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SimStore {
        let store = SimStore::in_memory().expect("in-memory store");
        store.migrate().expect("migration");
        store.insert_run("r1", 42, "test").expect("insert run");
        store
    }

    #[test]
    fn same_beta_is_replaced() {
        let store = store();
        store.upsert_susceptibility("r1", 0.5, 10.0, 100, 10).unwrap();
        store.upsert_susceptibility("r1", 0.5, 12.0, 200, 20).unwrap();
        let all = store.all_susceptibilities().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].susceptibility, 12.0);
        assert_eq!(all[0].nsteps, 200);
        assert_eq!(all[0].size, 20);
    }

    #[test]
    fn records_come_back_sorted_by_beta() {
        let store = store();
        for beta in [2.0, 0.1, 1.0] {
            store.upsert_susceptibility("r1", beta, beta * 3.0, 10, 5).unwrap();
        }
        let betas: Vec<f64> = store.all_susceptibilities().unwrap().iter().map(|r| r.beta).collect();
        assert_eq!(betas, vec![0.1, 1.0, 2.0]);
    }

    #[test]
    fn open_accepts_memory_path() {
        let store = SimStore::open(":memory:").unwrap();
        store.migrate().unwrap();
        store.insert_run("r2", 7, "test").unwrap();
        store.upsert_susceptibility("r2", 0.3, 1.5, 10, 4).unwrap();
        assert_eq!(store.all_susceptibilities().unwrap().len(), 1);
    }

    #[test]
    fn unknown_run_is_rejected() {
        let store = store();
        assert!(store.upsert_susceptibility("missing", 1.0, 1.0, 1, 1).is_err());
        assert_eq!(store.run_seed("r1").unwrap(), Some(42));
        assert_eq!(store.run_seed("missing").unwrap(), None);
    }
}
