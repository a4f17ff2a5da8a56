//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine calls store methods. Nothing else executes SQL.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    command::JournalEntry,
    error::DeskResult,
    snapshot::DeskSnapshot,
};

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    /// Open (or create) the desk database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn.execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Snapshot ───────────────────────────────────────────────

    /// Replace whatever snapshot is stored with `snapshot`.
    pub fn save_snapshot(&self, snapshot: &DeskSnapshot) -> DeskResult<()> {
        let json = snapshot.to_json()?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM snapshot", [])?;
        Self::insert_snapshot(&tx, snapshot.sequence, &json)?;
        tx.commit()?;
        log::debug!("Snapshot saved at sequence {}", snapshot.sequence);
        Ok(())
    }

    /// Journal row and new snapshot in one transaction; older snapshots are
    /// pruned in the same write. Either everything lands or nothing does.
    pub fn commit_transition(&self, entry: &JournalEntry, snapshot: &DeskSnapshot) -> DeskResult<()> {
        let json = snapshot.to_json()?;
        let tx = self.conn.unchecked_transaction()?;
        Self::insert_journal(&tx, entry)?;
        Self::insert_snapshot(&tx, snapshot.sequence, &json)?;
        tx.execute(
            "DELETE FROM snapshot WHERE sequence < ?1",
            params![snapshot.sequence as i64],
        )?;
        tx.commit()?;
        log::debug!("Transition committed at sequence {}", snapshot.sequence);
        Ok(())
    }

    fn insert_snapshot(conn: &Connection, sequence: u64, json: &str) -> DeskResult<()> {
        conn.execute(
            "INSERT INTO snapshot (sequence, state_json, saved_at) VALUES (?1, ?2, ?3)",
            params![sequence as i64, json, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn latest_snapshot(&self) -> DeskResult<Option<DeskSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM snapshot ORDER BY sequence DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| DeskSnapshot::from_json(&j)).transpose()
    }

    pub fn snapshot_count(&self) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM snapshot", [], |row| row.get(0))?;
        Ok(count)
    }

    // ── Journal ────────────────────────────────────────────────

    pub fn append_journal(&self, entry: &JournalEntry) -> DeskResult<()> {
        Self::insert_journal(&self.conn, entry)
    }

    fn insert_journal(conn: &Connection, entry: &JournalEntry) -> DeskResult<()> {
        conn.execute(
            "INSERT INTO journal (sequence, command_id, command_type, command_json, events_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.sequence as i64,
                entry.command_id,
                entry.command_type,
                entry.command_json,
                entry.events_json,
            ],
        )?;
        Ok(())
    }

    pub fn journal_entries(&self) -> DeskResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence, command_id, command_type, command_json, events_json
             FROM journal ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(JournalEntry {
                    id:           Some(row.get(0)?),
                    sequence:     row.get::<_, i64>(1)? as u64,
                    command_id:   row.get(2)?,
                    command_type: row.get(3)?,
                    command_json: row.get(4)?,
                    events_json:  row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
