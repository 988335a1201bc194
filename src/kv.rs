//! Flat key-value store with per-key expiry, backed by SQLite.
//!
//! This is the engine's only persistence primitive: `get`, `put` with a TTL,
//! `delete`, and cursor-paginated `list` in native key order. No
//! transactions, no secondary indexes and no compare-and-swap are exposed;
//! callers read-modify-write whole records and are written to tolerate the
//! races that implies. Expired entries are dropped lazily on read and swept
//! by [`Kv::purge_expired`].

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    ns         TEXT NOT NULL,
    key        TEXT NOT NULL,
    value      TEXT NOT NULL,
    expires_at INTEGER NOT NULL,
    PRIMARY KEY (ns, key)
);
CREATE INDEX IF NOT EXISTS idx_kv_entries_expiry ON kv_entries (expires_at);
";

/// One page of keys from [`Kv::list`].
#[derive(Debug, Clone)]
pub struct KvPage {
    /// Keys in native (lexicographic) order.
    pub keys: Vec<String>,
    /// Pass back as the next call's cursor. Only meaningful with `has_more`.
    pub cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Clone)]
pub struct Kv {
    pool: Pool<SqliteConnectionManager>,
}

impl Kv {
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
        });
        let pool = Pool::builder().max_size(8).build(manager)?;
        let kv = Self { pool };
        kv.init()?;
        Ok(kv)
    }

    /// In-memory store for tests. Pool size 1 keeps every caller on the
    /// single connection that owns the in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        let kv = Self { pool };
        kv.init()?;
        Ok(kv)
    }

    fn init(&self) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Fetch a value. An entry past its expiry is deleted and reported as
    /// absent, exactly as if the store had already evicted it.
    pub fn get(&self, ns: &str, key: &str) -> Result<Option<String>> {
        let conn = self.pool.get()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT value, expires_at FROM kv_entries WHERE ns = ?1 AND key = ?2",
                params![ns, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((value, expires_at)) => {
                if expires_at <= Utc::now().timestamp() {
                    conn.execute(
                        "DELETE FROM kv_entries WHERE ns = ?1 AND key = ?2",
                        params![ns, key],
                    )?;
                    Ok(None)
                } else {
                    Ok(Some(value))
                }
            }
            None => Ok(None),
        }
    }

    /// Insert or fully overwrite a value, resetting its TTL.
    pub fn put(&self, ns: &str, key: &str, value: &str, ttl_secs: i64) -> Result<()> {
        let conn = self.pool.get()?;
        let expires_at = Utc::now().timestamp() + ttl_secs;
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (ns, key, value, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![ns, key, value, expires_at],
        )?;
        Ok(())
    }

    pub fn delete(&self, ns: &str, key: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM kv_entries WHERE ns = ?1 AND key = ?2",
            params![ns, key],
        )?;
        Ok(())
    }

    /// List live keys in a namespace in key order, starting after `cursor`.
    pub fn list(&self, ns: &str, limit: usize, cursor: Option<&str>) -> Result<KvPage> {
        let conn = self.pool.get()?;
        let now = Utc::now().timestamp();
        let after = cursor.unwrap_or("");

        // Fetch one extra row to learn whether another page exists.
        let mut stmt = conn.prepare(
            "SELECT key FROM kv_entries
             WHERE ns = ?1 AND key > ?2 AND expires_at > ?3
             ORDER BY key
             LIMIT ?4",
        )?;
        let mut keys: Vec<String> = stmt
            .query_map(params![ns, after, now, (limit + 1) as i64], |row| {
                row.get(0)
            })?
            .collect::<std::result::Result<_, _>>()?;

        let has_more = keys.len() > limit;
        if has_more {
            keys.truncate(limit);
        }
        let cursor = if has_more { keys.last().cloned() } else { None };

        Ok(KvPage {
            keys,
            cursor,
            has_more,
        })
    }

    /// Sweep entries past their expiry. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute(
            "DELETE FROM kv_entries WHERE expires_at <= ?1",
            params![Utc::now().timestamp()],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("orders", "ORD-1", "{\"a\":1}", 60).unwrap();
        assert_eq!(kv.get("orders", "ORD-1").unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(kv.get("orders", "ORD-2").unwrap(), None);
        assert_eq!(kv.get("tokens", "ORD-1").unwrap(), None);
    }

    #[test]
    fn overwrite_replaces_value() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("orders", "ORD-1", "v1", 60).unwrap();
        kv.put("orders", "ORD-1", "v2", 60).unwrap();
        assert_eq!(kv.get("orders", "ORD-1").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("tokens", "TOK-1", "v", 0).unwrap();
        assert_eq!(kv.get("tokens", "TOK-1").unwrap(), None);
        // The lazy delete removed the row entirely
        assert_eq!(kv.list("tokens", 10, None).unwrap().keys.len(), 0);
    }

    #[test]
    fn delete_removes_entry() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("licenses", "VG-1", "v", 60).unwrap();
        kv.delete("licenses", "VG-1").unwrap();
        assert_eq!(kv.get("licenses", "VG-1").unwrap(), None);
    }

    #[test]
    fn list_paginates_in_key_order() {
        let kv = Kv::open_in_memory().unwrap();
        for key in ["C", "A", "E", "B", "D"] {
            kv.put("orders", key, "v", 60).unwrap();
        }

        let first = kv.list("orders", 2, None).unwrap();
        assert_eq!(first.keys, vec!["A", "B"]);
        assert!(first.has_more);

        let second = kv.list("orders", 2, first.cursor.as_deref()).unwrap();
        assert_eq!(second.keys, vec!["C", "D"]);
        assert!(second.has_more);

        let last = kv.list("orders", 2, second.cursor.as_deref()).unwrap();
        assert_eq!(last.keys, vec!["E"]);
        assert!(!last.has_more);
        assert_eq!(last.cursor, None);
    }

    #[test]
    fn list_skips_expired_entries() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("orders", "A", "v", 60).unwrap();
        kv.put("orders", "B", "v", 0).unwrap();
        kv.put("orders", "C", "v", 60).unwrap();

        let page = kv.list("orders", 10, None).unwrap();
        assert_eq!(page.keys, vec!["A", "C"]);
    }

    #[test]
    fn purge_sweeps_expired_rows() {
        let kv = Kv::open_in_memory().unwrap();
        kv.put("orders", "A", "v", 0).unwrap();
        kv.put("orders", "B", "v", 60).unwrap();
        assert_eq!(kv.purge_expired().unwrap(), 1);
        assert_eq!(kv.get("orders", "B").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        let path = path.to_str().unwrap();

        {
            let kv = Kv::open(path).unwrap();
            kv.put("orders", "ORD-1", "v", 60).unwrap();
        }
        let kv = Kv::open(path).unwrap();
        assert_eq!(kv.get("orders", "ORD-1").unwrap().as_deref(), Some("v"));
    }
}
