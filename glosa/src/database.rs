//! SQLite database layer for glossary storage
//!
//! Tables: `terms` (keyed by id), `favorites` (id set) and `history`
//! (query log bounded to the newest rows).
//! Uses r2d2 connection pooling to allow concurrent reads without mutex blocking.

use crate::interface::Term;
use crate::search::{sort_labels, sort_terms};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// History rows kept after each insert
pub const HISTORY_CAPACITY: usize = 100;

/// History rows returned by a read
pub const HISTORY_READ_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedSchema { found: i64, expected: i64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

const TERM_COLUMNS: &str = "id, category, es, en, de, fr, synonyms_es, notes";

/// Thread-safe database wrapper using connection pooling
///
/// WAL mode lets readers proceed without blocking each other, and a reader
/// never sees half of an open write transaction.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| {
                conn.execute_batch("
                    PRAGMA journal_mode=WAL;
                    PRAGMA synchronous=NORMAL;
                    PRAGMA busy_timeout=5000;
                ")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        tracing::debug!(path = %path.display(), "opened glossary database");
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Get a connection from the pool
    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Create tables and indexes, or validate an existing schema
    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;

        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version != 0 && version != SCHEMA_VERSION {
            return Err(DatabaseError::UnsupportedSchema {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS terms (
                id TEXT PRIMARY KEY NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                es TEXT NOT NULL DEFAULT '',
                en TEXT NOT NULL DEFAULT '',
                de TEXT NOT NULL DEFAULT '',
                fr TEXT NOT NULL DEFAULT '',
                synonyms_es TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS favorites (
                id TEXT PRIMARY KEY NOT NULL
            );

            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_terms_es ON terms(es);
            CREATE INDEX IF NOT EXISTS idx_terms_en ON terms(en);
            CREATE INDEX IF NOT EXISTS idx_terms_de ON terms(de);
            CREATE INDEX IF NOT EXISTS idx_terms_fr ON terms(fr);
            CREATE INDEX IF NOT EXISTS idx_terms_category ON terms(category);
            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp);
        "#)?;

        if version == 0 {
            conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Terms
    // ─────────────────────────────────────────────────────────────────────────────

    /// Get total number of terms in the database
    pub fn count_terms(&self) -> DatabaseResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM terms", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn has_terms(&self) -> DatabaseResult<bool> {
        let conn = self.get_conn()?;
        let exists: bool = conn.query_row("SELECT EXISTS(SELECT 1 FROM terms)", [], |row| row.get(0))?;
        Ok(exists)
    }

    /// Insert-or-replace every term in a single transaction.
    /// Returns the number of rows written.
    pub fn upsert_terms(&self, terms: &[Term]) -> DatabaseResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = Self::begin_write(&mut conn)?;
        let written = Self::upsert_in_tx(&tx, terms)?;
        tx.commit()?;
        Ok(written)
    }

    /// Upsert `terms` only if the table is empty, checking and writing in one
    /// transaction. Returns `None` when the store was already seeded.
    ///
    /// The write lock is held before the emptiness check, so overlapping
    /// imports queue on `busy_timeout` and the later ones see the seeded table.
    pub fn import_if_empty(&self, terms: &[Term]) -> DatabaseResult<Option<usize>> {
        let mut conn = self.get_conn()?;
        let tx = Self::begin_write(&mut conn)?;

        let seeded: bool = tx.query_row("SELECT EXISTS(SELECT 1 FROM terms)", [], |row| row.get(0))?;
        if seeded {
            return Ok(None);
        }

        let written = Self::upsert_in_tx(&tx, terms)?;
        tx.commit()?;
        Ok(Some(written))
    }

    /// Start a transaction that takes the write lock immediately.
    /// A deferred transaction that reads first cannot upgrade to a write
    /// while another connection writes; it fails with SQLITE_BUSY instead
    /// of waiting.
    fn begin_write(conn: &mut rusqlite::Connection) -> DatabaseResult<rusqlite::Transaction<'_>> {
        Ok(conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?)
    }

    fn upsert_in_tx(tx: &rusqlite::Transaction, terms: &[Term]) -> DatabaseResult<usize> {
        let mut stmt = tx.prepare_cached(
            r#"INSERT OR REPLACE INTO terms (id, category, es, en, de, fr, synonyms_es, notes)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )?;
        let mut written = 0;
        for term in terms {
            written += stmt.execute(params![
                term.id,
                term.category,
                term.es,
                term.en,
                term.de,
                term.fr,
                term.synonyms_es,
                term.notes,
            ])?;
        }
        Ok(written)
    }

    /// Fetch a single term by id
    pub fn fetch_term(&self, id: &str) -> DatabaseResult<Option<Term>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM terms WHERE id = ?1", TERM_COLUMNS);
        let term = conn.query_row(&sql, [id], Self::row_to_term).optional()?;
        Ok(term)
    }

    /// Fetch terms passing the category and favorites filters.
    /// Text matching and ordering are left to the caller.
    pub fn fetch_candidates(&self, category: Option<&str>, only_favorites: bool) -> DatabaseResult<Vec<Term>> {
        let conn = self.get_conn()?;

        let mut clauses = Vec::new();
        if category.is_some() {
            clauses.push("t.category = ?1");
        }
        if only_favorites {
            clauses.push("t.id IN (SELECT id FROM favorites)");
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT t.id, t.category, t.es, t.en, t.de, t.fr, t.synonyms_es, t.notes FROM terms t {}",
            where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let terms = match category {
            Some(name) => stmt.query_map([name], Self::row_to_term)?.collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], Self::row_to_term)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(terms)
    }

    /// Distinct non-empty categories, case-insensitively sorted
    pub fn fetch_categories(&self) -> DatabaseResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT category FROM terms WHERE category != ''")?;
        let mut categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        sort_labels(&mut categories);
        Ok(categories)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn favorite_ids(&self) -> DatabaseResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id FROM favorites ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn is_favorite(&self, id: &str) -> DatabaseResult<bool> {
        let conn = self.get_conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Add or remove a favorite. Ids are not checked against `terms`.
    pub fn set_favorite(&self, id: &str, is_favorite: bool) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        if is_favorite {
            conn.execute("INSERT OR REPLACE INTO favorites (id) VALUES (?1)", [id])?;
        } else {
            conn.execute("DELETE FROM favorites WHERE id = ?1", [id])?;
        }
        Ok(())
    }

    /// Favorites joined with their terms, sorted by case-folded `es`.
    /// Dangling favorites are dropped by the join.
    pub fn fetch_favorite_terms(&self) -> DatabaseResult<Vec<Term>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.category, t.es, t.en, t.de, t.fr, t.synonyms_es, t.notes FROM favorites f JOIN terms t ON t.id = f.id",
        )?;
        let mut terms = stmt
            .query_map([], Self::row_to_term)?
            .collect::<Result<Vec<_>, _>>()?;
        sort_terms(&mut terms);
        Ok(terms)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────────

    /// Append a query and prune to the newest `HISTORY_CAPACITY` rows.
    ///
    /// The stored timestamp is `max(now_millis, newest + 1)` so timestamps are
    /// strictly increasing even when the clock stalls or steps back.
    /// Returns the number of pruned rows.
    pub fn insert_history(&self, query: &str, now_millis: i64) -> DatabaseResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = Self::begin_write(&mut conn)?;

        tx.execute(
            r#"INSERT INTO history (query, timestamp)
               VALUES (?1, MAX(?2, COALESCE((SELECT MAX(timestamp) FROM history), 0) + 1))"#,
            params![query, now_millis],
        )?;
        let pruned = tx.execute(
            r#"DELETE FROM history WHERE id NOT IN (
                SELECT id FROM history ORDER BY timestamp DESC, id DESC LIMIT ?1
            )"#,
            [HISTORY_CAPACITY as i64],
        )?;

        tx.commit()?;
        Ok(pruned)
    }

    /// Newest queries first, empty strings excluded
    pub fn fetch_history(&self, limit: usize) -> DatabaseResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT query FROM history WHERE query != '' ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let queries = stmt
            .query_map([limit as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(queries)
    }

    pub fn count_history(&self) -> DatabaseResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn clear_history(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    fn row_to_term(row: &rusqlite::Row) -> rusqlite::Result<Term> {
        Ok(Term {
            id: row.get(0)?,
            category: row.get(1)?,
            es: row.get(2)?,
            en: row.get(3)?,
            de: row.get(4)?,
            fr: row.get(5)?,
            synonyms_es: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}
