//! GlossaryStore - Main API for UI interop, designed for UniFFI export.
//!
//! Every operation is async: SQLite work runs on a blocking worker so the
//! caller's executor is never stalled. Operations on one store serialize
//! through SQLite transactions; no locks are exposed.

use crate::config::StoreConfig;
use crate::database::{Database, HISTORY_READ_LIMIT};
use crate::interface::{
    GlossaryApi, GlosaError, ImportReport, SearchRequest, Term, ALL_CATEGORIES_LABEL,
};
use crate::search::{effective_limit, normalize_query, run_query};
use crate::seed::parse_seed;
use chrono::Utc;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// Shared across all GlossaryStore instances and never dropped.
/// Used by UniFFI which doesn't provide a tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

/// Thread-safe glossary store backed by SQLite
///
/// Concurrency Model:
/// - Database uses r2d2 connection pool (concurrent reads, no mutex blocking)
/// - Blocking work runs on tokio::spawn_blocking threads
/// - Uses global FALLBACK_RUNTIME when called outside any runtime (e.g., from UniFFI)
#[derive(uniffi::Object)]
pub struct GlossaryStore {
    db: Arc<Database>,
}

// Internal implementation (not exported via FFI)
impl GlossaryStore {
    /// Create a store with an in-memory database (for testing)
    #[cfg(test)]
    pub(crate) fn new_in_memory() -> Result<Self, GlosaError> {
        let database = Database::open_in_memory()?;
        Ok(Self { db: Arc::new(database) })
    }

    /// Open the store described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self, GlosaError> {
        let db = Database::open(&config.db_path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current()
            .unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    /// Run `work` against the database on a blocking worker
    async fn with_db<T, F>(&self, work: F) -> Result<T, GlosaError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, GlosaError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        self.runtime_handle()
            .spawn_blocking(move || work(&db))
            .await?
    }
}

// FFI-exported constructor (must be in standalone impl block)
#[uniffi::export]
impl GlossaryStore {
    /// Create a new store with a database at the given path
    #[uniffi::constructor]
    pub fn new(db_path: String) -> Result<Self, GlosaError> {
        Self::open(&StoreConfig::new(db_path))
    }
}

// Bundled-data import (not on trait, the dataset is a property of this build)
#[uniffi::export]
impl GlossaryStore {
    /// Seed from the dataset bundled with the library (no-op once seeded)
    pub async fn import_bundled_seed(&self) -> Result<ImportReport, GlosaError> {
        self.import_seed(seed_data::GLOSSARY_CSV.to_string()).await
    }
}

#[uniffi::export]
#[async_trait::async_trait]
impl GlossaryApi for GlossaryStore {
    // ─────────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────────

    async fn has_terms(&self) -> Result<bool, GlosaError> {
        self.with_db(|db| Ok(db.has_terms()?)).await
    }

    async fn term_count(&self) -> Result<u64, GlosaError> {
        self.with_db(|db| Ok(db.count_terms()?)).await
    }

    async fn get_term(&self, id: String) -> Result<Option<Term>, GlosaError> {
        self.with_db(move |db| Ok(db.fetch_term(&id)?)).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, GlosaError> {
        self.with_db(|db| {
            let categories = db.fetch_categories()?;
            let mut labels = Vec::with_capacity(categories.len() + 1);
            labels.push(ALL_CATEGORIES_LABEL.to_string());
            labels.extend(categories);
            Ok(labels)
        })
        .await
    }

    /// Search for terms
    ///
    /// Category and favorites filters narrow the candidates in SQL; the
    /// normalized query must then occur in the source-language field or in
    /// any of es/en/de/fr/synonyms/category. Results are sorted by
    /// case-folded `es` and truncated to the limit.
    async fn search(&self, request: SearchRequest) -> Result<Vec<Term>, GlosaError> {
        let limit = effective_limit(request.limit)?;
        let needle = normalize_query(&request.query);

        self.with_db(move |db| {
            let candidates = db.fetch_candidates(request.category.name(), request.only_favorites)?;
            let candidate_count = candidates.len();
            let results = run_query(candidates, &needle, request.source_language, limit);
            tracing::debug!(
                query = %needle,
                category = ?request.category,
                only_favorites = request.only_favorites,
                candidates = candidate_count,
                results = results.len(),
                "search"
            );
            Ok(results)
        })
        .await
    }

    async fn favorite_ids(&self) -> Result<Vec<String>, GlosaError> {
        self.with_db(|db| Ok(db.favorite_ids()?)).await
    }

    async fn is_favorite(&self, id: String) -> Result<bool, GlosaError> {
        self.with_db(move |db| Ok(db.is_favorite(&id)?)).await
    }

    async fn get_favorite_terms(&self) -> Result<Vec<Term>, GlosaError> {
        self.with_db(|db| Ok(db.fetch_favorite_terms()?)).await
    }

    async fn get_history(&self) -> Result<Vec<String>, GlosaError> {
        self.with_db(|db| Ok(db.fetch_history(HISTORY_READ_LIMIT)?)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Parse the CSV and import it in one transaction, only if the store is empty.
    /// Parsing happens before the transaction opens; a parse error writes nothing.
    async fn import_seed(&self, csv_text: String) -> Result<ImportReport, GlosaError> {
        self.with_db(move |db| {
            if db.has_terms()? {
                tracing::info!("glossary already seeded; skipping import");
                return Ok(ImportReport { already_seeded: true, ..Default::default() });
            }

            let parsed = parse_seed(&csv_text)?;
            let skipped = parsed.skipped as u64;
            if parsed.terms.is_empty() {
                tracing::info!(skipped, "seed data has no importable rows");
                return Ok(ImportReport { already_seeded: false, imported: 0, skipped });
            }

            match db.import_if_empty(&parsed.terms)? {
                Some(imported) => {
                    tracing::info!(imported, skipped, "imported glossary seed");
                    Ok(ImportReport { already_seeded: false, imported: imported as u64, skipped })
                }
                None => {
                    tracing::info!("glossary seeded concurrently; skipping import");
                    Ok(ImportReport { already_seeded: true, ..Default::default() })
                }
            }
        })
        .await
    }

    async fn upsert_terms(&self, terms: Vec<Term>) -> Result<u64, GlosaError> {
        // Same key normalization as the seed path
        let terms: Vec<Term> = terms
            .into_iter()
            .map(|mut term| {
                term.id = term.id.trim().to_string();
                term
            })
            .collect();
        if let Some(blank) = terms.iter().position(|t| t.id.is_empty()) {
            return Err(GlosaError::InvalidInput(format!("term at index {} has an empty id", blank)));
        }
        self.with_db(move |db| Ok(db.upsert_terms(&terms)? as u64)).await
    }

    async fn set_favorite(&self, id: String, is_favorite: bool) -> Result<(), GlosaError> {
        self.with_db(move |db| Ok(db.set_favorite(&id, is_favorite)?)).await
    }

    /// Record a query; blank input is ignored
    async fn add_history(&self, query: String) -> Result<(), GlosaError> {
        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            return Ok(());
        }
        self.with_db(move |db| {
            let pruned = db.insert_history(&trimmed, Utc::now().timestamp_millis())?;
            if pruned > 0 {
                tracing::debug!(pruned, "pruned search history");
            }
            Ok(())
        })
        .await
    }

    async fn clear_history(&self) -> Result<(), GlosaError> {
        self.with_db(|db| Ok(db.clear_history()?)).await
    }
}
