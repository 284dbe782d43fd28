//! Glosa FFI Interface Definition
//!
//! This file defines the public interface exposed to the UI layer via UniFFI.
//! It acts as the source of truth for shared types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Languages a term carries a translation for.
///
/// Closed set. Per-language data (code, label, speech locale) lives in the
/// table in `models.rs`, so adding a language is a table row plus a variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum Language {
    #[default]
    Spanish,
    English,
    German,
    French,
}

/// Label of the synthetic "no filter" entry at the head of `list_categories`.
pub const ALL_CATEGORIES_LABEL: &str = "Todas";

/// Category restriction for a search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Enum)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the stored category
    Named { name: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A glossary entry. Immutable once stored; re-importing the same id replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Term {
    pub id: String,
    pub category: String,
    pub es: String,
    pub en: String,
    pub de: String,
    pub fr: String,
    /// Free-text Spanish synonyms
    pub synonyms_es: String,
    pub notes: String,
}

/// Parameters of a glossary search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct SearchRequest {
    /// Free text; trimmed and lower-cased before matching. Empty matches everything.
    pub query: String,
    /// The "from" language selected in the UI
    pub source_language: Language,
    pub category: CategoryFilter,
    pub only_favorites: bool,
    /// Maximum number of results (clamped to 250, must be non-zero)
    pub limit: u32,
}

/// Outcome of a one-time seed import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct ImportReport {
    /// The store already held terms, so nothing was written
    pub already_seeded: bool,
    /// Rows written (insert or replace)
    pub imported: u64,
    /// Rows dropped because their id was empty
    pub skipped: u64,
}

/// Error type for Glosa operations
#[derive(Debug, Error, uniffi::Error)]
pub enum GlosaError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Seed data error: {0}")]
    Seed(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The primary interface for accessing the glossary.
/// This matches the functionality exposed by the `GlossaryStore` object.
///
/// State is pull-based: the store never pushes change notifications, so a
/// caller that mutates favorites or history must re-read them to see the
/// new state.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait GlossaryApi: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// True iff at least one term is stored
    async fn has_terms(&self) -> Result<bool, GlosaError>;

    /// Number of stored terms
    async fn term_count(&self) -> Result<u64, GlosaError>;

    /// Fetch a single term for the detail view
    async fn get_term(&self, id: String) -> Result<Option<Term>, GlosaError>;

    /// Distinct non-empty categories sorted case-insensitively, preceded by
    /// the "no filter" label.
    async fn list_categories(&self) -> Result<Vec<String>, GlosaError>;

    /// Filtered, case-insensitive substring search, sorted by the Spanish field.
    async fn search(&self, request: SearchRequest) -> Result<Vec<Term>, GlosaError>;

    /// All favorited ids, ascending
    async fn favorite_ids(&self) -> Result<Vec<String>, GlosaError>;

    async fn is_favorite(&self, id: String) -> Result<bool, GlosaError>;

    /// Favorited terms that exist in the store, sorted by the Spanish field
    async fn get_favorite_terms(&self) -> Result<Vec<Term>, GlosaError>;

    /// Up to 50 most recent queries, newest first
    async fn get_history(&self) -> Result<Vec<String>, GlosaError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Import seed CSV text once. A store that already has terms is left untouched.
    async fn import_seed(&self, csv_text: String) -> Result<ImportReport, GlosaError>;

    /// Insert-or-replace terms by id in one transaction. Returns rows written.
    async fn upsert_terms(&self, terms: Vec<Term>) -> Result<u64, GlosaError>;

    /// Add (true) or remove (false) a favorite. Idempotent.
    async fn set_favorite(&self, id: String, is_favorite: bool) -> Result<(), GlosaError>;

    /// Record a submitted query. Blank queries are ignored.
    async fn add_history(&self, query: String) -> Result<(), GlosaError>;

    async fn clear_history(&self) -> Result<(), GlosaError>;
}

impl From<crate::database::DatabaseError> for GlosaError {
    fn from(e: crate::database::DatabaseError) -> Self {
        GlosaError::Storage(e.to_string())
    }
}

impl From<crate::seed::SeedError> for GlosaError {
    fn from(e: crate::seed::SeedError) -> Self {
        GlosaError::Seed(e.to_string())
    }
}

impl From<tokio::task::JoinError> for GlosaError {
    fn from(e: tokio::task::JoinError) -> Self {
        GlosaError::TaskFailed(e.to_string())
    }
}
