//! Behaviour attached to the shared interface types
//!
//! Language dispatch is table-driven: every per-language fact is a column in
//! `LANGUAGE_TABLE`, indexed by the enum discriminant.

use crate::interface::{CategoryFilter, Language, SearchRequest, Term, ALL_CATEGORIES_LABEL};
use crate::search::DEFAULT_SEARCH_LIMIT;

// ─────────────────────────────────────────────────────────────────────────────
// LANGUAGES
// ─────────────────────────────────────────────────────────────────────────────

/// Static description of a supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Two-letter code, also the Term field name
    pub code: &'static str,
    /// Display label in the language itself
    pub label: &'static str,
    /// Locale handed to the speech synthesizer
    pub speech_locale: &'static str,
}

// SYNC: row order must match the `Language` variant order
const LANGUAGE_TABLE: [LanguageInfo; 4] = [
    LanguageInfo { code: "es", label: "Español", speech_locale: "es-ES" },
    LanguageInfo { code: "en", label: "English", speech_locale: "en-US" },
    LanguageInfo { code: "de", label: "Deutsch", speech_locale: "de-DE" },
    LanguageInfo { code: "fr", label: "Français", speech_locale: "fr-FR" },
];

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Spanish,
        Language::English,
        Language::German,
        Language::French,
    ];

    pub fn info(self) -> &'static LanguageInfo {
        &LANGUAGE_TABLE[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn speech_locale(self) -> &'static str {
        self.info().speech_locale
    }

    /// Look a language up by its two-letter code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

/// Display label for a language (exported for UI pickers)
#[uniffi::export]
pub fn language_label(language: Language) -> String {
    language.label().to_string()
}

/// Speech locale for a language, e.g. "es-ES"
#[uniffi::export]
pub fn language_speech_locale(language: Language) -> String {
    language.speech_locale().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// TERMS
// ─────────────────────────────────────────────────────────────────────────────

impl Term {
    /// The translation stored for `language`
    pub fn text_for(&self, language: Language) -> &str {
        match language {
            Language::Spanish => &self.es,
            Language::English => &self.en,
            Language::German => &self.de,
            Language::French => &self.fr,
        }
    }

    /// Fields a free-text query is matched against, in match order:
    /// source language, es, en, de, fr, synonyms, category.
    pub fn searchable_fields(&self, source: Language) -> [&str; 7] {
        [
            self.text_for(source),
            &self.es,
            &self.en,
            &self.de,
            &self.fr,
            &self.synonyms_es,
            &self.category,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FILTERS
// ─────────────────────────────────────────────────────────────────────────────

impl CategoryFilter {
    /// Map a label from `list_categories` back to a filter.
    /// The sentinel, "All" and blank labels mean no filter.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES_LABEL || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Named { name: label.to_string() }
        }
    }

    /// The stored category this filter requires, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Named { name } => Some(name),
        }
    }
}

impl SearchRequest {
    /// Unfiltered search from Spanish with the default limit
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source_language: Language::Spanish,
            category: CategoryFilter::All,
            only_favorites: false,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn from_language(mut self, language: Language) -> Self {
        self.source_language = language;
        self
    }

    pub fn in_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn favorites_only(mut self, only_favorites: bool) -> Self {
        self.only_favorites = only_favorites;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_table_matches_variants() {
        assert_eq!(Language::Spanish.code(), "es");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::German.code(), "de");
        assert_eq!(Language::French.code(), "fr");
        assert_eq!(Language::French.label(), "Français");
        assert_eq!(Language::Spanish.speech_locale(), "es-ES");
        assert_eq!(Language::German.speech_locale(), "de-DE");
    }

    #[test]
    fn test_default_language_is_spanish() {
        assert_eq!(Language::default(), Language::Spanish);
        assert_eq!(SearchRequest::new("x").source_language, Language::Spanish);
    }

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code(" fr "), Some(Language::French));
        assert_eq!(Language::from_code("it"), None);
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_text_for_each_language() {
        let term = Term {
            id: "1".into(),
            es: "merluza".into(),
            en: "hake".into(),
            de: "Seehecht".into(),
            fr: "merlu".into(),
            ..Default::default()
        };
        assert_eq!(term.text_for(Language::Spanish), "merluza");
        assert_eq!(term.text_for(Language::English), "hake");
        assert_eq!(term.text_for(Language::German), "Seehecht");
        assert_eq!(term.text_for(Language::French), "merlu");
        assert_eq!(term.searchable_fields(Language::English)[0], "hake");
    }

    #[test]
    fn test_category_filter_from_label() {
        assert_eq!(CategoryFilter::from_label("Todas"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_label("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_label("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_label("Pescados"),
            CategoryFilter::Named { name: "Pescados".into() }
        );
        assert_eq!(CategoryFilter::from_label("Pescados").name(), Some("Pescados"));
    }

    #[test]
    fn test_search_request_defaults() {
        let request = SearchRequest::new("hake");
        assert_eq!(request.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(request.category, CategoryFilter::All);
        assert!(!request.only_favorites);
        assert_eq!(request.source_language, Language::Spanish);
    }
}
