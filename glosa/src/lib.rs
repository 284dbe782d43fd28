//! Glosa Core - Rust business logic for the multilingual culinary glossary
//!
//! Seeds a local SQLite store from bundled CSV once, then answers
//! cross-language substring searches with category and favorites filters,
//! and keeps favorites and a bounded search history.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub mod config;
pub mod database;
pub mod interface;
pub mod models;
pub mod search;
pub mod seed;
pub mod speech;
mod store;

pub use config::StoreConfig;
pub use interface::*;
pub use models::LanguageInfo;
pub use speech::{pronounce, speech_request, SpeechOutput, SpeechRequest};
pub use store::GlossaryStore;

uniffi::setup_scaffolding!("glosa");
