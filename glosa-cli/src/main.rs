//! Terminal front-end for the glossary
//!
//! Every command first seeds the store from the bundled dataset, which is a
//! no-op after the first run. Output goes to stdout, logs to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glosa::{
    pronounce, CategoryFilter, GlossaryApi, GlossaryStore, Language, SearchRequest, SpeechOutput,
    StoreConfig, Term,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "glosa", author, version, about = "Multilingual culinary glossary", long_about = None)]
struct Args {
    /// Path to the SQLite database (defaults to GLOSA_DB_PATH or the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the store from the bundled dataset (no-op once seeded)
    Import,
    /// Search across all languages, synonyms and categories
    Search {
        /// Free text; empty lists everything
        #[arg(default_value = "")]
        query: String,
        /// Source language code (es, en, de, fr)
        #[arg(long, default_value = "es", value_parser = parse_language)]
        from: Language,
        /// Target language code shown next to the Spanish term
        #[arg(long, default_value = "en", value_parser = parse_language)]
        to: Language,
        /// Restrict to one category ("Todas" for all)
        #[arg(long, default_value = glosa::ALL_CATEGORIES_LABEL)]
        category: String,
        /// Only favorited terms
        #[arg(long)]
        favorites: bool,
        #[arg(long, default_value_t = glosa::search::DEFAULT_SEARCH_LIMIT)]
        limit: u32,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List categories
    Categories,
    /// Show every field of one term
    Show { id: String },
    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Inspect or clear search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Hand a term to the speech output in the given language
    Speak {
        id: String,
        #[arg(long, default_value = "es", value_parser = parse_language)]
        lang: Language,
    },
}

#[derive(Subcommand, Debug)]
enum FavoriteAction {
    Add { id: String },
    Remove { id: String },
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    List,
    Clear,
}

fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| {
        let known: Vec<&str> = Language::ALL.iter().map(|lang| lang.code()).collect();
        format!("unknown language '{}' (expected one of {})", code, known.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

/// Speech collaborator for the terminal: prints what a TTS engine would receive
struct StdoutSpeech;

impl SpeechOutput for StdoutSpeech {
    fn speak(&self, locale: String, text: String) {
        println!("[{}] {}", locale, text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.db {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::from_env(),
    };
    let store = GlossaryStore::open(&config)
        .with_context(|| format!("opening glossary at {}", config.db_path.display()))?;

    let report = store.import_bundled_seed().await.context("seeding glossary")?;
    if matches!(args.command, Command::Import) {
        if report.already_seeded {
            println!("Glossary already seeded ({} terms).", store.term_count().await?);
        } else {
            println!("Imported {} terms ({} rows skipped).", report.imported, report.skipped);
        }
        return Ok(());
    }

    run(&store, args.command).await
}

async fn run(store: &GlossaryStore, command: Command) -> Result<()> {
    match command {
        Command::Import => {}
        Command::Search { query, from, to, category, favorites, limit, json } => {
            let request = SearchRequest::new(query.clone())
                .from_language(from)
                .in_category(CategoryFilter::from_label(&category))
                .favorites_only(favorites)
                .with_limit(limit);
            let results = store.search(request).await?;
            store.add_history(query).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let favorite_ids = store.favorite_ids().await?;
                print_terms(&results, to, &favorite_ids);
            }
        }
        Command::Categories => {
            for category in store.list_categories().await? {
                println!("{}", category);
            }
        }
        Command::Show { id } => {
            let Some(term) = store.get_term(id.clone()).await? else {
                bail!("no term with id '{}'", id);
            };
            let favorite = store.is_favorite(id).await?;
            print_term_detail(&term, favorite);
        }
        Command::Favorite { action } => match action {
            FavoriteAction::Add { id } => {
                if store.get_term(id.clone()).await?.is_none() {
                    tracing::warn!(%id, "favoriting an id with no stored term");
                }
                store.set_favorite(id, true).await?;
            }
            FavoriteAction::Remove { id } => store.set_favorite(id, false).await?,
            FavoriteAction::List { json } => {
                let terms = store.get_favorite_terms().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&terms)?);
                } else {
                    let ids: Vec<String> = terms.iter().map(|t| t.id.clone()).collect();
                    print_terms(&terms, Language::English, &ids);
                }
            }
        },
        Command::History { action } => match action {
            HistoryAction::List => {
                for query in store.get_history().await? {
                    println!("{}", query);
                }
            }
            HistoryAction::Clear => store.clear_history().await?,
        },
        Command::Speak { id, lang } => {
            let Some(term) = store.get_term(id.clone()).await? else {
                bail!("no term with id '{}'", id);
            };
            if !pronounce(term, lang, Arc::new(StdoutSpeech)) {
                bail!("term '{}' has no {} text", id, lang.label());
            }
        }
    }
    Ok(())
}

fn print_terms(terms: &[Term], target: Language, favorite_ids: &[String]) {
    if terms.is_empty() {
        println!("No results.");
        return;
    }
    for term in terms {
        let star = if favorite_ids.contains(&term.id) { "*" } else { " " };
        let category = if term.category.is_empty() {
            String::new()
        } else {
            format!("  [{}]", term.category)
        };
        println!(
            "{} {:>4}  {} → {}{}",
            star,
            term.id,
            term.es,
            term.text_for(target),
            category
        );
    }
}

fn print_term_detail(term: &Term, favorite: bool) {
    println!("id:        {}{}", term.id, if favorite { "  (favorite)" } else { "" });
    println!("category:  {}", term.category);
    for language in Language::ALL {
        println!("{:<10} {}", format!("{}:", language.label()), term.text_for(language));
    }
    if !term.synonyms_es.is_empty() {
        println!("synonyms:  {}", term.synonyms_es);
    }
    if !term.notes.is_empty() {
        println!("notes:     {}", term.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_codes() {
        assert_eq!(parse_language("de").unwrap(), Language::German);
        assert!(parse_language("xx").unwrap_err().contains("es, en, de, fr"));
    }

    #[test]
    fn test_search_args_defaults() {
        let args = Args::try_parse_from(["glosa", "search", "hake"]).unwrap();
        match args.command {
            Command::Search { query, from, category, favorites, limit, .. } => {
                assert_eq!(query, "hake");
                assert_eq!(from, Language::Spanish);
                assert_eq!(CategoryFilter::from_label(&category), CategoryFilter::All);
                assert!(!favorites);
                assert_eq!(limit, 200);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_db_flag_after_subcommand() {
        let args = Args::try_parse_from(["glosa", "categories", "--db", "/tmp/x.sqlite3"]).unwrap();
        assert_eq!(args.db, Some(PathBuf::from("/tmp/x.sqlite3")));
    }
}
