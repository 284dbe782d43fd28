use criterion::{criterion_group, criterion_main, Criterion};
use glosa::{CategoryFilter, GlossaryApi, GlossaryStore, Language, SearchRequest, StoreConfig, Term};

/// Bundled seed plus synthetic filler so the scan has realistic width
fn setup_store(dir: &tempfile::TempDir, rt: &tokio::runtime::Runtime) -> GlossaryStore {
    let store = GlossaryStore::open(&StoreConfig::new(dir.path().join("bench.sqlite3")))
        .expect("Failed to open benchmark database");
    rt.block_on(async {
        store.import_bundled_seed().await.unwrap();
        let filler: Vec<Term> = (0..5_000)
            .map(|i| Term {
                id: format!("synthetic-{}", i),
                category: format!("Categoría {}", i % 12),
                es: format!("término {}", i),
                en: format!("term {}", i),
                de: format!("Begriff {}", i),
                fr: format!("terme {}", i),
                synonyms_es: String::new(),
                notes: String::new(),
            })
            .collect();
        store.upsert_terms(filler).await.unwrap();
    });
    store
}

fn bench_search(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = setup_store(&dir, &rt);

    let requests = vec![
        ("empty_query", SearchRequest::new("")),
        ("spanish_word", SearchRequest::new("merluza")),
        ("cross_language", SearchRequest::new("hake").from_language(Language::German)),
        ("accented", SearchRequest::new("AZAFRÁN")),
        ("no_match", SearchRequest::new("zzzzzz")),
        (
            "category_filter",
            SearchRequest::new("a").in_category(CategoryFilter::Named { name: "Pescados".into() }),
        ),
        ("favorites_only", SearchRequest::new("").favorites_only(true)),
    ];

    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    for (name, request) in requests {
        group.bench_function(name, |b| {
            b.iter(|| rt.block_on(async { store.search(request.clone()).await.unwrap() }));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
