//! Seed CSV parsing
//!
//! Columns are resolved by header name, so the file may list them in any
//! order. Every cell is trimmed and kept as a string. Rows whose id is blank
//! are dropped and counted, never reported as errors.

use crate::interface::Term;
use thiserror::Error;

pub const HEADER_ID: &str = "id";
pub const HEADER_CATEGORY: &str = "Categoría";
pub const HEADER_ES: &str = "Español";
pub const HEADER_EN: &str = "English";
pub const HEADER_DE: &str = "Deutsch";
pub const HEADER_FR: &str = "Français";
pub const HEADER_SYNONYMS_ES: &str = "Sinónimos (ES)";
pub const HEADER_NOTES: &str = "Notas";

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Terms parsed from a seed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSeed {
    pub terms: Vec<Term>,
    /// Data rows dropped for having an empty id
    pub skipped: usize,
}

/// Column positions resolved from the header row
#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    category: Option<usize>,
    es: Option<usize>,
    en: Option<usize>,
    de: Option<usize>,
    fr: Option<usize>,
    synonyms_es: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            id: find(HEADER_ID),
            category: find(HEADER_CATEGORY),
            es: find(HEADER_ES),
            en: find(HEADER_EN),
            de: find(HEADER_DE),
            fr: find(HEADER_FR),
            synonyms_es: find(HEADER_SYNONYMS_ES),
            notes: find(HEADER_NOTES),
        }
    }

    fn cell(record: &csv::StringRecord, column: Option<usize>) -> String {
        column
            .and_then(|idx| record.get(idx))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn to_term(&self, record: &csv::StringRecord) -> Option<Term> {
        let id = Self::cell(record, self.id);
        if id.is_empty() {
            return None;
        }
        Some(Term {
            id,
            category: Self::cell(record, self.category),
            es: Self::cell(record, self.es),
            en: Self::cell(record, self.en),
            de: Self::cell(record, self.de),
            fr: Self::cell(record, self.fr),
            synonyms_es: Self::cell(record, self.synonyms_es),
            notes: Self::cell(record, self.notes),
        })
    }
}

/// Parse seed CSV text into terms.
///
/// Empty input, or a header with no data rows, yields an empty result.
pub fn parse_seed(text: &str) -> SeedResult<ParsedSeed> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);
    if columns.id.is_none() && !headers.is_empty() {
        tracing::warn!("seed header has no '{}' column; every row will be skipped", HEADER_ID);
    }

    let mut parsed = ParsedSeed::default();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        match columns.to_term(&record) {
            Some(term) => parsed.terms.push(term),
            None => {
                // Row numbers are 1-based and count the header
                tracing::warn!(row = row + 2, "skipping seed row with empty id");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,Categoría,Español,English,Deutsch,Français,Sinónimos (ES),Notas";

    #[test]
    fn test_parse_basic_rows() {
        let text = format!(
            "{HEADER}\n1,Pescados,merluza,hake,Seehecht,merlu,pescadilla,\n2,Pescados,bacalao,cod,Kabeljau,cabillaud,,Desalar\n"
        );
        let parsed = parse_seed(&text).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.terms.len(), 2);
        assert_eq!(parsed.terms[0].es, "merluza");
        assert_eq!(parsed.terms[0].synonyms_es, "pescadilla");
        assert_eq!(parsed.terms[1].notes, "Desalar");
    }

    #[test]
    fn test_permuted_columns_map_by_name() {
        let text = "English,Notas,id,Español,Categoría\nhake,fresh,1,merluza,Pescados\n";
        let parsed = parse_seed(text).unwrap();
        let term = &parsed.terms[0];
        assert_eq!(term.id, "1");
        assert_eq!(term.en, "hake");
        assert_eq!(term.es, "merluza");
        assert_eq!(term.category, "Pescados");
        assert_eq!(term.notes, "fresh");
        assert_eq!(term.de, "");
        assert_eq!(term.fr, "");
    }

    #[test]
    fn test_blank_ids_are_skipped() {
        let text = format!("{HEADER}\n ,Pescados,merluza,hake,,,,\n,,,,,,,\n3,Carnes,cordero,lamb,Lamm,agneau,,\n");
        let parsed = parse_seed(&text).unwrap();
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.terms.len(), 1);
        assert_eq!(parsed.terms[0].id, "3");
    }

    #[test]
    fn test_cells_are_trimmed() {
        let text = format!("{HEADER}\n  7 , Mariscos ,  gamba ,prawn ,Garnele,crevette, camarón ,\n");
        let parsed = parse_seed(&text).unwrap();
        let term = &parsed.terms[0];
        assert_eq!(term.id, "7");
        assert_eq!(term.category, "Mariscos");
        assert_eq!(term.es, "gamba");
        assert_eq!(term.synonyms_es, "camarón");
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let text = format!("{HEADER}\n15,Carnes,pechuga,breast,Brust,blanc,,\"De pollo, pavo o pato.\"\n");
        let parsed = parse_seed(&text).unwrap();
        assert_eq!(parsed.terms[0].notes, "De pollo, pavo o pato.");
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert_eq!(parse_seed(HEADER).unwrap(), ParsedSeed::default());
        assert_eq!(parse_seed("").unwrap(), ParsedSeed::default());
    }

    #[test]
    fn test_missing_id_column_skips_everything() {
        let parsed = parse_seed("Español,English\nmerluza,hake\n").unwrap();
        assert!(parsed.terms.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_short_rows_fill_missing_cells() {
        let text = format!("{HEADER}\n9,Mariscos,almeja\n");
        let parsed = parse_seed(&text).unwrap();
        assert_eq!(parsed.terms[0].es, "almeja");
        assert_eq!(parsed.terms[0].notes, "");
    }

    #[test]
    fn test_bom_is_ignored() {
        let text = format!("\u{feff}{HEADER}\n1,Pescados,merluza,hake,,,,\n");
        let parsed = parse_seed(&text).unwrap();
        assert_eq!(parsed.terms[0].id, "1");
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let parsed = parse_seed(seed_data::GLOSSARY_CSV).unwrap();
        assert!(!parsed.terms.is_empty());
        assert_eq!(parsed.skipped, 0);
        assert!(parsed.terms.iter().any(|t| t.es == "merluza" && t.en == "hake"));
    }

    #[test]
    fn test_bundled_header_resolves_every_column() {
        let mut reader = csv::Reader::from_reader(seed_data::GLOSSARY_CSV.as_bytes());
        let columns = ColumnMap::from_headers(reader.headers().unwrap());
        for (name, column) in [
            (HEADER_ID, columns.id),
            (HEADER_CATEGORY, columns.category),
            (HEADER_ES, columns.es),
            (HEADER_EN, columns.en),
            (HEADER_DE, columns.de),
            (HEADER_FR, columns.fr),
            (HEADER_SYNONYMS_ES, columns.synonyms_es),
            (HEADER_NOTES, columns.notes),
        ] {
            assert!(column.is_some(), "bundled header is missing {name}");
        }
    }
}
