//! Bundled culinary glossary used to seed a fresh store.
//!
//! The CSV is compiled into the binary so the first launch works offline.
//! Header names are owned by `glosa::seed`; their order in the file is free.

/// Raw UTF-8 seed dataset (header row + one row per term).
pub const GLOSSARY_CSV: &str = include_str!("../glossary.csv");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_has_rows() {
        assert!(GLOSSARY_CSV.lines().skip(1).filter(|l| !l.trim().is_empty()).count() > 0);
    }
}
