use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::lineage::table::TaxonomyLookup;
use crate::lineage::LineageError;
use crate::parsing::kraken::KrakenAssignment;

/// Lineage given to sequences Kraken2 left unclassified
pub const UNCLASSIFIED_LINEAGE: &str = "unclassified";

/// A sequence and its readable lineage
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LineageLabel {
    pub sequence_id: String,
    pub taxid: String,
    pub lineage: String,
}

impl std::fmt::Display for LineageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.sequence_id, self.lineage)
    }
}

/// Translates assignments, asking the lookup about each taxid only once
pub struct LineageTranslator<'a> {
    lookup: &'a dyn TaxonomyLookup,
    cache: HashMap<String, String>,
}

impl<'a> LineageTranslator<'a> {
    pub fn new(lookup: &'a dyn TaxonomyLookup) -> Self {
        Self {
            lookup,
            cache: HashMap::new(),
        }
    }

    /// Lineage of one taxid, cached
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    pub fn lineage(&mut self, taxid: &str) -> Result<&str, LineageError> {
        if !self.cache.contains_key(taxid) {
            let lineage = self.lookup.lineage(taxid)?;
            self.cache.insert(taxid.to_string(), lineage);
        }
        Ok(self.cache[taxid].as_str())
    }

    /// Label every assignment in order. Unclassified sequences are labelled
    /// [`UNCLASSIFIED_LINEAGE`] without a lookup.
    ///
    /// # Errors
    ///
    /// Returns `LineageError::UnknownTaxon` for the first taxid the lookup
    /// cannot resolve.
    pub fn translate(
        &mut self,
        assignments: &[KrakenAssignment],
    ) -> Result<Vec<LineageLabel>, LineageError> {
        let mut labels = Vec::with_capacity(assignments.len());
        for (i, assignment) in assignments.iter().enumerate() {
            let lineage = if assignment.classified {
                self.lineage(&assignment.taxid)?.to_string()
            } else {
                UNCLASSIFIED_LINEAGE.to_string()
            };
            debug!("{i}:{}\t{lineage}", assignment.sequence_id);
            labels.push(LineageLabel {
                sequence_id: assignment.sequence_id.clone(),
                taxid: assignment.taxid.clone(),
                lineage,
            });
        }
        Ok(labels)
    }

    /// Number of distinct taxids resolved so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Write labels one per line
///
/// # Errors
///
/// Returns `LineageError::Io` if the file cannot be written.
pub fn write_labels(path: &Path, labels: &[LineageLabel]) -> Result<(), LineageError> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for label in labels {
        writeln!(out, "{label}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::table::LineageTable;
    use crate::parsing::kraken::parse_kraken_text;
    use std::cell::Cell;

    struct CountingLookup {
        calls: Cell<usize>,
    }

    impl TaxonomyLookup for CountingLookup {
        fn lineage(&self, taxid: &str) -> Result<String, LineageError> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("root;taxon{taxid}"))
        }
    }

    #[test]
    fn test_translate_caches_lookups() {
        let lookup = CountingLookup { calls: Cell::new(0) };
        let assignments =
            parse_kraken_text("C\tc1\t562\nC\tc2\t562\nC\tc3\t470\nC\tc4\t562\n").unwrap();

        let mut translator = LineageTranslator::new(&lookup);
        let labels = translator.translate(&assignments).unwrap();

        assert_eq!(labels.len(), 4);
        assert_eq!(labels[1].to_string(), "c2\troot;taxon562");
        assert_eq!(labels[2].lineage, "root;taxon470");
        assert_eq!(lookup.calls.get(), 2);
        assert_eq!(translator.cached(), 2);
    }

    #[test]
    fn test_translate_unclassified_without_lookup() {
        let lookup = CountingLookup { calls: Cell::new(0) };
        let assignments = parse_kraken_text("U\tc1\t0\nC\tc2\t562\n").unwrap();

        let mut translator = LineageTranslator::new(&lookup);
        let labels = translator.translate(&assignments).unwrap();

        assert_eq!(labels[0].to_string(), "c1\tunclassified");
        assert_eq!(labels[1].lineage, "root;taxon562");
        assert_eq!(lookup.calls.get(), 1);
    }

    #[test]
    fn test_translate_unknown_taxon() {
        let table = LineageTable::new();
        let assignments = parse_kraken_text("C\tc1\t9606\n").unwrap();
        let mut translator = LineageTranslator::new(&table);
        assert!(matches!(
            translator.translate(&assignments),
            Err(LineageError::UnknownTaxon(_))
        ));
    }

    #[test]
    fn test_write_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.tsv");
        let labels = vec![LineageLabel {
            sequence_id: "c1".to_string(),
            taxid: "562".to_string(),
            lineage: "root;Bacteria".to_string(),
        }];
        write_labels(&path, &labels).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "c1\troot;Bacteria\n");
    }
}
