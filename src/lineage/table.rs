use std::collections::HashMap;
use std::path::Path;

use crate::lineage::LineageError;

/// Resolves a taxonomy id to its full lineage
pub trait TaxonomyLookup {
    /// Lineage for `taxid`, from the root down to the taxon itself
    ///
    /// # Errors
    ///
    /// Returns `LineageError::UnknownTaxon` if the id cannot be resolved.
    fn lineage(&self, taxid: &str) -> Result<String, LineageError>;
}

/// Lineages loaded from a `taxid<TAB>lineage` table
#[derive(Debug, Clone, Default)]
pub struct LineageTable {
    lineages: HashMap<String, String>,
}

impl LineageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lineage table file
    ///
    /// # Errors
    ///
    /// Returns `LineageError::Io` if the file cannot be read or
    /// `LineageError::InvalidTable` if a line lacks a lineage column.
    pub fn load_from_file(path: &Path) -> Result<Self, LineageError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_text(&content)
    }

    /// Parse a lineage table. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns `LineageError::InvalidTable` if a line lacks a lineage column.
    pub fn from_text(text: &str) -> Result<Self, LineageError> {
        let mut table = Self::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (taxid, lineage) = line
                .split_once('\t')
                .map(|(t, l)| (t.trim(), l.trim()))
                .filter(|(t, l)| !t.is_empty() && !l.is_empty())
                .ok_or_else(|| LineageError::InvalidTable {
                    line: i + 1,
                    message: "expected taxid and lineage columns".to_string(),
                })?;

            // Extra columns (rank, name) are ignored
            let lineage = lineage.split('\t').next().unwrap_or(lineage);
            table.insert(taxid, lineage);
        }

        Ok(table)
    }

    pub fn insert(&mut self, taxid: impl Into<String>, lineage: impl Into<String>) {
        self.lineages.insert(taxid.into(), lineage.into());
    }

    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }
}

impl TaxonomyLookup for LineageTable {
    fn lineage(&self, taxid: &str) -> Result<String, LineageError> {
        self.lineages
            .get(taxid)
            .cloned()
            .ok_or_else(|| LineageError::UnknownTaxon(taxid.to_string()))
    }
}
