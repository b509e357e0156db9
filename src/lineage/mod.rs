//! Translate Kraken2 classifications into readable lineage labels.
//!
//! Kraken2 reports an NCBI taxonomy id per sequence. The translator resolves
//! each id once through a [`TaxonomyLookup`](table::TaxonomyLookup) and emits
//! `sequence<TAB>lineage` labels, where a lineage reads
//! `root;Bacteria;Pseudomonadota;...;Escherichia coli`.
//!
//! The bundled lookup is a [`LineageTable`](table::LineageTable) loaded from a
//! two-column `taxid<TAB>lineage` file (as produced by `taxonkit lineage`).

use thiserror::Error;

use crate::parsing::ParseError;

pub mod table;
pub mod translate;

#[derive(Error, Debug)]
pub enum LineageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No lineage known for taxid {0}")]
    UnknownTaxon(String),

    #[error("Invalid lineage table line {line}: {message}")]
    InvalidTable { line: usize, message: String },
}
