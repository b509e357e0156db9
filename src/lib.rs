//! # mlst-reconcile
//!
//! A library for checking and repairing MLST sequence types against PubMLST schemes.
//!
//! MLST callers sometimes report more than one allele for a locus. Each ambiguous
//! locus multiplies the number of profiles the sample could have, and the reported
//! sequence type often covers only some of them, or none.
//!
//! `mlst-reconcile` expands every combination of the reported alleles, looks each
//! candidate profile up in the scheme's profile table, and rewrites the record's
//! type field when the reported types do not agree with what the scheme says.
//!
//! ## Features
//!
//! - **Candidate expansion**: Cartesian product of ambiguous allele calls
//! - **Consistency check**: Compares candidate count with the reported types
//! - **Scheme lookup**: Resolves each candidate to its ST, or `-` when undefined
//! - **Anomaly labels**: Names the loci or profiles that still need submitting
//! - **Ledgers**: Appends blank and updated records to shared ledgers
//! - **Lab utilities**: Kraken2 lineage labels and sample-log matching
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mlst_reconcile::{DirectorySchemeRepository, FileType, MemoryLedger, Reconciler};
//!
//! let repository = DirectorySchemeRepository::new("databases/pubmlsts");
//! let mut blanks = MemoryLedger::new();
//! let mut updated = MemoryLedger::new();
//!
//! let mut reconciler = Reconciler::new(&repository, &mut blanks, &mut updated);
//! let result = reconciler
//!     .check_file(Path::new("RUN01/S1/MLST/S1.mlst"), FileType::Standard)
//!     .unwrap();
//!
//! if let Some(new_type) = result.new_type() {
//!     println!("{}: {} -> {}", result.sample, result.old_type(), new_type);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Allele calls, candidate profiles and MLST records
//! - [`parsing`]: Parsers for standard and SRST2 results, Kraken2 output and sample logs
//! - [`scheme`]: Scheme repositories and organism to scheme resolution
//! - [`matching`]: Candidate enumeration, scheme lookup and reconciliation
//! - [`persist`]: Ledgers and atomic record rewrites
//! - [`lineage`]: Kraken2 taxid to lineage translation
//! - [`samples`]: Sample-log matching
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod lineage;
pub mod matching;
pub mod parsing;
pub mod persist;
pub mod samples;
pub mod scheme;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::allele::{AlleleCall, Profile};
pub use core::record::MlstRecord;
pub use core::types::*;
pub use matching::reconcile::{ReconcileOptions, Reconciler, Reconciliation, Verdict};
pub use matching::ReconcileError;
pub use persist::ledger::{FileLedger, LedgerEntry, LedgerWriter, MemoryLedger};
pub use scheme::repository::{
    DirectorySchemeRepository, MemorySchemeRepository, SchemeRepository,
};
