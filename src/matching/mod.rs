//! Profile reconciliation: the consistency check and repair of reported
//! sequence types.
//!
//! This module provides the core checking functionality:
//!
//! - [`enumerate_candidates`](candidates::enumerate_candidates): expand ambiguous
//!   allele calls into candidate profiles
//! - [`lookup_types`](lookup::lookup_types): resolve candidates against a scheme table
//! - [`Reconciler`](reconcile::Reconciler): check a record file and repair it
//!
//! ## Algorithm
//!
//! 1. **Enumerate**: Cartesian product of every locus's allele list (7 or 8 loci)
//! 2. **Check**: compare candidate count and placeholders with the reported type(s)
//! 3. **Look up**: stream the scheme table once, first matching row per candidate
//! 4. **Repair**: sort resolved types (placeholders last), rewrite the record and
//!    append to the ledgers when they differ from what was reported
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mlst_reconcile::core::types::FileType;
//! use mlst_reconcile::matching::reconcile::Reconciler;
//! use mlst_reconcile::persist::ledger::FileLedger;
//! use mlst_reconcile::scheme::repository::DirectorySchemeRepository;
//!
//! let repository = DirectorySchemeRepository::new("/data/pubmlst");
//! let mut blanks = FileLedger::new("blank_MLSTs.txt");
//! let mut updated = FileLedger::new("updated_MLSTs.txt");
//!
//! let mut reconciler = Reconciler::new(&repository, &mut blanks, &mut updated);
//! let outcome = reconciler
//!     .check_file(Path::new("RUN/S1/MLST/S1.mlst"), FileType::Standard)
//!     .unwrap();
//! println!("{}: {:?}", outcome.sample, outcome.new_type());
//! ```

use thiserror::Error;

use crate::parsing::ParseError;
use crate::persist::ledger::LedgerError;
use crate::scheme::SchemeError;

pub mod candidates;
pub mod lookup;
pub mod reconcile;

/// Process exit codes for reconciliation failures
pub mod exit_code {
    pub const FAILURE: i32 = 1;
    pub const UNKNOWN_FILE_TYPE: i32 = 2;
    pub const MALFORMED_SCHEME: i32 = 3;
    pub const EMPTY_CANDIDATE_SET: i32 = 4;
    pub const SCHEME_MISMATCH: i32 = 5;
    pub const DATABASE_NOT_FOUND: i32 = 6;
    pub const MALFORMED_RECORD: i32 = 7;
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Malformed scheme: {0}")]
    MalformedScheme(String),

    #[error("No schemes found: no candidate profiles could be enumerated")]
    EmptyCandidateSet,

    #[error("Failed to rewrite {path}: {source}")]
    Rewrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    /// Exit code the command line reports for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(ParseError::UnknownFileType(_)) => exit_code::UNKNOWN_FILE_TYPE,
            Self::Parse(ParseError::InvalidFormat(_) | ParseError::InvalidType(_)) => {
                exit_code::MALFORMED_RECORD
            }
            Self::MalformedScheme(_) => exit_code::MALFORMED_SCHEME,
            Self::EmptyCandidateSet => exit_code::EMPTY_CANDIDATE_SET,
            Self::Scheme(
                SchemeError::SchemeMismatch { .. }
                | SchemeError::MissingHeader(_)
                | SchemeError::InvalidRow { .. },
            ) => exit_code::SCHEME_MISMATCH,
            Self::Scheme(SchemeError::DatabaseNotFound { .. } | SchemeError::UnknownScheme(_)) => {
                exit_code::DATABASE_NOT_FOUND
            }
            _ => exit_code::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            ReconcileError::Parse(ParseError::UnknownFileType("x".to_string())),
            ReconcileError::MalformedScheme("6 loci".to_string()),
            ReconcileError::EmptyCandidateSet,
            ReconcileError::Scheme(SchemeError::SchemeMismatch {
                expected: vec![],
                found: vec![],
            }),
            ReconcileError::Scheme(SchemeError::DatabaseNotFound {
                genus: "Vibrio".to_string(),
                species: "cholerae".to_string(),
            }),
            ReconcileError::Parse(ParseError::InvalidType("x".to_string())),
        ];
        let codes: Vec<i32> = errors.iter().map(ReconcileError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_io_failures_are_generic() {
        let err = ReconcileError::Parse(ParseError::Io(std::io::Error::other("gone")));
        assert_eq!(err.exit_code(), exit_code::FAILURE);
    }
}
