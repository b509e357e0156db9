//! Reference MLST scheme storage and resolution.
//!
//! Each scheme is a PubMLST-style profile table: a header row naming the loci
//! and one row per sequence type.
//!
//! ```text
//! ST  Oxf_gltA  Oxf_gyrB  Oxf_gdhB  Oxf_recA  Oxf_cpn60  Oxf_gpi  Oxf_rpoD  clonal_complex
//! 1   1         1         1         1         5          1        1         CC1
//! 2   1         3         3         2         2          96       3         CC2
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use mlst_reconcile::scheme::repository::{DirectorySchemeRepository, SchemeRepository};
//!
//! // Schemes live at <root>/<name>/<name>.txt
//! let repository = DirectorySchemeRepository::new("/data/pubmlst");
//! if repository.contains("abaumannii") {
//!     let reader = repository.open("abaumannii").unwrap();
//! }
//! ```

use thiserror::Error;

pub mod repository;
pub mod taxonomy;

#[derive(Error, Debug)]
pub enum SchemeError {
    #[error("Failed to read scheme: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scheme '{0}' not found in repository")]
    UnknownScheme(String),

    #[error("Scheme loci {found:?} do not match record loci {expected:?}")]
    SchemeMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Scheme '{0}' has no ST header row before its profiles")]
    MissingHeader(String),

    #[error("Invalid profile row {line} in scheme '{scheme}': {message}")]
    InvalidRow {
        scheme: String,
        line: usize,
        message: String,
    },

    #[error("No database found for {genus} {species}")]
    DatabaseNotFound { genus: String, species: String },
}
