//! Parsers for MLST result files and the auxiliary inputs of the toolkit.
//!
//! This module provides parsers for:
//!
//! - **Standard MLST output**: one line of `sample, scheme, type, locus(alleles)...`
//! - **SRST2 MLST output**: a header of locus names plus one data line
//! - **Kraken2 per-contig output**: classification status, contig id, taxid
//! - **Sample logs**: the sequencing sample spreadsheet, or a delimited export of it
//!
//! ## Example
//!
//! ```rust,no_run
//! use mlst_reconcile::parsing::standard::parse_standard_text;
//!
//! let line = "S1\tabaumannii\t1\tcpn60(1)\tfusA(1)\tgltA(1)\tpyrG(1)\trecA(5)\trplB(1)\trpoB(1)\n";
//! let record = parse_standard_text(line).unwrap();
//! assert_eq!(record.loci.len(), 7);
//! ```
//!
//! ## Standard Layout
//!
//! | Column | Content | Example |
//! |--------|---------|---------|
//! | 1 | Sample | `2019AY-0001` |
//! | 2 | Scheme | `abaumannii_2` |
//! | 3 | Type(s) | `2`, `-`, `1/2` |
//! | 4.. | Locus calls | `cpn60(1)`, `gltA(1,2)` |

use thiserror::Error;

pub mod kraken;
pub mod seqlog;
pub mod srst2;
pub mod standard;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid MLST record format: {0}")]
    InvalidFormat(String),

    #[error("Unknown MLST filetype '{0}' (expected standard or srst2)")]
    UnknownFileType(String),

    #[error("Invalid sequence type: '{0}'")]
    InvalidType(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
}
