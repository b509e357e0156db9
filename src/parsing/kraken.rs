//! Parser for Kraken2 per-sequence classification output.
//!
//! Each line is `C|U <TAB> sequence id <TAB> taxid <TAB> length <TAB> LCA mapping`.
//! Only the first three columns are used. Gzip-compressed files (`.gz`) are
//! decompressed transparently.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::parsing::ParseError;

/// One classified (or unclassified) sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenAssignment {
    /// Whether Kraken2 classified the sequence (`C`)
    pub classified: bool,
    /// Contig / read identifier
    pub sequence_id: String,
    /// Assigned NCBI taxonomy id (`0` when unclassified)
    pub taxid: String,
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Parse a Kraken2 output file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or
/// `ParseError::InvalidFormat` if a line has fewer than three columns.
pub fn parse_kraken_file(path: &Path) -> Result<Vec<KrakenAssignment>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        parse_kraken_reader(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        parse_kraken_reader(BufReader::new(file))
    }
}

/// Parse Kraken2 output from any buffered reader
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure or `ParseError::InvalidFormat`
/// if a line has fewer than three columns.
pub fn parse_kraken_reader<R: BufRead>(reader: R) -> Result<Vec<KrakenAssignment>, ParseError> {
    let mut assignments = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Kraken2 line {} has fewer than 3 fields",
                i + 1
            )));
        }

        assignments.push(KrakenAssignment {
            classified: fields[0] == "C",
            sequence_id: fields[1].to_string(),
            taxid: fields[2].trim().to_string(),
        });
    }

    Ok(assignments)
}

/// Parse Kraken2 output held in memory
///
/// # Errors
///
/// See [`parse_kraken_reader`].
pub fn parse_kraken_text(text: &str) -> Result<Vec<KrakenAssignment>, ParseError> {
    parse_kraken_reader(text.as_bytes())
}
