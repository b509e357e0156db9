//! Parser for SRST2-style MLST output.
//!
//! SRST2 writes a header line and a single data line:
//!
//! ```text
//! Sample  ST  gltA  gyrB  gdhB  recA  cpn60  gpi  rpoD  mismatches  uncertainty  depth  maxMAF
//! S1      2   1     3     3     2     2      96   3     0           -            41.2   0.02
//! ```
//!
//! Locus names run from the third column up to the `mismatches` column. Allele
//! values may carry SRST2 annotations (`*` for mismatches, `?` for low depth);
//! they are kept verbatim and judged later by the placeholder rules.

use std::path::Path;

use tracing::debug;

use crate::core::allele::AlleleCall;
use crate::core::record::{MlstRecord, RawLines};
use crate::core::types::FileType;
use crate::parsing::ParseError;
use crate::utils::validation::is_placeholder_allele;

/// Column of the data line holding the reported type
const TYPE_COLUMN: usize = 1;

/// First locus column in both lines
const FIRST_LOCUS_COLUMN: usize = 2;

/// Header column that ends the locus list
const LOCUS_TERMINATOR: &str = "mismatches";

/// Parse an SRST2 MLST file. The scheme name is not part of the file and must
/// be supplied by the caller.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_srst2_file(path: &Path, scheme: impl Into<String>) -> Result<MlstRecord, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_srst2_text(&content, scheme)
}

/// Parse SRST2 MLST text.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the header or data line is missing
/// or the data line has fewer allele columns than the header declares loci.
pub fn parse_srst2_text(text: &str, scheme: impl Into<String>) -> Result<MlstRecord, ParseError> {
    let raw = RawLines::split(text);

    if raw.len() < 2 {
        return Err(ParseError::InvalidFormat(
            "SRST2 output needs a header line and a data line".to_string(),
        ));
    }

    let locus_names: Vec<&str> = raw.fields[0]
        .iter()
        .skip(FIRST_LOCUS_COLUMN)
        .map(|name| name.trim())
        .take_while(|name| *name != LOCUS_TERMINATOR)
        .collect();

    let data = &raw.fields[1];
    if data.len() < FIRST_LOCUS_COLUMN + locus_names.len() {
        return Err(ParseError::InvalidFormat(format!(
            "Data line has {} columns but the header declares {} loci",
            data.len(),
            locus_names.len()
        )));
    }

    let loci: Vec<AlleleCall> = locus_names
        .iter()
        .zip(&data[FIRST_LOCUS_COLUMN..])
        .map(|(name, value)| {
            let call = AlleleCall::from_list(*name, value);
            if is_placeholder_allele(value) {
                debug!(locus = %name, value = %value, "Ambiguous SRST2 allele call");
            } else {
                debug!(locus = %name, value = %value, "SRST2 allele call");
            }
            call
        })
        .collect();

    let sample = data[0].trim().to_string();

    MlstRecord::from_parts(FileType::Srst2, sample, scheme.into(), loci, raw, 1, TYPE_COLUMN)
}
