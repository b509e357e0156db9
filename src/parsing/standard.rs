use std::path::Path;

use crate::core::allele::AlleleCall;
use crate::core::record::{MlstRecord, RawLines};
use crate::core::types::FileType;
use crate::parsing::ParseError;

/// Column holding the reported type
const TYPE_COLUMN: usize = 2;

/// First locus column
const FIRST_LOCUS_COLUMN: usize = 3;

/// Parse a standard MLST result file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_standard_file(path: &Path) -> Result<MlstRecord, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_standard_text(&content)
}

/// Parse standard MLST text. Only the first line is interpreted; any further
/// lines are carried along unchanged.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the file is empty, has fewer than
/// three columns, or a locus column is not of the form `name(a,b,...)`.
pub fn parse_standard_text(text: &str) -> Result<MlstRecord, ParseError> {
    let raw = RawLines::split(text);

    let fields = raw
        .fields
        .first()
        .ok_or_else(|| ParseError::InvalidFormat("MLST file is empty".to_string()))?;

    if fields.len() < FIRST_LOCUS_COLUMN {
        return Err(ParseError::InvalidFormat(format!(
            "Expected at least {FIRST_LOCUS_COLUMN} columns, found {}",
            fields.len()
        )));
    }

    let sample = fields[0].trim().to_string();
    let scheme = fields[1].trim().to_string();

    let loci = fields[FIRST_LOCUS_COLUMN..]
        .iter()
        .filter(|column| !column.trim().is_empty())
        .map(|column| parse_locus_column(column))
        .collect::<Result<Vec<_>, _>>()?;

    MlstRecord::from_parts(
        FileType::Standard,
        sample,
        scheme,
        loci,
        raw,
        0,
        TYPE_COLUMN,
    )
}

/// Parse a `name(a,b,...)` locus column
fn parse_locus_column(column: &str) -> Result<AlleleCall, ParseError> {
    let (name, rest) = column.trim().split_once('(').ok_or_else(|| {
        ParseError::InvalidFormat(format!("Malformed locus column '{column}'"))
    })?;
    let alleles = rest.split(')').next().unwrap_or_default();
    Ok(AlleleCall::from_list(name, alleles))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "2019AY-0001\tabaumannii\t1/2\tOxf_gltA(1)\tOxf_gyrB(3)\tOxf_gdhB(189,3)\tOxf_recA(2)\tOxf_cpn60(2)\tOxf_gpi(96,107)\tOxf_rpoD(3)\n";

    #[test]
    fn test_parse_standard_text() {
        let record = parse_standard_text(RECORD).unwrap();
        assert_eq!(record.file_type, FileType::Standard);
        assert_eq!(record.sample, "2019AY-0001");
        assert_eq!(record.scheme, "abaumannii");
        assert_eq!(record.reported_type, "1/2");
        assert_eq!(record.loci.len(), 7);
        assert_eq!(record.loci[0].locus, "Oxf_gltA");
        assert_eq!(record.loci[2].alleles, vec!["189", "3"]);
        assert_eq!(record.loci[5].alleles, vec!["96", "107"]);
    }

    #[test]
    fn test_parse_preserves_layout() {
        let record = parse_standard_text(RECORD).unwrap();
        assert_eq!(record.to_text(), RECORD);

        let record = parse_standard_text(RECORD.trim_end()).unwrap();
        assert_eq!(record.to_text(), RECORD.trim_end());
    }

    #[test]
    fn test_crlf_record_keeps_line_endings() {
        let text = RECORD.replace('\n', "\r\n");
        let mut record = parse_standard_text(&text).unwrap();
        assert_eq!(record.loci[6].alleles, vec!["3"]);

        record.set_type("1/2/-");
        assert_eq!(record.to_text(), text.replace("\t1/2\t", "\t1/2/-\t"));
    }

    #[test]
    fn test_parse_placeholder_alleles() {
        let text = "S1\tecoli\t-\tadk(~6)\tfumC(4?)\tgyrB(-)\ticd(1)\tmdh(8)\tpurA(8)\trecA(2)";
        let record = parse_standard_text(text).unwrap();
        assert!(record.loci[0].has_placeholder());
        assert!(record.loci[1].has_placeholder());
        assert!(record.loci[2].has_placeholder());
        assert!(!record.loci[3].has_placeholder());
    }

    #[test]
    fn test_parse_empty_allele_list() {
        let text = "S1\tecoli\t-\tadk()\tfumC(4)";
        let record = parse_standard_text(text).unwrap();
        assert!(record.loci[0].alleles.is_empty());
    }

    #[test]
    fn test_parse_malformed_locus() {
        let result = parse_standard_text("S1\tecoli\t-\tadk6\tfumC(4)");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_too_few_columns() {
        assert!(parse_standard_text("S1\tecoli\n").is_err());
        assert!(parse_standard_text("").is_err());
    }
}
