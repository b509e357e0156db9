//! Parsers for the sequencing sample log and run output lists.
//!
//! The sample log is maintained as a spreadsheet. It is read either from the
//! workbook itself (xlsx, xls, xlsb, ods; one named sheet) or from a CSV/TSV
//! export of that sheet. Only three columns are used:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `Output Folder Name` | Sequencing run the sample was loaded on |
//! | `OSII WGS ID (HQ)` | Sequencing identifier |
//! | `CDC Local Aliquot ID or Outbreak ID` | Local aliquot identifier |

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use serde::Deserialize;
use tracing::debug;

use crate::parsing::ParseError;

/// Extensions read as workbooks rather than delimited text
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

const OUTPUT_FOLDER_COLUMN: &str = "Output Folder Name";
const WGS_ID_COLUMN: &str = "OSII WGS ID (HQ)";
const LOCAL_ID_COLUMN: &str = "CDC Local Aliquot ID or Outbreak ID";

/// One row of the sample log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleLogRow {
    #[serde(rename = "Output Folder Name")]
    pub output_folder: String,

    #[serde(rename = "OSII WGS ID (HQ)")]
    pub wgs_id: String,

    #[serde(rename = "CDC Local Aliquot ID or Outbreak ID")]
    pub local_id: String,
}

/// Parse a sample log, choosing the reader from the extension: workbooks are
/// read from `sheet` (the first sheet when None), `.csv` is comma separated and
/// anything else tab separated.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Workbook`
/// if a workbook cannot be opened, `ParseError::Csv` for a malformed export, or
/// `ParseError::InvalidFormat` if the sheet or a required column is missing.
pub fn parse_sample_log_file(
    path: &Path,
    sheet: Option<&str>,
) -> Result<Vec<SampleLogRow>, ParseError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let delimiter = match extension.as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => {
            return parse_sample_log_workbook(path, sheet);
        }
        Some("csv") => b',',
        _ => b'\t',
    };
    if let Some(sheet) = sheet {
        debug!(sheet, "Ignoring sheet name for a delimited sample log");
    }
    let file = std::fs::File::open(path)?;
    parse_sample_log_reader(file, delimiter)
}

/// Parse one sheet of a sample log workbook; the first row is the header.
///
/// # Errors
///
/// Returns `ParseError::Workbook` if the workbook cannot be read, or
/// `ParseError::InvalidFormat` if the sheet or a required column is missing.
pub fn parse_sample_log_workbook(
    path: &Path,
    sheet: Option<&str>,
) -> Result<Vec<SampleLogRow>, ParseError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(name) if sheet_names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => {
            return Err(ParseError::InvalidFormat(format!(
                "Sheet '{name}' not found (available: {})",
                sheet_names.join(", ")
            )));
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ParseError::InvalidFormat("Workbook contains no sheets".to_string()))?,
    };
    debug!(sheet = %sheet_name, "Reading sample log sheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    sample_log_rows(range.rows().map(|row| row.iter().map(cell_text).collect()))
}

/// Build log rows from a header row followed by data rows. Blank rows are
/// skipped.
fn sample_log_rows(
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<Vec<SampleLogRow>, ParseError> {
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| ParseError::InvalidFormat("Sample log sheet is empty".to_string()))?;

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::InvalidFormat(format!("Sample log is missing column '{name}'")))
    };
    let output_folder = column(OUTPUT_FOLDER_COLUMN)?;
    let wgs_id = column(WGS_ID_COLUMN)?;
    let local_id = column(LOCAL_ID_COLUMN)?;

    let field = |row: &[String], index: usize| row.get(index).cloned().unwrap_or_default();

    Ok(rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| SampleLogRow {
            output_folder: field(row.as_slice(), output_folder),
            wgs_id: field(row.as_slice(), wgs_id),
            local_id: field(row.as_slice(), local_id),
        })
        .collect())
}

/// Text of a workbook cell; whole numbers lose their `.0`
#[allow(clippy::cast_possible_truncation)] // Guarded by the magnitude check
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string().trim().to_string(),
    }
}

/// Parse a sample log from any reader
///
/// # Errors
///
/// Returns `ParseError::Csv` if a required column is missing or a row is malformed.
pub fn parse_sample_log_reader(
    src: impl Read,
    delimiter: u8,
) -> Result<Vec<SampleLogRow>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(src);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: SampleLogRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a run output list. Each line is a path such as `RUN/SAMPLE/...`;
/// the second component is the sample name.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a non-empty line has no second
/// path component.
pub fn parse_run_list(text: &str) -> Result<Vec<String>, ParseError> {
    let mut samples = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let sample = line
            .split('/')
            .nth(1)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Line {} of run list has no sample component: '{line}'",
                    i + 1
                ))
            })?;
        samples.push(sample.to_string());
    }

    Ok(samples)
}

/// Read and parse a run output list file
///
/// # Errors
///
/// See [`parse_run_list`].
pub fn parse_run_list_file(path: &Path) -> Result<Vec<String>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_run_list(&content)
}
