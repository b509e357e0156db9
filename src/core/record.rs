use crate::core::allele::AlleleCall;
use crate::core::types::{FileType, ReportedType};
use crate::parsing::ParseError;

/// A parsed MLST result file.
///
/// The raw tab-separated fields of every line are retained so the record can
/// be written back with only the type field changed.
#[derive(Debug, Clone)]
pub struct MlstRecord {
    /// Layout the record was read from
    pub file_type: FileType,

    /// Sample identifier
    pub sample: String,

    /// Scheme / database name used for the lookup
    pub scheme: String,

    /// The type field as it appears in the file
    pub reported_type: String,

    /// One call per locus, in file order
    pub loci: Vec<AlleleCall>,

    raw: RawLines,
    data_line: usize,
    type_column: usize,
}

/// The tab-separated fields of every line of a record, plus the line endings
/// needed to write the text back byte for byte
#[derive(Debug, Clone, Default)]
pub struct RawLines {
    /// Fields per line, without the line terminator
    pub fields: Vec<Vec<String>>,
    carriage_returns: Vec<bool>,
    trailing_newline: bool,
}

impl RawLines {
    /// Split text on `\n`, remembering which lines ended in `\r\n` and whether
    /// the text ended with a newline.
    pub fn split(text: &str) -> Self {
        let body = text.strip_suffix('\n');
        let trailing_newline = body.is_some();

        let mut fields = Vec::new();
        let mut carriage_returns = Vec::new();
        if !text.is_empty() {
            for line in body.unwrap_or(text).split('\n') {
                let (line, cr) = match line.strip_suffix('\r') {
                    Some(line) => (line, true),
                    None => (line, false),
                };
                fields.push(line.split('\t').map(str::to_string).collect());
                carriage_returns.push(cr);
            }
        }

        Self {
            fields,
            carriage_returns,
            trailing_newline,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Join the lines back into text
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (i, (fields, cr)) in self.fields.iter().zip(&self.carriage_returns).enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(&fields.join("\t"));
            if *cr {
                text.push('\r');
            }
        }
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }
}

impl MlstRecord {
    /// Assemble a record from its parsed parts and the raw fields.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if `(data_line, type_column)` does
    /// not address a field of `raw`.
    pub fn from_parts(
        file_type: FileType,
        sample: String,
        scheme: String,
        loci: Vec<AlleleCall>,
        raw: RawLines,
        data_line: usize,
        type_column: usize,
    ) -> Result<Self, ParseError> {
        let reported_type = raw
            .fields
            .get(data_line)
            .and_then(|fields| fields.get(type_column))
            .cloned()
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "No type field at line {} column {}",
                    data_line + 1,
                    type_column + 1
                ))
            })?;

        Ok(Self {
            file_type,
            sample,
            scheme,
            reported_type,
            loci,
            raw,
            data_line,
            type_column,
        })
    }

    /// Normalized view of the reported type
    ///
    /// # Errors
    ///
    /// See [`ReportedType::normalize`].
    pub fn normalized_type(&self) -> Result<ReportedType, ParseError> {
        ReportedType::normalize(&self.reported_type)
    }

    /// Locus names in scheme order
    pub fn locus_names(&self) -> Vec<String> {
        self.loci.iter().map(|call| call.locus.clone()).collect()
    }

    /// Replace the type field
    pub fn set_type(&mut self, new_type: &str) {
        self.raw.fields[self.data_line][self.type_column] = new_type.to_string();
        self.reported_type = new_type.to_string();
    }

    /// Fields of the data line after the sample identifier
    pub fn trailing_fields(&self) -> &[String] {
        self.raw.fields[self.data_line].get(1..).unwrap_or_default()
    }

    /// Render the record in its original layout
    pub fn to_text(&self) -> String {
        self.raw.to_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MlstRecord {
        MlstRecord::from_parts(
            FileType::Standard,
            "S1".to_string(),
            "abaumannii".to_string(),
            vec![AlleleCall::from_list("cpn60", "1")],
            RawLines::split("S1\tabaumannii\t-\tcpn60(1)\n"),
            0,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_text() {
        assert_eq!(record().to_text(), "S1\tabaumannii\t-\tcpn60(1)\n");
    }

    #[test]
    fn test_set_type() {
        let mut record = record();
        record.set_type("1/2");
        assert_eq!(record.reported_type, "1/2");
        assert_eq!(record.to_text(), "S1\tabaumannii\t1/2\tcpn60(1)\n");
    }

    #[test]
    fn test_trailing_fields() {
        assert_eq!(record().trailing_fields(), ["abaumannii", "-", "cpn60(1)"]);
    }

    #[test]
    fn test_missing_type_column() {
        let result = MlstRecord::from_parts(
            FileType::Standard,
            "S1".to_string(),
            "abaumannii".to_string(),
            Vec::new(),
            RawLines::split("S1\tabaumannii"),
            0,
            2,
        );
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_raw_lines_keep_crlf() {
        let text = "Sample\tST\tgltA\r\nS1\t5\t1\r\n";
        let raw = RawLines::split(text);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.fields[1], ["S1", "5", "1"]);
        assert_eq!(raw.to_text(), text);
    }

    #[test]
    fn test_raw_lines_without_trailing_newline() {
        for text in ["S1\t5", "a\nb\r\nc", "a\n\nb\n", ""] {
            assert_eq!(RawLines::split(text).to_text(), text);
        }
        assert!(RawLines::split("").is_empty());
    }
}
