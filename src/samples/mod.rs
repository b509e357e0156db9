//! Reconcile the sequencing sample log against a run's output list.
//!
//! Given the samples a run produced (from a list of `RUN/SAMPLE/...` paths)
//! and the sample log export, report every log entry for that run whose
//! sequencing id, or failing that local aliquot id, is among the produced
//! samples. Matches are written as `RUN/<id>`, one per line.

use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::parsing::seqlog::SampleLogRow;
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No samples in the run list; nothing to compare against the sample log")]
    EmptySampleList,
}

/// Select the log rows of `run` whose ids appear in `samples`.
///
/// The sequencing id takes precedence over the local aliquot id.
///
/// # Errors
///
/// Returns `SampleError::EmptySampleList` if `samples` is empty.
pub fn match_samples(
    rows: &[SampleLogRow],
    samples: &[String],
    run: &str,
) -> Result<Vec<String>, SampleError> {
    if samples.is_empty() {
        return Err(SampleError::EmptySampleList);
    }
    for (i, sample) in samples.iter().enumerate() {
        debug!("{i} {sample}");
    }

    let mut matches = Vec::new();
    for row in rows.iter().filter(|row| row.output_folder == run) {
        debug!(wgs_id = %row.wgs_id, local_id = %row.local_id, "Sample log entry");
        if samples.contains(&row.wgs_id) {
            matches.push(format!("{run}/{}", row.wgs_id));
        } else if samples.contains(&row.local_id) {
            matches.push(format!("{run}/{}", row.local_id));
        } else {
            debug!(wgs_id = %row.wgs_id, "No match");
        }
    }

    info!("Matching rows: {}", matches.len());
    Ok(matches)
}

/// Write matched samples one per line
///
/// # Errors
///
/// Returns `SampleError::Io` if the file cannot be written.
pub fn write_matches(path: &Path, matches: &[String]) -> Result<(), SampleError> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for sample in matches {
        writeln!(out, "{sample}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(run: &str, wgs: &str, local: &str) -> SampleLogRow {
        SampleLogRow {
            output_folder: run.to_string(),
            wgs_id: wgs.to_string(),
            local_id: local.to_string(),
        }
    }

    fn samples(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_match_prefers_sequencing_id() {
        let rows = vec![
            row("RUN01", "2019AY-0001", "CDC-1"),
            row("RUN01", "2019AY-0002", "CDC-2"),
            row("RUN01", "2019AY-0003", "CDC-3"),
            row("RUN02", "2019AY-0004", "CDC-4"),
        ];
        let matches = match_samples(
            &rows,
            &samples(&["2019AY-0001", "CDC-1", "CDC-2", "2019AY-0004"]),
            "RUN01",
        )
        .unwrap();
        assert_eq!(matches, vec!["RUN01/2019AY-0001", "RUN01/CDC-2"]);
    }

    #[test]
    fn test_empty_sample_list() {
        let result = match_samples(&[row("RUN01", "S1", "")], &[], "RUN01");
        assert!(matches!(result, Err(SampleError::EmptySampleList)));
    }

    #[test]
    fn test_write_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.txt");
        write_matches(&path, &samples(&["RUN01/S1", "RUN01/S2"])).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "RUN01/S1\nRUN01/S2\n"
        );
    }
}
