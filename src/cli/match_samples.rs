use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::seqlog::{parse_run_list_file, parse_sample_log_file};
use crate::samples::{match_samples, write_matches};

#[derive(Args)]
pub struct MatchSamplesArgs {
    /// Sample log workbook (xlsx, xls, xlsb, ods) or a CSV/TSV export of it
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Workbook sheet holding the sample log (defaults to the first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// List of run outputs (RUN/SAMPLE/... per line)
    #[arg(short, long, required = true)]
    pub list: PathBuf,

    /// Run ID to match against the Output Folder Name column
    #[arg(short, long, required = true)]
    pub run: String,

    /// Output file for the matched RUN/SAMPLE lines
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

/// Execute match-samples subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed, the run list is empty, or
/// the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchSamplesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let samples = parse_run_list_file(&args.list)?;
    let rows = parse_sample_log_file(&args.input, args.sheet.as_deref())?;

    if verbose {
        eprintln!(
            "{} samples in run list, {} rows in sample log",
            samples.len(),
            rows.len()
        );
    }

    let matches = match_samples(&rows, &samples, &args.run)?;
    write_matches(&args.output, &matches)?;

    match format {
        OutputFormat::Text => println!("Matching rows: {}", matches.len()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "run": args.run,
                "output": args.output.display().to_string(),
                "matches": matches,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("run\tsample");
            for m in &matches {
                let sample = m.split_once('/').map_or(m.as_str(), |(_, s)| s);
                println!("{}\t{sample}", args.run);
            }
        }
    }

    Ok(())
}
