use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::lineage::table::LineageTable;
use crate::lineage::translate::{write_labels, LineageLabel, LineageTranslator};
use crate::parsing::kraken::parse_kraken_file;

#[derive(Args)]
pub struct TranslateArgs {
    /// Kraken2 per-sequence output (plain or .gz)
    #[arg(required = true)]
    pub kraken: PathBuf,

    /// Output file for sequence<TAB>lineage labels
    #[arg(required = true)]
    pub output: PathBuf,

    /// Lineage table with taxid<TAB>lineage lines
    #[arg(long, required = true)]
    pub lineages: PathBuf,
}

/// Execute translate subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be parsed, a taxid has no lineage, or
/// the labels cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TranslateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let table = LineageTable::load_from_file(&args.lineages)?;
    if verbose {
        eprintln!("Loaded {} lineages", table.len());
    }

    let assignments = parse_kraken_file(&args.kraken)?;
    let mut translator = LineageTranslator::new(&table);
    let labels = translator.translate(&assignments)?;
    write_labels(&args.output, &labels)?;

    match format {
        OutputFormat::Text => {
            println!("Lines: {}", labels.len());
            for label in &labels {
                println!("{label}");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "output": args.output.display().to_string(),
                "lines": labels.len(),
                "taxa": translator.cached(),
                "labels": labels,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv_labels(&labels),
    }

    Ok(())
}

fn print_tsv_labels(labels: &[LineageLabel]) {
    println!("sequence\ttaxid\tlineage");
    for label in labels {
        println!("{}\t{}\t{}", label.sequence_id, label.taxid, label.lineage);
    }
}
