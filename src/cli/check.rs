use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::FileType;
use crate::matching::reconcile::{ReconcileOptions, Reconciler, Reconciliation};
use crate::matching::ReconcileError;
use crate::persist::ledger::{FileLedger, BLANKS_LEDGER, UPDATED_LEDGER};
use crate::scheme::repository::DirectorySchemeRepository;

#[derive(Args)]
pub struct CheckArgs {
    /// Input MLST result file
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Layout of the MLST file (standard or srst2)
    #[arg(short = 't', long, required = true)]
    pub filetype: String,

    /// Directory of PubMLST schemes, laid out as <name>/<name>.txt
    #[arg(long, default_value = "databases/pubmlsts")]
    pub db_root: PathBuf,

    /// Directory holding the blank_MLSTs.txt and updated_MLSTs.txt ledgers
    #[arg(long, default_value = ".")]
    pub ledger_dir: PathBuf,

    /// Also look up types that already agree with the allele calls, repairing
    /// concrete types that are missing from the scheme
    #[arg(long)]
    pub verify_defined: bool,
}

/// Execute check subcommand
///
/// # Errors
///
/// Returns a `ReconcileError` if the file type is unknown, the record or its
/// scheme is unusable, or the repair cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let file_type: FileType = args.filetype.parse().map_err(ReconcileError::from)?;

    let repository = DirectorySchemeRepository::new(&args.db_root);
    let mut blanks = FileLedger::new(args.ledger_dir.join(BLANKS_LEDGER));
    let mut updated = FileLedger::new(args.ledger_dir.join(UPDATED_LEDGER));

    if verbose {
        eprintln!(
            "Schemes from {}, ledgers in {}",
            repository.root().display(),
            args.ledger_dir.display()
        );
    }

    let options = ReconcileOptions {
        verify_defined: args.verify_defined,
    };
    let mut reconciler =
        Reconciler::new(&repository, &mut blanks, &mut updated).with_options(options);
    let reconciliation = reconciler.check_file(&args.input, file_type)?;

    match format {
        OutputFormat::Text => print_text_result(&args, &reconciliation),
        OutputFormat::Json => print_json_result(&args, &reconciliation)?,
        OutputFormat::Tsv => print_tsv_result(&reconciliation),
    }

    Ok(())
}

fn print_text_result(args: &CheckArgs, reconciliation: &Reconciliation) {
    println!("MLST Check");
    println!("{}", "=".repeat(60));
    println!("\nInput: {}", args.input.display());
    println!("  Sample: {}", reconciliation.sample);
    println!("  Scheme: {}", reconciliation.scheme);
    println!("  Candidate profiles: {}", reconciliation.candidates);
    println!("  Verdict: {}", reconciliation.verdict.describe());
    println!("  Old types: {}", reconciliation.reported.join(","));

    if let Some(resolved) = &reconciliation.resolved {
        println!("  New types: {}", resolved.join(","));
    }

    match reconciliation.new_type() {
        Some(new_type) => println!("\nUpdated type to {new_type}"),
        None => println!("\nNo change"),
    }

    if let Some(anomaly) = &reconciliation.anomaly {
        println!("Problem: {}", anomaly.label());
    }
}

fn print_json_result(args: &CheckArgs, reconciliation: &Reconciliation) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "changed": reconciliation.is_changed(),
        "new_type": reconciliation.new_type(),
        "result": reconciliation,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(reconciliation: &Reconciliation) {
    println!("sample\tscheme\tcandidates\tverdict\told_type\tnew_type\tproblem");
    println!(
        "{}\t{}\t{}\t{:?}\t{}\t{}\t{}",
        reconciliation.sample,
        reconciliation.scheme,
        reconciliation.candidates,
        reconciliation.verdict,
        reconciliation.old_type(),
        reconciliation.new_type().unwrap_or_default(),
        reconciliation
            .anomaly
            .as_ref()
            .map(|a| a.label())
            .unwrap_or_default(),
    );
}
