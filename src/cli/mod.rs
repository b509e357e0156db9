//! Command-line interface for mlst-reconcile.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **check**: Check an MLST result against its scheme and repair the type
//! - **translate**: Turn Kraken2 output into `sequence<TAB>lineage` labels
//! - **match-samples**: Match a run's outputs against the sample log
//!
//! ## Usage
//!
//! ```text
//! # Check and repair a standard MLST result
//! mlst-reconcile check --input RUN/S1/MLST/S1.mlst --filetype standard
//!
//! # SRST2 result, scheme resolved from the filename
//! mlst-reconcile check -i RUN/S1/MLST/S1_Klebsiella_pneumoniae.srst2 -t srst2 --db-root /data/pubmlst
//!
//! # Label contigs with their lineage
//! mlst-reconcile translate S1.kraken2 S1.labels --lineages lineages.tsv
//!
//! # Which samples of RUN01 are in the sample log
//! mlst-reconcile match-samples -i seqlog.xlsx -s 2021 -l RUN01.list -r RUN01 -o RUN01.matched
//! ```

use clap::{Parser, Subcommand};

use crate::matching::{exit_code, ReconcileError};

pub mod check;
pub mod match_samples;
pub mod translate;

#[derive(Parser)]
#[command(name = "mlst-reconcile")]
#[command(version)]
#[command(about = "Check and repair MLST sequence types, plus related lab utilities")]
#[command(
    long_about = "mlst-reconcile checks MLST results whose allele calls are ambiguous.\n\nIt expands every combination of ambiguous alleles into candidate profiles, looks each one up in the PubMLST scheme, and rewrites the reported sequence type when it does not agree. Undefined profiles and rewritten types are appended to shared ledgers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check an MLST result file and repair its sequence type
    Check(check::CheckArgs),

    /// Translate Kraken2 output into lineage labels
    Translate(translate::TranslateArgs),

    /// Match a run's output list against the sample log
    MatchSamples(match_samples::MatchSamplesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Process exit code for a failed command
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ReconcileError>()
        .map_or(exit_code::FAILURE, ReconcileError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_code_for() {
        let err = anyhow::Error::new(ReconcileError::EmptyCandidateSet);
        assert_eq!(exit_code_for(&err), exit_code::EMPTY_CANDIDATE_SET);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), exit_code::FAILURE);
    }
}
