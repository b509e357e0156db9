use clap::Parser;
use tracing_subscriber::EnvFilter;

use mlst_reconcile::cli;

fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("mlst_reconcile=debug,info")
    } else {
        EnvFilter::new("mlst_reconcile=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        cli::Commands::Check(args) => cli::check::run(args, cli.format, cli.verbose),
        cli::Commands::Translate(args) => cli::translate::run(args, cli.format, cli.verbose),
        cli::Commands::MatchSamples(args) => {
            cli::match_samples::run(args, cli.format, cli.verbose)
        }
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        std::process::exit(cli::exit_code_for(&err));
    }
}
