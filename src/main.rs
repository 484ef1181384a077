//! Cuebias CLI
//!
//! # Usage
//!
//! ```bash
//! # Index the style-transfer set and enumerate its triplets
//! cuebias index
//! cuebias triplets
//!
//! # Fake stimuli and their trials
//! cuebias index --set fake
//! cuebias trials
//!
//! # Decision reports from precomputed classifier probabilities
//! cuebias evaluate --scores probs.json --mapping imagenet16.json --model resnet50
//! ```

use clap::Parser;
use cuebias::cli::{init_tracing, run_command, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
