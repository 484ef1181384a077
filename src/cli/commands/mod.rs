//! CLI command implementations

mod corpus;
mod evaluate;
mod index;
mod info;
mod stats;
mod texture_dir;


use crate::cli::LogLevel;
use crate::config::{load_or_default, Cli, Command};
use crate::stimuli::Convention;
use cuebias_common::CuebiasError;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    let spec = load_or_default(cli.config.as_deref()).map_err(diagnostic)?;

    match cli.command {
        Command::Index(args) => index::run_index(&spec, args, log_level),
        Command::Triplets(args) => {
            corpus::run_corpus(&spec, Convention::StyleTransfer, args, log_level)
        }
        Command::Trials(args) => corpus::run_corpus(&spec, Convention::Fake, args, log_level),
        Command::Stats(args) => stats::run_stats(&spec, args, log_level),
        Command::TextureDir(args) => texture_dir::run_texture_dir(&spec, args, log_level),
        Command::Evaluate(args) => evaluate::run_evaluate(&spec, args, log_level),
        Command::Info(args) => info::run_info(&spec, args, log_level),
    }
}

/// Render a library error with its diagnostic code and hint
fn diagnostic(err: crate::Error) -> String {
    let err = CuebiasError::from(err);
    format!("[{}] {err}", err.code())
}
