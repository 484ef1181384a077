//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::stimuli::Convention;

/// Cuebias: shape-vs-texture cue-conflict stimuli and decision analysis
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cuebias")]
#[command(version)]
#[command(
    about = "Index cue-conflict stimuli, enumerate triplets and trials, and analyse shape-vs-texture decisions"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to YAML experiment configuration (defaults apply when omitted)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Build or load the index of a stimulus set
    Index(IndexArgs),

    /// Build or load style-transfer triplets
    Triplets(CorpusArgs),

    /// Build or load fake-stimulus trials
    Trials(CorpusArgs),

    /// Compute per-channel mean and std of a stimulus set
    Stats(StatsArgs),

    /// Mirror the style-transfer set into texture-organised directories
    TextureDir(TextureDirArgs),

    /// Analyse classifier decisions on the style-transfer set
    Evaluate(EvaluateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the index command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct IndexArgs {
    /// Stimulus set (style-transfer, fake)
    #[arg(short, long, default_value = "style-transfer")]
    pub set: Convention,

    /// Discard the persisted index and rescan storage
    #[arg(long)]
    pub rebuild: bool,
}

/// Arguments for the triplets and trials commands
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CorpusArgs {
    /// Discard the persisted corpus and enumerate again
    #[arg(long)]
    pub rebuild: bool,

    /// List anchors that contribute no tuples
    #[arg(long)]
    pub show_empty: bool,
}

/// Arguments for the stats command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct StatsArgs {
    /// Stimulus set (style-transfer, fake)
    #[arg(short, long, default_value = "style-transfer")]
    pub set: Convention,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the texture-dir command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TextureDirArgs {
    /// Shape-organised source (overrides stimuli.style_transfer)
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Texture-organised target (overrides stimuli.texture)
    #[arg(long)]
    pub to: Option<PathBuf>,
}

/// Arguments for the evaluate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct EvaluateArgs {
    /// JSON file of class probabilities per stimulus id
    #[arg(long, value_name = "FILE")]
    pub scores: PathBuf,

    /// JSON file grouping class indices per category; scores are taken as
    /// category scores when omitted
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Override evaluation.model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override evaluation.results_dir
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
