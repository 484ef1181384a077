//! Experiment configuration and command-line interface
//!
//! A YAML file (optional) describes where stimuli live, where the index and
//! tuple corpora are persisted, how images are preprocessed, and how decision
//! reports are written.

pub mod cli;
mod load;
mod schema;
pub mod validate;

pub use cli::{
    parse_args, Cli, Command, CorpusArgs, EvaluateArgs, IndexArgs, InfoArgs, OutputFormat,
    StatsArgs, TextureDirArgs,
};
pub use load::{load_config, load_or_default};
pub use schema::{
    CacheConfig, EvaluationConfig, ExperimentSpec, StimuliConfig, TransformConfig,
};
pub use validate::{validate_config, ValidationError};
