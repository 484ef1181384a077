//! Cuebias: shape-vs-texture cue-conflict stimuli
//!
//! Builds persistent indices of cue-conflict image stimuli, enumerates the
//! triplets (Geirhos style transfer) and trials (synthetic stimuli) used to
//! probe whether a classifier follows shape or texture, and turns classifier
//! scores into shape/texture decision reports.
//!
//! # Modules
//!
//! - [`stimuli`]: filename parsing, indexing, match sets, tuple enumeration
//! - [`data`]: image decoding, normalization and set statistics
//! - [`eval`]: category mapping, decisions, tables and reports
//! - [`config`]: YAML experiment configuration and CLI arguments
//! - [`cli`]: command handlers for the `cuebias` binary

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod stimuli;

pub use error::{Error, Result};
