//! Library error type.

use cuebias_common::CuebiasError;
use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by stimulus indexing, tuple enumeration and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Image error for {path}: {message}")]
    Image { path: PathBuf, message: String },

    /// Storage root missing and no persisted index to fall back on.
    #[error("Stimulus index unavailable: {0} does not exist and no cached index was found")]
    IndexUnavailable(PathBuf),

    #[error("Unknown stimulus id: {0}")]
    UnknownStimulus(String),

    /// A stimulus id collides with the reserved corpus key.
    #[error("Stimulus id '{0}' collides with a reserved corpus key")]
    ReservedId(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A tuple corpus enumerated from a different index.
    #[error("Tuple corpus is stale: {anchors} anchors for {indexed} indexed stimuli")]
    StaleCorpus { anchors: usize, indexed: usize },

    /// The texture mirror would overwrite the stimuli it copies.
    #[error("Texture root {target} overlaps stimulus root {source_root}")]
    OverlappingRoots { source_root: PathBuf, target: PathBuf },
}

impl From<Error> for CuebiasError {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(source) => CuebiasError::io("stimulus storage", source),
            Error::Serialization(message) => CuebiasError::Serialization { message },
            Error::ConfigError(message) => CuebiasError::ConfigValue {
                field: "config".into(),
                message,
                suggestion: "Run `cuebias info` to print the effective configuration".into(),
            },
            Error::Image { path, message } => CuebiasError::Image { path, message },
            Error::IndexUnavailable(path) => CuebiasError::StimuliNotFound { path },
            Error::UnknownStimulus(id) => CuebiasError::UnknownStimulus { id },
            Error::ReservedId(id) => CuebiasError::Internal {
                message: format!("stimulus id '{id}' is reserved"),
            },
            Error::DimensionMismatch { expected, actual } => CuebiasError::InvalidScores {
                message: format!("expected {expected} values, got {actual}"),
            },
            err @ Error::StaleCorpus { .. } => CuebiasError::Internal {
                message: err.to_string(),
            },
            Error::OverlappingRoots {
                source_root,
                target,
            } => CuebiasError::ConfigValue {
                field: "stimuli.texture".into(),
                message: format!(
                    "{} overlaps the style-transfer root {}",
                    target.display(),
                    source_root.display()
                ),
                suggestion: "Point stimuli.texture outside the shape-organised set".into(),
            },
        }
    }
}
