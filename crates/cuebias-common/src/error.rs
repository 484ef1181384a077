//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context for the user to fix the problem
//! without reading the source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cuebias tools.
pub type Result<T> = std::result::Result<T, CuebiasError>;

/// Errors surfaced by the cuebias command-line tools.
#[derive(Error, Debug)]
pub enum CuebiasError {
    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Create a config file or drop --config to use the default layout")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue { field: String, message: String, suggestion: String },

    /// Stimulus directory missing and nothing cached.
    #[error("Stimulus set not available: {path}\n  → Download the stimuli into this directory or point stimuli.* at them")]
    StimuliNotFound { path: PathBuf },

    /// A tuple or lookup referenced an id the index does not hold.
    #[error("Unknown stimulus id: {id}\n  → Delete the cached index/corpus files and rebuild")]
    UnknownStimulus { id: String },

    /// Classifier scores do not line up with the category mapping.
    #[error("Invalid classifier scores: {message}\n  → Check that the scores file and mapping file were produced for the same model")]
    InvalidScores { message: String },

    /// An image could not be decoded.
    #[error("Image error for {path}: {message}\n  → Re-export the file as PNG or remove it from the stimulus set")]
    Image { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this as a bug")]
    Internal { message: String },
}

impl CuebiasError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParsing { .. }
                | Self::ConfigValue { .. }
                | Self::StimuliNotFound { .. }
                | Self::UnknownStimulus { .. }
                | Self::InvalidScores { .. }
                | Self::Image { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::ConfigValue { .. } => "E003",
            Self::StimuliNotFound { .. } => "E010",
            Self::UnknownStimulus { .. } => "E011",
            Self::InvalidScores { .. } => "E020",
            Self::Image { .. } => "E030",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::Internal { .. } => "E999",
        }
    }
}
