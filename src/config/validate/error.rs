//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid transform size: {0} (must be > 0)")]
    InvalidSize(u32),

    #[error("Transform mean and std must be given together")]
    IncompleteNormalization,

    #[error("Invalid {field} length: {len} (must have one value per RGB channel)")]
    InvalidChannelCount { field: &'static str, len: usize },

    #[error("Invalid std value: {0} (must be > 0.0)")]
    InvalidStd(f32),

    #[error("Invalid mean value: {0} (must be finite)")]
    InvalidMean(f32),

    #[error("Evaluation categories cannot be empty")]
    EmptyCategories,

    #[error("Duplicate evaluation category: {0}")]
    DuplicateCategory(String),

    #[error("Model name cannot be empty")]
    EmptyModelName,

    #[error("Cache file name for {0} cannot be empty")]
    EmptyCacheName(&'static str),

    #[error("Cache files {0} and {1} must have different names")]
    CacheNameCollision(&'static str, &'static str),
}
