//! Configuration validation
//!
//! Checks experiment specifications before any stimulus is touched.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
