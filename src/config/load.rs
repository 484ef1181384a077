//! Loading experiment configuration from YAML

use super::schema::ExperimentSpec;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate an experiment specification from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<ExperimentSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let spec: ExperimentSpec = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;

    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;

    Ok(spec)
}

/// Load `config_path` if given, else the default specification
pub fn load_or_default(config_path: Option<&Path>) -> Result<ExperimentSpec> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(ExperimentSpec::default()),
    }
}
