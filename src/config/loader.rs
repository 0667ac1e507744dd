//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RegistryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RegistryConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.toml");
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:4000\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn test_load_reports_each_failure_kind() {
        let temp = TempDir::new().unwrap();

        let missing = load_config(&temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));

        let bad_syntax = temp.path().join("bad.toml");
        fs::write(&bad_syntax, "[listener\n").unwrap();
        assert!(matches!(load_config(&bad_syntax).unwrap_err(), ConfigError::Parse(_)));

        let invalid = temp.path().join("invalid.toml");
        fs::write(&invalid, "[limits]\nmax_body_bytes = 0\n").unwrap();
        let err = load_config(&invalid).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert_eq!(err.to_string(), "Validation failed: limits.max_body_bytes: must be greater than 0");
    }
}
