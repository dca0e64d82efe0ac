//! Configuration management and validation.
//!
//! Provides the settings a [`DataContainer`](crate::DataContainer) is built
//! with: sensor deduplication tolerance, index origin on file, the alias table
//! and the tokens that hold sensor indices. Settings can be read from a TOML
//! file and then overridden from the command line.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FLOAT_PRECISION, DEFAULT_SENSOR_FORMAT,
    DEFAULT_SENSOR_TOLERANCE, MAX_FLOAT_PRECISION,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One alias table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Raw token as it appears in files, e.g. `u/mV`
    pub alias: String,

    /// Canonical column token, e.g. `u`
    pub token: String,
}

/// Container settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Distance below which a parsed sensor is merged into an existing one
    pub sensor_tolerance: f64,

    /// Sensor indices on file start at 1 instead of 0
    pub sensor_index_from_one: bool,

    /// Compact invalid rows right after loading
    pub remove_invalid_on_load: bool,

    /// Sensor column order used by save when none is given
    pub sensor_format: String,

    /// Digits after the decimal point for written floats
    pub float_precision: usize,

    /// Tokens registered as sensor-index columns at construction
    pub sensor_index_tokens: Vec<String>,

    /// Alias table loaded into the token translator
    pub aliases: Vec<AliasConfig>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            sensor_tolerance: DEFAULT_SENSOR_TOLERANCE,
            sensor_index_from_one: false,
            remove_invalid_on_load: false,
            sensor_format: DEFAULT_SENSOR_FORMAT.to_string(),
            float_precision: DEFAULT_FLOAT_PRECISION,
            sensor_index_tokens: Vec::new(),
            aliases: Vec::new(),
        }
    }
}

impl ContainerConfig {
    /// Set the sensor deduplication tolerance
    pub fn with_sensor_tolerance(mut self, tolerance: f64) -> Self {
        self.sensor_tolerance = tolerance;
        self
    }

    /// Read and write sensor indices starting at 1
    pub fn with_sensor_index_from_one(mut self, from_one: bool) -> Self {
        self.sensor_index_from_one = from_one;
        self
    }

    /// Compact invalid rows right after loading
    pub fn with_remove_invalid_on_load(mut self) -> Self {
        self.remove_invalid_on_load = true;
        self
    }

    /// Set the default sensor column order for save
    pub fn with_sensor_format(mut self, format: impl Into<String>) -> Self {
        self.sensor_format = format.into();
        self
    }

    /// Set the float output precision
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    /// Register a token as a sensor-index column
    pub fn with_sensor_index(mut self, token: impl Into<String>) -> Self {
        self.sensor_index_tokens.push(token.into());
        self
    }

    /// Add an alias table entry
    pub fn with_alias(mut self, alias: impl Into<String>, token: impl Into<String>) -> Self {
        self.aliases.push(AliasConfig {
            alias: alias.into(),
            token: token.into(),
        });
        self
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if !self.sensor_tolerance.is_finite() || self.sensor_tolerance <= 0.0 {
            return Err(Error::configuration(format!(
                "sensor_tolerance must be a positive finite number, got {}",
                self.sensor_tolerance
            )));
        }

        if self.float_precision == 0 || self.float_precision > MAX_FLOAT_PRECISION {
            return Err(Error::configuration(format!(
                "float_precision must be within 1..={}, got {}",
                MAX_FLOAT_PRECISION, self.float_precision
            )));
        }

        if self.sensor_format.split_whitespace().next().is_none() {
            return Err(Error::configuration("sensor_format must not be empty"));
        }

        if let Some(token) = self.sensor_index_tokens.iter().find(|t| t.trim().is_empty()) {
            return Err(Error::configuration(format!(
                "sensor index token must not be empty: '{}'",
                token
            )));
        }

        for entry in &self.aliases {
            if entry.alias.trim().is_empty() || entry.token.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "alias entries need both alias and token: {:?}",
                    entry
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from a TOML file and validate it
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;

        let config: ContainerConfig = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default location of the configuration file
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ContainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sensor_format, "x y z");
        assert_eq!(config.float_precision, 14);
        assert!(!config.sensor_index_from_one);
    }

    #[test]
    fn test_builder_methods() {
        let config = ContainerConfig::default()
            .with_sensor_tolerance(0.01)
            .with_sensor_index_from_one(true)
            .with_remove_invalid_on_load()
            .with_sensor_index("s")
            .with_alias("u/mV", "u");

        assert_eq!(config.sensor_tolerance, 0.01);
        assert!(config.sensor_index_from_one);
        assert!(config.remove_invalid_on_load);
        assert_eq!(config.sensor_index_tokens, vec!["s".to_string()]);
        assert_eq!(config.aliases[0].token, "u");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(
            ContainerConfig::default()
                .with_sensor_tolerance(0.0)
                .validate()
                .is_err()
        );
        assert!(
            ContainerConfig::default()
                .with_sensor_tolerance(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            ContainerConfig::default()
                .with_float_precision(0)
                .validate()
                .is_err()
        );
        assert!(
            ContainerConfig::default()
                .with_sensor_format("  ")
                .validate()
                .is_err()
        );
        assert!(
            ContainerConfig::default()
                .with_alias("", "u")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
sensor_index_from_one = true
sensor_index_tokens = ["s", "g"]

[[aliases]]
alias = "t/ms"
token = "t"
"#
        )
        .unwrap();

        let config = ContainerConfig::from_file(file.path()).unwrap();
        assert!(config.sensor_index_from_one);
        assert_eq!(config.sensor_index_tokens, vec!["s", "g"]);
        assert_eq!(config.aliases.len(), 1);
        // Unspecified fields fall back to defaults
        assert_eq!(config.sensor_tolerance, DEFAULT_SENSOR_TOLERANCE);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sensor_tolerance = \"not a number\"").unwrap();

        let result = ContainerConfig::from_file(file.path());
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
