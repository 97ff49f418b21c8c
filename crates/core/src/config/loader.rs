//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or discover one in the working directory.
    ///
    /// With no explicit path and no discovered file, defaults are used.
    /// The loaded schema is validated before it is returned. Nothing is
    /// logged here; callers log once their subscriber is installed.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        schema
            .validate()
            .context(format!("Config: {}", config_path.as_deref().unwrap_or("<defaults>")))?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        schema.validate()?;
        Ok(Self { schema, path: None })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        "fuelroute.toml",
        ".fuelroute.toml",
        ".config/fuelroute.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::new(
                ErrorCode::ConfigNotFound,
                format!("Configuration file not found: {}", path),
            )
            .with_suggestion("Create fuelroute.toml or pass --config with a valid path")
        } else {
            Error::config(format!("Failed to read config file {}: {}", path, e)).with_source(e)
        }
    })?;

    let schema: ConfigSchema = toml::from_str(&content)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.vehicle.mpg, 10.0);
    }

    #[test]
    fn test_config_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vehicle]\nmax_range_miles = 600\nrefuel_interval_miles = 450").unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.schema.vehicle.max_range_miles, 600.0);
        assert_eq!(config.schema.vehicle.refuel_interval_miles, 450.0);
        assert!(config.path.is_some());
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let err = Config::load(Some("/nonexistent/fuelroute.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vehicle]\nmpg = -3").unwrap();

        let err = Config::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_config_from_toml_parse_error() {
        let err = Config::from_toml("[vehicle\nmpg = 3").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
