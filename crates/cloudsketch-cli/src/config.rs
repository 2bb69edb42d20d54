//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use cloudsketch::{CloudsketchError, config::AppConfig};

const LOCAL_CONFIG: &str = "cloudsketch/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for CloudsketchError {
    fn from(err: ConfigError) -> Self {
        CloudsketchError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (cloudsketch/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CloudsketchError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "cloudsketch", "cloudsketch") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CloudsketchError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content).map_err(Into::into)
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r##"
            [layout]
            relocation_limit = 20

            [style]
            header_color = "#336699"
            font_family = "Noto Sans"
            "##,
        )
        .unwrap();

        assert_eq!(config.layout().relocation_limit(), 20);
        assert_eq!(
            config.style().header_color().unwrap().map(|c| c.to_hex()),
            Some("#336699".to_string())
        );
        assert_eq!(config.style().font_family(), Some("Noto Sans"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.layout().relocation_limit(), 100);
        assert_eq!(config.style().font_family(), None);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse_config("[layout\nrelocation_limit = 1").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nrelocation_limit = 7").unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.layout().relocation_limit(), 7);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();

        assert!(err.to_string().contains("Missing configuration file"));
    }
}
