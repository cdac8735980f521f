//! Global expocal configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FETCH_TIMEOUT;
use crate::error::{ExpoError, ExpoResult};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_REGION: &str = "Sri Lanka";
const DEFAULT_FOCUS: &str = "Focus on Colombo (BMICH, SLECC) and other major cities.";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("expocal"))
        .unwrap_or_else(|| PathBuf::from("~/.expocal"))
}

fn default_fetch_timeout() -> String {
    humantime::format_duration(DEFAULT_FETCH_TIMEOUT).to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_focus() -> String {
    DEFAULT_FOCUS.to_string()
}

/// Configuration at ~/.config/expocal/config.toml, overridable with
/// `EXPOCAL_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Where the store (API key + cached events) lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Upper bound for one refresh, e.g. "90s" or "2m"
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Country or area the search is scoped to
    #[serde(default = "default_region")]
    pub region: String,

    /// Extra sentence steering the search towards venues or cities
    #[serde(default = "default_focus")]
    pub focus: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(),
            fetch_timeout: default_fetch_timeout(),
            model: default_model(),
            api_base: default_api_base(),
            region: default_region(),
            focus: default_focus(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> ExpoResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ExpoError::Config("Could not determine config directory".into()))?
            .join("expocal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented-out default on first run)
    /// and apply environment overrides.
    pub fn load() -> ExpoResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::build(&config_path, true)
    }

    /// Load from an explicit file, without environment overrides.
    pub fn load_from(path: &Path) -> ExpoResult<Self> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> ExpoResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from(path.to_path_buf()).required(false));
        if with_env {
            builder = builder.add_source(Environment::with_prefix("EXPOCAL"));
        }

        let config: AppConfig = builder
            .build()
            .map_err(|e| ExpoError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ExpoError::Config(e.to_string()))?;

        // Surface a bad duration now rather than at the first refresh
        config.fetch_timeout()?;
        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn fetch_timeout(&self) -> ExpoResult<Duration> {
        humantime::parse_duration(self.fetch_timeout.trim()).map_err(|e| {
            ExpoError::Config(format!("Invalid fetch_timeout '{}': {e}", self.fetch_timeout))
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ExpoResult<()> {
        let contents = format!(
            "\
# expocal configuration

# Where the API key and cached events are stored:
# data_dir = \"{}\"

# Give up on a refresh after this long:
# fetch_timeout = \"{}\"

# Gemini model and endpoint:
# model = \"{DEFAULT_MODEL}\"
# api_base = \"{DEFAULT_API_BASE}\"

# What to search for:
# region = \"{DEFAULT_REGION}\"
# focus = \"{DEFAULT_FOCUS}\"
",
            default_data_dir().display(),
            default_fetch_timeout(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ExpoError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ExpoError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expocal/config.toml");
        AppConfig::create_default_config(&path).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.fetch_timeout().unwrap(), DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"~/expo-data\"\nfetch_timeout = \"90s\"\nregion = \"Kenya\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.region, "Kenya");
        assert_eq!(config.fetch_timeout().unwrap(), Duration::from_secs(90));
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
        assert!(config.data_path().ends_with("expo-data"));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fetch_timeout = \"soon\"\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ExpoError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_all_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
