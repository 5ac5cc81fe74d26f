use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::todoist::DEFAULT_BASE_URL;

static CONFIG_FILE_NAME: &str = "config.json";
static LOG_FILE_NAME: &str = "dewy.log";
static DEFAULT_HOME_FILTER: &str = "today";

pub static ENV_API_TOKEN: &str = "TODOIST_API_TOKEN";
static ENV_CONFIG_DIR: &str = "DEWY_CONFIG_DIR";
static ENV_API_URL: &str = "DEWY_API_URL";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "dewy", "dewy"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API token found. Either:\n  1. Create {} with contents:\n     {{ \"apiToken\": \"your-todoist-api-token\" }}\n  2. Set the TODOIST_API_TOKEN environment variable",
        .path.display()
    )]
    MissingToken { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// On-disk shape of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_filter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    config_dir: PathBuf,
    api_token: String,
    home_filter: String,
    api_url: String,
}

impl AppConfig {
    /// Resolve the config directory and token from the environment and platform defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        let config_dir = resolve_config_dir()?;
        let mut config = Self::from_dir(config_dir, env::var(ENV_API_TOKEN).ok())?;
        if let Ok(url) = env::var(ENV_API_URL) {
            config.api_url = url;
        }
        Ok(config)
    }

    /// Load `config.json` from `config_dir`, falling back to `env_token` when the file has none.
    pub fn from_dir(config_dir: PathBuf, env_token: Option<String>) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let file = read_config_file(&path)?.unwrap_or_default();

        let api_token = file
            .api_token
            .filter(|token| !token.trim().is_empty())
            .or(env_token.filter(|token| !token.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingToken { path: path.clone() })?;

        let home_filter = file
            .home_filter
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOME_FILTER.to_string());

        debug!(path = %path.display(), home_filter, "resolved configuration");

        Ok(Self {
            config_dir,
            api_token,
            home_filter,
            api_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.config_dir.join(LOG_FILE_NAME)
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn home_filter(&self) -> &str {
        &self.home_filter
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Write the token and home filter back to `config.json`.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.config_path();
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        let file = ConfigFile {
            api_token: Some(self.api_token.clone()),
            home_filter: Some(self.home_filter.clone()),
        };
        let mut body = serde_json::to_string_pretty(&file).map_err(|source| {
            ConfigError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        body.push('\n');
        fs::write(&path, body).map_err(|source| ConfigError::Write { path, source })
    }
}

/// Default location of the config directory, honouring `DEWY_CONFIG_DIR`.
pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = env::var(ENV_CONFIG_DIR) {
        return Ok(PathBuf::from(dir));
    }

    PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), body).expect("write config");
    }

    #[test]
    fn reads_token_and_home_filter_from_file() {
        let dir = TempDir::new().expect("temp dir");
        write_config(&dir, r##"{ "apiToken": "abc", "homeFilter": "#Work & today" }"##);

        let config = AppConfig::from_dir(dir.path().to_path_buf(), None).expect("config");

        assert_eq!(config.api_token(), "abc");
        assert_eq!(config.home_filter(), "#Work & today");
    }

    #[test]
    fn missing_file_falls_back_to_env_token_and_today() {
        let dir = TempDir::new().expect("temp dir");

        let config =
            AppConfig::from_dir(dir.path().to_path_buf(), Some("from-env".into())).expect("config");

        assert_eq!(config.api_token(), "from-env");
        assert_eq!(config.home_filter(), "today");
    }

    #[test]
    fn file_token_wins_over_env() {
        let dir = TempDir::new().expect("temp dir");
        write_config(&dir, r#"{ "apiToken": "file" }"#);

        let config =
            AppConfig::from_dir(dir.path().to_path_buf(), Some("env".into())).expect("config");

        assert_eq!(config.api_token(), "file");
    }

    #[test]
    fn missing_token_names_both_remediations() {
        let dir = TempDir::new().expect("temp dir");

        let err = AppConfig::from_dir(dir.path().to_path_buf(), None).unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, ConfigError::MissingToken { .. }));
        assert!(message.starts_with("No API token found. Either:\n"));
        assert!(message.contains(&dir.path().join(CONFIG_FILE_NAME).display().to_string()));
        assert!(message.contains(r#"{ "apiToken": "your-todoist-api-token" }"#));
        assert!(message.contains("Set the TODOIST_API_TOKEN environment variable"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        write_config(&dir, "{ not json");

        let err = AppConfig::from_dir(dir.path().to_path_buf(), Some("env".into())).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_round_trips_through_from_dir() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("nested");
        let config = AppConfig::from_dir(nested.clone(), Some("tok".into())).expect("config");

        config.save().expect("save");
        let reloaded = AppConfig::from_dir(nested, None).expect("reload");

        assert_eq!(reloaded.api_token(), "tok");
        assert_eq!(reloaded.home_filter(), "today");
    }
}
