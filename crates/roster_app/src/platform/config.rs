use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use roster_client::RemoteSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::cli::Cli;
use super::logging::{LogDestination, LogLevel};

pub const DEFAULT_CONFIG_FILE: &str = "roster.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid server url {url:?}: {source}")]
    ServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings read from `roster.ron`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub download_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000/".to_string(),
            download_dir: PathBuf::from("downloads"),
            log_destination: LogDestination::File,
            log_level: LogLevel::Info,
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_response_bytes: 50 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./roster.ron` when no path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        ron::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        self.log_level = self.log_level.raised(cli.verbose);
    }

    pub fn remote_settings(&self) -> Result<RemoteSettings, ConfigError> {
        let base_url = Url::parse(&self.server_url).map_err(|source| ConfigError::ServerUrl {
            url: self.server_url.clone(),
            source,
        })?;
        let mut settings = RemoteSettings::new(base_url);
        settings.connect_timeout = self.connect_timeout_secs.map(Duration::from_secs);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings.max_response_bytes = self.max_response_bytes;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("roster.ron");
        fs::write(
            &path,
            r#"(server_url: "http://scraper.local:8080/", request_timeout_secs: Some(30))"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server_url, "http://scraper.local:8080/");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.connect_timeout_secs, None);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&temp.path().join("absent.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("roster.ron");
        fs::write(&path, "(server_url: 42").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = AppConfig::default();
        let cli = Cli {
            server: Some("http://other:9000".to_string()),
            download_dir: Some(PathBuf::from("/tmp/out")),
            verbose: 1,
            ..Cli::default()
        };

        config.apply_cli(&cli);

        assert_eq!(config.server_url, "http://other:9000");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn remote_settings_have_no_timeouts_by_default() {
        let settings = AppConfig::default().remote_settings().unwrap();

        assert_eq!(settings.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(settings.connect_timeout, None);
        assert_eq!(settings.request_timeout, None);
    }

    #[test]
    fn bad_server_url_is_reported() {
        let config = AppConfig {
            server_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.remote_settings(),
            Err(ConfigError::ServerUrl { .. })
        ));
    }
}
