mod env;
pub mod file;

use crate::domain::LinePattern;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use file::{CONFIG_FILE_NAME, FileSettings};

/// Config directory used when `REPORTER_CONFIG_DIR` is unset or invalid.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/olfs/";

/// Field names of the Hyrax anonymous access log.
pub const DEFAULT_PATTERN_NAMES: &str =
    "host;sessionId;localDateTime;duration;httpStatus;responseSize;httpVerb;resourceId;query";

/// Matches lines such as
/// `[host] [id] [2016-06-23T17:50:27.468 +0100] [   19 ms] [200] [      12] [GET] [/path] [query]`.
pub const DEFAULT_PATTERN_REGEXP: &str = r"\[([^\]]*)\] \[([^\]]*)\] \[([^\]]*)\] \[\s*([^\]]*)\] \[([^\]]*)\] \[\s*([^\]]*)\] \[([^\]]*)\] \[([^\]]*)\] \[(.*)\]";

const DEFAULT_PING_SECS: u64 = 3600;
const DEFAULT_COLLECTOR_URL: &str = "localhost:8080/collector/registration?";
const DEFAULT_SERVER_URL: &str = "http://localhost:8080/opendap";
const DEFAULT_REPORTER_URL: &str = "http://localhost:9600";
const DEFAULT_LOG_COUNT: u32 = 100;
const DEFAULT_IDENTIFIER_PATH: &str = "./reporter.uuid";
const DEFAULT_REGISTRATION_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HTTP_PORT: u16 = 9600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Failed to read {}: {source}", .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse line pattern file {}: {source}", .path.display())]
    PatternFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Fully resolved settings, shared read-only by the extractor and the
/// registration client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_file_path: PathBuf,
    pub line_pattern: LinePattern,
    /// Ping interval advertised to the collector, in seconds.
    pub ping_interval_secs: u64,
    pub collector_url: String,
    pub server_url: String,
    pub reporter_url: String,
    /// Number of log records the collector should fetch per poll.
    pub log_count: u32,
    pub identifier_path: PathBuf,
    pub registration_timeout: Duration,
    pub http_port: u16,
}

impl Settings {
    /// Resolve settings from defaults, `reporter.toml` and the environment.
    pub fn load(config_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut file_settings = match find_config_dir(config_dir) {
            Some(dir) => {
                tracing::info!("Using config directory {}", dir.display());
                FileSettings::load_from_dir(&dir)?
            }
            None => FileSettings::default(),
        };
        file_settings.apply_env()?;
        Self::from_file_settings(file_settings)
    }

    /// Fill anything left unset with defaults and validate.
    pub fn from_file_settings(file: FileSettings) -> Result<Self, ConfigError> {
        let log_file_path = file
            .log_file
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("log_file"))?;

        let line_pattern = resolve_line_pattern(file.pattern_path.as_deref(), file.pattern)?;

        let settings = Self {
            log_file_path,
            line_pattern,
            ping_interval_secs: file.ping.unwrap_or(DEFAULT_PING_SECS),
            collector_url: file
                .collector_url
                .unwrap_or_else(|| DEFAULT_COLLECTOR_URL.to_string()),
            server_url: file
                .server_url
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            reporter_url: file
                .reporter_url
                .unwrap_or_else(|| DEFAULT_REPORTER_URL.to_string()),
            log_count: file.log_count.unwrap_or(DEFAULT_LOG_COUNT),
            identifier_path: file
                .identifier_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IDENTIFIER_PATH)),
            registration_timeout: Duration::from_secs(
                file.registration_timeout_secs
                    .unwrap_or(DEFAULT_REGISTRATION_TIMEOUT_SECS),
            ),
            http_port: file.http_port.unwrap_or(DEFAULT_HTTP_PORT),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_port(self.http_port)?;
        if self.registration_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Registration timeout must be greater than 0".into(),
            ));
        }
        if self.collector_url.trim().is_empty() {
            return Err(ConfigError::Missing("collector_url"));
        }
        self.line_pattern
            .compile()
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}

/// Pick the config directory: the explicit one if it is a directory,
/// otherwise [`DEFAULT_CONFIG_DIR`] if it exists.
pub fn find_config_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        if dir.is_dir() {
            return Some(dir.to_path_buf());
        }
        tracing::warn!(
            "Config directory {} is not a directory, falling back to {}",
            dir.display(),
            DEFAULT_CONFIG_DIR
        );
    }
    let default = Path::new(DEFAULT_CONFIG_DIR);
    default.is_dir().then(|| default.to_path_buf())
}

/// A pattern file wins over an inline pattern; an incomplete inline pattern
/// falls back to the built-in one.
fn resolve_line_pattern(
    pattern_path: Option<&Path>,
    inline: Option<LinePattern>,
) -> Result<LinePattern, ConfigError> {
    if let Some(path) = pattern_path.filter(|p| !p.as_os_str().is_empty()) {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileError {
            path: path.to_path_buf(),
            source,
        })?;
        return serde_json::from_str(&contents).map_err(|source| ConfigError::PatternFile {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(inline
        .filter(LinePattern::is_complete)
        .unwrap_or_else(|| LinePattern::new(DEFAULT_PATTERN_NAMES, DEFAULT_PATTERN_REGEXP)))
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidConfig("Port cannot be 0".into()));
    }
    Ok(())
}
