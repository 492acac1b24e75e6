use super::ConfigError;
use super::env::{load_env_path, load_env_string, load_env_var};
use crate::domain::LinePattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the settings file looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "reporter.toml";

/// Optional overrides read from `reporter.toml` and the environment.
///
/// ```toml
/// log_file = "/usr/share/olfs/logs/anonymous.log"
/// ping = 3600
/// collector_url = "collector.example.org/registration?"
///
/// [pattern]
/// names = "host;id;localDateTime"
/// regexp = '\[([^\]]*)\] \[([^\]]*)\] \[([^\]]*)\]'
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub log_file: Option<PathBuf>,
    pub pattern_path: Option<PathBuf>,
    pub pattern: Option<LinePattern>,
    pub ping: Option<u64>,
    pub collector_url: Option<String>,
    pub server_url: Option<String>,
    pub reporter_url: Option<String>,
    pub log_count: Option<u32>,
    pub identifier_path: Option<PathBuf>,
    pub registration_timeout_secs: Option<u64>,
    pub http_port: Option<u16>,
}

impl FileSettings {
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `reporter.toml` from `dir`. A missing file yields empty settings.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!("No {} in {}", CONFIG_FILE_NAME, dir.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileError {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&contents, &path)
    }

    /// Overlay individual `REPORTER_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        load_env_path("REPORTER_LOG_FILE", &mut self.log_file);
        load_env_path("REPORTER_PATTERN_PATH", &mut self.pattern_path);

        let mut names = None;
        let mut regexp = None;
        load_env_string("REPORTER_PATTERN_NAMES", &mut names);
        load_env_string("REPORTER_PATTERN_REGEXP", &mut regexp);
        if names.is_some() || regexp.is_some() {
            let current = self.pattern.take().unwrap_or_default();
            self.pattern = Some(LinePattern {
                names: names.unwrap_or(current.names),
                regexp: regexp.unwrap_or(current.regexp),
            });
        }

        load_env_var("REPORTER_PING", &mut self.ping)?;
        load_env_string("REPORTER_COLLECTOR_URL", &mut self.collector_url);
        load_env_string("REPORTER_SERVER_URL", &mut self.server_url);
        load_env_string("REPORTER_URL", &mut self.reporter_url);
        load_env_var("REPORTER_LOG_COUNT", &mut self.log_count)?;
        load_env_path("REPORTER_IDENTIFIER_PATH", &mut self.identifier_path);
        load_env_var(
            "REPORTER_REGISTRATION_TIMEOUT_SECS",
            &mut self.registration_timeout_secs,
        )?;
        load_env_var("HTTP_PORT", &mut self.http_port)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
            log_file = "/usr/share/olfs/logs/anonymous.log"
            ping = 600
            collector_url = "collector.example.org/registration?"
            server_url = "http://hyrax.example.org/opendap"
            reporter_url = "http://hyrax.example.org/reporter"
            log_count = 25
            identifier_path = "/var/lib/reporter/reporter.uuid"
            registration_timeout_secs = 5
            http_port = 8081

            [pattern]
            names = "host;status"
            regexp = '(\S+) (\d+)'
        "#;

        let settings = FileSettings::from_toml(toml, Path::new("reporter.toml")).unwrap();

        assert_eq!(
            settings.log_file,
            Some(PathBuf::from("/usr/share/olfs/logs/anonymous.log"))
        );
        assert_eq!(settings.ping, Some(600));
        assert_eq!(settings.log_count, Some(25));
        assert_eq!(settings.http_port, Some(8081));
        let pattern = settings.pattern.unwrap();
        assert_eq!(pattern.names, "host;status");
        assert_eq!(pattern.regexp, r"(\S+) (\d+)");
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = FileSettings::from_toml("", Path::new("reporter.toml")).unwrap();
        assert!(settings.log_file.is_none());
        assert!(settings.pattern.is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = FileSettings::from_toml("colector_url = \"typo\"", Path::new("reporter.toml"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::load_from_dir(dir.path()).unwrap();
        assert!(settings.collector_url.is_none());
    }

    #[test]
    fn test_load_from_dir_reads_reporter_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "ping = 42\n").unwrap();
        let settings = FileSettings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.ping, Some(42));
    }
}
