//! One-shot registration with the central collector.
//!
//! The collector answers with a `serverUUID` that is persisted as the sole
//! content of the identifier file. That file doubles as the "already
//! registered" marker: [`RegistrationClient::register_on_startup`] skips the
//! exchange when it exists.
//!
//! Concurrent `/register` triggers race on the delete-then-recreate of the
//! identifier file. No locking is done.

use crate::config::Settings;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

/// Response field carrying the identifier.
pub const IDENTIFIER_FIELD: &str = "serverUUID";

#[cfg(unix)]
const IDENTIFIER_FILE_MODE: u32 = 0o755;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Invalid registration URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Collector request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Collector returned status {0}")]
    Status(StatusCode),

    #[error("Failed to read collector response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Malformed collector response: {0}")]
    MalformedResponse(String),

    #[error("Failed to persist identifier to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistrationError {
    /// Name of the exchange phase that failed, for log context.
    pub fn phase(&self) -> &'static str {
        match self {
            RegistrationError::InvalidUrl { .. } => "url",
            RegistrationError::Client(_) | RegistrationError::Request(_) => "request",
            RegistrationError::Status(_) => "status",
            RegistrationError::Body(_) => "body",
            RegistrationError::MalformedResponse(_) => "response",
            RegistrationError::Persist { .. } => "persist",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    #[serde(rename = "serverUUID")]
    server_uuid: String,
}

/// Extract the identifier from a collector response body.
pub fn parse_identifier(body: &str) -> Result<String, RegistrationError> {
    let response: RegistrationResponse = serde_json::from_str(body)
        .map_err(|e| RegistrationError::MalformedResponse(e.to_string()))?;
    let identifier = response.server_uuid.trim();
    if identifier.is_empty() {
        return Err(RegistrationError::MalformedResponse(format!(
            "empty {IDENTIFIER_FIELD}"
        )));
    }
    Ok(identifier.to_string())
}

#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Collector host, path and the start of the query string, e.g.
    /// `collector.example.org/registration?`.
    pub collector_url: String,
    pub server_url: String,
    pub reporter_url: String,
    pub ping_interval_secs: u64,
    pub log_count: u32,
    pub identifier_path: PathBuf,
    pub timeout: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            collector_url: "localhost:8080/collector/registration?".to_string(),
            server_url: "http://localhost:8080/opendap".to_string(),
            reporter_url: "http://localhost:9600".to_string(),
            ping_interval_secs: 3600,
            log_count: 100,
            identifier_path: PathBuf::from("./reporter.uuid"),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Settings> for RegistrationConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            collector_url: settings.collector_url.clone(),
            server_url: settings.server_url.clone(),
            reporter_url: settings.reporter_url.clone(),
            ping_interval_secs: settings.ping_interval_secs,
            log_count: settings.log_count,
            identifier_path: settings.identifier_path.clone(),
            timeout: settings.registration_timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationClient {
    client: Client,
    config: RegistrationConfig,
}

impl RegistrationClient {
    pub fn new(config: RegistrationConfig) -> Result<Self, RegistrationError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("log-reporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RegistrationError::Client)?;

        Ok(Self { client, config })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RegistrationError> {
        Self::new(RegistrationConfig::from(settings))
    }

    pub fn identifier_path(&self) -> &Path {
        &self.config.identifier_path
    }

    /// The registration URL as configured, with query values concatenated
    /// unencoded. [`Self::build_url`] normalizes it before sending: spaces,
    /// `"`, `'`, `<`, `>`, control characters and non-ASCII bytes are
    /// percent-encoded, `&`, `=`, `|` and `/` pass through unchanged, and a
    /// `#` cuts the rest off as a fragment.
    pub fn registration_url(&self) -> String {
        let c = &self.config;
        format!(
            "http://{}serverUrl={}&reporterUrl={}&ping={}&log={}",
            c.collector_url, c.server_url, c.reporter_url, c.ping_interval_secs, c.log_count
        )
    }

    /// The URL actually sent, as normalized by [`Url::parse`].
    pub fn build_url(&self) -> Result<Url, RegistrationError> {
        let url = self.registration_url();
        Url::parse(&url).map_err(|source| RegistrationError::InvalidUrl { url, source })
    }

    /// Perform one exchange with the collector and persist the identifier,
    /// overwriting any previous one. Nothing is written if any phase fails.
    pub async fn register(&self) -> Result<String, RegistrationError> {
        let result = self.exchange().await;
        match &result {
            Ok(identifier) => info!(
                identifier = %identifier,
                "Registered with collector, identifier saved to {}",
                self.config.identifier_path.display()
            ),
            Err(e) => error!(phase = e.phase(), error = %e, "Registration with collector failed"),
        }
        result
    }

    async fn exchange(&self) -> Result<String, RegistrationError> {
        let url = self.build_url()?;
        info!("Registering with collector at {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RegistrationError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistrationError::Status(status));
        }

        // consuming the body releases the connection
        let body = response.text().await.map_err(RegistrationError::Body)?;
        let identifier = parse_identifier(&body)?;

        persist_identifier(&self.config.identifier_path, &identifier).await?;
        Ok(identifier)
    }

    /// Startup hook: reuse a persisted identifier, otherwise register once.
    ///
    /// Failures are logged and swallowed so the service keeps running
    /// unregistered.
    pub async fn register_on_startup(&self) -> Option<String> {
        if let Some(identifier) = self.read_identifier().await {
            info!(
                identifier = %identifier,
                "Already registered, identifier read from {}",
                self.config.identifier_path.display()
            );
            return Some(identifier);
        }
        self.register().await.ok()
    }

    /// Drop the persisted identifier, if any, and register again.
    pub async fn reregister(&self) -> Result<String, RegistrationError> {
        if let Err(e) = remove_identifier(&self.config.identifier_path).await {
            error!(phase = e.phase(), error = %e, "Failed to remove identifier file");
            return Err(e);
        }
        self.register().await
    }

    /// The persisted identifier, if the file exists and is non-empty.
    pub async fn read_identifier(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.config.identifier_path).await {
            Ok(contents) => Some(contents.trim().to_string()).filter(|id| !id.is_empty()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "Failed to read identifier file {}: {}",
                    self.config.identifier_path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Write the identifier next to `path` and rename it into place, so a
/// failed write never leaves a marker that reads as registered.
async fn persist_identifier(path: &Path, identifier: &str) -> Result<(), RegistrationError> {
    let staging = staging_path(path);
    let result = write_staged(&staging, path, identifier).await;
    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&staging).await {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", staging.display(), e);
            }
        }
    }
    result.map_err(|source| RegistrationError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_staged(staging: &Path, path: &Path, identifier: &str) -> std::io::Result<()> {
    tokio::fs::write(staging, identifier).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(IDENTIFIER_FILE_MODE);
        tokio::fs::set_permissions(staging, permissions).await?;
    }

    tokio::fs::rename(staging, path).await
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("reporter.uuid"));
    name.push(".tmp");
    path.with_file_name(name)
}

async fn remove_identifier(path: &Path) -> Result<(), RegistrationError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            info!("Removed identifier file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RegistrationError::Persist {
            path: path.to_path_buf(),
            source,
        }),
    }
}
