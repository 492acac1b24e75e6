//! Client side of `reporter healthcheck`, used as a container probe.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Port probed when neither `--port` nor `HTTP_PORT` is given.
pub const DEFAULT_HTTP_PORT: u16 = 9600;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const BANNER_PREFIX: &str = "Reporter Application";

#[derive(Error, Debug)]
pub enum HealthcheckError {
    #[error("Healthcheck request to {url} failed: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Healthcheck returned status {0}")]
    Status(StatusCode),

    #[error("Healthcheck answered with an unexpected banner: {0:?}")]
    Banner(String),
}

/// Probe `/healthcheck` on localhost and check the version banner.
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let url = format!("http://127.0.0.1:{port}/healthcheck");
    let unreachable = |source: reqwest::Error| HealthcheckError::Unreachable {
        url: url.clone(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(unreachable)?;
    let resp = client.get(&url).send().await.map_err(unreachable)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(HealthcheckError::Status(status));
    }

    let body = resp.text().await.map_err(unreachable)?;
    if !body.starts_with(BANNER_PREFIX) {
        return Err(HealthcheckError::Banner(body));
    }
    Ok(())
}
