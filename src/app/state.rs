use crate::adapter::TracingDiagnostics;
use crate::config::Settings;
use crate::extractor::LogExtractor;
use crate::registration::{RegistrationClient, RegistrationError};
use std::sync::Arc;

/// Components shared by the HTTP handlers and the startup hook.
pub struct AppState {
    pub extractor: Arc<LogExtractor>,
    pub registration: Arc<RegistrationClient>,
}

impl AppState {
    /// Create `AppState` from configuration settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistrationError> {
        let extractor = LogExtractor::from_settings(settings, Arc::new(TracingDiagnostics));
        let registration = RegistrationClient::from_settings(settings)?;

        Ok(Self {
            extractor: Arc::new(extractor),
            registration: Arc::new(registration),
        })
    }
}
