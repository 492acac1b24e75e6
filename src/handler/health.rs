use tracing::debug;

/// Handler for GET /healthcheck
pub async fn health_handler() -> String {
    debug!("Health check requested");
    format!("Reporter Application, Version = {}", crate::VERSION)
}
