use crate::registration::{RegistrationClient, RegistrationError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;
use tracing::info;

/// Handler for GET /register
///
/// Drops the persisted identifier and registers again. Failures are already
/// logged with their phase by the client.
pub async fn register_handler(State(client): State<Arc<RegistrationClient>>) -> impl IntoResponse {
    info!("Re-registration requested");

    match client.reregister().await {
        Ok(_) => (StatusCode::OK, "Registered"),
        Err(RegistrationError::Persist { .. }) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist identifier")
        }
        Err(_) => (StatusCode::BAD_GATEWAY, "Registration failed"),
    }
}
