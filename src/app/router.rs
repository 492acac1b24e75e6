use crate::extractor::LogExtractor;
use crate::handler::health::health_handler;
use crate::handler::log::log_handler;
use crate::handler::register::register_handler;
use crate::registration::RegistrationClient;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the HTTP router (log records, re-registration, health).
pub fn main_router(extractor: Arc<LogExtractor>, registration: Arc<RegistrationClient>) -> Router {
    let health_router = Router::new().route("/healthcheck", get(health_handler));

    let log_router = Router::new()
        .route("/log", get(log_handler))
        .with_state(extractor);

    let register_router = Router::new()
        .route("/register", get(register_handler))
        .with_state(registration);

    Router::new()
        .merge(health_router)
        .merge(log_router)
        .merge(register_router)
        .layer(TraceLayer::new_for_http())
}
