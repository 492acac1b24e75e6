use super::error::ApiError;
use crate::domain::LogData;
use crate::extractor::LogExtractor;
use crate::parser::parse_since;
use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// ISO-8601 local date-time; only records strictly after it are returned.
    pub since: Option<String>,
}

/// Handler for GET /log
pub async fn log_handler(
    State(extractor): State<Arc<LogExtractor>>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogData>, ApiError> {
    let since = query
        .since
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_since)
        .transpose()
        .map_err(ApiError::InvalidSince)?;

    let records = extractor.extract_since(since).await?;
    info!(
        records = records.len(),
        since = ?since,
        "Serving log records"
    );

    Ok(Json(LogData::from_records(&records)))
}
