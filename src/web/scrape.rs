//! `GET /scrape`: combined CSV download for a day.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use super::AppState;
use super::auth::ScrapeAccess;
use crate::error::AppError;
use crate::export::export_combined;

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    /// `YYYY-MM-DD`; empty or missing means today.
    pub date: Option<String>,
}

/// Build the combined export for the requested date and send it as a CSV download.
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    access: ScrapeAccess,
    Query(params): Query<ScrapeParams>,
) -> Result<Response, AppError> {
    let date = params.date.as_deref().filter(|d| !d.is_empty());
    info!(user = ?access.user, ?date, "Export requested");

    let path = export_combined(&state.snapshots, state.fetcher.as_ref(), date).await?;
    let body = tokio::fs::read(&path).await?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("Combined.csv");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
