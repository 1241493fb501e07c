//! Query API handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::http::service::{HistoryError, MonitorService};
use crate::snapshot::SnapshotView;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Server Status</title>
    <style>
        body { font-family: Arial, sans-serif; background-color: #e0f7fa; color: #333; text-align: center; padding: 50px; }
        .status-box { display: inline-block; padding: 20px; border: 2px dashed #66bb6a; border-radius: 10px; background-color: #ffffff; }
        h1 { color: #66bb6a; }
        p { font-size: 1.2em; }
    </style>
</head>
<body>
    <div class="status-box">
        <h1>The Server is Up and Running!</h1>
        <p>Everything is working as expected.</p>
    </div>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub url: Option<String>,
}

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Latest snapshot as a JSON array, 503 until the first round completes.
pub async fn get_health(State(service): State<MonitorService>) -> Response {
    match service.get_snapshot() {
        SnapshotView::Empty => {
            (StatusCode::SERVICE_UNAVAILABLE, "No health data available").into_response()
        }
        SnapshotView::Ready(snapshot) => Json(snapshot.results().to_vec()).into_response(),
    }
}

/// Recorded results for one target, newest first.
pub async fn get_server_history(
    State(service): State<MonitorService>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let target = match params.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return (StatusCode::BAD_REQUEST, "Missing 'url' query parameter").into_response();
        }
    };

    tracing::debug!(url = %target, "Querying health history");

    match service.get_history(&target).await {
        Ok(results) => {
            tracing::debug!(url = %target, count = results.len(), "History found");
            Json(results).into_response()
        }
        Err(HistoryError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            "No data found for the specified server URL",
        )
            .into_response(),
        Err(HistoryError::Storage(e)) => {
            tracing::error!(url = %target, error = %e, "Failed to retrieve health history");
            (StatusCode::SERVICE_UNAVAILABLE, "Failed to retrieve health data").into_response()
        }
    }
}
