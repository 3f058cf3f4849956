use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

use crate::config::FailurePolicy;
use crate::error::{AppResult, ExporterError};
use crate::state::AppState;

/// GET /metrics -- run a full scrape and return the text exposition.
///
/// The scrape shells out to the scheduler, so it runs on the blocking
/// pool.  A scheduler failure is answered with 503 and, under
/// [`FailurePolicy::Exit`], also stops the server.
async fn scrape(State(state): State<AppState>) -> AppResult<Response> {
    let metrics = Arc::clone(&state.metrics);
    let rendered = tokio::task::spawn_blocking(move || metrics.render())
        .await
        .map_err(|e| ExporterError::Join(e.to_string()))?;

    match rendered {
        Ok(body) => Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response()),
        Err(e) => {
            tracing::error!(error = %e, cluster = %state.config.cluster, "Scrape failed");

            if matches!(e, ExporterError::SchedulerUnavailable { .. })
                && state.config.failure_policy == FailurePolicy::Exit
            {
                tracing::error!("Scheduler unavailable, shutting down");
                state.fatal.cancel();
            }

            Err(e.into())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(scrape))
}
