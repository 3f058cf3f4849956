use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors raised while collecting or serving GPU metrics.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// A scheduler command could not be spawned or exited non-zero.
    #[error("Scheduler command `{command}` unavailable: {reason}")]
    SchedulerUnavailable { command: String, reason: String },

    /// Building or encoding a Prometheus metric failed.
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Invalid startup configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking scrape task panicked or was cancelled.
    #[error("Scrape task failed: {0}")]
    Join(String),
}

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Exporter(#[from] ExporterError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Exporter(ExporterError::SchedulerUnavailable { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SCHEDULER_UNAVAILABLE",
                self.to_string(),
            ),
            AppError::Exporter(other) => {
                tracing::error!(error = %other, "Internal exporter error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
