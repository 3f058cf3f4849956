use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ExporterConfig;
use crate::registry::MetricsRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a token handle.
#[derive(Clone)]
pub struct AppState {
    /// Metrics registry, built once at startup.
    pub metrics: Arc<MetricsRegistry>,
    pub config: Arc<ExporterConfig>,
    /// Cancelled when a scrape hits an unavailable scheduler and the
    /// failure policy says to stop serving.
    pub fatal: CancellationToken,
}
