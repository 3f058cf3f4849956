//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the binary (`main.rs`) and
//! integration tests use the same middleware stack.

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes;
use crate::state::AppState;

/// Build the full application [`Router`] with all middleware layers.
///
/// Applied bottom-up: request tracing, request timeout, panic recovery.
///
/// A scrape that outlives the request timeout is answered with
/// `504 Gateway Timeout`: the stall is upstream in the scheduler, not in
/// the client.  The blocking task running the hung command is not
/// cancelled and keeps its blocking-pool thread until the command exits.
pub fn build_app_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .merge(routes::metrics::router())
        .merge(routes::health::router())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
