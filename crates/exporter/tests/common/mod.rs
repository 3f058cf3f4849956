#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use slurm_gpu_exporter::collector::{GpuMetricsAggregator, GpusCollector};
use slurm_gpu_exporter::config::{ExporterConfig, FailurePolicy};
use slurm_gpu_exporter::error::ExporterError;
use slurm_gpu_exporter::registry::MetricsRegistry;
use slurm_gpu_exporter::router::build_app_router;
use slurm_gpu_exporter::scheduler::Scheduler;
use slurm_gpu_exporter::state::AppState;

/// Scheduler returning fixed listings, or failing when a listing is `None`.
///
/// Counts calls so tests can check that every scrape re-runs both
/// commands.
#[derive(Default)]
pub struct FakeScheduler {
    pub nodes: Option<String>,
    pub jobs: Option<String>,
    pub calls: AtomicUsize,
    /// Delay applied before every listing, to stand in for a hung command.
    pub delay: Option<Duration>,
}

impl FakeScheduler {
    pub fn new(nodes: &str, jobs: &str) -> Self {
        Self {
            nodes: Some(nodes.to_string()),
            jobs: Some(jobs.to_string()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// `sinfo` is unavailable.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn listing(&self, command: &str, listing: &Option<String>) -> Result<String, ExporterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        listing
            .clone()
            .ok_or_else(|| ExporterError::SchedulerUnavailable {
                command: command.to_string(),
                reason: "exit 1: Unable to contact slurm controller".to_string(),
            })
    }
}

impl Scheduler for FakeScheduler {
    fn node_listing(&self) -> Result<String, ExporterError> {
        self.listing("sinfo", &self.nodes)
    }

    fn job_listing(&self) -> Result<String, ExporterError> {
        self.listing("squeue", &self.jobs)
    }
}

/// Build a test `ExporterConfig` with safe defaults.
pub fn test_config(failure_policy: FailurePolicy) -> ExporterConfig {
    ExporterConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cluster: "test-cluster".to_string(),
        sinfo_bin: "sinfo".to_string(),
        squeue_bin: "squeue".to_string(),
        failure_policy,
        request_timeout_secs: 30,
    }
}

/// Build the full router around `scheduler`, returning the state too so
/// tests can inspect the failure token and counters.
pub fn build_test_app(
    scheduler: Arc<FakeScheduler>,
    failure_policy: FailurePolicy,
) -> (Router, AppState) {
    build_test_app_with_config(scheduler, test_config(failure_policy))
}

/// [`build_test_app`] with an explicit configuration.
pub fn build_test_app_with_config(
    scheduler: Arc<FakeScheduler>,
    config: ExporterConfig,
) -> (Router, AppState) {
    let gpus = GpusCollector::new(GpuMetricsAggregator::new(scheduler))
        .expect("gauge descriptors are valid");
    let metrics = MetricsRegistry::new(gpus).expect("registry builds");

    let state = AppState {
        metrics: Arc::new(metrics),
        config: Arc::new(config),
        fatal: CancellationToken::new(),
    };

    (build_app_router(state.clone()), state)
}

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    app.oneshot(request).await.expect("router is infallible")
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body is JSON")
}

/// Value of an unlabelled sample in a text exposition.
pub fn sample(body: &str, name: &str) -> Option<f64> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (metric, value) = line.split_once(' ')?;
            (metric == name).then(|| value.parse().ok()).flatten()
        })
}
