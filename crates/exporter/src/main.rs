//! `slurm-gpu-exporter` -- Prometheus exporter for Slurm GPU allocation.
//!
//! # Flags / environment variables
//!
//! | Flag                      | Variable               | Required | Default  |
//! |---------------------------|------------------------|----------|----------|
//! | `--listen-address`        | `LISTEN_ADDRESS`       | yes      | --       |
//! | `--cluster`               | `SLURM_CLUSTER`        | yes      | --       |
//! | `--sinfo-bin`             | `SINFO_BIN`            | no       | `sinfo`  |
//! | `--squeue-bin`            | `SQUEUE_BIN`           | no       | `squeue` |
//! | `--on-scheduler-failure`  | `ON_SCHEDULER_FAILURE` | no       | `exit`   |
//! | `--request-timeout-secs`  | `REQUEST_TIMEOUT_SECS` | no       | `30`     |

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slurm_gpu_exporter::collector::{GpuMetricsAggregator, GpusCollector};
use slurm_gpu_exporter::config::{Cli, ExporterConfig};
use slurm_gpu_exporter::error::ExporterError;
use slurm_gpu_exporter::registry::MetricsRegistry;
use slurm_gpu_exporter::router::build_app_router;
use slurm_gpu_exporter::scheduler::SlurmCli;
use slurm_gpu_exporter::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slurm_gpu_exporter=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing required flags exit with status 2 here.
    let cli = Cli::parse();

    let fatal = CancellationToken::new();
    match run(cli, fatal.clone()).await {
        Ok(()) if fatal.is_cancelled() => {
            tracing::error!("Stopped after scheduler failure");
            std::process::exit(1);
        }
        Ok(()) => tracing::info!("Graceful shutdown complete"),
        Err(e) => {
            tracing::error!(error = %e, "Exporter failed");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, fatal: CancellationToken) -> Result<(), ExporterError> {
    let config = ExporterConfig::try_from(cli)?;
    tracing::info!(
        addr = %config.listen_addr,
        cluster = %config.cluster,
        sinfo = %config.sinfo_bin,
        squeue = %config.squeue_bin,
        policy = ?config.failure_policy,
        "Loaded exporter configuration",
    );

    let scheduler = Arc::new(SlurmCli::new(&config.sinfo_bin, &config.squeue_bin));
    let gpus = GpusCollector::new(GpuMetricsAggregator::new(scheduler))?;
    let metrics = Arc::new(MetricsRegistry::new(gpus)?);

    let addr = config.listen_addr;
    let state = AppState {
        metrics,
        config: Arc::new(config),
        fatal: fatal.clone(),
    };
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal))
        .await?;

    Ok(())
}

/// Wait for SIGINT, SIGTERM, or a fatal scrape failure.
async fn shutdown_signal(fatal: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
        () = fatal.cancelled() => {
            tracing::info!("Scheduler failure, starting graceful shutdown");
        }
    }
}
