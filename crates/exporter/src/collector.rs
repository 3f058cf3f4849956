//! GPU metric collection.
//!
//! [`total_gpus`] and [`allocated_gpus`] each run one scheduler listing
//! and reduce it to a count.  [`GpuMetricsAggregator`] combines them into
//! a [`GpuSnapshot`], and [`GpusCollector`] turns that snapshot into
//! Prometheus gauge families.
//!
//! Every call recomputes from scratch; nothing is cached between
//! scrapes and concurrent scrapes are not serialised against each other.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use slurm_gpu_core::listing::{sum_job_listing, sum_node_listing};
use slurm_gpu_core::metric_names::{
    HELP_GPUS_ALLOC, HELP_GPUS_IDLE, HELP_GPUS_TOTAL, HELP_GPUS_UTILIZATION, METRIC_GPUS_ALLOC,
    METRIC_GPUS_IDLE, METRIC_GPUS_TOTAL, METRIC_GPUS_UTILIZATION,
};
use slurm_gpu_core::snapshot::GpuSnapshot;

use crate::error::ExporterError;
use crate::scheduler::Scheduler;

/// Total GPUs declared across all nodes known to the scheduler.
pub fn total_gpus(scheduler: &dyn Scheduler) -> Result<f64, ExporterError> {
    let output = scheduler.node_listing()?;
    Ok(sum_node_listing(&output))
}

/// GPUs currently allocated to running or pending jobs.
pub fn allocated_gpus(scheduler: &dyn Scheduler) -> Result<f64, ExporterError> {
    let output = scheduler.job_listing()?;
    Ok(sum_job_listing(&output))
}

/// Builds a [`GpuSnapshot`] from the node and job listings.
#[derive(Clone)]
pub struct GpuMetricsAggregator {
    scheduler: Arc<dyn Scheduler>,
}

impl GpuMetricsAggregator {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Query both listings sequentially and compute the snapshot.
    ///
    /// A failure of either command aborts the snapshot; no partial
    /// result is returned.
    pub fn snapshot(&self) -> Result<GpuSnapshot, ExporterError> {
        let total = total_gpus(self.scheduler.as_ref())?;
        let alloc = allocated_gpus(self.scheduler.as_ref())?;

        let snapshot = GpuSnapshot::from_counts(total, alloc);
        tracing::debug!(
            total = snapshot.total,
            alloc = snapshot.alloc,
            idle = snapshot.idle,
            utilization = snapshot.utilization,
            "Computed GPU snapshot",
        );
        Ok(snapshot)
    }
}

/// Name/help pairs for the four exposed gauges, in exposition order.
const GAUGES: [(&str, &str); 4] = [
    (METRIC_GPUS_ALLOC, HELP_GPUS_ALLOC),
    (METRIC_GPUS_IDLE, HELP_GPUS_IDLE),
    (METRIC_GPUS_TOTAL, HELP_GPUS_TOTAL),
    (METRIC_GPUS_UTILIZATION, HELP_GPUS_UTILIZATION),
];

/// Prometheus adapter over [`GpuMetricsAggregator`].
///
/// Each collection runs one full aggregation pass and emits four
/// label-less gauges.
pub struct GpusCollector {
    aggregator: GpuMetricsAggregator,
    descs: Vec<Desc>,
}

impl GpusCollector {
    pub fn new(aggregator: GpuMetricsAggregator) -> Result<Self, ExporterError> {
        let descs = GAUGES
            .iter()
            .map(|(name, help)| {
                Desc::new(
                    (*name).to_string(),
                    (*help).to_string(),
                    Vec::new(),
                    HashMap::new(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { aggregator, descs })
    }

    /// Collect a fresh snapshot and render it as gauge families.
    pub fn try_collect(&self) -> Result<Vec<MetricFamily>, ExporterError> {
        let snapshot = self.aggregator.snapshot()?;
        snapshot_families(&snapshot)
    }
}

/// Render a snapshot as one gauge family per field.
pub fn snapshot_families(snapshot: &GpuSnapshot) -> Result<Vec<MetricFamily>, ExporterError> {
    let values = [
        snapshot.alloc,
        snapshot.idle,
        snapshot.total,
        snapshot.utilization,
    ];

    let mut families = Vec::with_capacity(GAUGES.len());
    for ((name, help), value) in GAUGES.iter().zip(values) {
        let gauge = Gauge::with_opts(Opts::new(*name, *help))?;
        gauge.set(value);
        families.extend(gauge.collect());
    }
    Ok(families)
}

impl Collector for GpusCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    /// Infallible variant for use inside a plain `prometheus::Registry`.
    ///
    /// A failed scrape is logged and yields no families.
    fn collect(&self) -> Vec<MetricFamily> {
        self.try_collect().unwrap_or_else(|e| {
            tracing::error!(error = %e, "GPU metrics collection failed");
            Vec::new()
        })
    }
}
