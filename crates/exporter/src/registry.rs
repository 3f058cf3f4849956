//! Explicit metrics registry handed to the HTTP layer at startup.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use slurm_gpu_core::metric_names::{HELP_SCRAPE_FAILURES, METRIC_SCRAPE_FAILURES};

use crate::collector::GpusCollector;
use crate::error::ExporterError;

/// Owns the GPU collector plus the exporter's own metrics.
///
/// The GPU collector is kept outside the inner [`Registry`] so that a
/// failed scheduler command surfaces as an error instead of a silently
/// empty exposition.
pub struct MetricsRegistry {
    gpus: GpusCollector,
    registry: Registry,
    scrape_failures: IntCounter,
}

impl MetricsRegistry {
    pub fn new(gpus: GpusCollector) -> Result<Self, ExporterError> {
        let registry = Registry::new();

        let scrape_failures = IntCounter::new(METRIC_SCRAPE_FAILURES, HELP_SCRAPE_FAILURES)?;
        registry.register(Box::new(scrape_failures.clone()))?;

        Ok(Self {
            gpus,
            registry,
            scrape_failures,
        })
    }

    /// Number of scrapes that failed so far.
    pub fn scrape_failures(&self) -> u64 {
        self.scrape_failures.get()
    }

    /// Run one full collection: GPU gauges followed by registered metrics.
    ///
    /// Blocks on the scheduler commands.
    pub fn gather(&self) -> Result<Vec<MetricFamily>, ExporterError> {
        let mut families = self.gpus.try_collect().inspect_err(|_| {
            self.scrape_failures.inc();
        })?;
        families.extend(self.registry.gather());
        Ok(families)
    }

    /// [`gather`](Self::gather) encoded in the Prometheus text format.
    pub fn render(&self) -> Result<String, ExporterError> {
        let families = self.gather()?;
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Metrics(prometheus::Error::Msg(e.to_string())))
    }
}
