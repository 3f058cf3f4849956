//! The four-field GPU utilisation snapshot produced by one scrape.

/// Cluster-wide GPU counts at a single point in time.
///
/// Built once per scrape and never mutated.  `idle + alloc == total`
/// holds by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuSnapshot {
    pub alloc: f64,
    pub idle: f64,
    pub total: f64,
    /// `alloc / total`, or `0.0` when the cluster reports no GPUs.
    pub utilization: f64,
}

impl GpuSnapshot {
    pub fn from_counts(total: f64, alloc: f64) -> Self {
        let utilization = if total == 0.0 { 0.0 } else { alloc / total };

        Self {
            alloc,
            idle: total - alloc,
            total,
            utilization,
        }
    }
}
