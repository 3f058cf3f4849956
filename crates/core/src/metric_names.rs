//! Exposed metric names and their help strings.

/// GPUs allocated to running or pending jobs.
pub const METRIC_GPUS_ALLOC: &str = "slurm_gpus_alloc";
pub const HELP_GPUS_ALLOC: &str = "Allocated GPUs";

/// GPUs present on nodes but not allocated.
pub const METRIC_GPUS_IDLE: &str = "slurm_gpus_idle";
pub const HELP_GPUS_IDLE: &str = "Idle GPUs";

/// GPUs declared across all nodes.
pub const METRIC_GPUS_TOTAL: &str = "slurm_gpus_total";
pub const HELP_GPUS_TOTAL: &str = "Total GPUs";

/// Allocated / total, in `[0, 1]` under normal conditions.
pub const METRIC_GPUS_UTILIZATION: &str = "slurm_gpus_utilization";
pub const HELP_GPUS_UTILIZATION: &str = "Total GPU utilization";

/// Scrapes that failed because a scheduler command was unavailable.
pub const METRIC_SCRAPE_FAILURES: &str = "slurm_gpus_scrape_failures_total";
pub const HELP_SCRAPE_FAILURES: &str =
    "Scrapes aborted because a scheduler command failed";
