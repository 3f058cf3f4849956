//! GPU count extraction from Slurm resource descriptors.
//!
//! Two formats are understood:
//!
//! - **GRES** descriptors as printed by `sinfo -o "%G"`, e.g.
//!   `cpu:16,gpu:v100:4`.  A GPU entry is `gpu:<count>` or
//!   `gpu:<type>:<count>`.
//! - **TRES** allocation lines as printed by `squeue -O tres-alloc:`,
//!   e.g. `billing=5,cpu=5,gres/gpu=1,node=1`.
//!
//! Entry detection is a plain substring test (`gpu:` / `gres/gpu=`
//! anywhere in the comma-separated entry), not a prefix match, so an
//! entry such as `mygpu:2` is also treated as a GPU entry.  Only the
//! first matching entry is honoured.  `no_consume` annotations are not
//! distinguished from regular entries.
//!
//! The `try_*` functions surface malformed counts as
//! [`CoreError::InvalidCount`]; the plain functions collapse any error
//! to `0.0`, which is what the exporter reports.

use crate::error::CoreError;

/// Marker identifying a GPU entry in a GRES descriptor.
const GRES_GPU_MARKER: &str = "gpu:";

/// Marker identifying the GPU entry in a TRES allocation line.
const TRES_GPU_MARKER: &str = "gres/gpu=";

/// Parse the GPU count declared by a node's GRES descriptor.
///
/// Returns `Ok(0.0)` when the descriptor is empty or has no GPU entry.
pub fn try_node_gpu_count(descriptor: &str) -> Result<f64, CoreError> {
    let Some(entry) = descriptor
        .split(',')
        .find(|entry| entry.contains(GRES_GPU_MARKER))
    else {
        return Ok(0.0);
    };

    let fields: Vec<&str> = entry.split(':').collect();
    // `gpu:<type>:<count>` when a type is present, `gpu:<count>` otherwise.
    let count = if fields.len() > 2 { fields[2] } else { fields[1] };

    parse_count("gres", count)
}

/// Parse the GPU count allocated to a job from its TRES line.
///
/// Returns `Ok(0.0)` when the line carries no `gres/gpu` entry.
pub fn try_job_gpu_count(tres: &str) -> Result<f64, CoreError> {
    let Some(entry) = tres.split(',').find(|entry| entry.contains(TRES_GPU_MARKER)) else {
        return Ok(0.0);
    };

    let count = entry
        .split('=')
        .nth(1)
        .ok_or(CoreError::MissingField("gres/gpu count"))?;

    parse_count("tres", count)
}

/// Infallible form of [`try_node_gpu_count`]: malformed counts yield `0.0`.
pub fn node_gpu_count(descriptor: &str) -> f64 {
    try_node_gpu_count(descriptor).unwrap_or_else(|e| {
        tracing::debug!(descriptor, error = %e, "Treating unparseable GRES count as zero");
        0.0
    })
}

/// Infallible form of [`try_job_gpu_count`]: malformed counts yield `0.0`.
pub fn job_gpu_count(tres: &str) -> f64 {
    try_job_gpu_count(tres).unwrap_or_else(|e| {
        tracing::debug!(tres, error = %e, "Treating unparseable TRES count as zero");
        0.0
    })
}

fn parse_count(field: &'static str, value: &str) -> Result<f64, CoreError> {
    value.parse::<f64>().map_err(|_| CoreError::InvalidCount {
        field,
        value: value.to_string(),
    })
}
