//! Summation over whole `sinfo` / `squeue` listings.
//!
//! Both listings are newline-delimited, headerless, and may wrap each
//! line in double quotes depending on how the format string reached the
//! command.  Empty lines are skipped.

use crate::error::CoreError;
use crate::gres::{job_gpu_count, node_gpu_count};

/// Iterate the non-empty, quote-trimmed lines of a listing.
fn lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_matches('"'))
}

/// Extract the GRES descriptor from a `"<nodename> <descriptor>"` line.
pub fn node_descriptor(line: &str) -> Result<&str, CoreError> {
    line.split_whitespace()
        .nth(1)
        .ok_or(CoreError::MissingField("node gres descriptor"))
}

/// Total GPUs across every node of an `sinfo -h -o "%n %G"` listing.
///
/// Lines without a descriptor field contribute nothing.
pub fn sum_node_listing(output: &str) -> f64 {
    lines(output)
        .map(|line| match node_descriptor(line) {
            Ok(descriptor) => node_gpu_count(descriptor),
            Err(e) => {
                tracing::debug!(line, error = %e, "Skipping node line");
                0.0
            }
        })
        .sum()
}

/// Allocated GPUs across every job of a `squeue -O tres-alloc:` listing.
pub fn sum_job_listing(output: &str) -> f64 {
    lines(output).map(job_gpu_count).sum()
}
