//! Slurm command execution.
//!
//! [`Scheduler`] is the seam between the collectors and the outside
//! world: production uses [`SlurmCli`], which shells out to `sinfo` and
//! `squeue`; tests substitute a canned implementation.
//!
//! The seam is synchronous because `prometheus::core::Collector::collect`
//! is; the HTTP layer moves each scrape onto the blocking pool.

use std::process::Command;

use crate::error::ExporterError;

/// `sinfo` arguments: no header, `<nodename> <gres>` per line.
const SINFO_ARGS: [&str; 3] = ["-h", "-o", "%n %G"];

/// `squeue` arguments: TRES allocation only, one line per job, no header.
const SQUEUE_ARGS: [&str; 4] = ["-O", "tres-alloc:", "-r", "--noheader"];

/// Source of raw scheduler listings.
pub trait Scheduler: Send + Sync {
    /// Per-node GRES listing (`<nodename> <descriptor>` lines).
    fn node_listing(&self) -> Result<String, ExporterError>;

    /// Per-job TRES allocation listing.
    fn job_listing(&self) -> Result<String, ExporterError>;
}

/// [`Scheduler`] backed by the Slurm command-line tools.
#[derive(Debug, Clone)]
pub struct SlurmCli {
    sinfo_bin: String,
    squeue_bin: String,
}

impl Default for SlurmCli {
    fn default() -> Self {
        Self::new("sinfo", "squeue")
    }
}

impl SlurmCli {
    pub fn new(sinfo_bin: impl Into<String>, squeue_bin: impl Into<String>) -> Self {
        Self {
            sinfo_bin: sinfo_bin.into(),
            squeue_bin: squeue_bin.into(),
        }
    }
}

impl Scheduler for SlurmCli {
    fn node_listing(&self) -> Result<String, ExporterError> {
        run_command(&self.sinfo_bin, &SINFO_ARGS)
    }

    fn job_listing(&self) -> Result<String, ExporterError> {
        run_command(&self.squeue_bin, &SQUEUE_ARGS)
    }
}

/// Run `program` to completion and return its stdout.
///
/// No timeout is applied; a hung command blocks the caller.
pub fn run_command(program: &str, args: &[&str]) -> Result<String, ExporterError> {
    tracing::debug!(program, ?args, "Running scheduler command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ExporterError::SchedulerUnavailable {
            command: program.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExporterError::SchedulerUnavailable {
            command: program.to_string(),
            reason: format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
