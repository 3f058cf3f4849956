//! `slurm-gpu-exporter` library crate.
//!
//! Serves Slurm GPU allocation as Prometheus gauges.  Every scrape of
//! `/metrics` runs `sinfo` and `squeue`, sums the GPU counts found in
//! their output and exposes `slurm_gpus_{alloc,idle,total,utilization}`.
//!
//! The binary entrypoint lives in `main.rs`; modules are public so the
//! integration tests can build the same router.

pub mod collector;
pub mod config;
pub mod error;
pub mod registry;
pub mod router;
pub mod routes;
pub mod scheduler;
pub mod state;
