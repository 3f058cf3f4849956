//! `slurm-gpu-core` -- pure parsing and aggregation logic.
//!
//! Turns the textual output of Slurm's `sinfo` / `squeue` into GPU
//! counts and a [`snapshot::GpuSnapshot`].  Nothing in this crate
//! spawns processes or touches the network, so every function can be
//! tested in isolation.

pub mod error;
pub mod gres;
pub mod listing;
pub mod metric_names;
pub mod snapshot;
