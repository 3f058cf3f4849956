use std::net::{Ipv4Addr, SocketAddr};

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};

use crate::error::ExporterError;

/// What to do when a scrape fails because a scheduler command is
/// unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Answer the scrape with 503, then shut the server down.
    Exit,
    /// Answer the scrape with 503 and keep serving.
    Respond,
}

/// Command-line interface.
///
/// Every flag can also be supplied through the listed environment
/// variable (a `.env` file is honoured).  Missing or empty required
/// flags print usage and exit with status 2.
#[derive(Parser, Debug)]
#[command(name = "slurm-gpu-exporter")]
#[command(about = "Prometheus exporter for Slurm GPU allocation")]
#[command(version)]
pub struct Cli {
    /// Address to listen on: `9341`, `:9341` or `127.0.0.1:9341`
    #[arg(long, env = "LISTEN_ADDRESS", value_parser = NonEmptyStringValueParser::new())]
    pub listen_address: String,

    /// Slurm cluster name
    #[arg(long, env = "SLURM_CLUSTER", value_parser = NonEmptyStringValueParser::new())]
    pub cluster: String,

    /// Path to the `sinfo` binary
    #[arg(long, env = "SINFO_BIN", default_value = "sinfo")]
    pub sinfo_bin: String,

    /// Path to the `squeue` binary
    #[arg(long, env = "SQUEUE_BIN", default_value = "squeue")]
    pub squeue_bin: String,

    /// Behaviour when a scheduler command fails during a scrape
    #[arg(long, env = "ON_SCHEDULER_FAILURE", value_enum, default_value = "exit")]
    pub on_scheduler_failure: FailurePolicy,

    /// HTTP request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,
}

/// Validated exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen_addr: SocketAddr,
    /// Accepted for compatibility; queries are not scoped by cluster.
    pub cluster: String,
    pub sinfo_bin: String,
    pub squeue_bin: String,
    pub failure_policy: FailurePolicy,
    pub request_timeout_secs: u64,
}

impl TryFrom<Cli> for ExporterConfig {
    type Error = ExporterError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            listen_addr: parse_listen_address(&cli.listen_address)?,
            cluster: cli.cluster,
            sinfo_bin: cli.sinfo_bin,
            squeue_bin: cli.squeue_bin,
            failure_policy: cli.on_scheduler_failure,
            request_timeout_secs: cli.request_timeout_secs,
        })
    }
}

/// Parse a listen address.
///
/// A bare port or `:port` binds all IPv4 interfaces; anything else must
/// be a full socket address.
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr, ExporterError> {
    let raw = raw.trim();
    let port = raw.strip_prefix(':').unwrap_or(raw);

    if let Ok(port) = port.parse::<u16>() {
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }

    raw.parse()
        .map_err(|_| ExporterError::Config(format!("Invalid listen address '{raw}'")))
}
