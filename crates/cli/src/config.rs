//! Command line arguments and logging setup.

use crate::commands::Command;
use clap::{Args, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Peer bootstrap command line.
#[derive(Debug, Parser)]
#[command(name = "peer", version, about = "Peer bootstrap decisions")]
pub struct CliConfig {
    /// Log filter, e.g. `debug` or `peercore=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where configuration comes from.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Peer configuration file (TOML).
    #[arg(long, short, default_value = "core.toml")]
    pub config: PathBuf,

    /// Ignore CORE_* environment overrides.
    #[arg(long)]
    pub no_env: bool,
}

impl CliConfig {
    /// Install the global `tracing` subscriber. Defaults to `info`.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
