use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_LOG_FILTER: &str = "syrups=info,tower_http=info";

#[derive(Debug, Parser)]
#[command(name = "syrups", version, about = "Employee performance review tracker")]
pub struct Cli {
    /// Address the HTTP server listens on.
    #[arg(long, env = "SYRUPS_BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: String,

    /// Snapshot file to load on startup and rewrite after every mutation.
    /// Data stays in memory only when unset.
    #[arg(long, env = "SYRUPS_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Log filter directives, e.g. `syrups=debug,tower_http=info`.
    #[arg(long, env = "SYRUPS_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_file: Option<PathBuf>,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let bind_addr = cli
            .bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("bind address '{}' must be host:port", cli.bind_addr))?;

        Ok(Self {
            bind_addr,
            data_file: cli.data_file,
            log_filter: cli.log,
        })
    }

    pub fn load() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }
}
