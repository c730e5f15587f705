//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Snippet sharing web application.
#[derive(Debug, Clone, Parser)]
#[command(name = "snippetbox", version, about)]
pub struct Config {
    /// HTTP network address
    #[arg(long, env = "SNIPPETBOX_ADDR", default_value = "0.0.0.0:4000")]
    pub addr: SocketAddr,

    /// Path to static assets
    #[arg(long, env = "SNIPPETBOX_STATIC_DIR", default_value = "./ui/static")]
    pub static_dir: PathBuf,

    /// Log output format
    #[arg(long, env = "SNIPPETBOX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// bcrypt work factor for stored passwords
    #[arg(
        long,
        env = "SNIPPETBOX_BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31),
    )]
    pub bcrypt_cost: u32,

    /// Seconds a client may take to send the request head
    #[arg(long, env = "SNIPPETBOX_READ_TIMEOUT", default_value_t = 5)]
    pub read_timeout: u64,
}

impl Config {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}
