use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding reporter.toml (falls back to /etc/olfs/)
    #[arg(long, env = "REPORTER_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe a running reporter's /healthcheck endpoint (for container healthchecks)
    Healthcheck {
        #[arg(long, env = "HTTP_PORT", default_value_t = crate::healthcheck::DEFAULT_HTTP_PORT)]
        port: u16,
    },
}
