use clap::{Parser, Subcommand};

/// The main CLI structure for the ethwatch gateway.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Defines the available subcommands for the application.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ethwatch gateway service.
    /// This starts the block poller and the HTTP API.
    Run(RunCmd),
    /// Exercise a running gateway: subscribe addresses and report what it found.
    Probe(ProbeCmd),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunCmd {
    /// Path to the gateway configuration TOML file.
    /// If not provided, default values and environment variables are used.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides the HTTP listen port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Overrides the chain node JSON-RPC endpoint.
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Overrides the seconds between two head checks.
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Scans from this block instead of the node's head at startup.
    #[arg(long)]
    pub start_block: Option<u64>,
}

/// Arguments for the `probe` subcommand.
#[derive(Parser, Debug)]
pub struct ProbeCmd {
    /// Base URL of the gateway.
    #[arg(long, default_value = "http://localhost:8080")]
    pub url: String,

    /// Seconds to wait between subscribing and listing transactions.
    #[arg(long, default_value_t = 30)]
    pub wait_secs: u64,

    /// Addresses to subscribe and inspect.
    #[arg(required = true)]
    pub addresses: Vec<String>,
}
