pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod probe;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RunCmd};
use config::{load_config, GatewayConfig};
use tokio::signal;

/// The main entry point for running the gateway application logic.
/// This function handles CLI parsing, configuration, and service startup.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_cmd) => {
            let config = load_config_from_cli(&run_cmd)?;
            ethwatch_logger::init(&config.gateway.log)?;
            tracing::info!("Configuration loaded: {:#?}", &config);
            run_server(config).await
        }
        Commands::Probe(probe_cmd) => probe::run_probe(probe_cmd).await,
    }
}

/// Loads the gateway configuration and applies the command-line overrides.
pub fn load_config_from_cli(run_cmd: &RunCmd) -> Result<GatewayConfig> {
    match &run_cmd.config {
        Some(config_path) => println!("Loading configuration from '{}'", config_path),
        None => println!("No config file provided, using defaults and environment."),
    }
    let mut config = load_config(run_cmd.config.as_deref())?;

    if let Some(port) = run_cmd.port {
        config.gateway.http.port = port;
    }
    if let Some(rpc_url) = &run_cmd.rpc_url {
        config.connector.chain.rpc_url = rpc_url.clone();
    }
    if let Some(interval) = run_cmd.poll_interval_secs {
        config.connector.synchronizer.poll_interval_secs = interval;
    }
    if let Some(start_block) = run_cmd.start_block {
        config.connector.synchronizer.start_block = Some(start_block);
    }

    Ok(config)
}

/// Starts the services and handles graceful shutdown.
async fn run_server(config: GatewayConfig) -> Result<()> {
    let handle = http::start(&config).await?;

    match signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            handle.stop().await;
            tracing::info!("Shutdown complete.");
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to listen for shutdown signal.");
        }
    }
    Ok(())
}
