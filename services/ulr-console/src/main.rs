//! ULR Console CLI
//!
//! Command-line entry point for the Diameter ULR simulator console.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use ulr_console::{load_config, Config};

#[derive(Parser)]
#[command(name = "ulr-console")]
#[command(about = "Operator console for the Diameter ULR simulator")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulator base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Fetch status once, log the view and exit instead of serving the dashboard
    #[arg(long)]
    no_dashboard: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.base_url,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.base_url {
        config.gateway.base_url = base_url;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }
    if args.no_dashboard {
        config.dashboard.enabled = false;
    }

    tracing::info!("Starting ULR console against {}", config.gateway.base_url);

    ulr_console::run(config).await?;

    Ok(())
}
