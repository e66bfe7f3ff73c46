//! meshload Server Binary
//!
//! Emulates one node of a microservice mesh: every configured endpoint burns
//! its declared CPU cost and reports what it consumed.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use meshload_config::{ConfigLoader, MeshloadConfig};
use meshload_logging::init_logging_from_config;
use meshload_server::Server;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address, overrides the configured address and port
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Name of the emulated service
    #[arg(long, value_name = "NAME")]
    service_name: Option<String>,

    /// Print a sample configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", MeshloadConfig::generate_sample());
        return Ok(());
    }

    let mut config = ConfigLoader::new()
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    apply_cli_overrides(&mut config, &cli)?;

    init_logging_from_config(&config.logging)?;

    Server::new(config).start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut MeshloadConfig, cli: &Cli) -> Result<()> {
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind.ip().to_string();
        config.server.port = bind.port();
    }

    if let Some(name) = &cli.service_name {
        config.service.name = name.clone();
    }

    config
        .validate_all()
        .context("Invalid configuration after command line overrides")?;
    Ok(())
}
