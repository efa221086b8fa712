//! Diagnostic HTTP echo service.
//!
//! Answers every request with a JSON document describing that request.
//! A certificate at the configured path additionally enables a TLS
//! listener next to the plaintext one.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echo_diag::config::loader::load_config;
use echo_diag::{lifecycle, EchoConfig};

#[derive(Parser)]
#[command(name = "echo-diag")]
#[command(about = "Diagnostic HTTP echo service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EchoConfig::default(),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "echo_diag={level},tower_http={level}",
                    level = config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("echo-diag v0.1.0 starting");

    tracing::info!(
        plain_address = %config.listener.bind_address,
        tls_address = %config.tls.bind_address,
        cert_path = %config.tls.cert_path,
        "Configuration loaded"
    );

    lifecycle::startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
