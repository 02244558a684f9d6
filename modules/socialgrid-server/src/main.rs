use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use socialgrid_common::AppConfig;
use socialgrid_sources::Aggregator;

mod routes;

#[derive(Parser)]
#[command(name = "socialgrid-server", about = "Unified multi-platform search server")]
struct Cli {
    /// Port to listen on. Overrides the PORT env var.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting socialgrid-server");

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let port = cli.port.unwrap_or(config.port);

    let aggregator = Arc::new(Aggregator::from_config(&config));
    let app = routes::build_router(aggregator);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
