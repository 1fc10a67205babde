//! API Server binary entrypoint.

use api_server::ApiServer;
use approval_core::Config;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RevokeScan API server
#[derive(Parser)]
#[command(name = "api-server")]
#[command(about = "Token approval scanner and risk assessment API")]
#[command(version)]
struct Cli {
    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api_server=info,approval_scanner=info,approval_core=warn,tower_http=warn,hyper=warn"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }

    tracing::info!(
        host = %config.api.host,
        port = config.api.port,
        rpc = %config.rpc.eth_rpc_url,
        explorer_lookups = config.etherscan_api_key.is_some(),
        "Server configuration loaded"
    );

    ApiServer::new(config).run().await
}
