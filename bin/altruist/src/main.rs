use altruist_net::{build_server, Config};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration, falling back to defaults");
            Config::default()
        }
    };

    info!(
        environment = %config.environment,
        ipfs = %config.ipfs_gateway_url,
        rpc = %config.rpc_url,
        "Starting altruist"
    );

    build_server(config).await
}
