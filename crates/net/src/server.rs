use altruist_chain::{MarketSource, MarketplaceContract, NodeProvider, StaticMarket};
use altruist_database::{InnerDatabase, SafeDatabase};
use altruist_service::{Backend, Context};
use altruist_storage::{IpfsGateway, MdbxObjectStore};
use axum::http::{self, HeaderValue};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cause::*;
use crate::config::Config;
use crate::foundation::*;
use crate::nft::*;
use crate::post::*;
use crate::router::*;
use crate::step::*;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Opens the database, picks object storage and the market reader from `config`, and serves
/// until ctrl-c or SIGTERM.
pub async fn build_server(config: Config) -> Result<(), BoxError> {
    std::fs::create_dir_all(&config.database_path)?;
    let db = InnerDatabase::new(&config.database_path)?;
    info!(path = %config.database_path, "database opened");

    let market = if config.rpc_url.is_empty() {
        warn!("no rpc_url configured, every token reads as unlisted");
        MarketSource::Static(StaticMarket::new())
    } else {
        let provider = NodeProvider::new(&config.rpc_url)?;
        match provider.chain_id().await {
            Ok(chain_id) => info!(chain_id, "connected to node"),
            Err(e) => warn!(error = %e, "node unreachable at startup, listings will fail until it answers"),
        }
        MarketSource::Node(MarketplaceContract::new(provider))
    };

    if config.ipfs_api_url.is_empty() {
        warn!("no ipfs_api_url configured, objects are kept in the local database");
        let objects = MdbxObjectStore::new(db.clone(), config.ipfs_gateway_url.as_str());
        serve(Context::new(db, objects, market), &config).await
    } else {
        let objects = IpfsGateway::new(&config.ipfs_api_url, &config.ipfs_gateway_url, config.ipfs_api_token.clone())?;
        serve(Context::new(db, objects, market), &config).await
    }
}

async fn serve<B: Backend>(backend: B, config: &Config) -> Result<(), BoxError> {
    let app = build_router(backend, config);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, environment = %config.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Every route, with CORS and request tracing.
pub fn build_router<B: Backend>(backend: B, config: &Config) -> Router {
    main_router(collect_components::<B>(), backend)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
}

async fn hello() -> &'static str {
    "Hello World!"
}

fn collect_components<B: Backend>() -> Vec<(String, Router<B>)> {
    vec![
        get_router_builder("/", hello),

        // causes and their deployment chain
        post_router_builder("/cause/create-cause-by-wallet", create_cause_by_wallet::<B>),
        post_router_builder("/cause/get-cause-by-wallet/{wallet}", get_cause_by_wallet::<B>),
        get_router_builder("/cause/get-steps-by-address/{address}", get_steps_by_address::<B>),
        post_router_builder("/cause/register-deployment", register_deployment::<B>),

        // foundations
        post_router_builder("/foundation/create-foundation", create_foundation::<B>),
        get_router_builder("/foundation/get-foundations", get_foundations::<B>),
        get_router_builder("/foundation/get-foundation-by-email/{email}", get_foundation_by_email::<B>),
        get_router_builder("/foundation/get-foundation-by-wallet/{wallet}", get_foundation_by_wallet::<B>),

        // nfts
        post_router_builder("/nft/create-one-nft", create_one_nft::<B>),
        post_router_builder("/nft/create-collection-nfts", create_collection_nfts::<B>),
        post_router_builder("/nft/register-nft", register_nft::<B>),
        get_router_builder("/nft/get-newest-nfts", get_newest_nfts::<B>),
        get_router_builder("/nft/get-nfts-from-cause/{address}", get_nfts_from_cause::<B>),
        get_router_builder("/nft/get-nfts-from-address-and-tokenid/{address}/{id}", get_nfts_from_address_and_token_id::<B>),
        get_router_builder("/nft/get-nft-from-wallet/{wallet}", get_nfts_from_wallet::<B>),
        post_router_builder("/nft/tradeNft", trade_nft::<B>),
        get_router_builder("/nft/get-file/{hash}", get_file::<B>),

        // posts
        post_router_builder("/post/create-post", create_post::<B>),
        get_router_builder("/post/get-posts-by-foundation-name/{name_foundation}", get_posts_by_foundation_name::<B>),
        get_router_builder("/post/get-posts-by-foundation-wallet/{ethAddress}", get_posts_by_foundation_wallet::<B>),

        // steps
        get_router_builder("/step/get-steps-by-address/{wallet}", get_steps_by_wallet::<B>),
        post_router_builder("/step/create-step", create_step::<B>),
    ]
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
