mod error;
mod handlers;
mod router;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use market_feed::FeedHub;
use router::create_router;
use state::AppState;
use tokio::net::TcpListener;
use trade_engine::TradeEngine;
use vault_watcher::{ChannelLogSource, MemoryDedup, VaultWatcher, WatcherConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting venue gateway service");

    let engine = Arc::new(TradeEngine::in_memory());
    let hub = Arc::new(FeedHub::with_defaults());

    // Chain ingestion. The RPC-backed log source is wired in at deployment;
    // the channel source keeps the watcher lifecycle honest locally. With
    // no VAULT_CONTRACT_ADDRESS configured, start is a logged no-op.
    let log_source = Arc::new(ChannelLogSource::new());
    let watcher = VaultWatcher::new(
        WatcherConfig::from_env(),
        log_source,
        engine.clone(),
        hub.clone(),
        Arc::new(MemoryDedup::new()),
    );
    watcher.start().await;

    // Initialize application state
    let state = AppState::new(engine, hub);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
