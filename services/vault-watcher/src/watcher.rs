//! Vault contract watcher
//!
//! Holds live subscriptions to the Buy and Sell topics for the lifetime of
//! the process and drives each log through decode → claim → apply →
//! fan-out. Errors are isolated per event: a bad log is logged and
//! abandoned, and the loop moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use market_feed::FeedHub;
use trade_engine::TradeEngine;

use crate::dedup::ProcessedEvents;
use crate::events::{EventKind, LogSource, LogSubscription, VaultEvent, VaultLog};

/// Watcher configuration
#[derive(Debug, Clone, Default)]
pub struct WatcherConfig {
    /// Address of the vault contract; `None` disables the watcher
    pub vault_address: Option<String>,
}

impl WatcherConfig {
    /// Read the vault address from `VAULT_CONTRACT_ADDRESS`
    pub fn from_env() -> Self {
        Self {
            vault_address: std::env::var("VAULT_CONTRACT_ADDRESS")
                .ok()
                .filter(|address| !address.is_empty()),
        }
    }
}

/// Watches the vault contract's Buy and Sell events
pub struct VaultWatcher {
    config: WatcherConfig,
    source: Arc<dyn LogSource>,
    engine: Arc<TradeEngine>,
    hub: Arc<FeedHub>,
    dedup: Arc<dyn ProcessedEvents>,
    running: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl VaultWatcher {
    pub fn new(
        config: WatcherConfig,
        source: Arc<dyn LogSource>,
        engine: Arc<TradeEngine>,
        hub: Arc<FeedHub>,
        dedup: Arc<dyn ProcessedEvents>,
    ) -> Self {
        Self {
            config,
            source,
            engine,
            hub,
            dedup,
            running: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start watching. Guarded: a second start, or a start without a
    /// configured contract address, is a logged no-op.
    pub async fn start(&self) {
        let Some(address) = self.config.vault_address.clone() else {
            warn!("no vault contract address configured; watcher disabled");
            return;
        };
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("watcher already running");
            return;
        }

        info!(vault = %address, "watching vault Buy/Sell events");

        let mut tasks = self.tasks.lock().await;
        for &kind in EventKind::all() {
            match self.source.subscribe(&address, kind).await {
                Ok(subscription) => {
                    tasks.push(tokio::spawn(run_subscription(
                        kind,
                        subscription,
                        self.engine.clone(),
                        self.hub.clone(),
                        self.dedup.clone(),
                    )));
                }
                Err(err) => {
                    error!(kind = kind.label(), error = %err, "event subscription failed");
                }
            }
        }
    }

    /// Stop watching and reset the in-memory claim set
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        let cleared = self.dedup.clear();
        info!(cleared_claims = cleared, "watcher stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

async fn run_subscription(
    kind: EventKind,
    mut subscription: LogSubscription,
    engine: Arc<TradeEngine>,
    hub: Arc<FeedHub>,
    dedup: Arc<dyn ProcessedEvents>,
) {
    while let Some(batch) = subscription.next_batch().await {
        debug!(kind = kind.label(), count = batch.len(), "received log batch");
        for log in &batch {
            handle_log(kind, log, &engine, &hub, dedup.as_ref()).await;
        }
    }
    info!(kind = kind.label(), "log subscription ended");
}

async fn handle_log(
    kind: EventKind,
    log: &VaultLog,
    engine: &TradeEngine,
    hub: &FeedHub,
    dedup: &dyn ProcessedEvents,
) {
    let event = match VaultEvent::decode(kind, log) {
        Ok(event) => event,
        Err(err) => {
            error!(
                kind = kind.label(),
                tx = %log.transaction_hash,
                error = %err,
                "undecodable log dropped"
            );
            return;
        }
    };

    if !dedup.try_claim(kind, &event.transaction_hash) {
        debug!(
            kind = kind.label(),
            tx = %event.transaction_hash,
            "duplicate event skipped"
        );
        return;
    }

    // The claim is kept even if the apply fails: a double-applied balance
    // mutation is worse than a lost event.
    let wallet = Some(event.wallet.clone());
    let applied = match kind {
        EventKind::Buy => engine.buy(&event.asset_id, event.amount_tokens, wallet).await,
        EventKind::Sell => engine.sell(&event.asset_id, event.amount_tokens, wallet).await,
    };

    match applied {
        Ok(execution) => {
            debug!(
                kind = kind.label(),
                tx = %event.transaction_hash,
                asset = %event.asset_id,
                price = %execution.state.current_price,
                supply = %execution.state.supply,
                "chain event applied"
            );
            hub.publish_execution(&execution.trade, &execution.state, &execution.candle);
        }
        Err(err) => {
            error!(
                kind = kind.label(),
                tx = %event.transaction_hash,
                asset = %event.asset_id,
                error = %err,
                "chain event abandoned"
            );
        }
    }
}
