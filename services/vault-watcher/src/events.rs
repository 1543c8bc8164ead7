//! Vault event definitions and the log-source boundary
//!
//! The chain node is an opaque log source: given a contract address and an
//! event kind it yields a lazy, unbounded sequence of log batches. Amount
//! fields arrive as fixed-point integers at 10^18 scale and are converted
//! to the engine's decimal units on decode.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use types::ids::AssetId;

/// Scale of on-chain amount fields (1 token = 10^18 base units)
pub const FIXED_POINT_DECIMALS: u32 = 18;

/// The two event topics emitted by the vault contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Buy,
    Sell,
}

impl EventKind {
    /// Stable label for logging and dedup keys
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Buy => "Buy",
            EventKind::Sell => "Sell",
        }
    }

    /// Both topics, in subscription order
    pub fn all() -> &'static [EventKind] {
        &[EventKind::Buy, EventKind::Sell]
    }
}

/// A raw decoded log entry as delivered by the log source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultLog {
    pub transaction_hash: String,
    pub wallet: String,
    pub asset_id: AssetId,
    /// Token amount in 10^18 base units
    pub amount_tokens: u128,
    /// Value paid (Buy) or received (Sell) in 10^18 base units
    pub amount_value: u128,
}

/// A vault event in engine units
#[derive(Debug, Clone, PartialEq)]
pub struct VaultEvent {
    pub kind: EventKind,
    pub transaction_hash: String,
    pub wallet: String,
    pub asset_id: AssetId,
    pub amount_tokens: Decimal,
    pub amount_value: Decimal,
}

/// Per-log decode failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("amount out of range: {0} base units")]
    AmountOutOfRange(u128),
}

impl VaultEvent {
    /// Convert a raw log into engine units
    pub fn decode(kind: EventKind, log: &VaultLog) -> Result<Self, DecodeError> {
        Ok(Self {
            kind,
            transaction_hash: log.transaction_hash.clone(),
            wallet: log.wallet.clone(),
            asset_id: log.asset_id.clone(),
            amount_tokens: from_fixed_point(log.amount_tokens)?,
            amount_value: from_fixed_point(log.amount_value)?,
        })
    }
}

/// Convert a 10^18-scaled integer amount to a Decimal token amount
pub fn from_fixed_point(base_units: u128) -> Result<Decimal, DecodeError> {
    let signed =
        i128::try_from(base_units).map_err(|_| DecodeError::AmountOutOfRange(base_units))?;
    Decimal::try_from_i128_with_scale(signed, FIXED_POINT_DECIMALS)
        .map(|amount| amount.normalize())
        .map_err(|_| DecodeError::AmountOutOfRange(base_units))
}

/// Errors from the log-source boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("subscription failed: {0}")]
    Subscribe(String),
}

/// A live, restartable subscription to one event topic
pub struct LogSubscription {
    rx: mpsc::Receiver<Vec<VaultLog>>,
}

impl LogSubscription {
    pub fn new(rx: mpsc::Receiver<Vec<VaultLog>>) -> Self {
        Self { rx }
    }

    /// Next batch of logs; `None` when the source is gone
    pub async fn next_batch(&mut self) -> Option<Vec<VaultLog>> {
        self.rx.recv().await
    }
}

/// The chain-node boundary: event subscriptions scoped to a contract.
///
/// Reconnect/backoff belongs to implementations of this trait, not to the
/// watcher consuming it.
#[async_trait]
pub trait LogSource: Send + Sync + 'static {
    async fn subscribe(
        &self,
        contract: &str,
        kind: EventKind,
    ) -> Result<LogSubscription, SourceError>;
}

/// In-process log source over channels
///
/// Used by tests and replay harnesses; a production deployment substitutes
/// an RPC-backed implementation behind the same trait.
#[derive(Default)]
pub struct ChannelLogSource {
    senders: DashMap<EventKind, Vec<mpsc::Sender<Vec<VaultLog>>>>,
}

impl ChannelLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a batch to every subscriber of the given topic
    pub async fn push(&self, kind: EventKind, batch: Vec<VaultLog>) {
        let targets: Vec<_> = self
            .senders
            .get(&kind)
            .map(|subscribers| subscribers.clone())
            .unwrap_or_default();
        for tx in targets {
            let _ = tx.send(batch.clone()).await;
        }
    }

    /// Number of active subscriptions for a topic
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.senders
            .get(&kind)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl LogSource for ChannelLogSource {
    async fn subscribe(
        &self,
        _contract: &str,
        kind: EventKind,
    ) -> Result<LogSubscription, SourceError> {
        let (tx, rx) = mpsc::channel(64);
        self.senders.entry(kind).or_default().push(tx);
        Ok(LogSubscription::new(rx))
    }
}
