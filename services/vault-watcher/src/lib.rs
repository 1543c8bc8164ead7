//! Vault Watcher Service
//!
//! Ingests Buy/Sell logs emitted by the vault contract and drives them
//! through the venue, exactly once each:
//!
//! ```text
//! LogSource (chain RPC boundary)
//!      │  batches of raw logs
//!  ┌───▼────┐
//!  │ decode │  ← fixed-point (10^18) → Decimal
//!  └───┬────┘
//!  ┌───▼────┐
//!  │ dedup  │  ← atomic claim per (kind, tx hash)
//!  └───┬────┘
//!  ┌───▼────────┐
//!  │ TradeEngine│
//!  └───┬────────┘
//!  ┌───▼────┐
//!  │ FeedHub│  trade → price → chart-update → ip-update
//!  └────────┘
//! ```
//!
//! One bad log never halts the loop: decode and apply failures are logged
//! and the event abandoned.

pub mod dedup;
pub mod events;
pub mod watcher;

pub use dedup::{MemoryDedup, ProcessedEvents};
pub use events::{ChannelLogSource, EventKind, LogSource, LogSubscription, VaultEvent, VaultLog};
pub use watcher::{VaultWatcher, WatcherConfig};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
