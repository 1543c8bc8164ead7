//! Trade Engine Service
//!
//! The transactional core of the venue. Applies buy/sell operations to
//! per-asset bonding-curve price state and is the only writer of:
//! - PriceState (supply / reserve / spot price)
//! - the append-only trade ledger
//! - the per-trade candlestick series
//!
//! # Architecture
//!
//! ```text
//!  buy / sell
//!      │
//!  ┌───▼────────┐   per-asset mutex held across
//!  │ TradeEngine│ ← read → curve math → write
//!  └───┬────────┘
//!      │
//!  ┌───┴─────┬───────────┐
//!  │         │           │
//! ┌▼─────┐ ┌─▼─────┐ ┌───▼────┐
//! │Price │ │Trades │ │Candles │
//! └──────┘ └───────┘ └────────┘
//! ```

pub mod candles;
pub mod curve;
pub mod engine;
pub mod store;

pub use engine::{TradeEngine, TradeExecution};
pub use store::{CandleStore, MemoryStore, PriceStore, TradeStore};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
