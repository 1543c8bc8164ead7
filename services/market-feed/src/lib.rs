//! Market Feed Service
//!
//! Real-time distribution layer for committed trades:
//! - Wire protocol for client requests and feed events
//! - Per-asset broadcast rooms plus a global feed
//! - Registry of which connection joined which asset room
//!
//! For every committed trade the hub emits, in order:
//! `trade` → `price` → `chart-update` to the asset's room, then a global
//! `ip-update` (and a human-readable `log` line). Delivery across the
//! sequence is not atomic; only the relative order per trade is guaranteed.

pub mod hub;
pub mod messages;
pub mod rooms;

pub use hub::FeedHub;
pub use messages::{ClientRequest, FeedMessage};
pub use rooms::{ConnectionId, RoomRegistry};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
