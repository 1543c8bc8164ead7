//! Fan-out hub
//!
//! One lazily-created broadcast channel per asset room plus a single
//! global channel. Publishing never blocks: lagging subscribers drop the
//! oldest messages (broadcast semantics) rather than back-pressuring the
//! trade path.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use types::candle::Candlestick;
use types::ids::AssetId;
use types::price::PriceState;
use types::trade::{Side, Trade};

use crate::messages::{AssetUpdatePayload, FeedMessage, PricePayload, TradePayload};

/// Default per-channel buffer
const DEFAULT_CAPACITY: usize = 256;

/// Publishes feed messages to asset rooms and the global feed
pub struct FeedHub {
    rooms: DashMap<AssetId, broadcast::Sender<FeedMessage>>,
    global: broadcast::Sender<FeedMessage>,
    room_capacity: usize,
}

impl FeedHub {
    pub fn new(room_capacity: usize) -> Self {
        let (global, _) = broadcast::channel(room_capacity);
        Self {
            rooms: DashMap::new(),
            global,
            room_capacity,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Subscribe to one asset's room
    pub fn subscribe_room(&self, asset: &AssetId) -> broadcast::Receiver<FeedMessage> {
        self.room_sender(asset).subscribe()
    }

    /// Subscribe to the global feed (every connection gets one)
    pub fn subscribe_global(&self) -> broadcast::Receiver<FeedMessage> {
        self.global.subscribe()
    }

    /// Publish one message to an asset's room
    pub fn send_to_room(&self, asset: &AssetId, message: FeedMessage) {
        // A send error only means no subscriber is currently listening.
        let _ = self.room_sender(asset).send(message);
    }

    /// Publish one message to every connection
    pub fn send_global(&self, message: FeedMessage) {
        let _ = self.global.send(message);
    }

    /// Emit the full notification sequence for one committed trade:
    /// `trade` → `price` → `chart-update` to the room, then the global
    /// `ip-update` and activity `log` line.
    pub fn publish_execution(&self, trade: &Trade, state: &PriceState, candle: &Candlestick) {
        let asset = &trade.asset_id;

        self.send_to_room(asset, FeedMessage::Trade(TradePayload::from_parts(trade, state)));
        self.send_to_room(asset, FeedMessage::Price(PricePayload::from_state(state)));
        self.send_to_room(asset, FeedMessage::ChartUpdate(candle.chart_point()));

        self.send_global(FeedMessage::IpUpdate(AssetUpdatePayload::from_state(state)));
        self.send_global(FeedMessage::Log {
            message: activity_line(trade),
        });

        debug!(
            asset = %asset,
            side = trade.side.label(),
            price = %state.current_price,
            "execution fanned out"
        );
    }

    /// Number of rooms with at least one past subscriber
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_sender(&self, asset: &AssetId) -> broadcast::Sender<FeedMessage> {
        self.rooms
            .entry(asset.clone())
            .or_insert_with(|| broadcast::channel(self.room_capacity).0)
            .value()
            .clone()
    }
}

/// Human-readable activity line for the global feed
fn activity_line(trade: &Trade) -> String {
    let verb = match trade.side {
        Side::Buy => "Buy",
        Side::Sell => "Sell",
    };
    let who = trade
        .wallet
        .as_deref()
        .map(short_wallet)
        .unwrap_or_else(|| "anon".to_string());
    format!(
        "{}: {} tokens of {} by {}",
        verb, trade.amount_tokens, trade.asset_id, who
    )
}

fn short_wallet(wallet: &str) -> String {
    if wallet.len() <= 6 {
        wallet.to_string()
    } else {
        format!("{}...", &wallet[..6])
    }
}
