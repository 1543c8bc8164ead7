use std::sync::Arc;

use market_feed::{FeedHub, RoomRegistry};
use trade_engine::TradeEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TradeEngine>,
    pub hub: Arc<FeedHub>,
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new(engine: Arc<TradeEngine>, hub: Arc<FeedHub>) -> Self {
        Self {
            engine,
            hub,
            rooms: Arc::new(RoomRegistry::new()),
        }
    }
}
