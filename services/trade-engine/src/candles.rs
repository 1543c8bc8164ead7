//! Per-trade candle derivation
//!
//! Every committed trade produces exactly one OHLC point: open is the spot
//! price before the trade, close the spot price after, high/low their
//! extremes. No merging, no bucketing, no backfill.

use rust_decimal::Decimal;
use types::candle::Candlestick;
use types::ids::{AssetId, TradeId};

/// Derive the candle for a single committed trade
pub fn trade_candle(
    asset_id: AssetId,
    pre_trade_price: Decimal,
    post_trade_price: Decimal,
    trade_id: TradeId,
) -> Candlestick {
    Candlestick::from_transition(asset_id, pre_trade_price, post_trade_price, trade_id)
}
