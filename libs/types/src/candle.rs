//! Per-trade OHLC candlestick records
//!
//! One candle per committed trade: open is the price immediately before the
//! trade, close the price immediately after. No time bucketing: the series
//! is exactly as long as the trade history.

use crate::ids::{AssetId, TradeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLC data point derived from one trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candlestick {
    pub asset_id: AssetId,
    /// RFC 3339 timestamp, lexically sortable
    pub time: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Trade that produced this candle (non-owning back-reference)
    pub trade_id: TradeId,
    pub created_at: DateTime<Utc>,
}

impl Candlestick {
    /// Build a candle from a price transition, stamped at the current time
    pub fn from_transition(
        asset_id: AssetId,
        open: Decimal,
        close: Decimal,
        trade_id: TradeId,
    ) -> Self {
        let now = Utc::now();
        Self {
            asset_id,
            time: now.to_rfc3339(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            trade_id,
            created_at: now,
        }
    }

    /// Projection in the shape charting clients consume
    pub fn chart_point(&self) -> ChartPoint {
        ChartPoint {
            time: self.time.clone(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        }
    }

    /// OHLC invariants for a two-price candle
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Time/open/high/low/close projection of a candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}
