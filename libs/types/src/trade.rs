//! Executed-trade records for the append-only trade ledger

use crate::ids::{AssetId, TradeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Tokens minted against the curve
    Buy,
    /// Tokens burned back into the curve
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Stable label for logging and dedup keys
    pub fn label(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// An executed trade against an asset's bonding curve
///
/// Immutable once created; the ledger is append-only. `total_value` is the
/// cost paid (buy) or refund received (sell), `price_per_token` the spot
/// price after the trade committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub asset_id: AssetId,
    pub wallet: Option<String>,
    pub side: Side,
    pub amount_tokens: Decimal,
    pub total_value: Decimal,
    pub price_per_token: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new trade record stamped at the current time
    pub fn new(
        asset_id: AssetId,
        wallet: Option<String>,
        side: Side,
        amount_tokens: Decimal,
        total_value: Decimal,
        price_per_token: Decimal,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            asset_id,
            wallet,
            side,
            amount_tokens,
            total_value,
            price_per_token,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn test_trade_creation() {
        let trade = Trade::new(
            AssetId::new("ip-42"),
            Some("0xabc".to_string()),
            Side::Buy,
            Decimal::from(10),
            Decimal::new(151, 2),
            Decimal::new(201, 3),
        );

        assert_eq!(trade.asset_id.as_str(), "ip-42");
        assert_eq!(trade.amount_tokens, Decimal::from(10));
        assert_eq!(trade.total_value, Decimal::new(151, 2));
    }

    #[test]
    fn test_trade_serialization_roundtrip() {
        let trade = Trade::new(
            AssetId::new("ip-7"),
            None,
            Side::Sell,
            Decimal::from(5),
            Decimal::new(38, 2),
            Decimal::new(101, 3),
        );

        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deserialized);
    }
}
