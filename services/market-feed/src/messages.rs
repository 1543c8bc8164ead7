//! Wire protocol for the real-time transport
//!
//! Client requests are tagged by `action`, server events by `event`, both
//! kebab-case. Error events are scoped to the requesting connection and
//! never tear down the socket.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::candle::ChartPoint;
use types::ids::AssetId;
use types::price::PriceState;
use types::trade::{Side, Trade};

/// Messages a connected client may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ClientRequest {
    JoinRoom {
        asset_id: AssetId,
    },
    LeaveRoom {
        asset_id: AssetId,
    },
    GetTrades {
        asset_id: AssetId,
        limit: Option<usize>,
    },
    GetCandles {
        asset_id: AssetId,
        limit: Option<usize>,
    },
    Ping,
}

/// Parse a raw JSON frame into a client request
pub fn parse_request(json: &str) -> Option<ClientRequest> {
    serde_json::from_str(json).ok()
}

/// An individual fill, published to the asset's room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePayload {
    pub asset_id: AssetId,
    pub side: Side,
    pub amount_tokens: Decimal,
    pub total: Decimal,
    pub price: Decimal,
    pub wallet: Option<String>,
    pub created_at: DateTime<Utc>,
    pub supply: Decimal,
    pub reserve: Decimal,
}

/// Price snapshot for an asset's room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePayload {
    pub price: Decimal,
    pub supply: Decimal,
    pub reserve: Decimal,
}

/// Global asset summary after a committed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdatePayload {
    pub asset_id: AssetId,
    pub supply: Decimal,
    pub current_price: Decimal,
    pub reserve: Decimal,
    /// Equal to reserve: the curve's spot price is marginal, not average
    pub market_cap: Decimal,
}

/// Messages the server publishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum FeedMessage {
    Trade(TradePayload),
    Price(PricePayload),
    ChartUpdate(ChartPoint),
    IpUpdate(AssetUpdatePayload),
    Log {
        message: String,
    },
    Trades {
        trades: Vec<TradePayload>,
    },
    ChartData {
        candles: Vec<ChartPoint>,
    },
    Pong,
    TradeError {
        asset_id: AssetId,
        message: String,
    },
    ChartError {
        asset_id: AssetId,
        message: String,
    },
}

impl TradePayload {
    /// Shape a ledger trade plus the committed state for the wire
    pub fn from_parts(trade: &Trade, state: &PriceState) -> Self {
        Self {
            asset_id: trade.asset_id.clone(),
            side: trade.side,
            amount_tokens: trade.amount_tokens,
            total: trade.total_value,
            price: trade.price_per_token,
            wallet: trade.wallet.clone(),
            created_at: trade.created_at,
            supply: state.supply,
            reserve: state.reserve,
        }
    }

    /// Shape a historical ledger trade; supply/reserve are not stored per
    /// trade, so they are zeroed in replayed lists.
    pub fn from_history(trade: &Trade) -> Self {
        Self {
            asset_id: trade.asset_id.clone(),
            side: trade.side,
            amount_tokens: trade.amount_tokens,
            total: trade.total_value,
            price: trade.price_per_token,
            wallet: trade.wallet.clone(),
            created_at: trade.created_at,
            supply: Decimal::ZERO,
            reserve: Decimal::ZERO,
        }
    }
}

impl PricePayload {
    pub fn from_state(state: &PriceState) -> Self {
        Self {
            price: state.current_price,
            supply: state.supply,
            reserve: state.reserve,
        }
    }
}

impl AssetUpdatePayload {
    pub fn from_state(state: &PriceState) -> Self {
        Self {
            asset_id: state.asset_id.clone(),
            supply: state.supply,
            current_price: state.current_price,
            reserve: state.reserve,
            market_cap: state.market_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::candle::Candlestick;
    use types::ids::TradeId;
    use types::price::PriceState;

    #[test]
    fn test_parse_join_room() {
        let req = parse_request(r#"{"action":"join-room","asset_id":"ip-42"}"#).unwrap();
        assert_eq!(
            req,
            ClientRequest::JoinRoom {
                asset_id: AssetId::new("ip-42")
            }
        );
    }

    #[test]
    fn test_parse_get_trades_with_limit() {
        let req =
            parse_request(r#"{"action":"get-trades","asset_id":"ip-42","limit":5}"#).unwrap();
        assert_eq!(
            req,
            ClientRequest::GetTrades {
                asset_id: AssetId::new("ip-42"),
                limit: Some(5)
            }
        );
    }

    #[test]
    fn test_parse_ping() {
        assert_eq!(parse_request(r#"{"action":"ping"}"#).unwrap(), ClientRequest::Ping);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_request("not json").is_none());
        assert!(parse_request(r#"{"action":"unknown"}"#).is_none());
    }

    #[test]
    fn test_feed_message_event_tags() {
        let state = PriceState::initial(AssetId::new("ip-42"));

        let price = FeedMessage::Price(PricePayload::from_state(&state));
        let json = serde_json::to_string(&price).unwrap();
        assert!(json.contains(r#""event":"price""#));

        let update = FeedMessage::IpUpdate(AssetUpdatePayload::from_state(&state));
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains(r#""event":"ip-update""#));

        let candle = Candlestick::from_transition(
            AssetId::new("ip-42"),
            Decimal::ONE,
            Decimal::TWO,
            TradeId::new(),
        );
        let chart = FeedMessage::ChartUpdate(candle.chart_point());
        let json = serde_json::to_string(&chart).unwrap();
        assert!(json.contains(r#""event":"chart-update""#));
    }

    #[test]
    fn test_market_cap_equals_reserve() {
        let mut state = PriceState::initial(AssetId::new("ip-42"));
        state.reserve = Decimal::new(151, 2);
        let update = AssetUpdatePayload::from_state(&state);
        assert_eq!(update.market_cap, update.reserve);
    }

    #[test]
    fn test_trade_payload_from_parts() {
        let state = PriceState::initial(AssetId::new("ip-42"));
        let trade = Trade::new(
            AssetId::new("ip-42"),
            Some("0xfeedface".to_string()),
            Side::Buy,
            Decimal::from(10),
            Decimal::new(151, 2),
            Decimal::new(201, 3),
        );

        let payload = TradePayload::from_parts(&trade, &state);
        assert_eq!(payload.total, Decimal::new(151, 2));
        assert_eq!(payload.supply, state.supply);

        let replayed = TradePayload::from_history(&trade);
        assert_eq!(replayed.supply, Decimal::ZERO);
        assert_eq!(replayed.price, trade.price_per_token);
    }

    #[test]
    fn test_feed_message_roundtrip() {
        let msg = FeedMessage::TradeError {
            asset_id: AssetId::new("ip-42"),
            message: "boom".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""event":"trade-error""#));
        let back: FeedMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
