use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use market_feed::messages::TradePayload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_engine::TradeExecution;
use types::candle::ChartPoint;
use types::ids::{AssetId, TradeId};
use types::trade::Side;

const DEFAULT_TRADES_LIMIT: usize = 20;
const DEFAULT_CANDLES_LIMIT: usize = 100;

/// Trade-entry request for off-chain callers (migrations, test harnesses)
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRequest {
    pub asset_id: AssetId,
    pub amount_tokens: Decimal,
    pub wallet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeResponse {
    pub trade_id: TradeId,
    pub asset_id: AssetId,
    pub side: Side,
    pub amount_tokens: Decimal,
    pub total: Decimal,
    pub price: Decimal,
    pub supply: Decimal,
    pub reserve: Decimal,
    pub market_cap: Decimal,
}

impl TradeResponse {
    fn from_execution(execution: &TradeExecution) -> Self {
        Self {
            trade_id: execution.trade.trade_id,
            asset_id: execution.trade.asset_id.clone(),
            side: execution.trade.side,
            amount_tokens: execution.trade.amount_tokens,
            total: execution.total,
            price: execution.state.current_price,
            supply: execution.state.supply,
            reserve: execution.state.reserve,
            market_cap: execution.state.market_cap(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

pub async fn buy(
    State(state): State<AppState>,
    Json(payload): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, AppError> {
    let execution = state
        .engine
        .buy(&payload.asset_id, payload.amount_tokens, payload.wallet)
        .await?;

    // API trades fan out exactly like chain trades
    state
        .hub
        .publish_execution(&execution.trade, &execution.state, &execution.candle);

    Ok(Json(TradeResponse::from_execution(&execution)))
}

pub async fn sell(
    State(state): State<AppState>,
    Json(payload): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, AppError> {
    let execution = state
        .engine
        .sell(&payload.asset_id, payload.amount_tokens, payload.wallet)
        .await?;

    state
        .hub
        .publish_execution(&execution.trade, &execution.state, &execution.candle);

    Ok(Json(TradeResponse::from_execution(&execution)))
}

pub async fn recent_trades(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TradePayload>>, AppError> {
    let asset = AssetId::new(asset_id);
    let trades = state
        .engine
        .get_recent_trades(&asset, query.limit.unwrap_or(DEFAULT_TRADES_LIMIT))
        .await?;
    Ok(Json(trades.iter().map(TradePayload::from_history).collect()))
}

pub async fn candle_series(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    let asset = AssetId::new(asset_id);
    let candles = state
        .engine
        .get_candlesticks(&asset, query.limit.unwrap_or(DEFAULT_CANDLES_LIMIT))
        .await?;
    Ok(Json(candles))
}
