//! Transactional trade core
//!
//! `TradeEngine` is the only writer of price state, the trade ledger, and
//! the candle series. All mutations on one asset are serialized behind a
//! per-asset mutex held across the full read-compute-write span, so buy
//! cost is never computed from a supply that a concurrent commit has made
//! stale. Operations on different assets proceed fully in parallel.
//!
//! Validation failures are the caller's to handle and are never retried.
//! Store failures propagate uncaught: retrying a non-idempotent balance
//! mutation here would double-apply, and exactly-once delivery is the
//! deduplication layer's job.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use types::candle::{Candlestick, ChartPoint};
use types::errors::TradeError;
use types::ids::AssetId;
use types::price::PriceState;
use types::trade::{Side, Trade};

use crate::candles::trade_candle;
use crate::curve::LinearCurve;
use crate::store::{CandleStore, MemoryStore, PriceStore, TradeStore};

/// Everything a committed trade produced, mutually consistent
#[derive(Debug, Clone, Serialize)]
pub struct TradeExecution {
    pub state: PriceState,
    pub trade: Trade,
    pub candle: Candlestick,
    /// Cost paid (buy) or refund received (sell)
    pub total: Decimal,
}

/// The venue's single writer of per-asset trading state
pub struct TradeEngine {
    prices: Arc<dyn PriceStore>,
    trades: Arc<dyn TradeStore>,
    candles: Arc<dyn CandleStore>,
    /// Per-asset mutation locks, created lazily
    locks: DashMap<AssetId, Arc<Mutex<()>>>,
}

impl TradeEngine {
    pub fn new(
        prices: Arc<dyn PriceStore>,
        trades: Arc<dyn TradeStore>,
        candles: Arc<dyn CandleStore>,
    ) -> Self {
        Self {
            prices,
            trades,
            candles,
            locks: DashMap::new(),
        }
    }

    /// Engine over a single shared in-process store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store)
    }

    /// Load the asset's price state, seeding defaults on first touch.
    ///
    /// Idempotent under concurrency: the per-asset lock guarantees at most
    /// one create wins and every caller observes the same resulting state.
    pub async fn ensure_price(&self, asset: &AssetId) -> Result<PriceState, TradeError> {
        let lock = self.asset_lock(asset);
        let _guard = lock.lock().await;
        self.load_or_seed(asset).await
    }

    /// Apply a buy: mint `amount` tokens against the curve
    pub async fn buy(
        &self,
        asset: &AssetId,
        amount: Decimal,
        wallet: Option<String>,
    ) -> Result<TradeExecution, TradeError> {
        if amount <= Decimal::ZERO {
            return Err(TradeError::InvalidAmount(amount));
        }

        let lock = self.asset_lock(asset);
        let _guard = lock.lock().await;

        let mut state = self.load_or_seed(asset).await?;
        let curve = LinearCurve::new(state.base_price, state.slope);
        let pre_trade_price = state.current_price;

        let cost = curve.cost_to_buy(state.supply, amount);
        state.supply += amount;
        state.reserve += cost;
        state.current_price = curve.price_at_supply(state.supply);
        state.updated_at = chrono::Utc::now();

        self.commit(state, Side::Buy, asset, wallet, amount, cost, pre_trade_price)
            .await
    }

    /// Apply a sell: burn `amount` tokens back into the curve
    pub async fn sell(
        &self,
        asset: &AssetId,
        amount: Decimal,
        wallet: Option<String>,
    ) -> Result<TradeExecution, TradeError> {
        if amount <= Decimal::ZERO {
            return Err(TradeError::InvalidAmount(amount));
        }

        let lock = self.asset_lock(asset);
        let _guard = lock.lock().await;

        let mut state = self.load_or_seed(asset).await?;
        if amount > state.supply {
            return Err(TradeError::InsufficientSupply {
                requested: amount,
                available: state.supply,
            });
        }

        let curve = LinearCurve::new(state.base_price, state.slope);
        let pre_trade_price = state.current_price;

        let refund = curve.refund_for_sell(state.supply, amount);
        state.supply -= amount;
        // Reserve never reports negative TVL: redeeming value the reserve
        // does not hold (e.g. selling the seeded initial supply) clamps.
        state.reserve = (state.reserve - refund).max(Decimal::ZERO);
        state.current_price = curve.price_at_supply(state.supply);
        state.updated_at = chrono::Utc::now();

        self.commit(state, Side::Sell, asset, wallet, amount, refund, pre_trade_price)
            .await
    }

    /// Most-recent-first slice of the asset's trade ledger
    pub async fn get_recent_trades(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> Result<Vec<Trade>, TradeError> {
        Ok(self.trades.recent(asset, limit).await?)
    }

    /// Oldest-first candle series in charting shape
    pub async fn get_candlesticks(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> Result<Vec<ChartPoint>, TradeError> {
        let series = self.candles.series(asset, limit).await?;
        Ok(series.iter().map(Candlestick::chart_point).collect())
    }

    fn asset_lock(&self, asset: &AssetId) -> Arc<Mutex<()>> {
        self.locks
            .entry(asset.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    async fn load_or_seed(&self, asset: &AssetId) -> Result<PriceState, TradeError> {
        if let Some(existing) = self.prices.get(asset).await? {
            return Ok(existing);
        }
        let seeded = PriceState::initial(asset.clone());
        self.prices.put(seeded.clone()).await?;
        debug!(asset = %asset, price = %seeded.current_price, "seeded price state");
        Ok(seeded)
    }

    #[allow(clippy::too_many_arguments)]
    async fn commit(
        &self,
        state: PriceState,
        side: Side,
        asset: &AssetId,
        wallet: Option<String>,
        amount: Decimal,
        total: Decimal,
        pre_trade_price: Decimal,
    ) -> Result<TradeExecution, TradeError> {
        self.prices.put(state.clone()).await?;

        let trade = Trade::new(
            asset.clone(),
            wallet,
            side,
            amount,
            total,
            state.current_price,
        );
        self.trades.append(trade.clone()).await?;

        let candle = trade_candle(
            asset.clone(),
            pre_trade_price,
            state.current_price,
            trade.trade_id,
        );
        self.candles.append(candle.clone()).await?;

        debug!(
            asset = %asset,
            side = side.label(),
            amount = %amount,
            total = %total,
            price = %state.current_price,
            supply = %state.supply,
            reserve = %state.reserve,
            "trade committed"
        );

        Ok(TradeExecution {
            state,
            trade,
            candle,
            total,
        })
    }
}
