//! Injectable store boundaries
//!
//! The engine persists through three narrow traits so the backing store is
//! a configuration choice: `MemoryStore` in-process for tests and the
//! reference runtime, a durable document store in production. All
//! operations provide read-your-writes consistency for a single caller.

use async_trait::async_trait;
use dashmap::DashMap;
use types::candle::Candlestick;
use types::errors::StoreError;
use types::ids::AssetId;
use types::price::PriceState;
use types::trade::Trade;

/// Key-addressable price state, one record per asset
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn get(&self, asset: &AssetId) -> Result<Option<PriceState>, StoreError>;
    async fn put(&self, state: PriceState) -> Result<(), StoreError>;
}

/// Append-only trade ledger scoped by asset
#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn append(&self, trade: Trade) -> Result<(), StoreError>;
    /// Most-recent-first, bounded
    async fn recent(&self, asset: &AssetId, limit: usize) -> Result<Vec<Trade>, StoreError>;
}

/// Append-only candlestick series scoped by asset
#[async_trait]
pub trait CandleStore: Send + Sync {
    async fn append(&self, candle: Candlestick) -> Result<(), StoreError>;
    /// Oldest-first, bounded
    async fn series(&self, asset: &AssetId, limit: usize)
        -> Result<Vec<Candlestick>, StoreError>;
}

/// In-process store backing all three boundaries
///
/// Concurrent readers are safe on the append-only collections; price-state
/// write ordering is the engine's responsibility via its per-asset locks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prices: DashMap<AssetId, PriceState>,
    trades: DashMap<AssetId, Vec<Trade>>,
    candles: DashMap<AssetId, Vec<Candlestick>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assets with price state
    pub fn asset_count(&self) -> usize {
        self.prices.len()
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn get(&self, asset: &AssetId) -> Result<Option<PriceState>, StoreError> {
        Ok(self.prices.get(asset).map(|entry| entry.clone()))
    }

    async fn put(&self, state: PriceState) -> Result<(), StoreError> {
        self.prices.insert(state.asset_id.clone(), state);
        Ok(())
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn append(&self, trade: Trade) -> Result<(), StoreError> {
        self.trades
            .entry(trade.asset_id.clone())
            .or_default()
            .push(trade);
        Ok(())
    }

    async fn recent(&self, asset: &AssetId, limit: usize) -> Result<Vec<Trade>, StoreError> {
        Ok(self
            .trades
            .get(asset)
            .map(|entry| entry.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CandleStore for MemoryStore {
    async fn append(&self, candle: Candlestick) -> Result<(), StoreError> {
        self.candles
            .entry(candle.asset_id.clone())
            .or_default()
            .push(candle);
        Ok(())
    }

    async fn series(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> Result<Vec<Candlestick>, StoreError> {
        Ok(self
            .candles
            .get(asset)
            .map(|entry| entry.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::ids::TradeId;
    use types::trade::Side;

    fn make_trade(asset: &str, n: u32) -> Trade {
        Trade::new(
            AssetId::new(asset),
            None,
            Side::Buy,
            Decimal::from(n),
            Decimal::from(n),
            Decimal::ONE,
        )
    }

    #[tokio::test]
    async fn test_price_read_your_writes() {
        let store = MemoryStore::new();
        let asset = AssetId::new("ip-42");
        assert!(store.get(&asset).await.unwrap().is_none());

        let state = PriceState::initial(asset.clone());
        store.put(state.clone()).await.unwrap();
        assert_eq!(store.get(&asset).await.unwrap(), Some(state));
        assert_eq!(store.asset_count(), 1);
    }

    #[tokio::test]
    async fn test_recent_trades_newest_first() {
        let store = MemoryStore::new();
        let asset = AssetId::new("ip-42");
        for n in 1..=5 {
            TradeStore::append(&store, make_trade("ip-42", n)).await.unwrap();
        }

        let recent = TradeStore::recent(&store, &asset, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount_tokens, Decimal::from(5));
        assert_eq!(recent[2].amount_tokens, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_candle_series_oldest_first() {
        let store = MemoryStore::new();
        let asset = AssetId::new("ip-42");
        for n in 1..=4 {
            let candle = Candlestick::from_transition(
                asset.clone(),
                Decimal::from(n),
                Decimal::from(n + 1),
                TradeId::new(),
            );
            CandleStore::append(&store, candle).await.unwrap();
        }

        let series = store.series(&asset, 10).await.unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].open, Decimal::from(1));
        assert_eq!(series[3].open, Decimal::from(4));

        let bounded = store.series(&asset, 2).await.unwrap();
        assert_eq!(bounded.len(), 2);
        assert_eq!(bounded[0].open, Decimal::from(1));
    }

    #[tokio::test]
    async fn test_unknown_asset_is_empty_not_error() {
        let store = MemoryStore::new();
        let asset = AssetId::new("never-seen");
        assert!(TradeStore::recent(&store, &asset, 10).await.unwrap().is_empty());
        assert!(store.series(&asset, 10).await.unwrap().is_empty());
    }
}
