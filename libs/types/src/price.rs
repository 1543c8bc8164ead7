//! Per-asset bonding-curve price state
//!
//! One record per asset, created with seeded defaults the first time any
//! operation touches an unseen asset and mutated only by the trade engine.

use crate::ids::AssetId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Durable price state for a single asset
///
/// Invariant after every committed mutation:
/// `current_price == base_price + slope * supply`. Reserve is the
/// cumulative net value locked against the outstanding supply and never
/// goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceState {
    pub asset_id: AssetId,
    pub supply: Decimal,
    pub reserve: Decimal,
    pub base_price: Decimal,
    pub slope: Decimal,
    pub current_price: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl PriceState {
    /// Seeded state for an unseen asset: 10 tokens outstanding, empty
    /// reserve, curve 0.001 + 0.01s.
    pub fn initial(asset_id: AssetId) -> Self {
        let base_price = Decimal::new(1, 3);
        let slope = Decimal::new(1, 2);
        let supply = Decimal::from(10);
        Self {
            asset_id,
            supply,
            reserve: Decimal::ZERO,
            base_price,
            slope,
            current_price: base_price + slope * supply,
            updated_at: Utc::now(),
        }
    }

    /// Market cap is the reserve (TVL), not supply × price: the curve's
    /// spot price is marginal, not average.
    pub fn market_cap(&self) -> Decimal {
        self.reserve
    }

    /// Whether the derived-price invariant holds
    pub fn is_consistent(&self) -> bool {
        self.current_price == self.base_price + self.slope * self.supply
            && self.supply >= Decimal::ZERO
            && self.reserve >= Decimal::ZERO
    }
}
