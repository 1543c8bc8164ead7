//! Linear bonding curve
//!
//! Spot price rises linearly with supply: `P(s) = base_price + slope * s`.
//! Buy cost and sell refund are the exact definite integrals of the price
//! function, not `price * qty`: price moves continuously during the fill.
//! Closed forms only; a numerical integral would not reproduce identical
//! results across implementations.

use rust_decimal::Decimal;

/// A linear bonding curve, pure and stateless
///
/// Given `(b, m)`:
/// - `price_at_supply(s) = b + m*s`
/// - `cost_to_buy(s, q) = b*q + m*((s+q)² - s²)/2` (integral from s to s+q)
/// - `refund_for_sell(s, q) = b*q + m*(s² - (s-q)²)/2` (integral from s-q to s)
///
/// Callers enforce `q > 0`, and `s >= q` for sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCurve {
    base_price: Decimal,
    slope: Decimal,
}

impl LinearCurve {
    pub fn new(base_price: Decimal, slope: Decimal) -> Self {
        Self { base_price, slope }
    }

    /// Spot price at supply `s`
    pub fn price_at_supply(&self, supply: Decimal) -> Decimal {
        self.base_price + self.slope * supply
    }

    /// Cost to mint `qty` tokens starting from supply `supply`
    pub fn cost_to_buy(&self, supply: Decimal, qty: Decimal) -> Decimal {
        let upper = supply + qty;
        self.base_price * qty + self.slope * (upper * upper - supply * supply) / Decimal::TWO
    }

    /// Refund for burning `qty` tokens from supply `supply`
    ///
    /// Selling burns from the top of the current supply downward, mirroring
    /// the buy integral with reversed bounds.
    pub fn refund_for_sell(&self, supply: Decimal, qty: Decimal) -> Decimal {
        let lower = supply - qty;
        self.base_price * qty + self.slope * (supply * supply - lower * lower) / Decimal::TWO
    }
}
