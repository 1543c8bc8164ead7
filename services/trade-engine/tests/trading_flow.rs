//! End-to-end trading flow over a fresh asset
//!
//! Walks the reference scenario: seed, buy 10, sell 5, reject an oversell,
//! checking exact curve values and ledger/candle consistency at each step.

use rust_decimal::Decimal;
use trade_engine::curve::LinearCurve;
use trade_engine::TradeEngine;
use types::errors::TradeError;
use types::ids::AssetId;
use types::trade::Side;

#[tokio::test]
async fn full_buy_sell_cycle() {
    let engine = TradeEngine::in_memory();
    let asset = AssetId::new("ip-42");

    // Fresh asset seeds at supply 10, price 0.101
    let seeded = engine.ensure_price(&asset).await.unwrap();
    assert_eq!(seeded.supply, Decimal::from(10));
    assert_eq!(seeded.current_price, Decimal::new(101, 3));
    assert_eq!(seeded.market_cap(), Decimal::ZERO);

    // Buy 10: cost 1.51, price moves to 0.201
    let buy = engine
        .buy(&asset, Decimal::from(10), Some("0xfeed".into()))
        .await
        .unwrap();
    assert_eq!(buy.total, Decimal::new(151, 2));
    assert_eq!(buy.state.supply, Decimal::from(20));
    assert_eq!(buy.state.current_price, Decimal::new(201, 3));
    assert_eq!(buy.trade.side, Side::Buy);
    assert_eq!(buy.trade.amount_tokens, Decimal::from(10));
    assert_eq!(buy.trade.price_per_token, Decimal::new(201, 3));
    assert_eq!(buy.candle.open, Decimal::new(101, 3));
    assert_eq!(buy.candle.close, Decimal::new(201, 3));

    // Sell 5: price falls to 0.151, reserve drops by the exact refund
    let sell = engine.sell(&asset, Decimal::from(5), None).await.unwrap();
    let curve = LinearCurve::new(Decimal::new(1, 3), Decimal::new(1, 2));
    let refund = curve.refund_for_sell(Decimal::from(20), Decimal::from(5));
    assert_eq!(sell.state.supply, Decimal::from(15));
    assert_eq!(sell.state.current_price, Decimal::new(151, 3));
    assert_eq!(sell.state.reserve, Decimal::new(151, 2) - refund);

    // Oversell is rejected with no side effects
    let err = engine
        .sell(&asset, Decimal::from(999), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::InsufficientSupply { .. }));

    let trades = engine.get_recent_trades(&asset, 10).await.unwrap();
    assert_eq!(trades.len(), 2);
    // Most-recent-first
    assert_eq!(trades[0].side, Side::Sell);
    assert_eq!(trades[1].side, Side::Buy);

    let candles = engine.get_candlesticks(&asset, 10).await.unwrap();
    assert_eq!(candles.len(), 2);
    // Oldest-first, close of each candle equals the trade's committed price
    assert_eq!(candles[0].close, Decimal::new(201, 3));
    assert_eq!(candles[1].close, Decimal::new(151, 3));

    let state = engine.ensure_price(&asset).await.unwrap();
    assert!(state.is_consistent());
}
