//! Error taxonomy for the trading venue
//!
//! Comprehensive error types using thiserror

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by trade application
///
/// `InvalidAmount` and `InsufficientSupply` are caller errors, surfaced
/// verbatim and never retried. Store failures propagate uncaught; the
/// engine performs no silent retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply {
        requested: Decimal,
        available: Decimal,
    },

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Durable-store I/O failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_display() {
        let err = TradeError::InvalidAmount(Decimal::ZERO);
        assert_eq!(err.to_string(), "invalid amount: 0");
    }

    #[test]
    fn test_insufficient_supply_display() {
        let err = TradeError::InsufficientSupply {
            requested: Decimal::from(999),
            available: Decimal::from(15),
        };
        assert!(err.to_string().contains("999"));
        assert!(err.to_string().contains("15"));
    }

    #[test]
    fn test_trade_error_from_store_error() {
        let store_err = StoreError::Unavailable("timeout".to_string());
        let err: TradeError = store_err.into();
        assert!(matches!(err, TradeError::Store(_)));
    }
}
