//! Unique identifier types for venue entities
//!
//! Trade identifiers use UUID v7 for time-sortable ordering, enabling
//! efficient chronological queries. Asset identifiers are opaque strings
//! assigned by the registration flow outside this system.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a tradable asset
///
/// Assigned externally when the asset is registered; the venue only ever
/// consumes it as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new AssetId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for an executed trade
///
/// Uses UUID v7 for time-based sorting across the trade ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Create a new TradeId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_creation() {
        let asset = AssetId::new("ip-42");
        assert_eq!(asset.as_str(), "ip-42");
        assert_eq!(asset.to_string(), "ip-42");
    }

    #[test]
    fn test_asset_id_serialization() {
        let asset = AssetId::new("ip-42");
        let json = serde_json::to_string(&asset).unwrap();
        assert_eq!(json, "\"ip-42\"");

        let deserialized: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, deserialized);
    }

    #[test]
    fn test_trade_id_creation() {
        let id1 = TradeId::new();
        let id2 = TradeId::new();
        assert_ne!(id1, id2, "TradeIds should be unique");
    }

    #[test]
    fn test_trade_id_serialization() {
        let id = TradeId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TradeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
