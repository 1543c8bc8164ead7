//! Room membership registry
//!
//! Tracks which connection has joined which asset room. A connection may
//! join any number of rooms; disconnect clears its memberships in one
//! call. Membership is bookkeeping only; message delivery is the hub's
//! broadcast channels.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use types::ids::AssetId;

/// Unique connection identifier
pub type ConnectionId = u64;

/// Connection/room membership registry
#[derive(Debug, Default)]
pub struct RoomRegistry {
    next_id: AtomicU64,
    members: DashMap<ConnectionId, BTreeSet<AssetId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return its ID
    pub fn register(&self) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.members.insert(id, BTreeSet::new());
        id
    }

    /// Join a room. Returns false if the connection was not newly added
    /// (unknown connection or already a member).
    pub fn join(&self, conn: ConnectionId, asset: &AssetId) -> bool {
        match self.members.get_mut(&conn) {
            Some(mut rooms) => rooms.insert(asset.clone()),
            None => false,
        }
    }

    /// Leave a room. Returns false if the connection was not a member.
    pub fn leave(&self, conn: ConnectionId, asset: &AssetId) -> bool {
        match self.members.get_mut(&conn) {
            Some(mut rooms) => rooms.remove(asset),
            None => false,
        }
    }

    /// Whether the connection is currently in the room
    pub fn is_member(&self, conn: ConnectionId, asset: &AssetId) -> bool {
        self.members
            .get(&conn)
            .map(|rooms| rooms.contains(asset))
            .unwrap_or(false)
    }

    /// Rooms the connection has joined, in deterministic order
    pub fn joined_rooms(&self, conn: ConnectionId) -> Vec<AssetId> {
        self.members
            .get(&conn)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove the connection, returning the rooms it was in
    pub fn disconnect(&self, conn: ConnectionId) -> Vec<AssetId> {
        self.members
            .remove(&conn)
            .map(|(_, rooms)| rooms.into_iter().collect())
            .unwrap_or_default()
    }

    /// Number of connections currently in the given room
    pub fn room_size(&self, asset: &AssetId) -> usize {
        self.members
            .iter()
            .filter(|entry| entry.value().contains(asset))
            .count()
    }

    /// Number of registered connections
    pub fn connection_count(&self) -> usize {
        self.members.len()
    }
}
