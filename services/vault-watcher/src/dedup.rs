//! Idempotency gate for chain events
//!
//! The log source delivers at-least-once (reorg replay, subscription
//! restarts, multiple listeners); this gate turns that into at-most-once
//! application. A claim is an atomic test-and-set on `(kind, tx hash)`,
//! never a read followed by a write, which would let two concurrent
//! deliveries of the same transaction both observe "not yet claimed".
//!
//! Once claimed, a key stays claimed even if the downstream mutation
//! fails: a lost event is recoverable, a double-applied balance mutation
//! is not.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::events::EventKind;

/// Injectable ledger of already-applied events
///
/// The in-memory implementation is process-lifetime; a durable
/// implementation strictly strengthens the guarantee without changing
/// this contract.
pub trait ProcessedEvents: Send + Sync {
    /// Atomically claim the key. `true` means newly claimed (proceed),
    /// `false` means already processed (skip).
    fn try_claim(&self, kind: EventKind, tx_hash: &str) -> bool;

    /// Whether the key has been claimed
    fn contains(&self, kind: EventKind, tx_hash: &str) -> bool;

    /// Drop all claims, returning how many were held
    fn clear(&self) -> usize;

    /// Number of claims currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime claim set
#[derive(Debug, Default)]
pub struct MemoryDedup {
    seen: DashMap<(EventKind, String), ()>,
    claimed: AtomicU64,
    duplicates: AtomicU64,
}

impl MemoryDedup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful claims since creation
    pub fn claimed_total(&self) -> u64 {
        self.claimed.load(Ordering::Relaxed)
    }

    /// Total duplicate deliveries rejected since creation
    pub fn duplicates_total(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }
}

impl ProcessedEvents for MemoryDedup {
    fn try_claim(&self, kind: EventKind, tx_hash: &str) -> bool {
        match self.seen.entry((kind, tx_hash.to_string())) {
            Entry::Occupied(_) => {
                self.duplicates.fetch_add(1, Ordering::Relaxed);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(());
                self.claimed.fetch_add(1, Ordering::Relaxed);
                true
            }
        }
    }

    fn contains(&self, kind: EventKind, tx_hash: &str) -> bool {
        self.seen.contains_key(&(kind, tx_hash.to_string()))
    }

    fn clear(&self) -> usize {
        let held = self.seen.len();
        self.seen.clear();
        held
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}
