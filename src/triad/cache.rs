//! Memoized triad pool addresses
//!
//! Pool addresses never change once derived, so entries are inserted once
//! and never evicted or updated.

use alloy_primitives::Address;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, trace};

use crate::constants::ChainId;

/// Chain plus the canonically sorted token addresses
pub type TriadKey = (ChainId, [Address; 3]);

lazy_static::lazy_static! {
    static ref SHARED_CACHE: TriadAddressCache = TriadAddressCache::new();
}

/// Thread-safe insert-if-absent cache of derived pool addresses
#[derive(Debug, Default)]
pub struct TriadAddressCache {
    entries: RwLock<HashMap<TriadKey, Address>>,
}

impl TriadAddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance used when callers don't bring their own
    pub fn shared() -> &'static TriadAddressCache {
        &SHARED_CACHE
    }

    pub fn get(&self, key: &TriadKey) -> Option<Address> {
        // Entries are never partially written, so a poisoned lock is still readable
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).copied()
    }

    /// Return the cached address, deriving and inserting it on first use.
    ///
    /// If two threads race on the same key, the first insert wins and both
    /// see that value.
    pub fn get_or_insert_with<F>(&self, key: TriadKey, derive: F) -> Address
    where
        F: FnOnce() -> Address,
    {
        if let Some(addr) = self.get(&key) {
            trace!("Triad address cache hit for {:?}", key);
            return addr;
        }

        let derived = derive();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let stored = *entries.entry(key).or_insert(derived);
        debug!("Cached triad address {} on chain {}", stored, key.0.id());
        stored
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
