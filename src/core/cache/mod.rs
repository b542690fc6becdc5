// src/core/cache/mod.rs

//! The response cache: memoizes successful envelopes by request identity
//! with time-based expiry.

pub mod persistence;

use crate::core::envelope::Envelope;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A single cached envelope. `timestamp` is epoch seconds at insertion,
/// which is also the unit the snapshot file uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Envelope,
    pub timestamp: f64,
}

/// A concurrent key→envelope store with lazy, lookup-time expiry. Only
/// envelopes whose `error` field is clear are ever stored; that policy is
/// enforced by the caller-side orchestration, not here.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    expires: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    /// Number of `put`s since the last snapshot flush.
    dirty: AtomicU64,
}

impl ResponseCache {
    pub fn new(expires: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            expires,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            dirty: AtomicU64::new(0),
        }
    }

    fn now() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }

    fn is_fresh(&self, timestamp: f64, now: f64) -> bool {
        now - timestamp < self.expires.as_secs_f64()
    }

    /// Returns the cached envelope if the key exists and is still fresh.
    /// An expired entry reports a miss and is evicted on the spot.
    pub fn get(&self, key: &str) -> Option<Envelope> {
        let now = Self::now();
        let cached = self
            .entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.timestamp));

        match cached {
            Some((value, timestamp)) if self.is_fresh(timestamp, now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Mirrors `get`'s freshness check without touching the hit counters or
    /// returning the value.
    pub fn contains(&self, key: &str) -> bool {
        let now = Self::now();
        let timestamp = self.entries.get(key).map(|entry| entry.timestamp);

        match timestamp {
            Some(timestamp) if self.is_fresh(timestamp, now) => true,
            Some(_) => {
                self.entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Stores an envelope, overwriting unconditionally and resetting the
    /// entry's timestamp.
    pub fn put(&self, key: impl Into<String>, value: Envelope) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                timestamp: Self::now(),
            },
        );
        self.dirty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn expires(&self) -> Duration {
        self.expires
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Takes the dirty counter, resetting it to zero. Used by the snapshot
    /// task to decide whether a flush is needed.
    pub fn take_dirty(&self) -> u64 {
        self.dirty.swap(0, Ordering::Relaxed)
    }

    /// A point-in-time copy of every entry, ordered by key so snapshots are
    /// stable.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, CacheEntry> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Restores entries wholesale, as loaded from a snapshot. Stale entries
    /// are accepted; lookup-time expiry weeds them out.
    pub(crate) fn restore(&self, entries: BTreeMap<String, CacheEntry>) {
        for (key, entry) in entries {
            self.entries.insert(key, entry);
        }
    }
}
