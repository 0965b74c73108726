//! Content-addressed result cache.
//!
//! Keys are SHA-256 hashes over the extraction config and the document
//! bytes, so a key always identifies the exact (document, config) pair that
//! produced the cached result. Entries expire a fixed time after insertion
//! and the least recently accessed entry is evicted when the cache is full.
//!
//! The map and the recency list live under one mutex. Lookups, inserts and
//! evictions are O(1): the recency list is a doubly linked list threaded
//! through a slot vector by index.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::options::ExtractConfig;
use crate::result::ExtractResult;

/// 32-byte content hash identifying a (document, config) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Compute the cache key for a document under a config.
///
/// The canonical config bytes are length-prefixed so the boundary between
/// config and document is unambiguous. Line endings in the document are
/// normalized (CRLF and lone CR become LF) the same way the tree builder
/// normalizes them, so inputs that parse identically share a key.
#[must_use]
pub fn compute_key(document: &[u8], config: &ExtractConfig) -> CacheKey {
    let config_bytes = config.canonical_bytes();
    let mut hasher = Sha256::new();
    hasher.update((config_bytes.len() as u64).to_le_bytes());
    hasher.update(&config_bytes);
    update_normalized(&mut hasher, document);
    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());
    CacheKey(key)
}

fn update_normalized(hasher: &mut Sha256, bytes: &[u8]) {
    let mut rest = bytes;
    while let Some(pos) = rest.iter().position(|&b| b == b'\r') {
        hasher.update(&rest[..pos]);
        hasher.update(b"\n");
        rest = &rest[pos + 1..];
        if rest.first() == Some(&b'\n') {
            rest = &rest[1..];
        }
    }
    hasher.update(rest);
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
}

struct Slot {
    key: CacheKey,
    value: Arc<ExtractResult>,
    created: Instant,
    last_access: Instant,
    /// Toward the most recently used end.
    prev: Option<usize>,
    /// Toward the least recently used end.
    next: Option<usize>,
}

/// Map plus recency list. `head` is the most recently accessed entry.
#[derive(Default)]
struct Lru {
    map: HashMap<CacheKey, usize>,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Lru {
    fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn unlink(&mut self, index: usize) {
        let Some((prev, next)) = self.slot(index).map(|s| (s.prev, s.next)) else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(slot) = self.slot_mut(p) {
                    slot.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(slot) = self.slot_mut(n) {
                    slot.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(slot) = self.slot_mut(index) {
            slot.prev = None;
            slot.next = None;
        }
    }

    fn push_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slot_mut(index) {
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(slot) = self.slot_mut(h) {
                slot.prev = Some(index);
            }
        }
        self.head = Some(index);
        if self.tail.is_none() {
            self.tail = Some(index);
        }
    }

    fn touch(&mut self, index: usize, now: Instant) {
        if self.head != Some(index) {
            self.unlink(index);
            self.push_front(index);
        }
        if let Some(slot) = self.slot_mut(index) {
            slot.last_access = now;
        }
    }

    fn insert(&mut self, key: CacheKey, value: Arc<ExtractResult>, now: Instant) {
        let slot = Slot { key, value, created: now, last_access: now, prev: None, next: None };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.map.insert(key, index);
        self.push_front(index);
    }

    fn remove(&mut self, index: usize) -> Option<Slot> {
        self.unlink(index);
        let slot = self.slots.get_mut(index)?.take()?;
        self.map.remove(&slot.key);
        self.free.push(index);
        Some(slot)
    }

    fn pop_least_recent(&mut self) -> Option<Slot> {
        let tail = self.tail?;
        self.remove(tail)
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Thread-safe LRU + TTL cache of extraction results.
pub struct ResultCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Lru>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl ResultCache {
    /// A cache holding at most `capacity` entries, each valid for `ttl`.
    ///
    /// A capacity of zero disables storage; every lookup misses.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            inner: Mutex::new(Lru::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_expired(&self, created: Instant, now: Instant) -> bool {
        now.saturating_duration_since(created) > self.ttl
    }

    /// Look up a result, refreshing its recency on a hit.
    pub fn get(&self, key: &CacheKey) -> Option<ExtractResult> {
        if self.capacity == 0 {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let now = Instant::now();
        let value = {
            let mut lru = self.inner.lock();
            let found = lru.map.get(key).copied();
            match found {
                None => None,
                Some(index) => {
                    let created = lru.slot(index).map_or(now, |s| s.created);
                    if self.is_expired(created, now) {
                        lru.remove(index);
                        self.expirations.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(key = %key, "cache entry expired");
                        None
                    } else {
                        lru.touch(index, now);
                        lru.slot(index).map(|s| Arc::clone(&s.value))
                    }
                }
            }
        };

        if let Some(value) = value {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some((*value).clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert or overwrite a result, evicting the least recently accessed
    /// entry when full.
    pub fn put(&self, key: CacheKey, value: ExtractResult) {
        if self.capacity == 0 {
            return;
        }
        let value = Arc::new(value);
        let now = Instant::now();
        let mut lru = self.inner.lock();

        if let Some(index) = lru.map.get(&key).copied() {
            if let Some(slot) = lru.slot_mut(index) {
                slot.value = value;
                slot.created = now;
            }
            lru.touch(index, now);
            return;
        }

        while lru.len() >= self.capacity {
            let Some(evicted) = lru.pop_least_recent() else {
                break;
            };
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                key = %evicted.key,
                idle_ms = u64::try_from(now.saturating_duration_since(evicted.last_access).as_millis()).unwrap_or(u64::MAX),
                "cache entry evicted"
            );
        }
        lru.insert(key, value, now);
    }

    /// Physically drop every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut lru = self.inner.lock();
        let expired: Vec<usize> = lru
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().filter(|s| self.is_expired(s.created, now)).map(|_| i))
            .collect();
        for &index in &expired {
            lru.remove(index);
        }
        self.expirations.fetch_add(expired.len() as u64, Ordering::Relaxed);
        expired.len()
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        let lru = self.inner.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: lru.len(),
        }
    }

    /// Zero all counters.
    pub fn reset_stats(&self) {
        let _lru = self.inner.lock();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
