use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::engine::simulate;
use super::error::CacheError;
use super::types::{FinancialInputs, WealthSimulationResult};

pub const DEFAULT_CAPACITY: usize = 100;

/// SHA-256 over the key-sorted JSON form of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_inputs(inputs: &FinancialInputs) -> Result<Self, CacheError> {
        Self::from_value(serde_json::to_value(inputs)?)
    }

    pub fn from_value(value: Value) -> Result<Self, CacheError> {
        let json = serde_json::to_string(&canonicalize(value))?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        // `-0.0` serializes with its sign; fold it into `0.0`.
        Value::Number(n) if n.is_f64() && n.as_f64() == Some(0.0) => Value::from(0.0),
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<WealthSimulationResult>,
    pub created_at: Instant,
    pub last_accessed: Instant,
    pub access_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Result of `ResultCache::get_or_simulate`.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub result: Arc<WealthSimulationResult>,
    pub cached: bool,
}

#[derive(Debug)]
struct Node {
    key: CacheKey,
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded LRU of simulation results.
///
/// Entries live in a slab of slots linked into a recency list (head is most
/// recent, tail is next to evict); `index` maps keys to slots so lookup,
/// promotion and eviction are all O(1).
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    index: HashMap<CacheKey, usize>,
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(
        &mut self,
        inputs: &FinancialInputs,
    ) -> Result<Option<Arc<WealthSimulationResult>>, CacheError> {
        let key = CacheKey::from_inputs(inputs)?;
        Ok(self.get_by_key(&key))
    }

    pub fn get_by_key(&mut self, key: &CacheKey) -> Option<Arc<WealthSimulationResult>> {
        let Some(&slot) = self.index.get(key) else {
            self.misses += 1;
            return None;
        };
        self.hits += 1;
        self.promote(slot);
        let node = self.slots[slot].as_mut()?;
        node.entry.last_accessed = Instant::now();
        node.entry.access_count += 1;
        Some(Arc::clone(&node.entry.result))
    }

    /// Entry metadata without touching recency or counters.
    pub fn peek(&self, inputs: &FinancialInputs) -> Result<Option<&CacheEntry>, CacheError> {
        let key = CacheKey::from_inputs(inputs)?;
        Ok(self
            .index
            .get(&key)
            .and_then(|&slot| self.slots[slot].as_ref())
            .map(|node| &node.entry))
    }

    pub fn put(
        &mut self,
        inputs: &FinancialInputs,
        result: WealthSimulationResult,
    ) -> Result<Arc<WealthSimulationResult>, CacheError> {
        let key = CacheKey::from_inputs(inputs)?;
        Ok(self.insert(key, result))
    }

    pub fn insert(&mut self, key: CacheKey, result: WealthSimulationResult) -> Arc<WealthSimulationResult> {
        let result = Arc::new(result);
        let now = Instant::now();
        let entry = CacheEntry {
            result: Arc::clone(&result),
            created_at: now,
            last_accessed: now,
            access_count: 0,
        };

        if let Some(&slot) = self.index.get(&key) {
            if let Some(node) = self.slots[slot].as_mut() {
                node.entry = entry;
            }
            self.promote(slot);
            return result;
        }

        if self.index.len() >= self.capacity {
            if let Some(evicted) = self.evict_lru() {
                tracing::debug!(key = evicted.as_str(), "evicted least recently used result");
            }
        }

        let node = Node {
            key: key.clone(),
            entry,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.push_front(slot);
        result
    }

    /// Cached result for `inputs`, or a fresh simulation that is then stored.
    pub fn get_or_simulate(&mut self, inputs: &FinancialInputs) -> Result<CacheLookup, CacheError> {
        let key = CacheKey::from_inputs(inputs)?;
        if let Some(result) = self.get_by_key(&key) {
            return Ok(CacheLookup {
                result,
                cached: true,
            });
        }
        let result = simulate(inputs)?;
        Ok(CacheLookup {
            result: self.insert(key, result),
            cached: false,
        })
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f64 / lookups as f64
            },
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.slots[slot].as_ref().map(|n| (n.prev, n.next)) else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(node) = self.slots[h].as_mut() {
                node.prev = Some(slot);
            }
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn evict_lru(&mut self) -> Option<CacheKey> {
        let slot = self.tail?;
        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.index.remove(&node.key);
        Some(node.key)
    }
}

/// Process-wide cache shared by the HTTP handlers.
pub fn shared_cache() -> Arc<Mutex<ResultCache>> {
    static SHARED: OnceLock<Arc<Mutex<ResultCache>>> = OnceLock::new();
    Arc::clone(SHARED.get_or_init(|| Arc::new(Mutex::new(ResultCache::new()))))
}

/// Locks a cache, recovering the guard if a previous holder panicked.
pub fn lock_cache(cache: &Mutex<ResultCache>) -> MutexGuard<'_, ResultCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
