//! ChainMap: separate-chaining map from `String` keys to values.
//!
//! Entries live in a `SlotMap` arena. The bucket array holds the head of
//! each chain; every entry links to the next entry of its chain. New
//! entries are prepended to their chain.

use crate::string_hash::{bucket_index, StringHash};
use core::fmt;
use core::iter::FusedIterator;
use slotmap::{new_key_type, SlotMap};

/// Bucket count used by `ChainMapConfig::default()`.
pub const DEFAULT_TABLE_SIZE: usize = 16;

/// Load factor at or above which an insert grows the table.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.75;

new_key_type! {
    struct EntryKey;
}

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    // Raw hash; the bucket index is derived from it for the current size.
    hash: i64,
    next: Option<EntryKey>,
}

/// Invalid construction parameters for a [`ChainMap`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum MapError {
    #[error("table size must be positive")]
    ZeroTableSize,
    #[error("load factor threshold must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),
}

/// Construction-time settings of a [`ChainMap`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChainMapConfig {
    pub table_size: usize,
    pub load_factor_threshold: f64,
    pub hash: StringHash,
}

impl Default for ChainMapConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
            hash: StringHash::default(),
        }
    }
}

impl ChainMapConfig {
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    pub fn with_hash(mut self, hash: StringHash) -> Self {
        self.hash = hash;
        self
    }

    fn validate(&self) -> Result<(), MapError> {
        if self.table_size == 0 {
            return Err(MapError::ZeroTableSize);
        }
        let t = self.load_factor_threshold;
        if !t.is_finite() || t <= 0.0 {
            return Err(MapError::InvalidLoadFactor(t));
        }
        Ok(())
    }
}

/// Hash map with string keys, chained buckets, and doubling growth.
pub struct ChainMap<V> {
    heads: Vec<Option<EntryKey>>,
    entries: SlotMap<EntryKey, Entry<V>>,
    config: ChainMapConfig,
}

impl<V> ChainMap<V> {
    /// Creates a map with `table_size` empty buckets and default settings
    /// otherwise.
    pub fn new(table_size: usize) -> Result<Self, MapError> {
        Self::with_config(ChainMapConfig::default().with_table_size(table_size))
    }

    pub fn with_config(config: ChainMapConfig) -> Result<Self, MapError> {
        config.validate()?;
        log::trace!(
            "creating chain map: {} buckets, threshold {}, {:?} hash",
            config.table_size,
            config.load_factor_threshold,
            config.hash
        );
        Ok(Self {
            heads: vec![None; config.table_size],
            entries: SlotMap::with_key(),
            config,
        })
    }

    pub fn config(&self) -> ChainMapConfig {
        ChainMapConfig {
            table_size: self.heads.len(),
            ..self.config
        }
    }

    pub fn hash_function(&self) -> StringHash {
        self.config.hash
    }

    pub fn load_factor_threshold(&self) -> f64 {
        self.config.load_factor_threshold
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    pub fn empty_buckets(&self) -> usize {
        self.heads.iter().filter(|h| h.is_none()).count()
    }

    /// Entries per bucket. Exceeds 1.0 once chains average more than one
    /// entry.
    pub fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Inserts `key -> value`.
    ///
    /// If the key is present its value is replaced in place and the previous
    /// value is returned. Otherwise a new entry is prepended to its chain,
    /// and the table doubles if the load factor reached the threshold.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let hash = self.config.hash.hash(&key);
        let bucket = bucket_index(hash, self.heads.len());
        if let Some(k) = self.find_in_chain(bucket, &key) {
            return Some(core::mem::replace(&mut self.entries[k].value, value));
        }

        let next = self.heads[bucket];
        let k = self.entries.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.heads[bucket] = Some(k);

        if self.table_load() >= self.config.load_factor_threshold {
            self.grow();
        }
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|k| &self.entries[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        Some(&mut self.entries[k].value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Unlinks and returns the value for `key`. An absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let bucket = bucket_index(self.config.hash.hash(key), self.heads.len());
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let entry = &self.entries[k];
            let next = entry.next;
            if entry.key == key {
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.entries[p].next = next,
                }
                return self.entries.remove(k).map(|e| e.value);
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    /// Drops every entry and keeps the current bucket count.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.heads.iter_mut().for_each(|h| *h = None);
    }

    /// Length of each bucket's chain, in bucket order.
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.heads.iter().map(move |&head| self.chain(head).count())
    }

    /// Entries in bucket order, each chain from head to tail.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            map: self,
            bucket: 0,
            cur: None,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Mutable access to every value exactly once.
    ///
    /// Values come in arena order, which differs from the bucket order of
    /// [`iter`](Self::iter), [`keys`](Self::keys) and [`values`](Self::values).
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.entries.values_mut().map(|e| &mut e.value)
    }

    fn find(&self, key: &str) -> Option<EntryKey> {
        let bucket = bucket_index(self.config.hash.hash(key), self.heads.len());
        self.find_in_chain(bucket, key)
    }

    fn find_in_chain(&self, bucket: usize, key: &str) -> Option<EntryKey> {
        self.chain(self.heads[bucket])
            .find(|&k| self.entries[k].key == key)
    }

    fn chain(&self, head: Option<EntryKey>) -> impl Iterator<Item = EntryKey> + '_ {
        core::iter::successors(head, move |&k| self.entries[k].next)
    }

    /// Doubles the bucket count and rehashes every entry into the new table.
    ///
    /// The new heads and links are computed first; nothing in the map
    /// changes until they are complete. A table whose doubled size would
    /// overflow `usize` stays as it is.
    fn grow(&mut self) {
        let Some(new_size) = self.heads.len().checked_mul(2) else {
            log::debug!("chain map at {} buckets cannot grow", self.heads.len());
            return;
        };
        log::debug!(
            "growing chain map: {} entries, {} -> {} buckets",
            self.len(),
            self.heads.len(),
            new_size
        );
        let mut heads: Vec<Option<EntryKey>> = vec![None; new_size];
        let mut links = Vec::with_capacity(self.entries.len());
        for (k, entry) in self.entries.iter() {
            let bucket = bucket_index(entry.hash, new_size);
            links.push((k, heads[bucket]));
            heads[bucket] = Some(k);
        }
        for (k, next) in links {
            self.entries[k].next = next;
        }
        self.heads = heads;
    }

    /// Checks chain membership, bucket placement, and uniqueness of keys.
    #[cfg(test)]
    pub(crate) fn chains_are_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for (bucket, &head) in self.heads.iter().enumerate() {
            for k in self.chain(head) {
                let entry = &self.entries[k];
                if bucket_index(entry.hash, self.heads.len()) != bucket {
                    return false;
                }
                if entry.hash != self.config.hash.hash(&entry.key) {
                    return false;
                }
                if !seen.insert(entry.key.as_str()) {
                    return false;
                }
                if seen.len() > self.entries.len() {
                    return false;
                }
            }
        }
        seen.len() == self.entries.len()
    }
}

impl<V> Default for ChainMap<V> {
    fn default() -> Self {
        match Self::with_config(ChainMapConfig::default()) {
            Ok(map) => map,
            Err(e) => unreachable!("default chain map config is valid: {e}"),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ChainMap<V> {
    /// Lists each non-empty bucket with its chain, head first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (bucket, &head) in self.heads.iter().enumerate() {
            if head.is_none() {
                continue;
            }
            let chain: Vec<(&str, &V)> = self
                .chain(head)
                .map(|k| {
                    let e = &self.entries[k];
                    (e.key.as_str(), &e.value)
                })
                .collect();
            m.entry(&bucket, &chain);
        }
        m.finish()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for ChainMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Iterator over `(key, value)` pairs of a [`ChainMap`] in bucket order.
pub struct Iter<'a, V> {
    map: &'a ChainMap<V>,
    bucket: usize,
    cur: Option<EntryKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cur.is_none() {
            if self.bucket >= self.map.heads.len() {
                return None;
            }
            self.cur = self.map.heads[self.bucket];
            self.bucket += 1;
        }
        let k = self.cur?;
        let entry = &self.map.entries[k];
        self.cur = entry.next;
        self.remaining -= 1;
        Some((entry.key.as_str(), &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}
impl<'a, V> FusedIterator for Iter<'a, V> {}

impl<'a, V> IntoIterator for &'a ChainMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
