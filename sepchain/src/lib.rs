#![deny(clippy::disallowed_method)]

//! A string-to-string hash table over a fixed bucket array with separate
//! chaining, indexed by the classic rotating hash.
//!
//! Not synchronized; callers wanting concurrent mutation must wrap the
//! table in their own lock.

use std::num::NonZeroUsize;

use thiserror::Error;

pub mod hash;

/// Bucket count used by [`Table::new`], carried over from the original
/// rotating-hash tables.
pub const DEFAULT_CAPACITY: usize = 1234;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("no entry found for key {0:?}")]
    KeyNotFound(String),
}

// Chain node. Links are indices into the entry arena; `prev` is
// navigational only and never owns anything.
#[derive(Clone, Debug)]
struct Entry {
    key: String,
    value: String,
    next: Option<usize>,
    prev: Option<usize>,
}

/// Fixed-capacity bucket array with chained collision resolution.
///
/// Chains live in a flat arena of entries; each bucket slot holds the
/// index of its chain head. Capacity never changes after construction,
/// so load factor is entirely the caller's business.
pub struct Table {
    slots: Box<[Option<usize>]>,
    entries: Vec<Option<Entry>>,
    free: Vec<usize>,
    items: usize,
}

impl Table {
    pub fn new() -> Self {
        Table::with_capacity(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap())
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let mut slots = Vec::with_capacity(capacity.get());
        slots.resize(capacity.get(), None);
        Self {
            slots: slots.into_boxed_slice(),
            entries: Vec::new(),
            free: Vec::new(),
            items: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Bucket index the rotating hash assigns to `key`. Always in
    /// `0..capacity()`, and never 256 or above regardless of capacity,
    /// since the hash itself is 8 bits wide.
    pub fn bucket(&self, key: &str) -> usize {
        usize::from(hash::rotating_hash(key.as_bytes())) % self.slots.len()
    }

    pub fn get(&self, key: &str) -> Result<&str, TableError> {
        let mut cursor = self.slots[self.bucket(key)];
        while let Some(i) = cursor {
            let entry = self.entry(i);
            if entry.key == key {
                return Ok(&entry.value);
            }
            cursor = entry.next;
        }
        Err(TableError::KeyNotFound(key.to_owned()))
    }

    /// Idempotent upsert. Overwrites in place when the key is already
    /// chained, otherwise appends a new entry at the chain tail.
    pub fn set(&mut self, key: String, value: String) {
        let bucket = self.bucket(&key);
        match self.slots[bucket] {
            None => {
                let head = self.alloc(Entry {
                    key,
                    value,
                    next: None,
                    prev: None,
                });
                self.slots[bucket] = Some(head);
                self.items += 1;
            }
            Some(head) => {
                let mut i = head;
                loop {
                    if self.entry(i).key == key {
                        self.entry_mut(i).value = value;
                        return;
                    }
                    match self.entry(i).next {
                        Some(next) => i = next,
                        None => break,
                    }
                }
                let new = self.alloc(Entry {
                    key,
                    value,
                    next: None,
                    prev: Some(i),
                });
                self.entry_mut(i).next = Some(new);
                self.items += 1;
            }
        }
    }

    pub fn delete(&mut self, key: &str) -> Result<(), TableError> {
        let bucket = self.bucket(key);
        let mut cursor = self.slots[bucket];
        while let Some(i) = cursor {
            if self.entry(i).key == key {
                self.unlink(bucket, i);
                return Ok(());
            }
            cursor = self.entry(i).next;
        }
        Err(TableError::KeyNotFound(key.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.as_ref().map(|e| (e.key.as_str(), e.value.as_str())))
    }

    pub fn bucket_len(&self, bucket: usize) -> usize {
        let mut len = 0;
        let mut cursor = self.slots[bucket];
        while let Some(i) = cursor {
            len += 1;
            cursor = self.entry(i).next;
        }
        len
    }

    /// Occupancy of every bucket in index order, suitable as input to a
    /// distribution diagnostic.
    pub fn chain_lengths(&self) -> Vec<usize> {
        (0..self.slots.len()).map(|b| self.bucket_len(b)).collect()
    }

    pub fn invariants(&self) -> bool {
        let mut seen = vec![false; self.entries.len()];
        let mut reachable = 0;
        for (bucket, &head) in self.slots.iter().enumerate() {
            let mut prev = None;
            let mut cursor = head;
            let mut keys: Vec<&str> = Vec::new();
            while let Some(i) = cursor {
                let entry = match self.entries.get(i).and_then(Option::as_ref) {
                    Some(entry) => entry,
                    None => return false,
                };
                // seen[] also catches cycles, which would otherwise hang
                // the traversal
                if seen[i]
                    || entry.prev != prev
                    || self.bucket(&entry.key) != bucket
                    || keys.iter().any(|&k| k == entry.key)
                {
                    return false;
                }
                seen[i] = true;
                keys.push(entry.key.as_str());
                reachable += 1;
                prev = Some(i);
                cursor = entry.next;
            }
        }
        let occupied = self.entries.iter().filter(|e| e.is_some()).count();
        reachable == self.items
            && occupied == self.items
            && self.free.len() == self.entries.len() - occupied
            && self
                .free
                .iter()
                .all(|&i| self.entries.get(i).map_or(false, Option::is_none))
    }

    fn entry(&self, i: usize) -> &Entry {
        self.entries[i].as_ref().unwrap()
    }

    fn entry_mut(&mut self, i: usize) -> &mut Entry {
        self.entries[i].as_mut().unwrap()
    }

    fn alloc(&mut self, entry: Entry) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.entries[i] = Some(entry);
                i
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        }
    }

    fn unlink(&mut self, bucket: usize, i: usize) {
        let entry = self.entries[i].take().unwrap();
        match entry.prev {
            None => {
                // head removal; the new head must not keep a back-reference
                // to the removed entry
                self.slots[bucket] = entry.next;
                if let Some(next) = entry.next {
                    self.entry_mut(next).prev = None;
                }
            }
            Some(prev) => {
                self.entry_mut(prev).next = entry.next;
                if let Some(next) = entry.next {
                    self.entry_mut(next).prev = Some(prev);
                }
            }
        }
        self.free.push(i);
        self.items -= 1;
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}
