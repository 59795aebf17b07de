//! FastHashTable: bucket array, bag arena, salt and statistics.

use crate::bag::{Bag, BagKey, Bags, Slot, EMPTY};
use crate::builder::Builder;
use crate::bucket::{Bucket, Probe, SlotRef};
use crate::error::InsertError;
use crate::mix::bucket_index;
use crate::salt::{OsSalt, SaltSource};
use core::fmt;
use slotmap::SlotMap;

/// Counters describing the table's shape.
///
/// `nodes` and the per-bucket load counters only ever grow between resizes:
/// removals leave them alone, so after heavy churn they overstate density.
/// `fill`, `max_bags` and `max_bucket_load` are recomputed exactly on resize.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Successful inserts over the table's lifetime.
    pub nodes: usize,
    /// Buckets seen to go from empty to non-empty.
    pub fill: usize,
    /// Longest bag chain seen.
    pub max_bags: usize,
    /// Highest per-bucket insert count seen.
    pub max_bucket_load: usize,
    /// Number of doublings so far.
    pub resizes: usize,
    /// Current bucket count.
    pub buckets: usize,
    /// Bags allocated in the current bucket array.
    pub bags: usize,
}

/// Hash table keyed by caller-computed, non-zero 64-bit hashes.
///
/// The table never hashes keys itself and compares hashes for equality only,
/// so the caller's hash must make distinct keys collide with negligible
/// probability.
pub struct FastHashTable<V, S = OsSalt> {
    buckets: Box<[Bucket]>,
    bags: Bags<V>,
    salt: u64,
    salts: S,
    fill_percent: usize,
    len: usize,
    stats: Stats,
}

impl<V> FastHashTable<V> {
    /// Table with 1024 buckets and an OS-random salt.
    pub fn new() -> Self {
        Builder::new().build()
    }

    /// Table with `2^log2` buckets; `0` selects the default of 1024.
    ///
    /// # Panics
    /// If `2^log2` does not fit in `usize`.
    pub fn with_log2(log2: u32) -> Self {
        Builder::new().log2_buckets(log2).build()
    }
}

impl<V> Default for FastHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S: SaltSource> FastHashTable<V, S> {
    pub(crate) fn from_parts(log2: u32, fill_percent: usize, mut salts: S) -> Self {
        assert!(
            log2 < usize::BITS,
            "bucket count 2^{log2} does not fit in usize"
        );
        let salt = salts.next_salt();
        Self {
            buckets: vec![Bucket::default(); 1usize << log2].into_boxed_slice(),
            bags: SlotMap::with_key(),
            salt,
            salts,
            fill_percent,
            len: 0,
            stats: Stats::default(),
        }
    }

    #[inline]
    fn index_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.buckets.len(), self.salt)
    }

    #[inline]
    fn locate(&self, hash: u64) -> Option<SlotRef> {
        if hash == EMPTY {
            return None;
        }
        self.buckets[self.index_of(hash)].locate(&self.bags, hash)
    }

    /// Live entries.
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Salt of the current bucket-array generation.
    pub fn salt(&self) -> u64 {
        self.salt
    }

    pub fn fill_percent(&self) -> usize {
        self.fill_percent
    }

    pub fn stats(&self) -> Stats {
        Stats {
            buckets: self.buckets.len(),
            bags: self.bags.len(),
            ..self.stats
        }
    }

    /// Insert `value` under `hash` unless the hash is already present.
    ///
    /// On `Err` the table is unchanged. May allocate a bag and may double the
    /// bucket array.
    pub fn insert(&mut self, hash: u64, value: V) -> Result<(), InsertError> {
        self.insert_with(hash, || value)
    }

    /// Like [`insert`](Self::insert), but `default` runs only once the hash
    /// is known to be absent.
    pub fn insert_with<F>(&mut self, hash: u64, default: F) -> Result<(), InsertError>
    where
        F: FnOnce() -> V,
    {
        if hash == EMPTY {
            return Err(InsertError::ZeroHash);
        }
        let mut i = self.index_of(hash);
        let at = match self.buckets[i].probe(&self.bags, hash) {
            Probe::Present => return Err(InsertError::DuplicateHash),
            Probe::Vacant(at) => at,
        };
        self.buckets[i].place(&mut self.bags, at, hash, default());
        self.len += 1;
        self.stats.nodes += 1;

        // A bucket's first insert is the cheap proxy for "one more non-empty
        // bucket"; only then is the fill ratio worth checking.
        if self.buckets[i].inserts == 1 {
            self.stats.fill += 1;
            if self.stats.fill * 100 / (self.buckets.len() + 1) > self.fill_percent {
                self.stats.resizes += 1;
                self.resize();
                i = self.index_of(hash);
            }
        }

        let b = &self.buckets[i];
        self.stats.max_bags = self.stats.max_bags.max(b.bags);
        self.stats.max_bucket_load = self.stats.max_bucket_load.max(b.inserts);
        Ok(())
    }

    pub fn find(&self, hash: u64) -> Option<&V> {
        self.locate(hash)?.get(&self.bags)
    }

    pub fn get_mut(&mut self, hash: u64) -> Option<&mut V> {
        self.locate(hash)?.get_mut(&mut self.bags)
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.locate(hash).is_some()
    }

    /// Remove and return the value stored under `hash`.
    ///
    /// The slot becomes a tombstone for later inserts into the same bucket.
    /// Bags are not released and the bucket's insert counter is not lowered.
    pub fn remove(&mut self, hash: u64) -> Option<V> {
        let v = self.locate(hash)?.take(&mut self.bags)?;
        self.len -= 1;
        Some(v)
    }

    /// Double the bucket array and rehash every live entry under a new salt.
    fn resize(&mut self) {
        let n = self.buckets.len() << 1;
        let salt = self.salts.next_salt();
        let mut buckets = vec![Bucket::default(); n].into_boxed_slice();
        let mut bags: Bags<V> = SlotMap::with_capacity_and_key(self.bags.len());
        let mut old_bags = core::mem::take(&mut self.bags);
        let (mut fill, mut max_bags, mut max_load) = (0, 0, 0);

        for old in self.buckets.iter() {
            let mut next = old.head;
            while let Some(key) = next {
                let Some(bag) = old_bags.remove(key) else {
                    break;
                };
                next = bag.next;
                for (hash, value) in bag.slots.into_iter().filter_map(Slot::into_entry) {
                    let b = &mut buckets[bucket_index(hash, n, salt)];
                    b.place_quick(&mut bags, hash, value);
                    max_bags = max_bags.max(b.bags);
                    max_load = max_load.max(b.inserts);
                    if b.inserts == 1 {
                        fill += 1;
                    }
                }
            }
        }
        debug_assert!(old_bags.is_empty());

        #[cfg(feature = "logging")]
        log::debug!(
            "fast-ht resize #{}: {} -> {} buckets, {} live, fill {}, max bags {}, max load {}",
            self.stats.resizes,
            self.buckets.len(),
            n,
            self.len,
            fill,
            max_bags,
            max_load
        );

        self.buckets = buckets;
        self.bags = bags;
        self.salt = salt;
        self.stats.fill = fill;
        self.stats.max_bags = max_bags;
        self.stats.max_bucket_load = max_load;
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            bags: self.bags.values(),
            slots: Default::default(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            bags: self.bags.values_mut(),
            slots: Default::default(),
        }
    }
}

impl<V, S> fmt::Debug for FastHashTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastHashTable")
            .field("len", &self.len)
            .field("buckets", &self.buckets.len())
            .field("fill_percent", &self.fill_percent)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Iterator over `(hash, &value)` for every live entry, in no fixed order.
pub struct Iter<'a, V> {
    bags: slotmap::basic::Values<'a, BagKey, Bag<V>>,
    slots: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for slot in self.slots.by_ref() {
                if let Some(v) = slot.value.as_ref() {
                    return Some((slot.hash, v));
                }
            }
            self.slots = self.bags.next()?.slots.iter();
        }
    }
}

/// Iterator over `(hash, &mut value)` for every live entry, in no fixed order.
pub struct IterMut<'a, V> {
    bags: slotmap::basic::ValuesMut<'a, BagKey, Bag<V>>,
    slots: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (u64, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for slot in self.slots.by_ref() {
                if let Some(v) = slot.value.as_mut() {
                    return Some((slot.hash, v));
                }
            }
            self.slots = self.bags.next()?.slots.iter_mut();
        }
    }
}
