//! Buckets and the chain scans behind insert, find and remove.
//!
//! A bucket only holds the head link of its chain; the bags themselves live in
//! the table's arena, so every scan takes the arena alongside the bucket.

use crate::bag::{Bag, BagKey, Bags};

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Bucket {
    pub(crate) head: Option<BagKey>,
    /// Successful inserts attributed to this bucket. Removals leave it alone.
    pub(crate) inserts: usize,
    pub(crate) bags: usize,
}

/// Position of one slot inside a bucket's chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct SlotRef {
    bag: BagKey,
    idx: usize,
}

/// Result of scanning a chain ahead of a checked insert.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    Present,
    /// Not present; the first reusable slot, if the chain has one.
    Vacant(Option<SlotRef>),
}

/// Walks a chain head first (most recently allocated bag first).
pub(crate) struct Chain<'a, V> {
    bags: &'a Bags<V>,
    next: Option<BagKey>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (BagKey, &'a Bag<V>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        let bag = self.bags.get(key)?;
        self.next = bag.next;
        Some((key, bag))
    }
}

impl Bucket {
    pub(crate) fn chain<'a, V>(&self, bags: &'a Bags<V>) -> Chain<'a, V> {
        Chain {
            bags,
            next: self.head,
        }
    }

    /// Duplicate scan for a checked insert. The whole chain is read even
    /// after a tombstone turns up, since the hash may sit further down.
    pub(crate) fn probe<V>(&self, bags: &Bags<V>, hash: u64) -> Probe {
        let mut reuse = None;
        for (key, bag) in self.chain(bags) {
            for (idx, slot) in bag.slots.iter().enumerate() {
                if slot.hash == hash {
                    return Probe::Present;
                }
                if reuse.is_none() && slot.is_vacant() {
                    reuse = Some(SlotRef { bag: key, idx });
                }
            }
        }
        Probe::Vacant(reuse)
    }

    /// First empty slot in the chain, with no duplicate check.
    pub(crate) fn first_vacant<V>(&self, bags: &Bags<V>) -> Option<SlotRef> {
        self.chain(bags).find_map(|(key, bag)| {
            bag.slots
                .iter()
                .position(|s| s.is_vacant())
                .map(|idx| SlotRef { bag: key, idx })
        })
    }

    pub(crate) fn locate<V>(&self, bags: &Bags<V>, hash: u64) -> Option<SlotRef> {
        self.chain(bags).find_map(|(key, bag)| {
            bag.slots
                .iter()
                .position(|s| s.hash == hash)
                .map(|idx| SlotRef { bag: key, idx })
        })
    }

    /// Store `(hash, value)` at `at`, or in the first slot of a new head bag
    /// when `at` is `None`.
    pub(crate) fn place<V>(&mut self, bags: &mut Bags<V>, at: Option<SlotRef>, hash: u64, value: V) {
        let at = match at {
            Some(at) => at,
            None => {
                let bag = bags.insert(Bag::new(self.head));
                self.head = Some(bag);
                self.bags += 1;
                SlotRef { bag, idx: 0 }
            }
        };
        bags[at.bag].slots[at.idx].fill(hash, value);
        self.inserts += 1;
    }

    /// Insert without a duplicate scan. Only valid when `hash` cannot already
    /// be in the chain, as during a rehash.
    pub(crate) fn place_quick<V>(&mut self, bags: &mut Bags<V>, hash: u64, value: V) {
        let at = self.first_vacant(bags);
        self.place(bags, at, hash, value);
    }
}

impl SlotRef {
    #[inline]
    pub(crate) fn get<V>(self, bags: &Bags<V>) -> Option<&V> {
        bags.get(self.bag)?.slots[self.idx].value.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut<V>(self, bags: &mut Bags<V>) -> Option<&mut V> {
        bags.get_mut(self.bag)?.slots[self.idx].value.as_mut()
    }

    #[inline]
    pub(crate) fn take<V>(self, bags: &mut Bags<V>) -> Option<V> {
        bags.get_mut(self.bag)?.slots[self.idx].take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::BAGSZ;

    fn filled(n: u64) -> (Bucket, Bags<u64>) {
        let mut b = Bucket::default();
        let mut bags = Bags::with_key();
        for h in 1..=n {
            let at = b.first_vacant(&bags);
            b.place(&mut bags, at, h, h * 10);
        }
        (b, bags)
    }

    /// Invariant: a new bag is allocated only once every slot is taken, and
    /// it goes to the head of the chain.
    #[test]
    fn bags_grow_at_head() {
        let (b, bags) = filled(BAGSZ as u64);
        assert_eq!(b.bags, 1);
        let (b, bags2) = filled(BAGSZ as u64 + 1);
        assert_eq!(b.bags, 2);
        assert_eq!(bags.len(), 1);
        let (_, head) = b.chain(&bags2).next().unwrap();
        assert_eq!(head.slots[0].hash, BAGSZ as u64 + 1);
        assert!(head.slots[1..].iter().all(|s| s.is_vacant()));
    }

    /// Invariant: `probe` reports a duplicate that sits behind a tombstone.
    #[test]
    fn probe_sees_duplicate_past_tombstone() {
        let (b, mut bags) = filled(BAGSZ as u64 + 2);
        // Tombstone in the head bag; hash 3 lives in the older bag.
        let head = b.locate(&bags, BAGSZ as u64 + 1).unwrap();
        assert_eq!(head.take(&mut bags), Some((BAGSZ as u64 + 1) * 10));
        assert_eq!(b.probe(&bags, 3), Probe::Present);
        assert_eq!(b.probe(&bags, 1000), Probe::Vacant(Some(head)));
    }

    /// Invariant: the first tombstone in scan order is the one reused.
    #[test]
    fn probe_remembers_first_tombstone() {
        let (b, mut bags) = filled(4);
        let s2 = b.locate(&bags, 2).unwrap();
        let s4 = b.locate(&bags, 4).unwrap();
        s4.take(&mut bags);
        s2.take(&mut bags);
        assert_eq!(b.probe(&bags, 77), Probe::Vacant(Some(s2)));
    }

    #[test]
    fn empty_bucket_probe_has_no_slot() {
        let b = Bucket::default();
        let bags: Bags<u64> = Bags::with_key();
        assert_eq!(b.probe(&bags, 5), Probe::Vacant(None));
        assert!(b.locate(&bags, 5).is_none());
        assert_eq!(b.chain(&bags).count(), 0);
    }

    #[test]
    fn slot_ref_access() {
        let (b, mut bags) = filled(3);
        let s = b.locate(&bags, 2).unwrap();
        assert_eq!(s.get(&bags), Some(&20));
        *s.get_mut(&mut bags).unwrap() += 1;
        assert_eq!(s.take(&mut bags), Some(21));
        assert_eq!(s.get(&bags), None);
        assert!(b.locate(&bags, 2).is_none());
        assert_eq!(b.inserts, 3);
    }
}
