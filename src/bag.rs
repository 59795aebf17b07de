//! Bags: fixed-width blocks of slots chained under a bucket.

use slotmap::SlotMap;

/// Number of slots in one bag.
pub const BAGSZ: usize = 8;

/// Hash value marking an empty or deleted slot.
pub(crate) const EMPTY: u64 = 0;

slotmap::new_key_type! {
    /// Arena key of a bag within one bucket-array generation.
    pub(crate) struct BagKey;
}

/// Arena owning every bag of one bucket-array generation.
pub(crate) type Bags<V> = SlotMap<BagKey, Bag<V>>;

#[derive(Debug)]
pub(crate) struct Slot<V> {
    pub(crate) hash: u64,
    pub(crate) value: Option<V>,
}

impl<V> Slot<V> {
    const fn empty() -> Self {
        Slot {
            hash: EMPTY,
            value: None,
        }
    }

    #[inline]
    pub(crate) fn is_vacant(&self) -> bool {
        self.hash == EMPTY
    }

    #[inline]
    pub(crate) fn fill(&mut self, hash: u64, value: V) {
        debug_assert!(self.is_vacant());
        self.hash = hash;
        self.value = Some(value);
    }

    /// Turn the slot into a tombstone and hand back its value.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<V> {
        self.hash = EMPTY;
        self.value.take()
    }

    pub(crate) fn into_entry(self) -> Option<(u64, V)> {
        match self.value {
            Some(v) if self.hash != EMPTY => Some((self.hash, v)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Bag<V> {
    pub(crate) slots: [Slot<V>; BAGSZ],
    pub(crate) next: Option<BagKey>,
}

impl<V> Bag<V> {
    pub(crate) fn new(next: Option<BagKey>) -> Self {
        Bag {
            slots: core::array::from_fn(|_| Slot::empty()),
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bag_is_all_vacant() {
        let bag: Bag<String> = Bag::new(None);
        assert!(bag.slots.iter().all(|s| s.is_vacant() && s.value.is_none()));
        assert!(bag.next.is_none());
    }

    /// Invariant: `take` leaves a tombstone (`hash == 0`, no value).
    #[test]
    fn take_leaves_tombstone() {
        let mut bag: Bag<&str> = Bag::new(None);
        bag.slots[3].fill(99, "v");
        assert!(!bag.slots[3].is_vacant());
        assert_eq!(bag.slots[3].take(), Some("v"));
        assert!(bag.slots[3].is_vacant());
        assert_eq!(bag.slots[3].take(), None);
    }

    #[test]
    fn into_entry_skips_tombstones() {
        let mut bag: Bag<u8> = Bag::new(None);
        bag.slots[0].fill(5, 1);
        bag.slots[1].fill(6, 2);
        let _ = bag.slots[1].take();
        let live: Vec<_> = bag.slots.into_iter().filter_map(Slot::into_entry).collect();
        assert_eq!(live, vec![(5, 1)]);
    }
}
