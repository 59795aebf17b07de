#![cfg(test)]

// Property tests for FastHashTable kept inside the crate so they can check
// internal bucket placement alongside the public API.

use crate::bag::BAGSZ;
use crate::mix::bucket_index;
use crate::{Builder, FastHashTable, FixedSalt, InsertError};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations: indices shrink to earlier hashes, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    InsertWith(usize, i32),
    Remove(usize),
    Find(usize),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u64>, Vec<Op>)> {
    proptest::collection::vec(1u64..=u64::MAX, 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertWith(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Find),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run(mut sut: FastHashTable<i32, FixedSalt>, pool: &[u64], ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashMap<u64, i32> = HashMap::new();
    let mut last_resizes = 0;
    let mut last_buckets = sut.bucket_count();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let h = pool[i];
                let already = model.contains_key(&h);
                match sut.insert(h, v) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(h, v);
                    }
                    Err(InsertError::DuplicateHash) => {
                        prop_assert!(already, "duplicate error only when hash exists");
                    }
                    Err(InsertError::ZeroHash) => prop_assert!(false, "pool holds no zero"),
                }
            }
            Op::InsertWith(i, v) => {
                let h = pool[i];
                let already = model.contains_key(&h);
                let mut ran = false;
                let res = sut.insert_with(h, || {
                    ran = true;
                    v
                });
                prop_assert_eq!(ran, !already, "default runs exactly on success");
                prop_assert_eq!(res.is_ok(), !already);
                if !already {
                    model.insert(h, v);
                }
            }
            Op::Remove(i) => {
                let h = pool[i];
                prop_assert_eq!(sut.remove(h), model.remove(&h));
                prop_assert!(sut.find(h).is_none());
            }
            Op::Find(i) => {
                let h = pool[i];
                prop_assert_eq!(sut.find(h), model.get(&h));
                prop_assert_eq!(sut.contains(h), model.contains_key(&h));
            }
            Op::Mutate(i, d) => {
                let h = pool[i];
                match (sut.get_mut(h), model.get_mut(&h)) {
                    (Some(a), Some(b)) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (None, None) => {}
                    (a, b) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", a, b),
                }
            }
            Op::Iterate => {
                let s: BTreeMap<u64, i32> = sut.iter().map(|(h, v)| (h, *v)).collect();
                let m: BTreeMap<u64, i32> = model.iter().map(|(h, v)| (*h, *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        // 1) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 2) Each resize doubles exactly once
        let st = sut.stats();
        prop_assert!(st.resizes == last_resizes || st.resizes == last_resizes + 1);
        prop_assert_eq!(st.buckets, last_buckets << (st.resizes - last_resizes));
        prop_assert!(st.buckets.is_power_of_two());
        last_resizes = st.resizes;
        last_buckets = st.buckets;
        // 3) Bags hold at least the live entries
        prop_assert!(st.bags * BAGSZ >= sut.len());
    }

    for (h, v) in &model {
        prop_assert_eq!(sut.find(*h), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate hashes are rejected; the first value stays visible.
// - `find`/`contains`/`get_mut` parity with the model, including after
//   removals that leave tombstones.
// - `iter` yields the live set exactly.
// - Resizes happen one at a time and double the bucket count.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), log2 in 1u32..=4, salt in any::<u64>()) {
        let sut = Builder::new()
            .log2_buckets(log2)
            .salt_source(FixedSalt(salt))
            .build();
        run(sut, &pool, ops)?;
    }
}

// Property: same invariants with growth disabled on a two-bucket table, so
// chains run many bags deep and tombstones pile up in few buckets.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_long_chains((pool, ops) in arb_scenario(), salt in any::<u64>()) {
        let sut = Builder::new()
            .log2_buckets(1)
            .fill_percent(usize::MAX)
            .salt_source(FixedSalt(salt))
            .build();
        run(sut, &pool, ops)?;
    }
}

// Property: hashes that all share one bucket never lose data; the bucket's
// bag count is exactly the ceiling of its live entries over the bag width
// when nothing was removed.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_bucket_chains(count in 1usize..=40, salt in any::<u64>()) {
        let mut t: FastHashTable<usize, FixedSalt> = Builder::new()
            .log2_buckets(3)
            .salt_source(FixedSalt(salt))
            .build();
        let hs: Vec<u64> = (1u64..).filter(|&h| bucket_index(h, 8, salt) == 0).take(count).collect();
        for (i, &h) in hs.iter().enumerate() {
            prop_assert_eq!(t.insert(h, i), Ok(()));
        }
        let st = t.stats();
        prop_assert_eq!(st.resizes, 0);
        prop_assert_eq!(st.bags, (count + BAGSZ - 1) / BAGSZ);
        prop_assert_eq!(st.max_bags, st.bags);
        prop_assert_eq!(st.max_bucket_load, count);
        for (i, &h) in hs.iter().enumerate() {
            prop_assert_eq!(t.find(h), Some(&i));
        }
    }
}
