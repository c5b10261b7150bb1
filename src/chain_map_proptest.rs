#![cfg(test)]

// Property tests for ChainMap kept inside the crate so they can check the
// private chain structure after every step.

use crate::chain_map::{ChainMap, ChainMapConfig};
use crate::string_hash::StringHash;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = ChainMapConfig> {
    (
        1usize..=8,
        prop_oneof![Just(0.5), Just(0.75), Just(1.0), Just(2.0)],
        prop_oneof![Just(StringHash::Sum), Just(StringHash::PositionWeighted)],
    )
        .prop_map(|(size, threshold, hash)| {
            ChainMapConfig::default()
                .with_table_size(size)
                .with_load_factor_threshold(threshold)
                .with_hash(hash)
        })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences and configurations:
// - `insert` returns the model's previous value; duplicates never grow `len`.
// - `get`/`contains_key` parity with the model, before and after growth.
// - `remove` of an absent key is a no-op.
// - Every entry sits in the bucket its stored hash selects, keys are unique,
//   and empty plus occupied buckets cover the capacity.
// - An insert doubles the table exactly when the load reaches the threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(config in arb_config(), (pool, ops) in arb_scenario()) {
        let mut sut: ChainMap<i32> = ChainMap::with_config(config).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    let before = sut.len();
                    let cap_before = sut.capacity();
                    let prev = sut.insert(k.clone(), v);
                    prop_assert_eq!(prev, model.insert(k, v));
                    if prev.is_some() {
                        prop_assert_eq!(sut.len(), before);
                        prop_assert_eq!(sut.capacity(), cap_before);
                    } else if sut.capacity() != cap_before {
                        // Grew: exactly one doubling, triggered by the threshold.
                        prop_assert_eq!(sut.capacity(), cap_before * 2);
                        let load = sut.len() as f64 / cap_before as f64;
                        prop_assert!(load >= config.load_factor_threshold);
                    } else {
                        prop_assert!(sut.table_load() < config.load_factor_threshold);
                    }
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    prop_assert!(!sut.contains_key(k));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.saturating_add(d);
                    }
                    if let Some(v) = model.get_mut(k) {
                        *v = v.saturating_add(d);
                    }
                }
                OpI::Iterate => {
                    let s_keys: BTreeSet<String> = sut.keys().map(str::to_owned).collect();
                    let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                    prop_assert_eq!(s_keys, m_keys);
                }
            }

            prop_assert!(sut.chains_are_consistent());
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            let occupied = sut.chain_lengths().filter(|&n| n > 0).count();
            prop_assert_eq!(sut.empty_buckets() + occupied, sut.capacity());
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}

// Property: starting from one bucket, distinct keys all survive every growth.
proptest! {
    #[test]
    fn prop_growth_keeps_entries(keys in proptest::collection::btree_set("[a-zA-Z0-9]{1,12}", 1..200)) {
        let mut m: ChainMap<usize> = ChainMap::new(1).unwrap();
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(m.insert(k.as_str(), i), None);
            prop_assert!(m.table_load() < m.load_factor_threshold());
        }
        prop_assert_eq!(m.len(), keys.len());
        prop_assert!(m.chains_are_consistent());
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(m.get(k), Some(&i));
        }
    }
}
