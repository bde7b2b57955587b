// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Property: whichever tier ends up backing the map, its observable
//! behavior must match a trivial `BTreeMap` shadow model — the caller cannot
//! observe which tier is active except through `tier_name`/`partition_count`.

use std::collections::BTreeMap;
use proptest::prelude::*;
use tiered_map::{Config, Element, Map};

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, i32),
    Delete(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i32>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        any::<i32>().prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn matches_btreemap_shadow(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut map = Map::new(Config::new(2, 64).unwrap());
        let mut shadow: BTreeMap<i64, i64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let k = i64::from(k);
                    let v = i64::from(v);
                    let replaced = map.insert(vec![Element::Int(k), Element::Int(v)], None);
                    let shadow_replaced = shadow.insert(k, v).is_some();
                    prop_assert_eq!(replaced, shadow_replaced);
                }
                Op::Delete(k) => {
                    let k = i64::from(k);
                    let removed = map.delete(&Element::Int(k), None);
                    let shadow_removed = shadow.remove(&k).is_some();
                    prop_assert_eq!(removed, shadow_removed);
                }
            }
        }

        prop_assert_eq!(map.len(), shadow.len() as u64);
        for (&k, &v) in &shadow {
            prop_assert_eq!(
                map.lookup(&Element::Int(k), None),
                Some(vec![Element::Int(v)])
            );
        }

        let collected: Vec<(i64, i64)> = map
            .iter()
            .map(|e| match (&e[0], &e[1]) {
                (Element::Int(k), Element::Int(v)) => (*k, *v),
                _ => unreachable!(),
            })
            .collect();
        let expected: Vec<(i64, i64)> = shadow.into_iter().collect();
        prop_assert_eq!(collected, expected);
    }
}
