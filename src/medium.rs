// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The Medium tier: two packed sequences, partitioned at the implicit
//! boundary `first_key(map[1])`.

use crate::atom::AtomResolver;
use crate::element::{self, Element};
use crate::packed::{Cursor, PackedSeq};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Medium {
    map: [PackedSeq; 2],
    middle: [Option<Cursor>; 2],
}

impl Medium {
    /// Seeds a Medium tier directly from the two sequences a Small tier
    /// split into on promotion.
    #[must_use]
    pub fn from_halves(low: PackedSeq, high: PackedSeq) -> Self {
        let m0 = low.middle();
        let m1 = high.middle();
        Self {
            map: [low, high],
            middle: [m0, m1],
        }
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.map[0].count() + self.map[1].count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn bytes(&self) -> u32 {
        self.map[0].bytes() + self.map[1].bytes()
    }

    #[must_use]
    pub fn partitions(&self) -> &[PackedSeq; 2] {
        &self.map
    }

    fn partition_for(
        &self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> usize {
        if self.map[1].is_empty() {
            return 0;
        }
        let head1 = self.map[1].entry(0);
        let less = if key_only {
            element::compare(&probe[0], &head1[0], resolver) == Ordering::Less
        } else {
            // Two-finger scan: compare columns in order until a mismatch
            // decides the partition.
            let mut decided = Ordering::Equal;
            for (x, y) in probe.iter().zip(head1.iter()) {
                let c = element::compare(x, y, resolver);
                if c != Ordering::Equal {
                    decided = c;
                    break;
                }
            }
            decided == Ordering::Less
        };
        usize::from(!less)
    }

    /// Restores "lower keys live in `map[0]`" after a delete empties
    /// `map[0]` while `map[1]` stays non-empty.
    fn fix_conformance(&mut self) {
        if self.map[0].is_empty() && !self.map[1].is_empty() {
            self.map.swap(0, 1);
            self.middle.swap(0, 1);
        }
    }

    pub fn insert(
        &mut self,
        entry: Vec<Element>,
        key_only: bool,
        dedup: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        let idx = self.partition_for(&entry, key_only, resolver);
        self.map[idx].insert_replace_sorted(entry, &mut self.middle[idx], key_only, dedup, resolver)
    }

    #[must_use]
    pub fn exists(
        &self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        let idx = self.partition_for(probe, key_only, resolver);
        self.map[idx].find_sorted(probe, key_only, resolver).is_some()
    }

    #[must_use]
    pub fn lookup(
        &self,
        key: &Element,
        resolver: Option<&dyn AtomResolver>,
    ) -> Option<Vec<Element>> {
        let probe = [key.clone()];
        let idx = self.partition_for(&probe, true, resolver);
        self.map[idx]
            .find_sorted(&probe, true, resolver)
            .map(|c| self.map[idx].entry_copy(c)[1..].to_vec())
    }

    pub fn delete(
        &mut self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        let idx = self.partition_for(probe, key_only, resolver);
        let found = self.map[idx].find_sorted(probe, key_only, resolver);
        match found {
            Some(cursor) => {
                self.map[idx].delete_sorted(cursor, &mut self.middle[idx]);
                self.fix_conformance();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<Vec<Element>> {
        self.map[0]
            .head()
            .map(|c| self.map[0].entry_copy(c))
            .or_else(|| self.map[1].head().map(|c| self.map[1].entry_copy(c)))
    }

    #[must_use]
    pub fn last(&self) -> Option<Vec<Element>> {
        self.map[1]
            .tail()
            .map(|c| self.map[1].entry_copy(c))
            .or_else(|| self.map[0].tail().map(|c| self.map[0].entry_copy(c)))
    }

    /// Consumes this Medium tier into its two sequences, for seeding a Full
    /// tier on promotion.
    #[must_use]
    pub fn into_parts(self) -> (PackedSeq, PackedSeq) {
        let [a, b] = self.map;
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(k: i64, v: i64) -> Vec<Element> {
        vec![Element::Int(k), Element::Int(v)]
    }

    fn seeded() -> Medium {
        let mut low = PackedSeq::new(2);
        let mut high = PackedSeq::new(2);
        let mut mid = None;
        for k in 0..5 {
            low.insert_replace_sorted(kv(k, k), &mut mid, true, true, None);
        }
        for k in 5..10 {
            high.insert_replace_sorted(kv(k, k), &mut mid, true, true, None);
        }
        Medium::from_halves(low, high)
    }

    #[test]
    fn lookup_routes_to_correct_partition() {
        let m = seeded();
        assert_eq!(m.lookup(&Element::Int(2), None), Some(vec![Element::Int(2)]));
        assert_eq!(m.lookup(&Element::Int(7), None), Some(vec![Element::Int(7)]));
        assert_eq!(m.lookup(&Element::Int(100), None), None);
    }

    #[test]
    fn delete_draining_low_partition_triggers_swap() {
        let mut m = seeded();
        for k in 0..5 {
            assert!(m.delete(&[Element::Int(k)], true, None));
        }
        // map[0] was emptied; conformance rule swaps map[1] into map[0].
        assert_eq!(m.partitions()[0].count(), 5);
        assert!(m.partitions()[1].is_empty());
        assert_eq!(m.lookup(&Element::Int(7), None), Some(vec![Element::Int(7)]));
    }
}
