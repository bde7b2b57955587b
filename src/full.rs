// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The Full tier: partitioning across many packed sub-sequences with
//! per-partition midpoints and per-boundary range keys.
//!
//! This is the heart of the core. The trickiest part, full-width partition
//! search, is reformulated below as a plain "rightmost partition head <=
//! probe" binary search: equivalent to a neighbor-probing walk but easier to
//! get right and to read.

use crate::atom::AtomResolver;
use crate::element::{self, Element};
use crate::packed::{Cursor, PackedSeq};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Full {
    maps: Vec<PackedSeq>,
    middle: Vec<Option<Cursor>>,
    /// `range_keys[j]` is the materialized first key of `maps[j + 1]`.
    range_keys: Vec<Element>,
    values: u64,
    max_size: u32,
    elements_per_entry: u16,
}

fn materialize(e: &Element, resolver: Option<&dyn AtomResolver>) -> Element {
    match e {
        Element::Ref(id) => resolver
            .expect("surrogate key range-key materialization requires an AtomResolver")
            .resolve(*id),
        other => other.clone(),
    }
}

fn compare_entry_full(a: &[Element], b: &[Element], resolver: Option<&dyn AtomResolver>) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let c = element::compare(x, y, resolver);
        if c != Ordering::Equal {
            return c;
        }
    }
    Ordering::Equal
}

impl Full {
    /// Seeds a Full tier with the two sub-sequences a Medium tier held.
    #[must_use]
    pub fn from_two(low: PackedSeq, high: PackedSeq, max_size: u32, resolver: Option<&dyn AtomResolver>) -> Self {
        let epe = low.elements_per_entry();
        let values = u64::from(low.count()) + u64::from(high.count());
        let m0 = low.middle();
        let m1 = high.middle();
        let range_key = high
            .first_key()
            .map(|k| materialize(k, resolver))
            .unwrap_or(Element::Void);
        Self {
            maps: vec![low, high],
            middle: vec![m0, m1],
            range_keys: vec![range_key],
            values,
            max_size,
            elements_per_entry: epe,
        }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.values
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values == 0
    }

    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.maps.iter().map(|m| u64::from(m.bytes())).sum()
    }

    #[must_use]
    pub fn partitions(&self) -> &[PackedSeq] {
        &self.maps
    }

    #[must_use]
    pub fn range_keys(&self) -> &[Element] {
        &self.range_keys
    }

    /// Locates the partition a key-only probe belongs in by binary-searching
    /// the materialized range keys rather than walking sub-sequences.
    fn partition_index_key_only(&self, key: &Element, resolver: Option<&dyn AtomResolver>) -> usize {
        let n = self.maps.len();
        if n <= 1 {
            return 0;
        }
        let mut min = 0usize;
        let mut max = n - 1;
        while min < max {
            let mid = min + (max - min) / 2;
            match element::compare(&self.range_keys[mid], key, resolver) {
                Ordering::Less => min = mid + 1,
                Ordering::Greater => max = mid,
                Ordering::Equal => return mid + 1,
            }
        }
        if min < n {
            min
        } else {
            n - 1
        }
    }

    /// Full-width partition search, reformulated as "rightmost partition
    /// whose head entry is `<= probe`" (see module docs).
    fn locate_full_width(&self, probe: &[Element], resolver: Option<&dyn AtomResolver>) -> usize {
        let n = self.maps.len();
        if n <= 1 {
            return 0;
        }
        let mut result = 0usize;
        let mut lo = 0i64;
        let mut hi = (n - 1) as i64;
        while lo <= hi {
            #[allow(clippy::cast_sign_loss)]
            let mid = ((lo + hi) / 2) as usize;
            let head = self.maps[mid].entry(0);
            if compare_entry_full(head, probe, resolver) != Ordering::Greater {
                result = mid;
                lo = mid as i64 + 1;
            } else {
                hi = mid as i64 - 1;
            }
        }
        result
    }

    fn partition_index(&self, probe: &[Element], key_only: bool, resolver: Option<&dyn AtomResolver>) -> usize {
        if key_only {
            self.partition_index_key_only(&probe[0], resolver)
        } else {
            self.locate_full_width(probe, resolver)
        }
    }

    fn refresh_range_key(&mut self, j: usize, resolver: Option<&dyn AtomResolver>) {
        if j >= self.range_keys.len() {
            return;
        }
        if let Some(k) = self.maps[j + 1].first_key() {
            self.range_keys[j] = materialize(k, resolver);
        }
    }

    /// Inserts an already-populated `seq` as a new partition at `idx`,
    /// shifting `middle`/`range_keys` to match and installing whichever
    /// range key the new partition boundary requires.
    fn insert_partition_at(&mut self, idx: usize, seq: PackedSeq, resolver: Option<&dyn AtomResolver>) {
        debug_assert!(!seq.is_empty(), "new Full partitions are always seeded with content");
        let mid = seq.middle();
        self.maps.insert(idx, seq);
        self.middle.insert(idx, mid);
        if idx == 0 {
            let rk = materialize(self.maps[1].first_key().expect("non-empty"), resolver);
            self.range_keys.insert(0, rk);
        } else {
            let rk = materialize(self.maps[idx].first_key().expect("non-empty"), resolver);
            self.range_keys.insert(idx - 1, rk);
        }
    }

    fn remove_partition_at(&mut self, idx: usize) {
        self.maps.remove(idx);
        self.middle.remove(idx);
        if idx == 0 {
            if !self.range_keys.is_empty() {
                self.range_keys.remove(0);
            }
        } else if idx - 1 < self.range_keys.len() {
            self.range_keys.remove(idx - 1);
        }
    }

    /// Insert-or-replace. `dedup = false` permits exact duplicates on the
    /// comparison domain instead of replacing (list mode). Returns
    /// `replaced`.
    pub fn insert(
        &mut self,
        entry: Vec<Element>,
        key_only: bool,
        dedup: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        let i = self.partition_index(&entry, key_only, resolver);

        let fits = self.maps[i].bytes() <= self.max_size || self.maps[i].is_empty();
        if fits {
            let replaced = self.maps[i].insert_replace_sorted(
                entry,
                &mut self.middle[i],
                key_only,
                dedup,
                resolver,
            );
            if !replaced {
                self.values += 1;
            }
            if i > 0 {
                self.refresh_range_key(i - 1, resolver);
            }
            return replaced;
        }

        if self.maps[i].count() == 1 {
            // Don't split a singleton: grow a new empty sibling instead.
            let existing_key = self.maps[i].entry(0)[0].clone();
            let new_key = &entry[0];
            let goes_before = element::compare(new_key, &existing_key, resolver) == Ordering::Less;

            let mut fresh = PackedSeq::new(self.elements_per_entry);
            let mut fresh_mid = None;
            fresh.insert_replace_sorted(entry, &mut fresh_mid, key_only, dedup, resolver);
            self.values += 1;

            if goes_before {
                log::trace!("Full: growing new sibling before singleton partition {i}");
                self.insert_partition_at(i, fresh, resolver);
                if i > 0 {
                    self.refresh_range_key(i - 1, resolver);
                }
            } else {
                log::trace!("Full: growing new sibling after singleton partition {i}");
                self.insert_partition_at(i + 1, fresh, resolver);
                self.refresh_range_key(i, resolver);
            }
            return false;
        }

        // Split the oversize partition at its midpoint.
        log::debug!(
            "Full: splitting oversize partition {i} ({} bytes over {} cap)",
            self.maps[i].bytes(),
            self.max_size
        );
        let mid = self.maps[i].middle().expect("non-empty, checked above");
        let high = self.maps[i].split_at(mid);
        self.middle[i] = self.maps[i].middle();
        self.insert_partition_at(i + 1, high, resolver);
        if i > 0 {
            self.refresh_range_key(i - 1, resolver);
        }

        let target = if element::compare(&entry[0], &self.range_keys[i], resolver) == Ordering::Less {
            i
        } else {
            i + 1
        };
        let replaced = self.maps[target].insert_replace_sorted(
            entry,
            &mut self.middle[target],
            key_only,
            dedup,
            resolver,
        );
        if !replaced {
            self.values += 1;
        }
        if target > 0 {
            self.refresh_range_key(target - 1, resolver);
        }
        replaced
    }

    #[must_use]
    pub fn exists(&self, probe: &[Element], key_only: bool, resolver: Option<&dyn AtomResolver>) -> bool {
        let i = self.partition_index(probe, key_only, resolver);
        self.maps[i].find_sorted(probe, key_only, resolver).is_some()
    }

    #[must_use]
    pub fn lookup(&self, key: &Element, resolver: Option<&dyn AtomResolver>) -> Option<Vec<Element>> {
        let probe = [key.clone()];
        let i = self.partition_index_key_only(key, resolver);
        self.maps[i]
            .find_sorted(&probe, true, resolver)
            .map(|c| self.maps[i].entry_copy(c)[1..].to_vec())
    }

    /// Deletes the entry matching `probe`. Returns whether one was removed.
    pub fn delete(&mut self, probe: &[Element], key_only: bool, resolver: Option<&dyn AtomResolver>) -> bool {
        let i = self.partition_index(probe, key_only, resolver);
        let Some(cursor) = self.maps[i].find_sorted(probe, key_only, resolver) else {
            return false;
        };

        self.maps[i].delete_sorted(cursor, &mut self.middle[i]);
        self.values -= 1;
        if i > 0 {
            self.refresh_range_key(i - 1, resolver);
        }

        if self.maps.len() > 1 && self.maps[i].is_empty() {
            log::trace!("Full: dropping emptied partition {i}");
            self.remove_partition_at(i);
        } else if i + 1 < self.maps.len()
            && u64::from(self.maps[i].bytes()) + u64::from(self.maps[i + 1].bytes())
                <= u64::from(self.max_size)
        {
            log::trace!("Full: merging partitions {i} and {}", i + 1);
            let next = self.maps.remove(i + 1);
            self.middle.remove(i + 1);
            if i < self.range_keys.len() {
                self.range_keys.remove(i);
            }
            self.maps[i].bulk_append(next);
            self.middle[i] = self.maps[i].middle();
            if i > 0 {
                self.refresh_range_key(i - 1, resolver);
            }
        }

        true
    }

    /// Bulk prefix delete: removes every entry with key `<= pivot` in one
    /// pass — whole partitions below the pivot are freed without walking
    /// their entries, then the boundary partition is truncated.
    /// Returns the number of entries removed.
    pub fn delete_less_equal(&mut self, pivot: &Element, resolver: Option<&dyn AtomResolver>) -> usize {
        let n = self.maps.len();
        let mut i = self.partition_index_key_only(pivot, resolver);
        if i >= n {
            i = n - 1;
        }

        let mut removed = 0usize;
        if i > 0 {
            for seq in self.maps.drain(0..i) {
                removed += seq.count() as usize;
            }
            self.middle.drain(0..i);
            let take = i.min(self.range_keys.len());
            self.range_keys.drain(0..take);
        }

        if let Some(cursor) = self.maps[0].last_at_most(pivot, resolver) {
            removed += cursor + 1;
            self.maps[0].delete_up_to_inclusive(cursor);
        }
        self.middle[0] = self.maps[0].middle();
        self.values -= removed as u64;

        log::debug!("Full: bulk prefix delete removed {removed} entries across {i} partitions");
        removed
    }

    #[must_use]
    pub fn first(&self) -> Option<Vec<Element>> {
        self.maps
            .iter()
            .find(|m| !m.is_empty())
            .and_then(|m| m.head().map(|c| m.entry_copy(c)))
    }

    #[must_use]
    pub fn last(&self) -> Option<Vec<Element>> {
        self.maps
            .iter()
            .rev()
            .find(|m| !m.is_empty())
            .and_then(|m| m.tail().map(|c| m.entry_copy(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(k: i64, v: i64) -> Vec<Element> {
        vec![Element::Int(k), Element::Int(v)]
    }

    fn seeded(max_size: u32) -> Full {
        let mut low = PackedSeq::new(2);
        let mut high = PackedSeq::new(2);
        let mut mid = None;
        low.insert_replace_sorted(kv(0, 0), &mut mid, true, true, None);
        high.insert_replace_sorted(kv(1, 1), &mut mid, true, true, None);
        Full::from_two(low, high, max_size, None)
    }

    #[test]
    fn range_key_invariant_holds_after_many_inserts() {
        let mut full = seeded(64);
        for k in 2..500 {
            full.insert(kv(k, k * 2), true, true, None);
        }
        assert_eq!(full.len(), 500);
        for j in 0..full.range_keys().len() {
            let boundary = &full.range_keys()[j];
            assert_eq!(
                full.partitions()[j + 1].first_key(),
                Some(boundary),
                "range_keys[{j}] must equal first_key(map[{}])",
                j + 1
            );
            assert!(full.partitions()[j].max_key().is_some());
            assert_ne!(
                element::compare(full.partitions()[j].max_key().unwrap(), boundary, None),
                Ordering::Greater
            );
        }
        for k in 0..500 {
            assert_eq!(full.lookup(&Element::Int(k), None), Some(vec![Element::Int(k * 2)]));
        }
    }

    #[test]
    fn delete_merges_small_partitions() {
        let mut full = seeded(256);
        for k in 2..500 {
            full.insert(kv(k, k), true, true, None);
        }
        let before = full.partition_count();
        for k in 0..490 {
            assert!(full.delete(&[Element::Int(k)], true, None));
        }
        assert_eq!(full.len(), 10);
        assert!(full.partition_count() <= before);
        for k in 490..500 {
            assert!(full.exists(&[Element::Int(k)], true, None));
        }
    }

    #[test]
    fn bulk_prefix_delete_removes_exactly_up_to_pivot() {
        let mut full = seeded(64);
        for k in 2..200 {
            full.insert(kv(k, k), true, true, None);
        }
        let removed = full.delete_less_equal(&Element::Int(99), None);
        assert_eq!(removed, 100);
        assert_eq!(full.len(), 100);
        assert!(!full.exists(&[Element::Int(50)], true, None));
        assert!(full.exists(&[Element::Int(100)], true, None));
    }

    #[test]
    fn singleton_partition_grows_sibling_instead_of_splitting() {
        let mut low = PackedSeq::new(2);
        let mut high = PackedSeq::new(2);
        let mut mid = None;
        low.insert_replace_sorted(kv(0, 0), &mut mid, true, true, None);
        high.insert_replace_sorted(kv(1_000_000, 0), &mut mid, true, true, None);
        let mut full = Full::from_two(low, high, 8, None);
        // Partition 0 holds a single huge Bytes entry that is already over
        // max_size; the next insert must not try to split a 1-entry seq.
        full.insert(
            vec![Element::Int(-1), Element::Bytes(vec![0u8; 100])],
            true,
            true,
            None,
        );
        assert_eq!(full.len(), 3);
        assert!(full.exists(&[Element::Int(-1)], true, None));
        assert!(full.exists(&[Element::Int(0)], true, None));
    }
}
