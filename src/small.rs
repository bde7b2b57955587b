// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The Small tier: a single packed sequence plus a midpoint hint.

use crate::atom::AtomResolver;
use crate::element::Element;
use crate::packed::{Cursor, PackedSeq};

#[derive(Debug, Clone)]
pub struct Small {
    map: PackedSeq,
    middle: Option<Cursor>,
}

impl Small {
    #[must_use]
    pub fn new(elements_per_entry: u16) -> Self {
        Self {
            map: PackedSeq::new(elements_per_entry),
            middle: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.map.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> u32 {
        self.map.bytes()
    }

    #[must_use]
    pub fn map(&self) -> &PackedSeq {
        &self.map
    }

    /// Inserts `entry`, comparing on the key (column 0) or the full entry
    /// depending on `key_only`. `dedup = false` permits exact duplicates on
    /// that comparison domain (list mode) instead of replacing. Returns
    /// `replaced`.
    pub fn insert(
        &mut self,
        entry: Vec<Element>,
        key_only: bool,
        dedup: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        self.map
            .insert_replace_sorted(entry, &mut self.middle, key_only, dedup, resolver)
    }

    #[must_use]
    pub fn exists(
        &self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        self.map.find_sorted(probe, key_only, resolver).is_some()
    }

    #[must_use]
    pub fn lookup(
        &self,
        key: &Element,
        resolver: Option<&dyn AtomResolver>,
    ) -> Option<Vec<Element>> {
        let probe = [key.clone()];
        self.map
            .find_sorted(&probe, true, resolver)
            .map(|c| self.map.entry_copy(c)[1..].to_vec())
    }

    /// Deletes the entry matching `probe` under `key_only`/full-width
    /// comparison. Returns whether an entry was removed.
    pub fn delete(
        &mut self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        match self.map.find_sorted(probe, key_only, resolver) {
            Some(cursor) => {
                self.map.delete_sorted(cursor, &mut self.middle);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<Vec<Element>> {
        self.map.head().map(|c| self.map.entry_copy(c))
    }

    #[must_use]
    pub fn last(&self) -> Option<Vec<Element>> {
        self.map.tail().map(|c| self.map.entry_copy(c))
    }

    /// Splits this Small tier's single sequence at its midpoint,
    /// consuming `self` into the two sequences a Medium tier owns.
    #[must_use]
    pub fn into_halves(mut self) -> (PackedSeq, PackedSeq) {
        let mid = self.map.middle().unwrap_or(0);
        let high = self.map.split_at(mid);
        (self.map, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(k: i64, v: i64) -> Vec<Element> {
        vec![Element::Int(k), Element::Int(v)]
    }

    #[test]
    fn insert_lookup_delete_round_trip() {
        let mut s = Small::new(2);
        assert!(!s.insert(kv(1, 100), true, true, None));
        assert_eq!(s.lookup(&Element::Int(1), None), Some(vec![Element::Int(100)]));
        assert!(s.delete(&[Element::Int(1)], true, None));
        assert_eq!(s.lookup(&Element::Int(1), None), None);
    }

    #[test]
    fn into_halves_splits_evenly() {
        let mut s = Small::new(2);
        for k in 0..10 {
            s.insert(kv(k, k), true, true, None);
        }
        let (low, high) = s.into_halves();
        assert_eq!(low.count() + high.count(), 10);
        assert_ne!(
            crate::element::compare(
                low.last_key().unwrap(),
                high.first_key().unwrap(),
                None
            ),
            std::cmp::Ordering::Greater
        );
    }
}
