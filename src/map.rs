// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The public facade: a single ordered, tiered, multi-column map.

use crate::atom::AtomResolver;
use crate::config::Config;
use crate::element::{self, Element};
use crate::iter::Iter;
use crate::tier::Tier;

/// An ordered map over fixed-arity entries, stored across Small, Medium, or
/// Full tiers depending on size.
///
/// The first column of every entry is the sort key; remaining columns are
/// the value. A map configured with `elements_per_entry = N` stores entries
/// of exactly `N` elements.
#[derive(Debug, Clone)]
pub struct Map {
    config: Config,
    tier: Tier,
}

impl Map {
    /// Creates an empty map from a validated [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        let tier = Tier::new(config.elements_per_entry());
        log::trace!(
            "new map: arity={} max_size={}",
            config.elements_per_entry(),
            config.max_size()
        );
        Self { config, tier }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.tier.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tier.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.tier.bytes()
    }

    /// Name of the tier currently backing this map (`"Small"`, `"Medium"`,
    /// or `"Full"`). Supplemental introspection, not part of the ordered-map
    /// contract itself.
    #[must_use]
    pub fn tier_name(&self) -> &'static str {
        self.tier.name()
    }

    /// Number of packed sub-sequences backing this map. `1` for Small, `2`
    /// for Medium, `N` for Full.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.tier.partition_count()
    }

    fn arity_entry(&self, entry: &[Element]) {
        debug_assert_eq!(
            entry.len(),
            self.config.elements_per_entry() as usize,
            "entry arity does not match configured elements_per_entry"
        );
    }

    /// Inserts `entry`, routing and comparing on the key (column 0).
    ///
    /// Whether an existing entry with the same key is replaced or the new
    /// one is kept alongside it as a duplicate is governed by
    /// [`Config::map_is_set`]: `true` (the default, set semantics) replaces;
    /// `false` (list semantics) permits duplicate keys. Use
    /// [`Map::insert_full_width`] to compare on every column instead of
    /// just the key.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `entry.len() != elements_per_entry`.
    pub fn insert(&mut self, entry: Vec<Element>, resolver: Option<&dyn AtomResolver>) -> bool {
        self.arity_entry(&entry);
        let dedup = self.config.map_is_set();
        let replaced = self.tier.insert(entry, true, dedup, resolver);
        self.tier.maybe_promote(
            self.config.elements_per_entry(),
            self.config.max_size(),
            resolver,
        );
        replaced
    }

    /// Inserts comparing every column of `entry` rather than just the key,
    /// so distinct payloads under the same key both survive regardless of
    /// [`Config::map_is_set`]; that flag still governs whether an
    /// exact full-entry duplicate is replaced (`true`) or kept alongside
    /// the existing one (`false`).
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `entry.len() != elements_per_entry`.
    pub fn insert_full_width(
        &mut self,
        entry: Vec<Element>,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        self.arity_entry(&entry);
        let dedup = self.config.map_is_set();
        let replaced = self.tier.insert(entry, false, dedup, resolver);
        self.tier.maybe_promote(
            self.config.elements_per_entry(),
            self.config.max_size(),
            resolver,
        );
        replaced
    }

    #[must_use]
    pub fn exists(&self, key: &Element, resolver: Option<&dyn AtomResolver>) -> bool {
        self.tier.exists(std::slice::from_ref(key), true, resolver)
    }

    #[must_use]
    pub fn exists_full_width(
        &self,
        entry: &[Element],
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        self.tier.exists(entry, false, resolver)
    }

    #[must_use]
    pub fn lookup(&self, key: &Element, resolver: Option<&dyn AtomResolver>) -> Option<Vec<Element>> {
        self.tier.lookup(key, resolver)
    }

    pub fn delete(&mut self, key: &Element, resolver: Option<&dyn AtomResolver>) -> bool {
        self.tier.delete(std::slice::from_ref(key), true, resolver)
    }

    pub fn delete_full_width(
        &mut self,
        entry: &[Element],
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        self.tier.delete(entry, false, resolver)
    }

    /// Removes every entry with key `<= pivot`, returning the count removed.
    pub fn delete_up_to_inclusive(
        &mut self,
        pivot: &Element,
        resolver: Option<&dyn AtomResolver>,
    ) -> usize {
        self.tier.delete_less_equal(pivot, resolver)
    }

    #[must_use]
    pub fn first(&self) -> Option<Vec<Element>> {
        self.tier.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<Vec<Element>> {
        self.tier.last()
    }

    /// Resets the map to empty. There is no automatic demotion or shrink
    /// otherwise; this is the explicit escape hatch.
    pub fn clear(&mut self) {
        log::debug!("clear: dropping {} entries", self.len());
        self.tier = Tier::new(self.config.elements_per_entry());
    }

    /// Number of entries strictly less than `key`. `O(n)`: the packed
    /// sequence collaborator does not expose partition cardinalities
    /// cheaply enough for an `O(log n)` positional index, so this falls
    /// back to a linear scan via the iterator.
    #[must_use]
    pub fn rank(&self, key: &Element, resolver: Option<&dyn AtomResolver>) -> usize {
        self.iter()
            .take_while(|entry| element::compare(&entry[0], key, resolver) == std::cmp::Ordering::Less)
            .count()
    }

    /// Forward iterator over the full sorted order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::forward(&self.tier)
    }

    /// Reverse iterator over the full sorted order.
    #[must_use]
    pub fn iter_rev(&self) -> Iter<'_> {
        Iter::backward(&self.tier)
    }

    /// Iterator positioned at the first entry with key `>= key` (forward)
    /// or `<= key` (backward).
    #[must_use]
    pub fn iter_from(
        &self,
        key: &Element,
        forward: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> Iter<'_> {
        Iter::init_at(&self.tier, key, forward, resolver)
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
        let mut map = Map::new(Config::key_value());
        assert!(!map.insert(kv(1, 10), None));
        assert!(!map.insert(kv(2, 20), None));
        assert!(map.insert(kv(1, 11), None)); // replace
        assert_eq!(map.lookup(&Element::Int(1), None), Some(vec![Element::Int(11)]));
        assert_eq!(map.len(), 2);
        assert!(map.delete(&Element::Int(1), None));
        assert!(!map.exists(&Element::Int(1), None));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn clear_resets_to_small_tier() {
        let mut map = Map::new(Config::new(2, 64).unwrap());
        for k in 0..200 {
            map.insert(kv(k, k), None);
        }
        assert_ne!(map.tier_name(), "Small");
        map.clear();
        assert_eq!(map.tier_name(), "Small");
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn rank_counts_strictly_lesser_entries() {
        let mut map = Map::new(Config::key_value());
        for k in [10, 20, 30, 40] {
            map.insert(kv(k, k), None);
        }
        assert_eq!(map.rank(&Element::Int(25), None), 2);
        assert_eq!(map.rank(&Element::Int(10), None), 0);
        assert_eq!(map.rank(&Element::Int(100), None), 4);
    }

    #[test]
    fn bulk_prefix_delete_via_map() {
        let mut map = Map::new(Config::new(2, 64).unwrap());
        for k in 0..300 {
            map.insert(kv(k, k), None);
        }
        let removed = map.delete_up_to_inclusive(&Element::Int(149), None);
        assert_eq!(removed, 150);
        assert_eq!(map.len(), 150);
        assert_eq!(map.first(), Some(kv(150, 150)));
    }

    #[test]
    fn iter_from_positions_forward_and_backward() {
        let mut map = Map::new(Config::key_value());
        for k in [1, 3, 5, 7, 9] {
            map.insert(kv(k, k), None);
        }
        let fwd: Vec<i64> = map
            .iter_from(&Element::Int(4), true, None)
            .map(|e| match e[0] {
                Element::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(fwd, vec![5, 7, 9]);

        let bwd: Vec<i64> = map
            .iter_from(&Element::Int(4), false, None)
            .map(|e| match e[0] {
                Element::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(bwd, vec![3, 1]);
    }

    #[test]
    fn list_mode_permits_duplicate_keys_on_plain_insert() {
        let mut map = Map::new(Config::new(2, 64).unwrap().with_set_semantics(false));
        assert!(!map.insert(kv(1, 100), None));
        assert!(!map.insert(kv(1, 200), None));
        assert_eq!(map.len(), 2);
        let vals: Vec<i64> = map
            .iter()
            .map(|e| match e[1] {
                Element::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(vals, vec![100, 200]);
    }
}
