// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The tier discriminator and polymorphic dispatch contract.
//!
//! A reference implementation might represent this with a pointer whose low
//! bits carry the tier tag. The idiomatic Rust replacement is a tagged
//! `enum` dispatched with `match` — the performance characteristic that
//! matters (no extra indirection to find out which tier you're in) survives
//! because the tier body is inlined into the enum variant, not boxed.

use crate::atom::AtomResolver;
use crate::element::Element;
use crate::full::Full;
use crate::medium::Medium;
use crate::packed::PackedSeq;
use crate::small::Small;

#[derive(Debug, Clone)]
pub(crate) enum Tier {
    Small(Small),
    Medium(Medium),
    Full(Full),
}

impl Tier {
    pub(crate) fn new(elements_per_entry: u16) -> Self {
        Tier::Small(Small::new(elements_per_entry))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Tier::Small(_) => "Small",
            Tier::Medium(_) => "Medium",
            Tier::Full(_) => "Full",
        }
    }

    pub(crate) fn partition_count(&self) -> usize {
        match self {
            Tier::Small(_) => 1,
            Tier::Medium(_) => 2,
            Tier::Full(f) => f.partition_count(),
        }
    }

    pub(crate) fn len(&self) -> u64 {
        match self {
            Tier::Small(s) => u64::from(s.len()),
            Tier::Medium(m) => u64::from(m.len()),
            Tier::Full(f) => f.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn bytes(&self) -> u64 {
        match self {
            Tier::Small(s) => u64::from(s.bytes()),
            Tier::Medium(m) => u64::from(m.bytes()),
            Tier::Full(f) => f.bytes(),
        }
    }

    pub(crate) fn insert(
        &mut self,
        entry: Vec<Element>,
        key_only: bool,
        dedup: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        match self {
            Tier::Small(s) => s.insert(entry, key_only, dedup, resolver),
            Tier::Medium(m) => m.insert(entry, key_only, dedup, resolver),
            Tier::Full(f) => f.insert(entry, key_only, dedup, resolver),
        }
    }

    pub(crate) fn exists(
        &self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        match self {
            Tier::Small(s) => s.exists(probe, key_only, resolver),
            Tier::Medium(m) => m.exists(probe, key_only, resolver),
            Tier::Full(f) => f.exists(probe, key_only, resolver),
        }
    }

    pub(crate) fn lookup(
        &self,
        key: &Element,
        resolver: Option<&dyn AtomResolver>,
    ) -> Option<Vec<Element>> {
        match self {
            Tier::Small(s) => s.lookup(key, resolver),
            Tier::Medium(m) => m.lookup(key, resolver),
            Tier::Full(f) => f.lookup(key, resolver),
        }
    }

    pub(crate) fn delete(
        &mut self,
        probe: &[Element],
        key_only: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> bool {
        match self {
            Tier::Small(s) => s.delete(probe, key_only, resolver),
            Tier::Medium(m) => m.delete(probe, key_only, resolver),
            Tier::Full(f) => f.delete(probe, key_only, resolver),
        }
    }

    pub(crate) fn first(&self) -> Option<Vec<Element>> {
        match self {
            Tier::Small(s) => s.first(),
            Tier::Medium(m) => m.first(),
            Tier::Full(f) => f.first(),
        }
    }

    pub(crate) fn last(&self) -> Option<Vec<Element>> {
        match self {
            Tier::Small(s) => s.last(),
            Tier::Medium(m) => m.last(),
            Tier::Full(f) => f.last(),
        }
    }

    /// Bulk prefix delete. Only the Full tier has a dedicated fast path;
    /// Small/Medium fall back to a linear scan-and-delete, which is
    /// acceptable since both tiers are bounded in size by construction
    /// (they promote to Full once oversize).
    pub(crate) fn delete_less_equal(
        &mut self,
        pivot: &Element,
        resolver: Option<&dyn AtomResolver>,
    ) -> usize {
        match self {
            Tier::Full(f) => f.delete_less_equal(pivot, resolver),
            _ => {
                let mut removed = 0usize;
                while let Some(first) = self.first() {
                    if crate::element::compare(&first[0], pivot, resolver) == std::cmp::Ordering::Greater {
                        break;
                    }
                    self.delete(&first[..1], true, resolver);
                    removed += 1;
                }
                removed
            }
        }
    }

    /// Checks the dispatcher's promotion guards and promotes in place if
    /// they hold. Never demotes — shrinking back to a smaller tier is not
    /// automatic; [`crate::map::Map::clear`] is the explicit reset.
    pub(crate) fn maybe_promote(
        &mut self,
        elements_per_entry: u16,
        max_size: u32,
        resolver: Option<&dyn AtomResolver>,
    ) {
        match self {
            Tier::Small(small) => {
                let bytes = small.bytes();
                let entries = small.len();
                if bytes > max_size && entries >= 2 * u32::from(elements_per_entry) {
                    log::debug!(
                        "Small -> Medium: {bytes} bytes over {max_size} cap, {entries} entries"
                    );
                    let Tier::Small(owned) =
                        std::mem::replace(self, Tier::Small(Small::new(elements_per_entry)))
                    else {
                        unreachable!()
                    };
                    let (low, high) = owned.into_halves();
                    *self = Tier::Medium(Medium::from_halves(low, high));
                }
            }
            Tier::Medium(medium) => {
                let total = medium.bytes();
                let both_nonempty =
                    !medium.partitions()[0].is_empty() && !medium.partitions()[1].is_empty();
                if u64::from(total) > 3 * u64::from(max_size) && both_nonempty {
                    log::debug!("Medium -> Full: {total} bytes over {} cap", 3 * max_size);
                    let Tier::Medium(owned) =
                        std::mem::replace(self, Tier::Small(Small::new(elements_per_entry)))
                    else {
                        unreachable!()
                    };
                    let (low, high) = owned.into_parts();
                    *self = Tier::Full(Full::from_two(low, high, max_size, resolver));
                }
            }
            Tier::Full(_) => {}
        }
    }

    /// Partitions as packed sub-sequences, used by [`crate::iter::Iter`] to
    /// walk across tier boundaries uniformly.
    pub(crate) fn partition(&self, idx: usize) -> Option<&PackedSeq> {
        match self {
            Tier::Small(s) if idx == 0 => Some(s.map()),
            Tier::Small(_) => None,
            Tier::Medium(m) => m.partitions().get(idx),
            Tier::Full(f) => f.partitions().get(idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(k: i64, v: i64) -> Vec<Element> {
        vec![Element::Int(k), Element::Int(v)]
    }

    #[test]
    fn promotes_through_all_tiers() {
        let mut tier = Tier::new(2);
        let mut seen_small = false;
        let mut seen_medium = false;
        let mut seen_full = false;
        for k in 0..500 {
            tier.insert(kv(k, k * 2), true, true, None);
            tier.maybe_promote(2, 64, None);
            match tier.name() {
                "Small" => seen_small = true,
                "Medium" => seen_medium = true,
                "Full" => seen_full = true,
                _ => unreachable!(),
            }
        }
        assert!(seen_small && seen_medium && seen_full);
        assert_eq!(tier.len(), 500);
    }
}
