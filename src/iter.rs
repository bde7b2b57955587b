// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Iteration across tier boundaries.
//!
//! An iterator is a position descriptor `{partition index, cursor,
//! direction}` that walks the logical global sorted order regardless of
//! which tier the map is in. Iterators borrow the map, so they are
//! invalidated by any mutation on the same map (enforced here the ordinary
//! way, through the borrow checker: `Iter<'a>` holds a `&'a Tier`, so no
//! mutating call can be made on the map while one is alive).

use crate::atom::AtomResolver;
use crate::element::Element;
use crate::tier::Tier;

/// A forward or backward cursor over a map's global sorted order.
pub struct Iter<'a> {
    tier: &'a Tier,
    partition: usize,
    cursor: Option<usize>,
    forward: bool,
}

impl<'a> Iter<'a> {
    pub(crate) fn forward(tier: &'a Tier) -> Self {
        let mut iter = Self {
            tier,
            partition: 0,
            cursor: None,
            forward: true,
        };
        iter.seek_first_forward();
        iter
    }

    pub(crate) fn backward(tier: &'a Tier) -> Self {
        let mut iter = Self {
            tier,
            partition: tier.partition_count().saturating_sub(1),
            cursor: None,
            forward: false,
        };
        iter.seek_first_backward();
        iter
    }

    /// Positions the iterator at the first entry with key `>= key`
    /// (`forward = true`) or `<= key` (`forward = false`).
    pub(crate) fn init_at(
        tier: &'a Tier,
        key: &Element,
        forward: bool,
        resolver: Option<&dyn AtomResolver>,
    ) -> Self {
        if forward {
            let mut p = 0;
            loop {
                match tier.partition(p) {
                    Some(seq) => {
                        if let Some(c) = seq.first_at_least(key, resolver) {
                            return Self {
                                tier,
                                partition: p,
                                cursor: Some(c),
                                forward: true,
                            };
                        }
                        p += 1;
                    }
                    None => {
                        return Self {
                            tier,
                            partition: p,
                            cursor: None,
                            forward: true,
                        }
                    }
                }
            }
        } else {
            let mut p = tier.partition_count();
            while p > 0 {
                p -= 1;
                if let Some(seq) = tier.partition(p) {
                    if let Some(c) = seq.last_at_most(key, resolver) {
                        return Self {
                            tier,
                            partition: p,
                            cursor: Some(c),
                            forward: false,
                        };
                    }
                }
            }
            Self {
                tier,
                partition: 0,
                cursor: None,
                forward: false,
            }
        }
    }

    fn seek_first_forward(&mut self) {
        let mut p = self.partition;
        loop {
            match self.tier.partition(p) {
                Some(seq) if !seq.is_empty() => {
                    self.partition = p;
                    self.cursor = seq.head();
                    return;
                }
                Some(_) => p += 1,
                None => {
                    self.cursor = None;
                    return;
                }
            }
        }
    }

    fn seek_first_backward(&mut self) {
        let mut p = self.tier.partition_count();
        while p > 0 {
            p -= 1;
            if let Some(seq) = self.tier.partition(p) {
                if !seq.is_empty() {
                    self.partition = p;
                    self.cursor = seq.tail();
                    return;
                }
            }
        }
        self.cursor = None;
    }

    fn advance(&mut self) {
        let Some(seq) = self.tier.partition(self.partition) else {
            self.cursor = None;
            return;
        };
        let Some(cursor) = self.cursor else { return };

        if self.forward {
            if let Some(next) = seq.next(cursor) {
                self.cursor = Some(next);
                return;
            }
            let mut p = self.partition + 1;
            loop {
                match self.tier.partition(p) {
                    Some(next_seq) if !next_seq.is_empty() => {
                        self.partition = p;
                        self.cursor = next_seq.head();
                        return;
                    }
                    Some(_) => p += 1,
                    None => {
                        self.cursor = None;
                        return;
                    }
                }
            }
        } else {
            if let Some(prev) = seq.prev(cursor) {
                self.cursor = Some(prev);
                return;
            }
            let mut p = self.partition;
            while p > 0 {
                p -= 1;
                if let Some(prev_seq) = self.tier.partition(p) {
                    if !prev_seq.is_empty() {
                        self.partition = p;
                        self.cursor = prev_seq.tail();
                        return;
                    }
                }
            }
            self.cursor = None;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Vec<Element>;

    fn next(&mut self) -> Option<Vec<Element>> {
        let cursor = self.cursor?;
        let seq = self.tier.partition(self.partition)?;
        let entry = seq.entry_copy(cursor);
        self.advance();
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::small::Small;

    fn kv(k: i64, v: i64) -> Vec<Element> {
        vec![Element::Int(k), Element::Int(v)]
    }

    #[test]
    fn forward_and_backward_visit_in_order() {
        let mut small = Small::new(2);
        for k in [3, 1, 4, 1, 5, 9, 2, 6].into_iter().collect::<std::collections::BTreeSet<_>>() {
            small.insert(kv(k, k), true, true, None);
        }
        let tier = Tier::Small(small);
        let forward: Vec<i64> = Iter::forward(&tier)
            .map(|e| match e[0] {
                Element::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        let mut expected = forward.clone();
        expected.sort_unstable();
        assert_eq!(forward, expected);

        let mut backward: Vec<i64> = Iter::backward(&tier)
            .map(|e| match e[0] {
                Element::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        backward.reverse();
        assert_eq!(backward, expected);
    }
}
