// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A minimal stand-in for the external atom/reference container that a real
//! deployment would own.
//!
//! The production atom container — a refcounted dictionary from atom id to
//! payload, shared across many maps — lives outside this crate. This module
//! provides just enough of it (`AtomTable`) to exercise reference/surrogate
//! mode in this crate's own tests; a real embedding would bring its own
//! resolver.

use crate::element::Element;
use std::collections::HashMap;

/// Opaque identifier for a value stored in an [`AtomTable`] (or any other
/// atom container implementing [`AtomResolver`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomId(pub u64);

/// Borrowed collaborator passed into map operations running in surrogate
/// mode. `resolve` must be a pure, side-effect-free lookup — it is called
/// on the hot path of every comparison.
pub trait AtomResolver {
    /// Reads the underlying element referenced by `id`.
    ///
    /// # Panics
    ///
    /// Implementations may panic on an unknown id; the core never invents
    /// ids itself, so any id it resolves was written by the same caller
    /// that owns the atom container.
    fn resolve(&self, id: AtomId) -> Element;
}

/// A toy atom container: id -> (payload, refcount).
///
/// Refcount maintenance is the caller's responsibility; this table tracks it
/// but never acts on it (no GC) — reads during map operations never mutate
/// the table.
#[derive(Debug, Default)]
pub struct AtomTable {
    next_id: u64,
    entries: HashMap<u64, (Element, u64)>,
}

impl AtomTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `value`, returning a fresh id with refcount 1.
    pub fn insert(&mut self, value: Element) -> AtomId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, (value, 1));
        AtomId(id)
    }

    /// Increments the refcount for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present.
    pub fn incref(&mut self, id: AtomId) {
        self.entries
            .get_mut(&id.0)
            .expect("incref of unknown atom id")
            .1 += 1;
    }

    /// Decrements the refcount for `id`, removing the entry once it reaches
    /// zero. Returns the new refcount, or `None` if the entry was removed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present.
    pub fn decref(&mut self, id: AtomId) -> Option<u64> {
        let entry = self.entries.get_mut(&id.0).expect("decref of unknown atom id");
        entry.1 -= 1;
        if entry.1 == 0 {
            self.entries.remove(&id.0);
            None
        } else {
            Some(entry.1)
        }
    }

    #[must_use]
    pub fn refcount(&self, id: AtomId) -> Option<u64> {
        self.entries.get(&id.0).map(|(_, rc)| *rc)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AtomResolver for AtomTable {
    fn resolve(&self, id: AtomId) -> Element {
        self.entries
            .get(&id.0)
            .unwrap_or_else(|| panic!("resolve of unknown atom id {}", id.0))
            .0
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_resolve() {
        let mut table = AtomTable::new();
        let id = table.insert(Element::Int(42));
        assert_eq!(table.resolve(id), Element::Int(42));
        assert_eq!(table.refcount(id), Some(1));
    }

    #[test]
    fn refcounting_frees_on_zero() {
        let mut table = AtomTable::new();
        let id = table.insert(Element::Bool(true));
        table.incref(id);
        assert_eq!(table.refcount(id), Some(2));
        assert_eq!(table.decref(id), Some(1));
        assert_eq!(table.decref(id), None);
        assert_eq!(table.refcount(id), None);
    }
}
