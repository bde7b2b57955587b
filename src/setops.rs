// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Set algebra over two maps: intersect, difference, symmetric difference,
//! union. All four are two-finger zipper merges driven by
//! [`crate::element::compare`] on column 0 of each side's forward iterator,
//! so they run in `O(|a| + |b|)` without materializing either input.

use crate::atom::AtomResolver;
use crate::config::Config;
use crate::element::{self, Element};
use crate::map::Map;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Entries with a handful of columns live on the stack; wider ones spill to
/// the heap.
type Scratch = SmallVec<[Element; 8]>;

fn via_scratch(entry: &[Element]) -> Scratch {
    entry.iter().cloned().collect()
}

fn assert_compatible(a: &Map, b: &Map) {
    assert_eq!(
        a.config().elements_per_entry(),
        b.config().elements_per_entry(),
        "set operation requires both maps to share elements_per_entry"
    );
}

/// Entries present in both `a` and `b` (matched by key). Values are taken
/// from `a`.
#[must_use]
pub fn intersect(a: &Map, b: &Map, resolver: Option<&dyn AtomResolver>) -> Vec<Vec<Element>> {
    assert_compatible(a, b);
    let mut out = Vec::new();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    while let (Some(x), Some(y)) = (ai.peek(), bi.peek()) {
        match element::compare(&x[0], &y[0], resolver) {
            Ordering::Less => {
                ai.next();
            }
            Ordering::Greater => {
                bi.next();
            }
            Ordering::Equal => {
                let scratch: Scratch = via_scratch(ai.next().unwrap().as_slice());
                bi.next();
                out.push(scratch.into_vec());
            }
        }
    }
    out
}

/// Entries present in `a` but not in `b` (asymmetric).
#[must_use]
pub fn difference(a: &Map, b: &Map, resolver: Option<&dyn AtomResolver>) -> Vec<Vec<Element>> {
    assert_compatible(a, b);
    let mut out = Vec::new();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    loop {
        match (ai.peek(), bi.peek()) {
            (None, _) => break,
            (Some(_), None) => {
                out.push(ai.next().unwrap());
            }
            (Some(x), Some(y)) => match element::compare(&x[0], &y[0], resolver) {
                Ordering::Less => out.push(ai.next().unwrap()),
                Ordering::Greater => {
                    bi.next();
                }
                Ordering::Equal => {
                    ai.next();
                    bi.next();
                }
            },
        }
    }
    out
}

/// Entries present in exactly one of `a`, `b`.
#[must_use]
pub fn symmetric_difference(
    a: &Map,
    b: &Map,
    resolver: Option<&dyn AtomResolver>,
) -> Vec<Vec<Element>> {
    assert_compatible(a, b);
    let mut out = Vec::new();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    loop {
        match (ai.peek(), bi.peek()) {
            (None, None) => break,
            (Some(_), None) => out.push(ai.next().unwrap()),
            (None, Some(_)) => out.push(bi.next().unwrap()),
            (Some(x), Some(y)) => match element::compare(&x[0], &y[0], resolver) {
                Ordering::Less => out.push(ai.next().unwrap()),
                Ordering::Greater => out.push(bi.next().unwrap()),
                Ordering::Equal => {
                    ai.next();
                    bi.next();
                }
            },
        }
    }
    out
}

/// Merges `a` and `b` into a freshly built map, preferring `a`'s value on
/// key collision.
#[must_use]
pub fn union(a: &Map, b: &Map, resolver: Option<&dyn AtomResolver>) -> Map {
    assert_compatible(a, b);
    let mut out = Map::new(a.config().clone());
    union_into(&mut out, a, b, resolver);
    out
}

/// Same as [`union`] but merges into an existing (typically empty) `dest`,
/// avoiding an extra map allocation when the caller already has one ready.
pub fn union_into(dest: &mut Map, a: &Map, b: &Map, resolver: Option<&dyn AtomResolver>) {
    assert_eq!(
        dest.config().elements_per_entry(),
        a.config().elements_per_entry(),
        "destination map arity must match the operands"
    );
    assert_compatible(a, b);
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    loop {
        let next = match (ai.peek(), bi.peek()) {
            (None, None) => break,
            (Some(_), None) => ai.next(),
            (None, Some(_)) => bi.next(),
            (Some(x), Some(y)) => match element::compare(&x[0], &y[0], resolver) {
                Ordering::Less => ai.next(),
                Ordering::Greater => bi.next(),
                Ordering::Equal => {
                    bi.next();
                    ai.next()
                }
            },
        };
        if let Some(entry) = next {
            let scratch: Scratch = via_scratch(&entry);
            dest.insert(scratch.into_vec(), resolver);
        }
    }
}
