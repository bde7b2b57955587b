// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! An ordered, multi-column map that grows through three storage tiers —
//! Small, Medium, and Full — as it accumulates entries, trading the
//! simplicity of a single sorted run for the bounded insert/delete cost of
//! range-keyed partitioning once a single run would grow unwieldy.
//!
//! ```
//! use tiered_map::{Config, Element, Map};
//!
//! let mut map = Map::new(Config::key_value());
//! map.insert(vec![Element::Int(1), Element::Int(100)], None);
//! map.insert(vec![Element::Int(2), Element::Int(200)], None);
//! assert_eq!(map.lookup(&Element::Int(1), None), Some(vec![Element::Int(100)]));
//! ```
//!
//! Entries with columns beyond the key (surrogate/reference mode, where the
//! stored key is an id into an external "atom" table) compare through an
//! [`AtomResolver`] supplied at call time rather than being baked into the
//! map itself, so the same map type serves both plain and reference-keyed
//! workloads.

pub mod atom;
pub mod config;
pub mod element;
pub mod error;
mod full;
mod iter;
mod medium;
mod packed;
pub mod setops;
mod small;
mod tier;

mod map;

pub use atom::{AtomId, AtomResolver, AtomTable};
pub use config::Config;
pub use element::Element;
pub use error::{Error, Result};
pub use iter::Iter;
pub use map::Map;
pub use setops::{difference, intersect, symmetric_difference, union, union_into};
