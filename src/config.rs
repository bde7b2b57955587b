// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::error::{Error, Result};

/// Maximum number of elements allowed in a single entry; `elements_per_entry`
/// is stored in 16 bits.
pub const MAX_ELEMENTS_PER_ENTRY: u32 = u16::MAX as u32;

/// Maximum byte size of a Full-tier sub-sequence.
pub const MAX_PARTITION_SIZE: u32 = 65_536;

/// Per-map configuration.
///
/// Validated once at construction; every subsequent operation assumes a
/// valid `Config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    elements_per_entry: u16,
    max_size: u32,
    map_is_set: bool,
    compress: bool,
    is_surrogate: bool,
}

impl Config {
    /// Creates a configuration for a `(key, value)` map (`elements_per_entry = 2`)
    /// with the default partition size, set semantics, no compression, no
    /// reference mode.
    #[must_use]
    pub fn key_value() -> Self {
        Self {
            elements_per_entry: 2,
            max_size: MAX_PARTITION_SIZE,
            map_is_set: true,
            compress: false,
            is_surrogate: false,
        }
    }

    /// Creates and validates a configuration with the given arity and
    /// partition size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArity`] if `elements_per_entry` is `0` or
    /// exceeds `65535`, and [`Error::InvalidMaxSize`] if `max_size` is `0`
    /// or exceeds `65536`.
    pub fn new(elements_per_entry: u32, max_size: u32) -> Result<Self> {
        if elements_per_entry == 0 || elements_per_entry > MAX_ELEMENTS_PER_ENTRY {
            return Err(Error::InvalidArity(elements_per_entry));
        }
        if max_size == 0 || max_size > MAX_PARTITION_SIZE {
            return Err(Error::InvalidMaxSize(max_size));
        }

        Ok(Self {
            #[allow(clippy::cast_possible_truncation)]
            elements_per_entry: elements_per_entry as u16,
            max_size,
            map_is_set: true,
            compress: false,
            is_surrogate: false,
        })
    }

    /// Sets whether the map rejects/replaces duplicates (`true`, the
    /// default) or permits them as a list (`false`).
    #[must_use]
    pub fn with_set_semantics(mut self, map_is_set: bool) -> Self {
        self.map_is_set = map_is_set;
        self
    }

    /// Sets whether sub-sequences may be held compressed by the packed-
    /// sequence collaborator. Does not change observable semantics; the
    /// in-memory [`crate::packed::PackedSeq`] used by this crate does not
    /// implement an actual compression backend, so this flag is currently
    /// cosmetic / forwarded for API compatibility with a future
    /// collaborator that does.
    #[must_use]
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Sets reference/surrogate mode: stored keys are atom ids resolved
    /// through an [`crate::atom::AtomResolver`] at compare time.
    ///
    /// The flag itself is advisory: whether a compare actually dereferences
    /// happens per call, driven by whether an `AtomResolver` is passed to
    /// that call, not by this flag. Set it so callers of `config()` can tell
    /// a surrogate-keyed map from a plain one without inspecting live data.
    #[must_use]
    pub fn with_surrogate(mut self, is_surrogate: bool) -> Self {
        self.is_surrogate = is_surrogate;
        self
    }

    #[must_use]
    pub fn elements_per_entry(&self) -> u16 {
        self.elements_per_entry
    }

    #[must_use]
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    #[must_use]
    pub fn map_is_set(&self) -> bool {
        self.map_is_set
    }

    #[must_use]
    pub fn compress(&self) -> bool {
        self.compress
    }

    #[must_use]
    pub fn is_surrogate(&self) -> bool {
        self.is_surrogate
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::key_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_arity() {
        assert_eq!(Config::new(0, 64).unwrap_err(), Error::InvalidArity(0));
    }

    #[test]
    fn rejects_oversize_max_size() {
        assert_eq!(
            Config::new(2, 70_000).unwrap_err(),
            Error::InvalidMaxSize(70_000)
        );
    }

    #[test]
    fn builder_round_trip() {
        let cfg = Config::new(3, 128)
            .unwrap()
            .with_set_semantics(false)
            .with_surrogate(true);
        assert_eq!(cfg.elements_per_entry(), 3);
        assert_eq!(cfg.max_size(), 128);
        assert!(!cfg.map_is_set());
        assert!(cfg.is_surrogate());
    }
}
