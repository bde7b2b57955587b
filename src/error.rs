// Copyright (c) 2024-present, tiered-map authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use thiserror::Error;

/// Errors that can occur when constructing or configuring a [`crate::Map`].
///
/// Per the core's error taxonomy, structural operations on an already-valid
/// map (insert/delete/lookup/iterate) never fail: not-found is a `bool` or
/// `Option`, and configuration mismatches between set-op operands are
/// programmer errors reported via `assert!`/`debug_assert!`, not `Error`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// `elements_per_entry` was zero, or exceeded the 16-bit limit.
    #[error("elements_per_entry must be in 1..=65535, got {0}")]
    InvalidArity(u32),

    /// `max_size` was zero, or exceeded the 64 KiB partition cap.
    #[error("max_size must be in 1..=65536, got {0}")]
    InvalidMaxSize(u32),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
