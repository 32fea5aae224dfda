// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! Small newtypes for the version counters the engine uses to decide when
//! its cached shortest-path tree can be trusted: a `u64` wrapped in a unit
//! struct with `initial()` and `next()`, applied here to `graph_version`
//! and the `(graph_version, threshold)` commit key.

use std::fmt;

/// A strictly increasing counter bumped on every mutation notification.
///
/// Need not be contiguous: `Engine::invalidate` is allowed to skip ahead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GraphVersion(u64);

impl GraphVersion {
    pub fn initial() -> GraphVersion {
        GraphVersion(0)
    }

    #[must_use]
    pub fn next(self) -> GraphVersion {
        GraphVersion(self.0 + 1)
    }

    /// True iff `self` is exactly one mutation ahead of `other`.
    ///
    /// Used to decide whether the dirty-descendant walk of a tightening
    /// mutation is safe: it only is when this is the first mutation since
    /// the last commit.
    pub fn is_successor_of(self, other: GraphVersion) -> bool {
        self.0 == other.0 + 1
    }
}

impl fmt::Display for GraphVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The `(graph_version, threshold)` pair that a cached SPT is known fresh
/// for, or `None` if no full computation has ever committed.
///
/// Keying on the pair (rather than `graph_version` alone) matters because
/// a threshold-limited full run must not be trusted once the threshold
/// changes: vertices beyond the old threshold were left at `dist = +inf`
/// without reflecting their true distance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommitKey {
    pub version: GraphVersion,
    pub threshold_bits: u64,
}

impl CommitKey {
    pub fn new(version: GraphVersion, threshold: f64) -> CommitKey {
        CommitKey {
            version,
            threshold_bits: threshold.to_bits(),
        }
    }
}
