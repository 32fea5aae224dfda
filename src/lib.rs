// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

#![deny(warnings)]
// Enable all clippy lints except for many of the pedantic ones. It's a shame this needs to be copied and pasted across crates, but there doesn't appear to be a way to include inner attributes from a common source.
#![deny(
    clippy::all,
    clippy::default_trait_access,
    clippy::expl_impl_clone_on_copy,
    clippy::if_not_else,
    clippy::needless_continue,
    clippy::unseparated_literal_suffix,
    clippy::used_underscore_binding
)]
// It is often more clear to show that nothing is being moved.
#![allow(clippy::match_ref_pats)]
// Subjective style.
#![allow(
    clippy::len_without_is_empty,
    clippy::redundant_field_names,
    clippy::too_many_arguments
)]
// Default isn't as big a deal as people seem to think it is.
#![allow(clippy::new_without_default, clippy::new_ret_no_self)]

//! An in-memory engine that maintains a single-source shortest-path tree
//! over a mutable, non-negative-weighted directed graph, healing the
//! cached tree incrementally as edges are added, removed, or reweighted
//! instead of recomputing it from scratch on every query.

mod bidirectional;
mod engine;
mod error;
mod graph;
mod version;

pub use crate::bidirectional::bidirectional;
pub use crate::engine::{Engine, EngineStats, PathResult, MAX_CAPACITY, MIN_CAPACITY};
pub use crate::error::{EngineError, GraphError};
pub use crate::graph::{AdjacentEdge, Graph, NO_PRIOR_EDGE};

///
/// Logs at trace level, but only in `cfg(test)`.
///
#[macro_export]
macro_rules! test_trace_log {
    ($($arg:tt)+) => {
      #[cfg(test)]
      {
        log::trace!($($arg)+)
      }
    };
}
