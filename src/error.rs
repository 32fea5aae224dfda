// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::fmt;

/// Errors raised directly by [`crate::graph::Graph`] methods.
///
/// Raised at the API boundary before any mutation is applied; an `Err`
/// here means the graph's state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphError {
    /// A vertex identifier fell outside `[0, capacity)`.
    OutOfRange { vertex: usize, capacity: usize },
    /// An edge weight was negative.
    NegativeWeight { weight: f64 },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::OutOfRange { vertex, capacity } => write!(
                f,
                "vertex {vertex} is out of range for a graph of capacity {capacity}"
            ),
            GraphError::NegativeWeight { weight } => {
                write!(f, "edge weight {weight} is negative")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors raised by [`crate::engine::Engine`] operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineError {
    /// Propagated verbatim from the underlying [`crate::graph::Graph`].
    Graph(GraphError),
    /// A distance or path query was issued before `set_source`.
    NoSource,
    /// `Engine::new` was called with a capacity outside `[1, 100_000]`.
    CapacityRejected { requested: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Graph(inner) => write!(f, "{inner}"),
            EngineError::NoSource => {
                write!(f, "no source vertex is set; call set_source first")
            }
            EngineError::CapacityRejected { requested } => write!(
                f,
                "capacity {requested} is out of the allowed range [1, 100000]"
            ),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        EngineError::Graph(err)
    }
}
