// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The mutable weighted digraph underlying the shortest-path engine.
//!
//! Vertices are implicit integers in `[0, capacity)`; there is no per-vertex
//! allocation beyond the two adjacency lists every vertex owns. At most one
//! edge exists per ordered pair `(from, to)`; the outgoing record at `from`
//! and its mirror incoming record at `to` are always updated together.

use crate::error::GraphError;

/// A single edge as stored in an adjacency list: the other endpoint and the
/// current weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjacentEdge {
    pub other: usize,
    pub weight: f64,
}

/// A weighted directed graph over `[0, capacity)` with at most one edge per
/// ordered pair, and both outgoing and incoming adjacency maintained.
///
/// No lock-guarded inner handle is needed here, since mutation is never
/// concurrent.
#[derive(Clone, Debug)]
pub struct Graph {
    capacity: usize,
    // Iteration order must be insertion order within a vertex; a HashMap
    // would not preserve that, so plain Vec<AdjacentEdge> is used and
    // existence is checked by linear scan, which is fine given typical
    // sparse degree.
    out_adj: Vec<Vec<AdjacentEdge>>,
    in_adj: Vec<Vec<AdjacentEdge>>,
    edge_count: usize,
}

/// Sentinel returned by `set_weight`/`get_weight` when no prior edge
/// existed.
pub const NO_PRIOR_EDGE: f64 = -1.0;

impl Graph {
    /// Creates a graph with `capacity` vertices, all isolated.
    ///
    /// Capacity bounds ([1, 100_000]) are an `Engine`-level concern;
    /// `Graph` itself only requires `capacity >= 1` implicitly by never
    /// being asked for a vertex outside `[0, capacity)`.
    pub fn new(capacity: usize) -> Graph {
        Graph {
            capacity,
            out_adj: vec![Vec::new(); capacity],
            in_adj: vec![Vec::new(); capacity],
            edge_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn check_vertex(&self, v: usize) -> Result<(), GraphError> {
        if v < self.capacity {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                vertex: v,
                capacity: self.capacity,
            })
        }
    }

    fn check_weight(&self, weight: f64) -> Result<(), GraphError> {
        if weight >= 0.0 {
            Ok(())
        } else {
            Err(GraphError::NegativeWeight { weight })
        }
    }

    /// Inserts the edge `(from, to, weight)` if absent.
    ///
    /// Returns `Ok(false)` without side effect if the edge already exists.
    pub fn add(&mut self, from: usize, to: usize, weight: f64) -> Result<bool, GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        self.check_weight(weight)?;

        if self.out_adj[from].iter().any(|e| e.other == to) {
            return Ok(false);
        }

        self.out_adj[from].push(AdjacentEdge { other: to, weight });
        self.in_adj[to].push(AdjacentEdge {
            other: from,
            weight,
        });
        self.edge_count += 1;
        Ok(true)
    }

    /// Removes the edge `(from, to)` if present.
    ///
    /// Returns `Ok(false)` without side effect if no such edge exists.
    pub fn remove(&mut self, from: usize, to: usize) -> Result<bool, GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let out_pos = self.out_adj[from].iter().position(|e| e.other == to);
        let Some(out_pos) = out_pos else {
            return Ok(false);
        };
        // Exactly one mirror is expected to exist; if it is somehow
        // missing, this is defensive and should not panic.
        let in_pos = self.in_adj[to].iter().position(|e| e.other == from);

        self.out_adj[from].remove(out_pos);
        if let Some(in_pos) = in_pos {
            self.in_adj[to].remove(in_pos);
        }
        self.edge_count -= 1;
        Ok(true)
    }

    /// Sets the weight of `(from, to)`, inserting it if absent.
    ///
    /// Returns the previous weight, or [`NO_PRIOR_EDGE`] if the edge did not
    /// exist (it has now been inserted).
    pub fn set_weight(
        &mut self,
        from: usize,
        to: usize,
        new_weight: f64,
    ) -> Result<f64, GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        self.check_weight(new_weight)?;

        if let Some(edge) = self.out_adj[from].iter_mut().find(|e| e.other == to) {
            let prior = edge.weight;
            edge.weight = new_weight;
            if let Some(mirror) = self.in_adj[to].iter_mut().find(|e| e.other == from) {
                mirror.weight = new_weight;
            }
            return Ok(prior);
        }

        self.out_adj[from].push(AdjacentEdge {
            other: to,
            weight: new_weight,
        });
        self.in_adj[to].push(AdjacentEdge {
            other: from,
            weight: new_weight,
        });
        self.edge_count += 1;
        Ok(NO_PRIOR_EDGE)
    }

    /// Returns the current weight of `(from, to)`, or [`NO_PRIOR_EDGE`] if
    /// absent.
    pub fn get_weight(&self, from: usize, to: usize) -> Result<f64, GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        Ok(self.out_adj[from]
            .iter()
            .find(|e| e.other == to)
            .map(|e| e.weight)
            .unwrap_or(NO_PRIOR_EDGE))
    }

    /// Outgoing edges at `v`, in insertion order.
    pub fn iter_out(&self, v: usize) -> impl Iterator<Item = AdjacentEdge> + '_ {
        self.out_adj[v].iter().copied()
    }

    /// Incoming edges at `v`, in insertion order.
    pub fn iter_in(&self, v: usize) -> impl Iterator<Item = AdjacentEdge> + '_ {
        self.in_adj[v].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_out_of_range() {
        let mut g = Graph::new(2);
        assert_eq!(
            g.add(0, 2, 1.0),
            Err(GraphError::OutOfRange {
                vertex: 2,
                capacity: 2
            })
        );
    }

    #[test]
    fn add_rejects_negative_weight() {
        let mut g = Graph::new(2);
        assert_eq!(
            g.add(0, 1, -1.0),
            Err(GraphError::NegativeWeight { weight: -1.0 })
        );
    }

    #[test]
    fn add_is_idempotent_per_ordered_pair() {
        let mut g = Graph::new(2);
        assert_eq!(g.add(0, 1, 5.0), Ok(true));
        assert_eq!(g.add(0, 1, 9.0), Ok(false));
        assert_eq!(g.get_weight(0, 1), Ok(5.0));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn remove_updates_both_adjacency_lists() {
        let mut g = Graph::new(2);
        g.add(0, 1, 5.0).unwrap();
        assert_eq!(g.remove(0, 1), Ok(true));
        assert_eq!(g.iter_out(0).count(), 0);
        assert_eq!(g.iter_in(1).count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.remove(0, 1), Ok(false));
    }

    #[test]
    fn set_weight_inserts_when_absent() {
        let mut g = Graph::new(2);
        assert_eq!(g.set_weight(0, 1, 3.0), Ok(NO_PRIOR_EDGE));
        assert_eq!(g.set_weight(0, 1, 7.0), Ok(3.0));
        assert_eq!(g.get_weight(0, 1), Ok(7.0));
    }

    #[test]
    fn get_weight_absent_is_sentinel() {
        let g = Graph::new(2);
        assert_eq!(g.get_weight(0, 1), Ok(NO_PRIOR_EDGE));
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut g = Graph::new(4);
        g.add(0, 3, 1.0).unwrap();
        g.add(0, 1, 1.0).unwrap();
        g.add(0, 2, 1.0).unwrap();
        let order: Vec<usize> = g.iter_out(0).map(|e| e.other).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }
}
