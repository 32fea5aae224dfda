// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The stateless bidirectional source-target shortest-path query.
//!
//! Reads a [`Graph`] directly and never touches [`crate::engine::Engine`]
//! cache state, so it makes no assumption about which source is pinned
//! there.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::engine::PathResult;
use crate::error::GraphError;
use crate::graph::Graph;

#[derive(Clone, Copy, Debug, PartialEq)]
struct HeapEntry {
    dist: f64,
    vertex: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Direction {
    Forward,
    Backward,
}

/// Answers a one-off `source`-to-`target` shortest-path query by running
/// forward and backward Dijkstra searches that meet in the middle.
pub fn bidirectional(
    graph: &Graph,
    source: usize,
    target: usize,
) -> Result<PathResult, GraphError> {
    let capacity = graph.capacity();
    if source >= capacity {
        return Err(GraphError::OutOfRange {
            vertex: source,
            capacity,
        });
    }
    if target >= capacity {
        return Err(GraphError::OutOfRange {
            vertex: target,
            capacity,
        });
    }

    if source == target {
        return Ok(PathResult {
            distance: 0.0,
            path: vec![source],
            reachable: true,
        });
    }

    let mut dist_f = vec![f64::INFINITY; capacity];
    let mut dist_b = vec![f64::INFINITY; capacity];
    let mut parent_f: Vec<Option<usize>> = vec![None; capacity];
    let mut parent_b: Vec<Option<usize>> = vec![None; capacity];

    dist_f[source] = 0.0;
    dist_b[target] = 0.0;

    let mut heap_f = BinaryHeap::new();
    let mut heap_b = BinaryHeap::new();
    heap_f.push(HeapEntry {
        dist: 0.0,
        vertex: source,
    });
    heap_b.push(HeapEntry {
        dist: 0.0,
        vertex: target,
    });

    let mut best = f64::INFINITY;
    let mut meeting: Option<usize> = None;

    loop {
        let min_f = heap_f.peek().map(|e| e.dist).unwrap_or(f64::INFINITY);
        let min_b = heap_b.peek().map(|e| e.dist).unwrap_or(f64::INFINITY);

        if min_f + min_b >= best {
            break;
        }
        if heap_f.is_empty() && heap_b.is_empty() {
            break;
        }

        // Pop from whichever queue has the smaller top-of-heap; ties go
        // to forward.
        let direction = if heap_b.is_empty() || (!heap_f.is_empty() && min_f <= min_b) {
            Direction::Forward
        } else {
            Direction::Backward
        };

        match direction {
            Direction::Forward => {
                let Some(HeapEntry { dist: d, vertex: u }) = heap_f.pop() else {
                    continue;
                };
                if d > dist_f[u] {
                    continue;
                }
                if dist_b[u].is_finite() {
                    let candidate = dist_f[u] + dist_b[u];
                    if candidate < best {
                        best = candidate;
                        meeting = Some(u);
                    }
                }
                for edge in graph.iter_out(u) {
                    let nd = d + edge.weight;
                    if nd >= dist_f[edge.other] {
                        continue;
                    }
                    dist_f[edge.other] = nd;
                    parent_f[edge.other] = Some(u);
                    heap_f.push(HeapEntry {
                        dist: nd,
                        vertex: edge.other,
                    });
                }
            }
            Direction::Backward => {
                let Some(HeapEntry { dist: d, vertex: u }) = heap_b.pop() else {
                    continue;
                };
                if d > dist_b[u] {
                    continue;
                }
                if dist_f[u].is_finite() {
                    let candidate = dist_f[u] + dist_b[u];
                    if candidate < best {
                        best = candidate;
                        meeting = Some(u);
                    }
                }
                // Incoming edges at `u`, treated as outgoing in the
                // reverse graph.
                for edge in graph.iter_in(u) {
                    let nd = d + edge.weight;
                    if nd >= dist_b[edge.other] {
                        continue;
                    }
                    dist_b[edge.other] = nd;
                    parent_b[edge.other] = Some(u);
                    heap_b.push(HeapEntry {
                        dist: nd,
                        vertex: edge.other,
                    });
                }
            }
        }
    }

    let Some(m) = meeting else {
        return Ok(PathResult {
            distance: f64::INFINITY,
            path: Vec::new(),
            reachable: false,
        });
    };

    // Walk parentF from m back to source (inclusive), then parentB from m
    // forward to target, without duplicating m.
    let mut prefix = vec![m];
    let mut v = m;
    while v != source {
        let Some(p) = parent_f[v] else {
            // Defensive: a meeting vertex's forward parent chain should
            // always reach `source`; treat a break as unreachable.
            return Ok(PathResult {
                distance: f64::INFINITY,
                path: Vec::new(),
                reachable: false,
            });
        };
        v = p;
        prefix.push(v);
    }
    prefix.reverse();

    let mut suffix = Vec::new();
    let mut v = m;
    while v != target {
        let Some(p) = parent_b[v] else {
            // Defensive: same reasoning, mirrored for the backward chain.
            return Ok(PathResult {
                distance: f64::INFINITY,
                path: Vec::new(),
                reachable: false,
            });
        };
        v = p;
        suffix.push(v);
    }

    prefix.extend(suffix);
    Ok(PathResult {
        distance: best,
        path: prefix,
        reachable: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_source_and_target() {
        let graph = Graph::new(3);
        let result = bidirectional(&graph, 1, 1).unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.path, vec![1]);
        assert!(result.reachable);
    }

    #[test]
    fn unreachable_target() {
        let mut graph = Graph::new(3);
        graph.add(0, 1, 1.0).unwrap();
        let result = bidirectional(&graph, 0, 2).unwrap();
        assert!(!result.reachable);
        assert_eq!(result.distance, f64::INFINITY);
        assert!(result.path.is_empty());
    }

    #[test]
    fn meets_in_the_middle() {
        let mut graph = Graph::new(4);
        graph.add(0, 1, 1.0).unwrap();
        graph.add(1, 2, 1.0).unwrap();
        graph.add(2, 3, 1.0).unwrap();
        let result = bidirectional(&graph, 0, 3).unwrap();
        assert_eq!(result.distance, 3.0);
        assert_eq!(result.path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let graph = Graph::new(2);
        assert_eq!(
            bidirectional(&graph, 0, 5),
            Err(GraphError::OutOfRange {
                vertex: 5,
                capacity: 2
            })
        );
    }
}
