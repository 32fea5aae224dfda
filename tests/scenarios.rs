// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::collections::BinaryHeap;

use dyngraph::{bidirectional, Engine, Graph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init() {
    let _logger = env_logger::try_init();
}

#[test]
fn linear_chain() {
    init();
    let mut engine = Engine::new(4).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 2.0).unwrap();
    engine.add_edge(2, 3, 1.0).unwrap();
    engine.set_source(0).unwrap();

    let result = engine.shortest_path(3).unwrap();
    assert_eq!(result.distance, 4.0);
    assert_eq!(result.path, vec![0, 1, 2, 3]);
    assert!(result.reachable);
}

#[test]
fn case_a_incremental_heal() {
    init();
    let mut engine = Engine::new(4).unwrap();
    engine.add_edge(0, 1, 10.0).unwrap();
    engine.add_edge(1, 2, 10.0).unwrap();
    engine.add_edge(0, 3, 100.0).unwrap();
    engine.set_source(0).unwrap();

    assert_eq!(engine.distance(3).unwrap(), 100.0);

    engine.add_edge(2, 3, 1.0).unwrap();
    let result = engine.shortest_path(3).unwrap();
    assert_eq!(result.distance, 21.0);
    assert_eq!(result.path, vec![0, 1, 2, 3]);
}

#[test]
fn case_b_dirty_recompute() {
    init();
    let mut engine = Engine::new(4).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 1.0).unwrap();
    engine.add_edge(2, 3, 1.0).unwrap();
    engine.add_edge(0, 3, 10.0).unwrap();
    engine.set_source(0).unwrap();

    assert_eq!(engine.distance(3).unwrap(), 3.0);

    engine.remove_edge(1, 2).unwrap();
    let result = engine.shortest_path(3).unwrap();
    assert_eq!(result.distance, 10.0);
    assert_eq!(result.path, vec![0, 3]);
}

#[test]
fn case_b_with_source_in_dirty_subtree() {
    init();
    let mut engine = Engine::new(3).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 2.0).unwrap();
    engine.set_source(1).unwrap();

    assert_eq!(engine.distance(2).unwrap(), 2.0);

    engine.remove_edge(0, 1).unwrap();
    assert_eq!(engine.distance(2).unwrap(), 2.0);

    let result = engine.shortest_path(0).unwrap();
    assert!(!result.reachable);
}

#[test]
fn threshold_pruning() {
    init();
    let mut engine = Engine::new(4).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 1.0).unwrap();
    engine.add_edge(0, 3, 100.0).unwrap();
    engine.set_source(0).unwrap();
    engine.set_threshold(5.0);

    let far = engine.shortest_path(3).unwrap();
    assert!(!far.reachable);

    let near = engine.shortest_path(2).unwrap();
    assert_eq!(near.distance, 2.0);
}

#[test]
fn batched_case_a() {
    init();
    let mut engine = Engine::new(4).unwrap();
    engine.add_edge(0, 1, 10.0).unwrap();
    engine.add_edge(0, 3, 100.0).unwrap();
    engine.set_source(0).unwrap();

    assert_eq!(engine.distance(3).unwrap(), 100.0);

    engine.add_edge(1, 2, 1.0).unwrap();
    engine.add_edge(2, 3, 1.0).unwrap();
    let result = engine.shortest_path(3).unwrap();
    assert_eq!(result.distance, 12.0);
    assert_eq!(result.path, vec![0, 1, 2, 3]);
}

#[test]
fn invalidate_forces_a_from_scratch_result() {
    init();
    let mut engine = Engine::new(3).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 1.0).unwrap();
    engine.set_source(0).unwrap();
    assert_eq!(engine.distance(2).unwrap(), 2.0);

    engine.invalidate();
    assert_eq!(engine.distance(2).unwrap(), 2.0);
}

#[test]
fn add_then_remove_is_a_no_op_at_the_end() {
    init();
    let mut engine = Engine::new(3).unwrap();
    engine.add_edge(0, 1, 1.0).unwrap();
    engine.add_edge(1, 2, 1.0).unwrap();
    engine.set_source(0).unwrap();
    let before = engine.distance(2).unwrap();

    engine.add_edge(0, 2, 1.0).unwrap();
    let _ = engine.distance(2).unwrap();
    engine.remove_edge(0, 2).unwrap();

    let after = engine.distance(2).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unbounded_threshold_matches_plain_dijkstra() {
    init();
    let mut rng = StdRng::seed_from_u64(7);
    let n = 10;
    let mut engine = Engine::new(n).unwrap();
    let mut edges = Vec::new();
    for from in 0..n {
        for to in 0..n {
            if from != to && rng.gen_bool(0.3) {
                let w = rng.gen_range(1..20) as f64;
                engine.add_edge(from, to, w).unwrap();
                edges.push((from, to, w));
            }
        }
    }
    engine.set_source(0).unwrap();
    engine.set_threshold(f64::INFINITY);

    for target in 0..n {
        let expected = brute_force_dijkstra(n, &edges, 0, target);
        let actual = engine.distance(target).unwrap();
        assert_eq!(expected, actual, "mismatch for target {target}");
    }
}

#[test]
fn bidirectional_agrees_with_the_engine() {
    init();
    let mut rng = StdRng::seed_from_u64(11);
    let n = 8;
    let mut engine = Engine::new(n).unwrap();
    for from in 0..n {
        for to in 0..n {
            if from != to && rng.gen_bool(0.35) {
                let w = rng.gen_range(1..15) as f64;
                engine.add_edge(from, to, w).unwrap();
            }
        }
    }
    for source in 0..n {
        engine.set_source(source).unwrap();
        for target in 0..n {
            let single_source = engine.distance(target).unwrap();
            let bidi = bidirectional(engine.graph(), source, target).unwrap();
            assert_eq!(single_source, bidi.distance, "source {source} target {target}");
        }
    }
}

#[test]
fn randomized_mutation_sequence_tracks_a_from_scratch_recompute() {
    init();
    let mut rng = StdRng::seed_from_u64(42);
    let n = 6;
    let mut engine = Engine::new(n).unwrap();
    engine.set_source(0).unwrap();
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();

    for _ in 0..200 {
        let op = rng.gen_range(0..3);
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        if from == to {
            continue;
        }
        match op {
            0 => {
                let w = rng.gen_range(1..10) as f64;
                if engine.add_edge(from, to, w).unwrap() {
                    edges.push((from, to, w));
                }
            }
            1 => {
                if engine.remove_edge(from, to).unwrap() {
                    edges.retain(|&(f, t, _)| !(f == from && t == to));
                }
            }
            _ => {
                let w = rng.gen_range(1..10) as f64;
                let existed = edges.iter().position(|&(f, t, _)| f == from && t == to);
                engine.set_edge(from, to, w).unwrap();
                match existed {
                    Some(idx) => edges[idx].2 = w,
                    None => edges.push((from, to, w)),
                }
            }
        }

        let target = rng.gen_range(0..n);
        let expected = brute_force_dijkstra(n, &edges, 0, target);
        let actual = engine.distance(target).unwrap();
        assert_eq!(expected, actual, "mismatch for target {target} after mutation {op}");
    }
}

#[derive(PartialEq)]
struct HeapItem(f64, usize);

impl Eq for HeapItem {}
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.0.partial_cmp(&self.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn brute_force_dijkstra(n: usize, edges: &[(usize, usize, f64)], source: usize, target: usize) -> f64 {
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(HeapItem(0.0, source));
    while let Some(HeapItem(d, u)) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for &(f, t, w) in edges {
            if f != u {
                continue;
            }
            let nd = d + w;
            if nd < dist[t] {
                dist[t] = nd;
                heap.push(HeapItem(nd, t));
            }
        }
    }
    dist[target]
}

#[test]
fn graph_and_engine_reject_out_of_range_vertices() {
    let graph = Graph::new(2);
    assert!(graph.get_weight(0, 5).is_err());

    let mut engine = Engine::new(2).unwrap();
    assert!(engine.set_source(5).is_err());
}
