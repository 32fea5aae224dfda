// Copyright 2026 Dyngraph contributors.
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The incremental shortest-path engine.
//!
//! Caches a single-source shortest-path tree (SPT) and reuses it across
//! queries, healing it locally on relaxing mutations (Case A) and lazily
//! invalidating it on tightening mutations (Case B) rather than
//! recomputing from scratch every time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fnv::FnvHashSet;

use crate::error::{EngineError, GraphError};
use crate::graph::Graph;
use crate::version::{CommitKey, GraphVersion};

/// Smallest and largest capacity `Engine::new` accepts.
pub const MIN_CAPACITY: usize = 1;
pub const MAX_CAPACITY: usize = 100_000;

/// The result of a `shortest_path` query.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    pub distance: f64,
    pub path: Vec<usize>,
    pub reachable: bool,
}

/// Bookkeeping counters, plain fields rather than atomics since there is
/// exactly one owner. Purely diagnostic: nothing here changes a query
/// result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EngineStats {
    pub full_runs: usize,
    pub dirty_recomputes: usize,
    pub case_a_flushes: usize,
    pub edges_relaxed: usize,
    /// Cumulative count of vertices added to the dirty set across every
    /// Case B mutation this engine has observed.
    pub vertices_dirtied: usize,
}

// A min-heap entry ordered by ascending tentative distance. Weights are
// validated non-negative and finite at the Graph boundary, and sums of
// finite non-negative weights cannot produce NaN, so `partial_cmp` is safe
// to unwrap here.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HeapEntry {
    dist: f64,
    vertex: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` (a max-heap) pops the smallest
        // distance first.
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

/// Maintains a cached single-source shortest-path tree over a [`Graph`] and
/// answers distance/path queries with incremental work where possible.
///
/// Binds to one `Graph` for its lifetime; all mutations are expected to
/// flow through this engine's `add_edge`/`remove_edge`/`set_edge`, which
/// forward to the `Graph` and then record the bookkeeping needed to keep
/// the cached tree healable.
pub struct Engine {
    graph: Graph,
    source: Option<usize>,
    dist: Vec<f64>,
    parent: Vec<Option<usize>>,
    /// `children[u]` is the set of `v` with `parent[v] == Some(u)`; the
    /// transpose of `parent` needed for the dirty-descendant walk.
    children: Vec<Vec<usize>>,
    graph_version: GraphVersion,
    committed: Option<CommitKey>,
    pending_relax: Vec<(usize, usize, f64)>,
    dirty: FnvHashSet<usize>,
    threshold: f64,
    stats: EngineStats,
}

impl Engine {
    /// Creates an engine over a fresh `Graph` of the given capacity.
    pub fn new(capacity: usize) -> Result<Engine, EngineError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(EngineError::CapacityRejected {
                requested: capacity,
            });
        }
        Ok(Engine {
            graph: Graph::new(capacity),
            source: None,
            dist: vec![f64::INFINITY; capacity],
            parent: vec![None; capacity],
            children: vec![Vec::new(); capacity],
            graph_version: GraphVersion::initial(),
            committed: None,
            pending_relax: Vec::new(),
            dirty: FnvHashSet::default(),
            threshold: f64::INFINITY,
            stats: EngineStats::default(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.graph.capacity()
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Read-only access to the underlying graph, e.g. for
    /// [`crate::bidirectional::bidirectional`].
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn check_vertex(&self, v: usize) -> Result<(), EngineError> {
        if v < self.graph.capacity() {
            Ok(())
        } else {
            Err(EngineError::Graph(GraphError::OutOfRange {
                vertex: v,
                capacity: self.graph.capacity(),
            }))
        }
    }

    /// Pins the source vertex, clearing all per-source cache state. The
    /// `Graph` itself is untouched.
    pub fn set_source(&mut self, s: usize) -> Result<(), EngineError> {
        self.check_vertex(s)?;
        if self.source != Some(s) {
            self.source = Some(s);
            self.reset_cache();
        }
        Ok(())
    }

    fn reset_cache(&mut self) {
        self.dist.iter_mut().for_each(|d| *d = f64::INFINITY);
        self.parent.iter_mut().for_each(|p| *p = None);
        self.children.iter_mut().for_each(|c| c.clear());
        self.pending_relax.clear();
        self.dirty.clear();
        self.committed = None;
    }

    /// Stores `max(t, 0)`; non-finite or negative values normalize to
    /// `+inf`.
    pub fn set_threshold(&mut self, t: f64) {
        self.threshold = if !t.is_finite() || t < 0.0 {
            f64::INFINITY
        } else if t == 0.0 {
            // Collapse -0.0 to 0.0 so the commit key's bitwise comparison
            // treats them as the same threshold.
            0.0
        } else {
            t
        };
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn commit_key(&self) -> CommitKey {
        CommitKey::new(self.graph_version, self.threshold)
    }

    fn is_fresh(&self) -> bool {
        self.committed == Some(self.commit_key())
    }

    /// Whether a prior committed SPT exists under the *current* threshold.
    /// A committed run under a different threshold cannot safely seed Case
    /// A/B incremental work: vertices beyond the old threshold may hold
    /// `dist = +inf` that does not reflect their true distance.
    fn has_usable_prior_commit(&self) -> bool {
        matches!(self.committed, Some(k) if k.threshold_bits == self.threshold.to_bits())
    }

    // -- mutation surface, forwarded to Graph plus engine bookkeeping --

    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<bool, EngineError> {
        let inserted = self.graph.add(from, to, weight)?;
        if inserted {
            self.notify_added(from, to, weight);
        }
        Ok(inserted)
    }

    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<bool, EngineError> {
        let removed = self.graph.remove(from, to)?;
        if removed {
            self.notify_removed(to);
        }
        Ok(removed)
    }

    pub fn set_edge(&mut self, from: usize, to: usize, new_weight: f64) -> Result<(), EngineError> {
        let prior = self.graph.set_weight(from, to, new_weight)?;
        if prior < 0.0 {
            // No prior edge: this was an insertion, a Case A hint.
            self.notify_added(from, to, new_weight);
        } else if new_weight < prior {
            self.notify_weight_changed(from, to, new_weight);
        } else if new_weight > prior {
            self.notify_weight_changed_tightening(to);
        }
        // new_weight == prior: short-circuited as a no-op. Routing this to
        // Case B would be harmless but wasteful, since no distance can
        // possibly change.
        Ok(())
    }

    fn record_dirtied(&mut self, dirtied: usize) {
        self.stats.vertices_dirtied += dirtied;
    }

    /// Case A hint: an edge was inserted. Queued for a later pending flush
    /// rather than relaxed immediately, so a batch of insertions shares one
    /// heap run.
    fn notify_added(&mut self, from: usize, to: usize, weight: f64) {
        self.graph_version = self.graph_version.next();
        self.pending_relax.push((from, to, weight));
    }

    /// Case B hint: an edge was removed.
    fn notify_removed(&mut self, to: usize) {
        self.graph_version = self.graph_version.next();
        let dirtied = self.expand_dirty_from(to);
        log::info!("edge removal dirtied {to} and {dirtied} descendant(s)");
        self.record_dirtied(dirtied);
    }

    /// Case A hint: a weight decreased.
    fn notify_weight_changed(&mut self, from: usize, to: usize, new_w: f64) {
        self.graph_version = self.graph_version.next();
        self.pending_relax.push((from, to, new_w));
    }

    /// Case B hint: a weight increased.
    fn notify_weight_changed_tightening(&mut self, to: usize) {
        self.graph_version = self.graph_version.next();
        let dirtied = self.expand_dirty_from(to);
        log::info!("weight increase dirtied {to} and {dirtied} descendant(s)");
        self.record_dirtied(dirtied);
    }

    /// Expands `self.dirty` with `to` and, if safe, its descendants in the
    /// cached SPT. Returns the number of vertices newly added.
    fn expand_dirty_from(&mut self, to: usize) -> usize {
        let before = self.dirty.len();
        let safe_to_walk_descendants = match self.committed {
            Some(key) => self.graph_version.is_successor_of(key.version),
            None => false,
        };

        self.dirty.insert(to);
        if safe_to_walk_descendants {
            let mut queue: Vec<usize> = self.children.get(to).cloned().unwrap_or_default();
            while let Some(v) = queue.pop() {
                if self.dirty.insert(v) {
                    queue.extend(self.children[v].iter().copied());
                }
            }
        }
        self.dirty.len() - before
    }

    /// Bumps `graph_version` with no bookkeeping: the caller has reason to
    /// doubt cache validity for a mutation the engine was never told about.
    pub fn invalidate(&mut self) {
        log::info!("cache invalidated by external request at {}", self.graph_version);
        self.graph_version = self.graph_version.next();
    }

    // -- queries --

    /// Returns the distance from the pinned source to `target`.
    pub fn distance(&mut self, target: usize) -> Result<f64, EngineError> {
        self.check_vertex(target)?;
        let source = self.source.ok_or(EngineError::NoSource)?;
        self.ensure_fresh(source, None);
        Ok(self.dist[target])
    }

    /// Returns the shortest path from the pinned source to `target`.
    pub fn shortest_path(&mut self, target: usize) -> Result<PathResult, EngineError> {
        self.check_vertex(target)?;
        let source = self.source.ok_or(EngineError::NoSource)?;
        self.ensure_fresh(source, Some(target));

        if self.dist[target].is_infinite() {
            return Ok(PathResult {
                distance: f64::INFINITY,
                path: Vec::new(),
                reachable: false,
            });
        }

        let mut path = vec![target];
        let mut v = target;
        while v != source {
            match self.parent[v] {
                Some(p) => {
                    v = p;
                    path.push(v);
                }
                // Defensive: should already have been caught by the
                // dist[target] == +inf check above.
                None => {
                    return Ok(PathResult {
                        distance: f64::INFINITY,
                        path: Vec::new(),
                        reachable: false,
                    });
                }
            }
        }
        path.reverse();
        Ok(PathResult {
            distance: self.dist[target],
            path,
            reachable: true,
        })
    }

    /// The freshness protocol: picks the cheapest of (nothing / dirty
    /// recompute / pending flush / full run) that the current cache state
    /// allows, and applies it.
    ///
    /// `source` is the already-pinned source vertex; callers have checked
    /// `self.source.is_some()` before reaching here, so it is taken as a
    /// plain `usize` rather than re-derived from `self.source` downstream.
    fn ensure_fresh(&mut self, source: usize, target: Option<usize>) {
        if self.is_fresh() {
            return;
        }

        let completed = if !self.dirty.is_empty() {
            log::debug!("ensure_fresh: dirty recompute ({} dirty)", self.dirty.len());
            if self.has_usable_prior_commit() {
                self.stats.dirty_recomputes += 1;
                self.dirty_recompute(source, target)
            } else {
                self.stats.full_runs += 1;
                self.full_recompute(source, target)
            }
        } else if !self.pending_relax.is_empty() && self.has_usable_prior_commit() {
            log::debug!(
                "ensure_fresh: pending flush ({} pending)",
                self.pending_relax.len()
            );
            self.stats.case_a_flushes += 1;
            self.pending_flush(target)
        } else {
            log::debug!("ensure_fresh: full recompute");
            self.stats.full_runs += 1;
            self.full_recompute(source, target)
        };

        self.dirty.clear();
        self.pending_relax.clear();
        if completed {
            self.committed = Some(self.commit_key());
        }
        // Target-truncated runs do not advance `committed`: other
        // vertices may still be stale.
    }

    /// Case A: flush pending relaxations, then run the shared loop with the
    /// resulting (possibly non-empty) heap state. Returns whether the run
    /// reached full coverage (heap drained with no target, or no target
    /// given at all).
    fn pending_flush(&mut self, target: Option<usize>) -> bool {
        let mut heap = BinaryHeap::new();
        let pending = std::mem::take(&mut self.pending_relax);
        for (from, to, w) in pending {
            if !self.dist[from].is_finite() {
                continue;
            }
            let cand = self.dist[from] + w;
            if cand >= self.dist[to] {
                continue;
            }
            self.relax(to, from, cand);
            heap.push(HeapEntry {
                dist: cand,
                vertex: to,
            });
        }
        self.dijkstra_loop(&mut heap, target)
    }

    /// Case B: reset the dirty subtree, re-seed from source and the
    /// boundary, then run the shared loop.
    fn dirty_recompute(&mut self, source: usize, target: Option<usize>) -> bool {
        let dirty: Vec<usize> = self.dirty.iter().copied().collect();
        for &v in &dirty {
            self.clear_vertex(v);
        }

        self.dist[source] = 0.0;
        self.parent[source] = Some(source);

        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry {
            dist: 0.0,
            vertex: source,
        });

        let dirty_set: FnvHashSet<usize> = dirty.into_iter().collect();
        for v in 0..self.graph.capacity() {
            if dirty_set.contains(&v) || !self.dist[v].is_finite() {
                continue;
            }
            if self.graph.iter_out(v).any(|e| dirty_set.contains(&e.other)) {
                heap.push(HeapEntry {
                    dist: self.dist[v],
                    vertex: v,
                });
            }
        }

        self.dijkstra_loop(&mut heap, target)
    }

    /// No usable prior commit exists: recompute from scratch.
    fn full_recompute(&mut self, source: usize, target: Option<usize>) -> bool {
        self.dist.iter_mut().for_each(|d| *d = f64::INFINITY);
        self.parent.iter_mut().for_each(|p| *p = None);
        self.children.iter_mut().for_each(|c| c.clear());

        self.dist[source] = 0.0;
        self.parent[source] = Some(source);

        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry {
            dist: 0.0,
            vertex: source,
        });

        self.dijkstra_loop(&mut heap, target)
    }

    /// The shared Dijkstra main loop. Returns `true` if the heap drained
    /// (full coverage of all reachable-within-threshold vertices), `false`
    /// if it stopped early because `target` was settled.
    fn dijkstra_loop(&mut self, heap: &mut BinaryHeap<HeapEntry>, target: Option<usize>) -> bool {
        while let Some(HeapEntry { dist: d, vertex: u }) = heap.pop() {
            if d > self.dist[u] {
                continue; // stale (lazy deletion)
            }
            if d > self.threshold {
                continue;
            }
            if target == Some(u) {
                return false;
            }

            let edges: Vec<(usize, f64)> =
                self.graph.iter_out(u).map(|e| (e.other, e.weight)).collect();
            for (v, w) in edges {
                let nd = d + w;
                if nd > self.threshold {
                    continue;
                }
                if nd >= self.dist[v] {
                    continue;
                }
                self.relax(v, u, nd);
                self.stats.edges_relaxed += 1;
                heap.push(HeapEntry { dist: nd, vertex: v });
            }
        }
        true
    }

    /// Applies a relaxation: `v`'s distance improves to `nd` via `parent`.
    /// Keeps the `children` transpose map in sync.
    fn relax(&mut self, v: usize, new_parent: usize, nd: f64) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("relaxed {v} to {nd} via {new_parent} (was {})", self.dist[v]);
        }
        if let Some(old_parent) = self.parent[v] {
            if old_parent != v {
                self.remove_child(old_parent, v);
            }
        }
        self.dist[v] = nd;
        self.parent[v] = Some(new_parent);
        if new_parent != v {
            self.children[new_parent].push(v);
        }
    }

    /// Resets `v` to unreached and detaches it from its former parent's
    /// child list. Does not touch `children[v]` itself: `v`'s own children
    /// either remain valid (untouched parent pointers) or are being reset
    /// in the same dirty batch.
    fn clear_vertex(&mut self, v: usize) {
        if let Some(old_parent) = self.parent[v] {
            if old_parent != v {
                self.remove_child(old_parent, v);
            }
        }
        self.parent[v] = None;
        self.dist[v] = f64::INFINITY;
    }

    fn remove_child(&mut self, parent: usize, child: usize) {
        if let Some(pos) = self.children[parent].iter().position(|&c| c == child) {
            self.children[parent].swap_remove(pos);
        }
    }
}
