//! Single-source shortest paths: Dijkstra, or A* with a heuristic.
//!
//! # Overview
//!
//! [`ShortestPaths`] computes the lightest path from a source vertex to
//! every reachable vertex, or to one destination when
//! [`ShortestPaths::with_destination`] is set. It separates three concerns
//! so callers can swap each independently:
//!
//! | concern | trait | provided |
//! |---------|-------|----------|
//! | edge weights and heuristic | [`Weighting`] | closures, [`Heuristic`] |
//! | vertex weights and predecessors | [`PathStore`] | [`DenseStore`], [`SparseStore`] |
//! | the graph | [`Graph`] | any `Graph` |
//!
//! # Algorithm
//!
//! 1. Every vertex starts at weight `+∞`, the source at `0`.
//! 2. The frontier is a binary heap keyed by
//!    `(weight + estimated_distance, vertex)`; equal keys pop the smaller
//!    vertex first, so the order is total and runs are reproducible.
//! 3. Pop the minimum. Stop if it is the destination. Otherwise relax every
//!    outgoing edge: when `weight(v) + edge_weight(v, w) < weight(w)`, update
//!    `w`'s weight and predecessor and push it again with its new key.
//! 4. Heap entries whose recorded weight is larger than the vertex's current
//!    weight are stale and skipped when popped.
//!
//! With the default `estimated_distance` of 0 this is Dijkstra. An admissible
//! heuristic (never larger than the true remaining distance) turns it into
//! A*. Because improved vertices are always pushed again, a vertex that was
//! popped too early under an inconsistent heuristic is reopened rather than
//! left with a wrong weight.
//!
//! Edge weights are expected to be non-negative.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::error::GraphError;
use crate::graph::{Graph, Vertex};

// ---------------------------------------------------------------------------
// Weighting
// ---------------------------------------------------------------------------

/// Edge weights, plus an optional distance estimate for A*.
pub trait Weighting {
    /// Weight of edge `(u, v)`. Only called for edges present in the graph.
    fn edge_weight(&self, u: Vertex, v: Vertex) -> f64;

    /// Lower bound on the weight of the remaining path from `v` to the
    /// destination. Defaults to 0 (plain Dijkstra).
    fn estimated_distance(&self, _v: Vertex) -> f64 {
        0.0
    }
}

impl<F> Weighting for F
where
    F: Fn(Vertex, Vertex) -> f64,
{
    fn edge_weight(&self, u: Vertex, v: Vertex) -> f64 {
        self(u, v)
    }
}

/// Pairs an edge-weight closure with a heuristic closure for A* search.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic<W, H> {
    pub weights: W,
    pub estimate: H,
}

impl<W, H> Weighting for Heuristic<W, H>
where
    W: Fn(Vertex, Vertex) -> f64,
    H: Fn(Vertex) -> f64,
{
    fn edge_weight(&self, u: Vertex, v: Vertex) -> f64 {
        (self.weights)(u, v)
    }

    fn estimated_distance(&self, v: Vertex) -> f64 {
        (self.estimate)(v)
    }
}

// ---------------------------------------------------------------------------
// PathStore
// ---------------------------------------------------------------------------

/// Storage for per-vertex search results.
pub trait PathStore {
    /// Current weight of `v`; `+∞` if never set.
    fn weight(&self, v: Vertex) -> f64;

    fn set_weight(&mut self, v: Vertex, weight: f64);

    /// Current predecessor of `v` on its lightest known path.
    fn predecessor(&self, v: Vertex) -> Option<Vertex>;

    fn set_predecessor(&mut self, v: Vertex, u: Vertex);

    /// Forget every weight and predecessor.
    fn reset(&mut self);
}

/// Vectors indexed by vertex number. Best for graphs with compact numbering.
#[derive(Debug, Clone, Default)]
pub struct DenseStore {
    weights: Vec<f64>,
    predecessors: Vec<Option<Vertex>>,
}

impl DenseStore {
    /// A store preallocated for vertices up to `max_vertex`.
    #[must_use]
    pub fn with_capacity(max_vertex: Vertex) -> Self {
        Self {
            weights: vec![f64::INFINITY; max_vertex + 1],
            predecessors: vec![None; max_vertex + 1],
        }
    }

    fn ensure(&mut self, v: Vertex) {
        if v >= self.weights.len() {
            self.weights.resize(v + 1, f64::INFINITY);
            self.predecessors.resize(v + 1, None);
        }
    }
}

impl PathStore for DenseStore {
    fn weight(&self, v: Vertex) -> f64 {
        self.weights.get(v).copied().unwrap_or(f64::INFINITY)
    }

    fn set_weight(&mut self, v: Vertex, weight: f64) {
        self.ensure(v);
        self.weights[v] = weight;
    }

    fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        self.predecessors.get(v).copied().flatten()
    }

    fn set_predecessor(&mut self, v: Vertex, u: Vertex) {
        self.ensure(v);
        self.predecessors[v] = Some(u);
    }

    fn reset(&mut self) {
        self.weights.fill(f64::INFINITY);
        self.predecessors.fill(None);
    }
}

/// Hash maps keyed by vertex. Best when only a small region is explored.
#[derive(Debug, Clone, Default)]
pub struct SparseStore {
    weights: HashMap<Vertex, f64>,
    predecessors: HashMap<Vertex, Vertex>,
}

impl PathStore for SparseStore {
    fn weight(&self, v: Vertex) -> f64 {
        self.weights.get(&v).copied().unwrap_or(f64::INFINITY)
    }

    fn set_weight(&mut self, v: Vertex, weight: f64) {
        self.weights.insert(v, weight);
    }

    fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        self.predecessors.get(&v).copied()
    }

    fn set_predecessor(&mut self, v: Vertex, u: Vertex) {
        self.predecessors.insert(v, u);
    }

    fn reset(&mut self) {
        self.weights.clear();
        self.predecessors.clear();
    }
}

// ---------------------------------------------------------------------------
// Frontier key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Keyed {
    key: f64,
    vertex: Vertex,
    weight: f64,
}

impl Ord for Keyed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then(self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for Keyed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Keyed {}

// ---------------------------------------------------------------------------
// ShortestPaths
// ---------------------------------------------------------------------------

/// Shortest paths in a graph from one source vertex.
#[derive(Debug, Clone)]
pub struct ShortestPaths<'g, W, S = DenseStore> {
    graph: &'g Graph,
    source: Vertex,
    destination: Option<Vertex>,
    weighting: W,
    store: S,
    settled: Vec<Vertex>,
    computed: bool,
}

impl<'g, W: Weighting> ShortestPaths<'g, W, DenseStore> {
    /// Shortest paths from `source` using a [`DenseStore`] sized for `graph`.
    #[must_use]
    pub fn dense(graph: &'g Graph, source: Vertex, weighting: W) -> Self {
        Self::new(graph, source, weighting, DenseStore::with_capacity(graph.max_vertex()))
    }
}

impl<'g, W: Weighting, S: PathStore> ShortestPaths<'g, W, S> {
    pub fn new(graph: &'g Graph, source: Vertex, weighting: W, store: S) -> Self {
        Self {
            graph,
            source,
            destination: None,
            weighting,
            store,
            settled: Vec::new(),
            computed: false,
        }
    }

    /// Stop the search as soon as `destination` is settled.
    #[must_use]
    pub fn with_destination(mut self, destination: Vertex) -> Self {
        self.destination = Some(destination);
        self
    }

    #[must_use]
    pub const fn source(&self) -> Vertex {
        self.source
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Vertex> {
        self.destination
    }

    /// Run the search. Must be called before [`ShortestPaths::path_to`];
    /// calling it again recomputes from scratch.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if the source is not a vertex.
    pub fn set_paths(&mut self) -> Result<(), GraphError> {
        if !self.graph.contains(self.source) {
            return Err(GraphError::InvalidVertex(self.source));
        }

        self.store.reset();
        self.settled.clear();
        self.store.set_weight(self.source, 0.0);

        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse(Keyed {
            key: self.weighting.estimated_distance(self.source),
            vertex: self.source,
            weight: 0.0,
        }));

        while let Some(Reverse(entry)) = frontier.pop() {
            let v = entry.vertex;
            let base = self.store.weight(v);
            if entry.weight > base {
                continue;
            }
            self.settled.push(v);
            if self.destination == Some(v) {
                break;
            }

            for w in self.graph.successors(v) {
                let candidate = base + self.weighting.edge_weight(v, w);
                if candidate < self.store.weight(w) {
                    trace!(from = v, to = w, weight = candidate, "relaxed");
                    self.store.set_weight(w, candidate);
                    self.store.set_predecessor(w, v);
                    frontier.push(Reverse(Keyed {
                        key: candidate + self.weighting.estimated_distance(w),
                        vertex: w,
                        weight: candidate,
                    }));
                }
            }
        }

        self.computed = true;
        debug!(
            source = self.source,
            destination = ?self.destination,
            settled = self.settled.len(),
            "shortest paths computed"
        );
        Ok(())
    }

    /// Weight of the lightest known path to `v`; `+∞` if `v` is unreachable
    /// or not a vertex.
    #[must_use]
    pub fn weight(&self, v: Vertex) -> f64 {
        if self.graph.contains(v) {
            self.store.weight(v)
        } else {
            f64::INFINITY
        }
    }

    /// Predecessor of `v` on its lightest known path.
    #[must_use]
    pub fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        self.graph
            .contains(v)
            .then(|| self.store.predecessor(v))
            .flatten()
    }

    /// Vertices in the order they left the frontier.
    #[must_use]
    pub fn settled(&self) -> &[Vertex] {
        &self.settled
    }

    /// The vertices of a lightest path from the source to `v`, both included.
    /// Empty if `v` is unreachable. When a destination was set, only paths
    /// to the destination (and vertices settled before it) are final.
    ///
    /// # Errors
    ///
    /// [`GraphError::PathsNotComputed`] if [`ShortestPaths::set_paths`] has
    /// not run.
    pub fn path_to(&self, v: Vertex) -> Result<Vec<Vertex>, GraphError> {
        if !self.computed {
            return Err(GraphError::PathsNotComputed);
        }
        if self.weight(v).is_infinite() {
            return Ok(Vec::new());
        }

        let mut path = vec![v];
        let mut current = v;
        while current != self.source {
            match self.store.predecessor(current) {
                Some(u) if path.len() <= self.graph.vertex_size() => {
                    path.push(u);
                    current = u;
                }
                _ => return Ok(Vec::new()),
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Path to the destination; empty if none was set or it is unreachable.
    ///
    /// # Errors
    ///
    /// [`GraphError::PathsNotComputed`] if [`ShortestPaths::set_paths`] has
    /// not run.
    pub fn path_to_destination(&self) -> Result<Vec<Vertex>, GraphError> {
        match self.destination {
            Some(dest) => self.path_to(dest),
            None if self.computed => Ok(Vec::new()),
            None => Err(GraphError::PathsNotComputed),
        }
    }

    /// Give back the store holding the computed weights and predecessors.
    pub fn into_store(self) -> S {
        self.store
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
