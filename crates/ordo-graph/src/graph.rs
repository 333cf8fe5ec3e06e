//! The graph ADT: integer vertices, directed or undirected edges.
//!
//! # Overview
//!
//! A [`Graph`] owns a set of positive-integer vertices and the edges between
//! them. Directed and undirected graphs share one type; the
//! [`Directedness`] flag chosen at construction decides how `add_edge`,
//! `remove_edge` and the degree queries treat an edge, but not how adjacency
//! is stored.
//!
//! # Vertex numbering
//!
//! Vertices live in an arena of slots indexed by `vertex - 1`. Removing a
//! vertex empties its slot and records the number in a free-list; [`Graph::add`]
//! always takes the smallest free number first, so numbering stays minimal:
//!
//! ```text
//! add add add add add     -> 1 2 3 4 5
//! remove(2)               -> 1 _ 3 4 5   free = {2}
//! add                     -> 2
//! ```
//!
//! Trailing empty slots are dropped eagerly so [`Graph::max_vertex`] is the
//! length of the arena.
//!
//! # Edge identifiers
//!
//! Each present edge has a positive identifier computed from its endpoints
//! with the Cantor pairing function. Undirected edges normalize the endpoints
//! to `(max, min)` so both directions share an identifier. Pairing is a
//! bijection on ordered pairs, so two distinct present edges never share an
//! identifier regardless of how often vertex numbers are reused.
//!
//! # Errors
//!
//! Mutating operations (`add_edge`, `remove`, `remove_edge`) fail with
//! [`GraphError::InvalidVertex`] when an operand is not a vertex. Queries never
//! fail: absent vertices have degree 0, no edges and empty neighbor sequences.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::GraphError;
use crate::iteration::{Adjacent, Edges, Vertices};

/// A vertex number. Always at least 1.
pub type Vertex = usize;

/// Identifier of a present edge, derived from its endpoints.
pub type EdgeId = u64;

/// Whether edges have a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Directedness {
    /// Edge `(u, v)` leaves `u` and enters `v`.
    #[default]
    Directed,
    /// Edge `(u, v)` and edge `(v, u)` are the same edge.
    Undirected,
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Adjacency of one live vertex.
///
/// Directed graphs fill both lists. Undirected graphs keep every neighbor in
/// `out` (a self-loop appears once) and leave `inc` empty.
#[derive(Debug, Clone, Default)]
pub(crate) struct Slot {
    pub(crate) out: Vec<Vertex>,
    pub(crate) inc: Vec<Vertex>,
}

fn detach(list: &mut Vec<Vertex>, v: Vertex) {
    if let Some(pos) = list.iter().position(|&w| w == v) {
        list.remove(pos);
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed or undirected graph over positive-integer vertices.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    directedness: Directedness,
    /// `slots[v - 1]` is `Some` iff `v` is a vertex. Never ends in `None`.
    slots: Vec<Option<Slot>>,
    /// Numbers below `slots.len()` whose slot is empty.
    free: BTreeSet<Vertex>,
    vertex_count: usize,
    edge_count: usize,
}

impl Graph {
    /// Create an empty graph with the given directedness.
    #[must_use]
    pub fn new(directedness: Directedness) -> Self {
        Self {
            directedness,
            ..Self::default()
        }
    }

    /// Create an empty directed graph.
    #[must_use]
    pub fn directed() -> Self {
        Self::new(Directedness::Directed)
    }

    /// Create an empty undirected graph.
    #[must_use]
    pub fn undirected() -> Self {
        Self::new(Directedness::Undirected)
    }

    #[must_use]
    pub const fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Returns `true` for directed graphs.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        matches!(self.directedness, Directedness::Directed)
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_size(&self) -> usize {
        self.vertex_count
    }

    /// Largest vertex number in use, or 0 for an empty graph.
    #[must_use]
    pub const fn max_vertex(&self) -> Vertex {
        self.slots.len()
    }

    /// Number of edges. An undirected edge counts once.
    #[must_use]
    pub const fn edge_size(&self) -> usize {
        self.edge_count
    }

    // -----------------------------------------------------------------------
    // Slot access
    // -----------------------------------------------------------------------

    fn slot(&self, v: Vertex) -> Option<&Slot> {
        v.checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, v: Vertex) -> Result<&mut Slot, GraphError> {
        v.checked_sub(1)
            .and_then(|i| self.slots.get_mut(i))
            .and_then(Option::as_mut)
            .ok_or(GraphError::InvalidVertex(v))
    }

    fn check_vertex(&self, v: Vertex) -> Result<(), GraphError> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex(v))
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Returns `true` iff `v` is one of this graph's vertices.
    #[must_use]
    pub fn contains(&self, v: Vertex) -> bool {
        self.slot(v).is_some()
    }

    /// Returns `true` iff `u` and `v` are vertices and edge `(u, v)` exists.
    ///
    /// Symmetric for undirected graphs.
    #[must_use]
    pub fn contains_edge(&self, u: Vertex, v: Vertex) -> bool {
        self.contains(v) && self.slot(u).is_some_and(|s| s.out.contains(&v))
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add a vertex with no incident edges and return its number.
    ///
    /// The number is the smallest positive integer not currently in use.
    pub fn add(&mut self) -> Vertex {
        let v = if let Some(v) = self.free.pop_first() {
            self.slots[v - 1] = Some(Slot::default());
            v
        } else {
            self.slots.push(Some(Slot::default()));
            self.slots.len()
        };
        self.vertex_count += 1;
        trace!(vertex = v, "added vertex");
        v
    }

    /// Add edge `(u, v)`.
    ///
    /// Returns `Ok(Some(id))` with the new edge's identifier, or `Ok(None)`
    /// when the edge was already present. For undirected graphs the edge is
    /// also reachable as `(v, u)`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<Option<EdgeId>, GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if self.contains_edge(u, v) {
            return Ok(None);
        }

        self.slot_mut(u)?.out.push(v);
        match self.directedness {
            Directedness::Directed => self.slot_mut(v)?.inc.push(u),
            Directedness::Undirected if u != v => self.slot_mut(v)?.out.push(u),
            Directedness::Undirected => {}
        }
        self.edge_count += 1;

        Ok(Some(self.pair(u, v)))
    }

    /// Remove vertex `v` and every edge incident to it.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `v` is not a vertex.
    pub fn remove(&mut self, v: Vertex) -> Result<(), GraphError> {
        self.check_vertex(v)?;
        let slot = self.slots[v - 1].take().unwrap_or_default();
        let directedness = self.directedness;

        let mut removed = 0;
        for &w in &slot.out {
            removed += 1;
            if w == v {
                continue;
            }
            let peer = self.slot_mut(w)?;
            match directedness {
                Directedness::Directed => detach(&mut peer.inc, v),
                Directedness::Undirected => detach(&mut peer.out, v),
            }
        }
        for &w in &slot.inc {
            if w == v {
                // The self-loop was already counted on the outgoing side.
                continue;
            }
            removed += 1;
            detach(&mut self.slot_mut(w)?.out, v);
        }
        self.edge_count -= removed;
        self.vertex_count -= 1;
        self.free.insert(v);

        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
            self.free.remove(&(self.slots.len() + 1));
        }
        trace!(vertex = v, edges = removed, "removed vertex");
        Ok(())
    }

    /// Remove edge `(u, v)` if present (for undirected graphs, also `(v, u)`).
    ///
    /// Returns whether an edge was removed.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn remove_edge(&mut self, u: Vertex, v: Vertex) -> Result<bool, GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if !self.contains_edge(u, v) {
            return Ok(false);
        }

        detach(&mut self.slot_mut(u)?.out, v);
        match self.directedness {
            Directedness::Directed => detach(&mut self.slot_mut(v)?.inc, u),
            Directedness::Undirected if u != v => detach(&mut self.slot_mut(v)?.out, u),
            Directedness::Undirected => {}
        }
        self.edge_count -= 1;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Degrees
    // -----------------------------------------------------------------------

    /// Number of edges leaving `v`, or 0 if `v` is not a vertex.
    #[must_use]
    pub fn out_degree(&self, v: Vertex) -> usize {
        self.slot(v).map_or(0, |s| s.out.len())
    }

    /// Number of edges entering `v`, or 0 if `v` is not a vertex.
    ///
    /// Equal to [`Graph::out_degree`] for undirected graphs.
    #[must_use]
    pub fn in_degree(&self, v: Vertex) -> usize {
        self.slot(v).map_or(0, |s| match self.directedness {
            Directedness::Directed => s.inc.len(),
            Directedness::Undirected => s.out.len(),
        })
    }

    /// Synonym for [`Graph::out_degree`], read naturally on undirected graphs.
    #[must_use]
    pub fn degree(&self, v: Vertex) -> usize {
        self.out_degree(v)
    }

    // -----------------------------------------------------------------------
    // Sequences
    // -----------------------------------------------------------------------

    /// All vertices in increasing order.
    #[must_use]
    pub fn vertices(&self) -> Vertices<'_> {
        Vertices::new(&self.slots, self.vertex_count)
    }

    /// Vertices `w` with an edge `(v, w)`, in insertion order. Empty if `v`
    /// is not a vertex.
    #[must_use]
    pub fn successors(&self, v: Vertex) -> Adjacent<'_> {
        self.slot(v)
            .map_or_else(Adjacent::empty, |s| Adjacent::new(&s.out))
    }

    /// Vertices `u` with an edge `(u, v)`. Same as [`Graph::successors`] for
    /// undirected graphs.
    #[must_use]
    pub fn predecessors(&self, v: Vertex) -> Adjacent<'_> {
        self.slot(v).map_or_else(Adjacent::empty, |s| match self.directedness {
            Directedness::Directed => Adjacent::new(&s.inc),
            Directedness::Undirected => Adjacent::new(&s.out),
        })
    }

    /// Synonym for [`Graph::successors`].
    #[must_use]
    pub fn neighbors(&self, v: Vertex) -> Adjacent<'_> {
        self.successors(v)
    }

    /// All edges as `(u, v)` pairs, grouped by source vertex.
    ///
    /// Undirected graphs yield every edge once per direction; a self-loop is
    /// yielded once.
    #[must_use]
    pub fn edges(&self) -> Edges<'_> {
        Edges::new(&self.slots)
    }

    // -----------------------------------------------------------------------
    // Edge identifiers
    // -----------------------------------------------------------------------

    /// Identifier of edge `(u, v)`, or `None` if the edge is absent.
    ///
    /// Matches the value returned by [`Graph::add_edge`] when the edge was
    /// created.
    #[must_use]
    pub fn edge_id(&self, u: Vertex, v: Vertex) -> Option<EdgeId> {
        self.contains_edge(u, v).then(|| self.pair(u, v))
    }

    fn pair(&self, u: Vertex, v: Vertex) -> EdgeId {
        let (a, b) = match self.directedness {
            Directedness::Directed => (u, v),
            Directedness::Undirected => (u.max(v), u.min(v)),
        };
        let (a, b) = (a as u64, b as u64);
        (a + b) * (a + b + 1) / 2 + b
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
