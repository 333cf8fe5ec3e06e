//! A graph decorator that attaches domain values to vertices and edges.
//!
//! [`LabeledGraph`] owns a plain [`Graph`] plus two label maps: one keyed by
//! vertex, one keyed by [`EdgeId`]. Structural queries go through
//! [`LabeledGraph::graph`] and behave exactly as on the bare graph; the
//! labels never influence adjacency.
//!
//! Removing a vertex also drops its label and the labels of every edge that
//! touched it, so a recycled vertex number or edge identifier never inherits a
//! stale label.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::{Directedness, EdgeId, Graph, Vertex};

/// A [`Graph`] whose vertices carry `V` labels and whose edges may carry `E`
/// labels.
#[derive(Debug, Clone)]
pub struct LabeledGraph<V, E = ()> {
    graph: Graph,
    vertex_labels: HashMap<Vertex, V>,
    edge_labels: HashMap<EdgeId, E>,
}

impl<V, E> Default for LabeledGraph<V, E> {
    fn default() -> Self {
        Self::new(Directedness::Directed)
    }
}

impl<V, E> LabeledGraph<V, E> {
    #[must_use]
    pub fn new(directedness: Directedness) -> Self {
        Self {
            graph: Graph::new(directedness),
            vertex_labels: HashMap::new(),
            edge_labels: HashMap::new(),
        }
    }

    /// The underlying graph, for structural queries.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Borrow the structure and the vertex labels separately.
    ///
    /// Lets a traversal read the graph while its visitor updates labels.
    pub fn parts_mut(&mut self) -> (&Graph, &mut HashMap<Vertex, V>) {
        (&self.graph, &mut self.vertex_labels)
    }

    /// Add a vertex labeled `label` and return its number.
    pub fn add(&mut self, label: V) -> Vertex {
        let v = self.graph.add();
        self.vertex_labels.insert(v, label);
        v
    }

    /// Add a vertex whose label is built from its own number.
    pub fn add_with(&mut self, label: impl FnOnce(Vertex) -> V) -> Vertex {
        let v = self.graph.add();
        self.vertex_labels.insert(v, label(v));
        v
    }

    /// Add an unlabeled edge. See [`Graph::add_edge`].
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<Option<EdgeId>, GraphError> {
        self.graph.add_edge(u, v)
    }

    /// Add edge `(u, v)` labeled `label`. If the edge already exists only its
    /// label is replaced, and `Ok(None)` is returned as with
    /// [`Graph::add_edge`].
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn add_labeled_edge(
        &mut self,
        u: Vertex,
        v: Vertex,
        label: E,
    ) -> Result<Option<EdgeId>, GraphError> {
        let created = self.graph.add_edge(u, v)?;
        if let Some(id) = self.graph.edge_id(u, v) {
            self.edge_labels.insert(id, label);
        }
        Ok(created)
    }

    /// Remove `v`, its label, its incident edges and their labels.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `v` is not a vertex.
    pub fn remove(&mut self, v: Vertex) -> Result<(), GraphError> {
        let incident: Vec<EdgeId> = self
            .graph
            .successors(v)
            .filter_map(|w| self.graph.edge_id(v, w))
            .chain(
                self.graph
                    .predecessors(v)
                    .filter_map(|u| self.graph.edge_id(u, v)),
            )
            .collect();

        self.graph.remove(v)?;
        self.vertex_labels.remove(&v);
        for id in incident {
            self.edge_labels.remove(&id);
        }
        Ok(())
    }

    /// Remove edge `(u, v)` and its label. Returns whether an edge was removed.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn remove_edge(&mut self, u: Vertex, v: Vertex) -> Result<bool, GraphError> {
        let id = self.graph.edge_id(u, v);
        let removed = self.graph.remove_edge(u, v)?;
        if let Some(id) = id {
            self.edge_labels.remove(&id);
        }
        Ok(removed)
    }

    /// Label of `v`, or `None` if `v` is not a vertex.
    #[must_use]
    pub fn label(&self, v: Vertex) -> Option<&V> {
        self.vertex_labels.get(&v)
    }

    pub fn label_mut(&mut self, v: Vertex) -> Option<&mut V> {
        self.vertex_labels.get_mut(&v)
    }

    /// Replace the label of `v`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `v` is not a vertex.
    pub fn set_label(&mut self, v: Vertex, label: V) -> Result<Option<V>, GraphError> {
        if !self.graph.contains(v) {
            return Err(GraphError::InvalidVertex(v));
        }
        Ok(self.vertex_labels.insert(v, label))
    }

    /// Label of edge `(u, v)`, or `None` if the edge is absent or unlabeled.
    #[must_use]
    pub fn edge_label(&self, u: Vertex, v: Vertex) -> Option<&E> {
        self.graph
            .edge_id(u, v)
            .and_then(|id| self.edge_labels.get(&id))
    }

    /// Label an existing edge, returning the previous label. Returns
    /// `Ok(None)` without storing anything if the edge is absent.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if `u` or `v` is not a vertex.
    pub fn set_edge_label(&mut self, u: Vertex, v: Vertex, label: E) -> Result<Option<E>, GraphError> {
        for w in [u, v] {
            if !self.graph.contains(w) {
                return Err(GraphError::InvalidVertex(w));
            }
        }
        Ok(self
            .graph
            .edge_id(u, v)
            .and_then(|id| self.edge_labels.insert(id, label)))
    }

    /// Iterate over `(vertex, label)` pairs in increasing vertex order.
    pub fn labels(&self) -> impl Iterator<Item = (Vertex, &V)> + '_ {
        self.graph
            .vertices()
            .filter_map(|v| self.vertex_labels.get(&v).map(|label| (v, label)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_vertices() {
        let mut g: LabeledGraph<&str> = LabeledGraph::default();
        let a = g.add("a");
        let b = g.add("b");
        g.add_edge(a, b).unwrap();

        assert_eq!(g.label(a), Some(&"a"));
        assert_eq!(g.graph().successors(a).collect::<Vec<_>>(), vec![b]);

        *g.label_mut(b).unwrap() = "bee";
        assert_eq!(g.labels().collect::<Vec<_>>(), vec![(a, &"a"), (b, &"bee")]);
    }

    #[test]
    fn add_with_sees_its_vertex() {
        let mut g: LabeledGraph<Vertex> = LabeledGraph::default();
        g.add(0);
        let v = g.add_with(|v| v * 10);
        assert_eq!(g.label(v), Some(&20));
    }

    #[test]
    fn removed_vertex_drops_edge_labels() {
        let mut g: LabeledGraph<char, u32> = LabeledGraph::default();
        let a = g.add('a');
        let b = g.add('b');
        g.add_labeled_edge(a, b, 7).unwrap();
        g.add_labeled_edge(b, a, 9).unwrap();
        assert_eq!(g.edge_label(a, b), Some(&7));

        g.remove(b).unwrap();
        assert_eq!(g.label(b), None);

        // The recycled number must not resurrect the old labels.
        let c = g.add('c');
        assert_eq!(c, b);
        g.add_edge(a, c).unwrap();
        g.add_edge(c, a).unwrap();
        assert_eq!(g.edge_label(a, c), None);
        assert_eq!(g.edge_label(c, a), None);
    }

    #[test]
    fn undirected_edge_label_is_shared() {
        let mut g: LabeledGraph<(), &str> = LabeledGraph::new(Directedness::Undirected);
        let a = g.add(());
        let b = g.add(());
        g.add_labeled_edge(a, b, "road").unwrap();
        assert_eq!(g.edge_label(b, a), Some(&"road"));

        assert!(g.remove_edge(b, a).unwrap());
        assert_eq!(g.edge_label(a, b), None);
    }

    #[test]
    fn set_label_rejects_unknown_vertex() {
        let mut g: LabeledGraph<u8> = LabeledGraph::default();
        assert_eq!(g.set_label(1, 0), Err(GraphError::InvalidVertex(1)));
        let v = g.add(1);
        assert_eq!(g.set_label(v, 2), Ok(Some(1)));
        assert_eq!(g.set_edge_label(v, v, ()), Ok(None));
    }
}
