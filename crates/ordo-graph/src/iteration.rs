//! Lazy sequences over a graph's vertices and edges.
//!
//! Every graph query that returns "many" hands out one of the iterators in
//! this module. They share one contract:
//!
//! - **Finite and single-pass**: each yields a bounded number of items once,
//!   then keeps returning `None` ([`FusedIterator`]). There is no way to
//!   rewind; ask the graph again for a fresh sequence.
//! - **Borrowing**: each holds a shared borrow of the [`Graph`] it came from,
//!   so structural mutation while a sequence is alive does not compile.
//!   Collect first if you need to mutate while walking.
//!
//! [`Graph`]: crate::graph::Graph

use std::iter::{Enumerate, FusedIterator};
use std::slice;

use crate::graph::{Slot, Vertex};

// ---------------------------------------------------------------------------
// Vertices
// ---------------------------------------------------------------------------

/// The vertices of a graph, in increasing order.
#[derive(Debug, Clone)]
pub struct Vertices<'g> {
    slots: Enumerate<slice::Iter<'g, Option<Slot>>>,
    remaining: usize,
}

impl<'g> Vertices<'g> {
    pub(crate) fn new(slots: &'g [Option<Slot>], count: usize) -> Self {
        Self {
            slots: slots.iter().enumerate(),
            remaining: count,
        }
    }
}

impl Iterator for Vertices<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        for (i, slot) in self.slots.by_ref() {
            if slot.is_some() {
                self.remaining -= 1;
                return Some(i + 1);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Vertices<'_> {}
impl FusedIterator for Vertices<'_> {}

// ---------------------------------------------------------------------------
// Adjacent
// ---------------------------------------------------------------------------

/// Successors, predecessors or neighbors of one vertex, in the order the
/// edges were added.
#[derive(Debug, Clone)]
pub struct Adjacent<'g> {
    inner: slice::Iter<'g, Vertex>,
}

impl<'g> Adjacent<'g> {
    pub(crate) fn new(list: &'g [Vertex]) -> Self {
        Self { inner: list.iter() }
    }

    pub(crate) fn empty() -> Self {
        const NONE: &[Vertex] = &[];
        Self { inner: NONE.iter() }
    }
}

impl Iterator for Adjacent<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Adjacent<'_> {
    fn next_back(&mut self) -> Option<Vertex> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for Adjacent<'_> {}
impl FusedIterator for Adjacent<'_> {}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// All edges of a graph as `(source, target)` pairs, grouped by source in
/// increasing vertex order.
#[derive(Debug, Clone)]
pub struct Edges<'g> {
    slots: Enumerate<slice::Iter<'g, Option<Slot>>>,
    current: Option<(Vertex, slice::Iter<'g, Vertex>)>,
}

impl<'g> Edges<'g> {
    pub(crate) fn new(slots: &'g [Option<Slot>]) -> Self {
        Self {
            slots: slots.iter().enumerate(),
            current: None,
        }
    }
}

impl Iterator for Edges<'_> {
    type Item = (Vertex, Vertex);

    fn next(&mut self) -> Option<(Vertex, Vertex)> {
        loop {
            if let Some((u, targets)) = self.current.as_mut() {
                if let Some(&v) = targets.next() {
                    return Some((*u, v));
                }
            }
            let (i, slot) = self.slots.next()?;
            self.current = slot.as_ref().map(|s| (i + 1, s.out.iter()));
        }
    }
}

impl FusedIterator for Edges<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn vertices_report_exact_size() {
        let mut g = Graph::directed();
        for _ in 0..4 {
            g.add();
        }
        g.remove(2).unwrap();

        let mut vs = g.vertices();
        assert_eq!(vs.len(), 3);
        assert_eq!(vs.next(), Some(1));
        assert_eq!(vs.len(), 2);
        assert_eq!(vs.by_ref().count(), 2);
        assert_eq!(vs.next(), None);
    }

    #[test]
    fn adjacent_runs_backwards() {
        let mut g = Graph::directed();
        let a = g.add();
        let b = g.add();
        let c = g.add();
        g.add_edge(a, b).unwrap();
        g.add_edge(a, c).unwrap();

        assert_eq!(g.successors(a).rev().collect::<Vec<_>>(), vec![c, b]);
    }

    #[test]
    fn edges_skip_vertices_without_successors() {
        let mut g = Graph::directed();
        for _ in 0..4 {
            g.add();
        }
        g.add_edge(4, 1).unwrap();
        g.add_edge(2, 3).unwrap();

        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(2, 3), (4, 1)]);
    }
}
