//! Generic graph traversal with a pluggable frontier.
//!
//! # Overview
//!
//! A [`Traversal`] walks everything reachable from one or more roots. The
//! order is decided entirely by its [`Frontier`]:
//!
//! - [`Fifo`] (a queue) gives breadth-first order ([`BreadthFirst`]);
//!   vertices are visited in non-decreasing distance from the root.
//! - [`Lifo`] (a stack) gives depth-first order ([`DepthFirst`]) and supports
//!   post-order: a vertex's [`Visitor::post_visit`] fires only after every
//!   successor reachable through it has been post-visited.
//!
//! # Vertex states
//!
//! ```text
//! undiscovered ──pre_visit──▶ Frontier ──visit──▶ Visited ──post_visit──▶ Finished
//! ```
//!
//! Undiscovered vertices have no [`Mark`]. Marks persist across calls to
//! [`Traversal::traverse`], so a vertex reached from an earlier root (or an
//! earlier call) is never visited twice. [`Traversal::clear`] forgets them.
//!
//! # Post-order on a stack
//!
//! Instead of recursing, visiting `v` pushes an [`Entry::Finish`] marker for
//! `v` *below* the discovery entries of its successors. The marker surfaces
//! only once everything pushed above it has been fully processed, which is
//! exactly the post-order guarantee, with stack usage bounded by the frontier
//! instead of the call stack.
//!
//! # Pruning
//!
//! Returning `false` from [`Visitor::visit`] keeps the traversal from
//! expanding that vertex's successors. There is no way to abort a traversal
//! as a whole; it always runs until the frontier is empty.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::graph::{Graph, Vertex};

/// Traversal state of a discovered vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Discovered and waiting in the frontier.
    Frontier,
    /// [`Visitor::visit`] has run.
    Visited,
    /// [`Visitor::post_visit`] has run.
    Finished,
}

/// Work item held by a [`Frontier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Visit the vertex (if it has not been visited yet) and expand it.
    Discover(Vertex),
    /// Post-visit the vertex.
    Finish(Vertex),
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// The working set of discovered-but-unprocessed vertices.
pub trait Frontier: Default {
    /// Whether a vertex already waiting in the frontier is pushed again when
    /// another edge reaches it. Stacks need this to stay depth-first; queues
    /// must not, or breadth-first distance order breaks.
    const REQUEUE: bool;

    fn push(&mut self, entry: Entry);

    fn pop(&mut self) -> Option<Entry>;

    fn is_empty(&self) -> bool;

    fn clear(&mut self);

    /// Push the expansion of one vertex so that entries pop in `batch` order
    /// relative to each other.
    fn push_batch(&mut self, batch: &[Entry]) {
        for &entry in batch {
            self.push(entry);
        }
    }
}

/// First-in first-out frontier (breadth-first).
#[derive(Debug, Clone, Default)]
pub struct Fifo(VecDeque<Entry>);

impl Frontier for Fifo {
    const REQUEUE: bool = false;

    fn push(&mut self, entry: Entry) {
        self.0.push_back(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Last-in first-out frontier (depth-first).
#[derive(Debug, Clone, Default)]
pub struct Lifo(Vec<Entry>);

impl Frontier for Lifo {
    const REQUEUE: bool = true;

    fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.0.pop()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn push_batch(&mut self, batch: &[Entry]) {
        self.0.extend(batch.iter().rev().copied());
    }
}

// ---------------------------------------------------------------------------
// Visitor
// ---------------------------------------------------------------------------

/// Hooks invoked by a [`Traversal`]. Every hook defaults to a no-op.
pub trait Visitor {
    /// Called once when `v` is first discovered.
    fn pre_visit(&mut self, _v: Vertex) {}

    /// Called once when `v` leaves the frontier. Return `false` to skip
    /// expanding `v`'s successors.
    fn visit(&mut self, _v: Vertex) -> bool {
        true
    }

    /// Whether `v` should be post-visited. Queried right after `visit`.
    fn should_post_visit(&self, _v: Vertex) -> bool {
        false
    }

    /// Called once after everything reached through `v` has been processed.
    fn post_visit(&mut self, _v: Vertex) {}
}

/// Marks reachable vertices without observing them.
impl Visitor for () {}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// A reusable graph walk. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct Traversal<F: Frontier> {
    frontier: F,
    marks: HashMap<Vertex, Mark>,
}

/// Breadth-first traversal.
pub type BreadthFirst = Traversal<Fifo>;

/// Depth-first traversal, with post-order support.
pub type DepthFirst = Traversal<Lifo>;

impl<F: Frontier> Traversal<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mark of `v`, or `None` if the traversal has not discovered it.
    #[must_use]
    pub fn mark(&self, v: Vertex) -> Option<Mark> {
        self.marks.get(&v).copied()
    }

    /// Forget every mark so the next traversal starts fresh.
    pub fn clear(&mut self) {
        self.frontier.clear();
        self.marks.clear();
    }

    /// Traverse everything reachable from `root` that has not been visited by
    /// a previous call. Does nothing if `root` is not a vertex of `graph` or
    /// was already discovered.
    pub fn traverse<V>(&mut self, graph: &Graph, root: Vertex, visitor: &mut V)
    where
        V: Visitor + ?Sized,
    {
        if !graph.contains(root) || self.marks.contains_key(&root) {
            trace!(root, "skipping root");
            return;
        }

        self.marks.insert(root, Mark::Frontier);
        visitor.pre_visit(root);
        self.frontier.push(Entry::Discover(root));

        let mut batch = Vec::new();
        while let Some(entry) = self.frontier.pop() {
            match entry {
                Entry::Finish(v) => {
                    self.marks.insert(v, Mark::Finished);
                    visitor.post_visit(v);
                }
                Entry::Discover(v) => {
                    if matches!(self.marks.get(&v), Some(Mark::Visited | Mark::Finished)) {
                        continue;
                    }
                    self.marks.insert(v, Mark::Visited);

                    let expand = visitor.visit(v);
                    if visitor.should_post_visit(v) {
                        self.frontier.push(Entry::Finish(v));
                    }
                    if !expand {
                        trace!(vertex = v, "pruned");
                        continue;
                    }

                    batch.clear();
                    for w in graph.successors(v) {
                        match self.marks.get(&w) {
                            None => {
                                self.marks.insert(w, Mark::Frontier);
                                visitor.pre_visit(w);
                                batch.push(Entry::Discover(w));
                            }
                            Some(Mark::Frontier) if F::REQUEUE => {
                                batch.push(Entry::Discover(w));
                            }
                            Some(_) => {}
                        }
                    }
                    self.frontier.push_batch(&batch);
                }
            }
        }
    }

    /// Traverse from each root in order. Vertices reached from an earlier
    /// root are not revisited from a later one.
    pub fn traverse_all<I, V>(&mut self, graph: &Graph, roots: I, visitor: &mut V)
    where
        I: IntoIterator<Item = Vertex>,
        V: Visitor + ?Sized,
    {
        for root in roots {
            self.traverse(graph, root, visitor);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
