#![forbid(unsafe_code)]
//! ordo-graph library.
//!
//! A small graph toolkit built around integer vertices:
//!
//! - [`graph`]: the [`Graph`] ADT (directed or undirected) with minimal
//!   vertex numbering and pairing-based edge identifiers.
//! - [`iteration`]: the lazy, single-pass sequences every query hands out.
//! - [`traversal`]: breadth-first and depth-first walks driven by a
//!   pluggable [`Frontier`] and [`Visitor`] hooks.
//! - [`labeled`]: [`LabeledGraph`], attaching domain values to vertices and
//!   edges without touching graph semantics.
//! - [`paths`]: [`ShortestPaths`], Dijkstra with an A* heuristic hook over
//!   caller-chosen weight storage.
//!
//! # Conventions
//!
//! - **Errors**: Misuse of a mutating operation returns [`GraphError`]; pure
//!   queries never fail and answer with neutral values instead.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`) for algorithm
//!   detail. Nothing in this crate logs above `debug`.

pub mod error;
pub mod graph;
pub mod iteration;
pub mod labeled;
pub mod paths;
pub mod traversal;

pub use error::GraphError;
pub use graph::{Directedness, EdgeId, Graph, Vertex};
pub use iteration::{Adjacent, Edges, Vertices};
pub use labeled::LabeledGraph;
pub use paths::{DenseStore, Heuristic, PathStore, ShortestPaths, SparseStore, Weighting};
pub use traversal::{BreadthFirst, DepthFirst, Entry, Fifo, Frontier, Lifo, Mark, Traversal, Visitor};
