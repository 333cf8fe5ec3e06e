use crate::graph::Vertex;

/// Errors raised by graph operations that were handed bad operands.
///
/// These always indicate caller misuse: a mutating call that named a vertex
/// the graph does not contain, or a path query issued before the solver ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A mutating operation referenced a vertex that is not in the graph.
    #[error("vertex {0} is not in this graph")]
    InvalidVertex(Vertex),

    /// `path_to` was called before `set_paths` computed any paths.
    #[error("shortest paths have not been computed; call set_paths first")]
    PathsNotComputed,
}
