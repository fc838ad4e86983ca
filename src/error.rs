use thiserror::Error;

use crate::batch::Topology;

/// Errors raised while building vertex batches and shape geometry
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// A batch was declared with zero vertices
    #[error("{topology:?} batch needs at least one vertex")]
    EmptyBatch { topology: Topology },

    /// Declared vertex count does not match the supplied coordinates
    #[error("{topology:?} batch declared {expected} coordinates but got {actual}")]
    VertexCountMismatch {
        topology: Topology,
        expected: usize,
        actual: usize,
    },

    /// Declared vertex count does not fit in memory as xyz coordinates
    #[error("{topology:?} batch declared {vertex_count} vertices, too many to address")]
    VertexCountOverflow { topology: Topology, vertex_count: usize },

    /// Angular step for a generator is zero, negative or not finite
    #[error("Invalid angular step: {0}")]
    InvalidStep(f32),

    /// Generator output would exceed the vertex capacity
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },
}
