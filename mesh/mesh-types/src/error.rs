//! Error types for mesh validation.

use thiserror::Error;

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors reported when a mesh is structurally inconsistent.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A cell references a point that does not exist.
    #[error("cell {cell} references point {point} (mesh has {point_count} points)")]
    PointOutOfBounds {
        /// Index of the offending cell.
        cell: usize,
        /// The invalid point index.
        point: u32,
        /// Total number of points in the mesh.
        point_count: usize,
    },

    /// An attribute array does not have one tuple per element.
    #[error("attribute array '{name}' has {found} tuples, expected {expected}")]
    AttributeLength {
        /// Name of the array.
        name: String,
        /// Expected tuple count.
        expected: usize,
        /// Actual tuple count.
        found: usize,
    },
}
