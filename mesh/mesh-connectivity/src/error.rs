//! Error types for segmentation.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for segmentation.
pub type ConnectivityResult<T> = Result<T, ConnectivityError>;

/// Errors that can occur during segmentation.
///
/// Only structurally invalid input is reported. Out-of-range seeds,
/// unknown region ids, and malformed ranges are resolved in place.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    /// The input mesh references missing points or has mis-sized attributes.
    #[error("invalid input mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    /// A barrier edge references a point that is not in the mesh.
    #[error("barrier edge ({p0}, {p1}) references a point outside the mesh ({point_count} points)")]
    BarrierOutOfBounds {
        /// First endpoint.
        p0: u32,
        /// Second endpoint.
        p1: u32,
        /// Number of points in the segmented mesh.
        point_count: usize,
    },
}
