//! Traits for mesh types.

use nalgebra::Point3;

/// Trait for types that provide polygon mesh topology.
///
/// This trait defines the minimal interface algorithms need to walk a
/// polygon mesh, allowing them to work with different representations.
pub trait MeshTopology {
    /// Get the number of points.
    fn point_count(&self) -> usize;

    /// Get the number of polygonal cells.
    fn cell_count(&self) -> usize;

    /// Check if the mesh is empty.
    fn is_empty(&self) -> bool {
        self.point_count() == 0 || self.cell_count() == 0
    }

    /// Get a point by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn point(&self, index: usize) -> Option<Point3<f64>>;

    /// Get the point ids of a polygonal cell.
    ///
    /// Returns `None` if the index is out of bounds.
    fn cell(&self, index: usize) -> Option<&[u32]>;
}
