//! Polygon mesh.

use crate::{AttributeData, CellArray, MeshError, MeshResult, MeshTopology, Points};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A polygon mesh with optional polylines and attribute data.
///
/// # Memory Layout
///
/// - `points`: coordinates in single or double precision
/// - `polys`: polygonal cells as cyclic point-id lists
/// - `lines`: open polylines as point-id lists
/// - `point_data`: one tuple per point in every array
/// - `cell_data`: one tuple per polygon in every array
///
/// # Example
///
/// ```
/// use mesh_types::{MeshTopology, PolyMesh};
///
/// let mesh = PolyMesh::from_polygons(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     &[[0, 1, 2]],
/// );
/// assert_eq!(mesh.point_count(), 3);
/// assert_eq!(mesh.cell_count(), 1);
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolyMesh {
    /// Point coordinates.
    pub points: Points,
    /// Polygonal cells.
    pub polys: CellArray,
    /// Polylines.
    pub lines: CellArray,
    /// Per-point attributes.
    pub point_data: AttributeData,
    /// Per-polygon attributes.
    pub cell_data: AttributeData,
}

impl PolyMesh {
    /// Create a new empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from points and polygons.
    #[must_use]
    pub fn from_parts(points: Points, polys: CellArray) -> Self {
        Self {
            points,
            polys,
            ..Self::default()
        }
    }

    /// Create a mesh from raw coordinates and polygon point lists.
    #[must_use]
    pub fn from_polygons<C: AsRef<[u32]>>(coords: &[[f64; 3]], polys: &[C]) -> Self {
        Self::from_parts(Points::from_coords(coords), CellArray::from_cells(polys))
    }

    /// Check that every polygon and polyline references existing points.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::PointOutOfBounds`] for the first cell
    /// referencing a missing point.
    pub fn validate_topology(&self) -> MeshResult<()> {
        let point_count = self.points.len();
        for cells in [&self.polys, &self.lines] {
            for (cell, ids) in cells.iter().enumerate() {
                if let Some(&point) = ids.iter().find(|&&p| p as usize >= point_count) {
                    return Err(MeshError::PointOutOfBounds {
                        cell,
                        point,
                        point_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Check [`validate_topology`](Self::validate_topology) and that every
    /// attribute array has one tuple per element.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::PointOutOfBounds`] for the first polygon or
    /// polyline referencing a missing point, or
    /// [`MeshError::AttributeLength`] for the first mis-sized array.
    pub fn validate(&self) -> MeshResult<()> {
        self.validate_topology()?;

        for (data, expected) in [
            (&self.point_data, self.points.len()),
            (&self.cell_data, self.polys.len()),
        ] {
            for array in data.iter() {
                if array.tuple_count() != expected {
                    return Err(MeshError::AttributeLength {
                        name: array.name.clone(),
                        expected,
                        found: array.tuple_count(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Area of polygon `cell`.
    ///
    /// Returns zero for cells with fewer than three points or an
    /// out-of-bounds index.
    #[must_use]
    pub fn cell_area(&self, cell: usize) -> f64 {
        let Some(ids) = self.polys.cell(cell) else {
            return 0.0;
        };
        if ids.len() < 3 {
            return 0.0;
        }
        let ring: Vec<Point3<f64>> = ids
            .iter()
            .filter_map(|&p| self.points.get(p as usize))
            .collect();
        polygon_area(&ring)
    }

    /// Total area of all polygons.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        (0..self.polys.len()).map(|c| self.cell_area(c)).sum()
    }
}

impl MeshTopology for PolyMesh {
    #[inline]
    fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn cell_count(&self) -> usize {
        self.polys.len()
    }

    fn point(&self, index: usize) -> Option<Point3<f64>> {
        self.points.get(index)
    }

    fn cell(&self, index: usize) -> Option<&[u32]> {
        self.polys.cell(index)
    }
}

/// Area of a planar polygon given its vertex ring.
///
/// Uses Newell's method: half the length of the summed cross products of
/// consecutive vertices, which is exact for planar polygons of any
/// orientation in 3D.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, polygon_area};
///
/// let square = [
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(2.0, 0.0, 1.0),
///     Point3::new(2.0, 2.0, 1.0),
///     Point3::new(0.0, 2.0, 1.0),
/// ];
/// assert!((polygon_area(&square) - 4.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn polygon_area(ring: &[Point3<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let normal: Vector3<f64> = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.coords.cross(&b.coords))
        .sum();
    0.5 * normal.norm()
}
