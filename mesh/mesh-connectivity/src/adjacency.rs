//! Cell-to-point incidence for edge-neighbor queries.
//!
//! Provides the point-to-cell links the labeler walks.

use mesh_types::PolyMesh;

/// Point-to-cell incidence over the polygons of a mesh.
///
/// For each point, stores the cells that use it. Edge neighbors are found
/// by scanning the incident cells of one endpoint for cells that also
/// carry the edge. Cells with fewer than two points are not indexed.
#[derive(Debug, Clone)]
pub struct CellLinks {
    /// For each point, the cells incident to it, in ascending order.
    point_cells: Vec<Vec<usize>>,
}

impl CellLinks {
    /// Build links from a mesh.
    ///
    /// The mesh must be valid: every point id must be below the point
    /// count.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_connectivity::CellLinks;
    /// use mesh_types::PolyMesh;
    ///
    /// let mesh = PolyMesh::from_polygons(
    ///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [1.5, 1.0, 0.0]],
    ///     &[[0, 1, 2], [1, 3, 2]],
    /// );
    ///
    /// let links = CellLinks::from_mesh(&mesh);
    /// let mut neighbors = Vec::new();
    /// links.edge_neighbors(&mesh, 0, 1, 2, &mut neighbors);
    /// assert_eq!(neighbors, vec![1]);
    /// ```
    #[must_use]
    pub fn from_mesh(mesh: &PolyMesh) -> Self {
        let mut point_cells: Vec<Vec<usize>> = vec![Vec::new(); mesh.points.len()];

        for (cell, ids) in mesh.polys.iter().enumerate() {
            if ids.len() < 2 {
                continue;
            }
            for &p in ids {
                let incident = &mut point_cells[p as usize];
                // A point repeated within one cell is linked once
                if incident.last() != Some(&cell) {
                    incident.push(cell);
                }
            }
        }

        Self { point_cells }
    }

    /// Cells incident to a point.
    ///
    /// Returns an empty slice if the point index is out of bounds.
    #[must_use]
    pub fn point_cells(&self, point: u32) -> &[usize] {
        self.point_cells
            .get(point as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Get the number of indexed points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_cells.len()
    }

    /// Collect the cells other than `cell` that share edge `(p0, p1)`.
    ///
    /// `out` is cleared first. The result is empty for boundary edges.
    /// Edge direction does not matter.
    pub fn edge_neighbors(
        &self,
        mesh: &PolyMesh,
        cell: usize,
        p0: u32,
        p1: u32,
        out: &mut Vec<usize>,
    ) {
        debug_assert!(
            (p0 as usize) < self.point_cells.len() && (p1 as usize) < self.point_cells.len(),
            "edge ({p0}, {p1}) outside the indexed points"
        );
        out.clear();

        // Walk the shorter incidence list
        let (a, b) = if self.point_cells(p0).len() <= self.point_cells(p1).len() {
            (p0, p1)
        } else {
            (p1, p0)
        };

        for &candidate in self.point_cells(a) {
            if candidate == cell {
                continue;
            }
            if let Some(ids) = mesh.polys.cell(candidate)
                && has_edge(ids, a, b)
            {
                out.push(candidate);
            }
        }
    }
}

/// Number of distinct edges walked for a cell with `n` points.
///
/// A two-point cell has a single edge rather than the same edge twice.
#[inline]
#[must_use]
pub(crate) const fn edge_count(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        2 => 1,
        _ => n,
    }
}

/// The `i`-th edge of a cyclic point list.
#[inline]
#[must_use]
pub(crate) fn cell_edge(ids: &[u32], i: usize) -> (u32, u32) {
    (ids[i], ids[(i + 1) % ids.len()])
}

/// Whether `ids` has `(a, b)` as consecutive points in either direction.
fn has_edge(ids: &[u32], a: u32, b: u32) -> bool {
    (0..edge_count(ids.len())).any(|i| {
        let (q0, q1) = cell_edge(ids, i);
        (q0 == a && q1 == b) || (q0 == b && q1 == a)
    })
}
