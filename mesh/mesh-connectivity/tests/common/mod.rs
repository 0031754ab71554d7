//! Mesh fixtures shared by the integration tests.

#![allow(dead_code)]

use mesh_types::PolyMesh;

/// A `cols` x `rows` grid of unit quads in the XY plane.
///
/// Point `(i, j)` has id `j * (cols + 1) + i`; cells are row-major.
pub fn grid(cols: u32, rows: u32) -> PolyMesh {
    let mut coords = Vec::new();
    for j in 0..=rows {
        for i in 0..=cols {
            coords.push([f64::from(i), f64::from(j), 0.0]);
        }
    }
    let stride = cols + 1;
    let mut cells = Vec::new();
    for j in 0..rows {
        for i in 0..cols {
            let p = j * stride + i;
            cells.push([p, p + 1, p + stride + 1, p + stride]);
        }
    }
    PolyMesh::from_polygons(&coords, &cells)
}

/// Every edge of [`grid`], horizontal edges first.
pub fn grid_edges(cols: u32, rows: u32) -> Vec<(u32, u32)> {
    let stride = cols + 1;
    let mut edges = Vec::new();
    for j in 0..=rows {
        for i in 0..cols {
            let p = j * stride + i;
            edges.push((p, p + 1));
        }
    }
    for j in 0..rows {
        for i in 0..=cols {
            let p = j * stride + i;
            edges.push((p, p + stride));
        }
    }
    edges
}
