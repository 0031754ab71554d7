//! Core polygon mesh types for CortenForge.
//!
//! This crate provides the data model shared by the polygon processing
//! crates:
//!
//! - [`Points`] - Point coordinates stored in single or double precision
//! - [`CellArray`] - Variable-size cells (polygons or polylines) as point-id lists
//! - [`AttributeData`] - Named per-point or per-cell data arrays
//! - [`PolyMesh`] - Points plus polygons, polylines, and their attributes
//!
//! # Units
//!
//! This library is **unit-agnostic**. Coordinates are read back as `f64`
//! regardless of storage precision.
//!
//! # Example
//!
//! ```
//! use mesh_types::{MeshTopology, Point3, PolyMesh};
//!
//! // A unit square made of one quad
//! let mut mesh = PolyMesh::new();
//! mesh.points.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.points.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.points.push(Point3::new(1.0, 1.0, 0.0));
//! mesh.points.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.polys.push(&[0, 1, 2, 3]);
//!
//! assert_eq!(mesh.cell_count(), 1);
//! assert!((mesh.cell_area(0) - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod attributes;
mod cells;
mod error;
mod mesh;
mod points;
mod traits;

pub use attributes::{ArrayValues, AttributeData, DataArray};
pub use cells::CellArray;
pub use error::{MeshError, MeshResult};
pub use mesh::{PolyMesh, polygon_area};
pub use points::{Points, Precision};
pub use traits::MeshTopology;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
