//! Edge-connectivity segmentation for polygon meshes.
//!
//! This crate partitions the polygons of a mesh into regions: two polygons
//! share a region when a chain of shared edges connects them without
//! crossing a barrier edge or a cell that fails the scalar gate.
//!
//! - Barrier edges by length interval or by explicit point pairs
//! - Scalar connectivity on cell or point arrays
//! - Seeded, largest, all, specified, closest-point, and large-region
//!   extraction
//! - Growing of small regions into adjacent large ones
//!
//! # Overview
//!
//! [`segment`] runs the whole pipeline and returns a [`Segmentation`]
//! holding the compacted output mesh and per-region statistics. The
//! building blocks ([`CellLinks`], [`RegionLabeler`], [`RegionAreas`],
//! [`grow_small_regions`], [`assemble`]) are public for callers that need
//! finer control.
//!
//! # Quick Start
//!
//! ```
//! use mesh_connectivity::{segment, SegmentConfig};
//! use mesh_types::{MeshTopology, PolyMesh};
//!
//! // Two quads sharing an edge
//! let mesh = PolyMesh::from_polygons(
//!     &[
//!         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0],
//!         [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [2.0, 1.0, 0.0],
//!     ],
//!     &[[0, 1, 4, 3], [1, 2, 5, 4]],
//! );
//!
//! let result = segment(&mesh, &SegmentConfig::all_regions()).unwrap();
//! assert_eq!(result.region_count(), 1);
//! assert_eq!(result.mesh.cell_count(), 2);
//! ```
//!
//! # Barriers and Growing
//!
//! ```
//! use mesh_connectivity::{segment, BarrierEdges, SegmentConfig};
//! use mesh_types::PolyMesh;
//!
//! let mesh = PolyMesh::from_polygons(
//!     &[
//!         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0],
//!         [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [2.0, 1.0, 0.0],
//!     ],
//!     &[[0, 1, 4, 3], [1, 2, 5, 4]],
//! );
//!
//! // The shared edge (1, 4) splits the quads apart
//! let config = SegmentConfig::all_regions()
//!     .with_barrier_edges(BarrierEdges::new().with_edge(1, 4));
//! let split = segment(&mesh, &config).unwrap();
//! assert_eq!(split.region_count(), 2);
//!
//! // Both halves are half the area, so with a 0.5 threshold both are large
//! let grown = segment(&mesh, &config.with_region_growing(0.5)).unwrap();
//! assert_eq!(grown.number_of_extracted_regions(), 2);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod barrier;
mod config;
mod error;
mod extract;
mod grow;
mod label;
mod region_map;
mod scalar;
mod segment;

pub use adjacency::CellLinks;
pub use barrier::BarrierEdges;
pub use config::{DEFAULT_LARGE_REGION_THRESHOLD, ExtractionMode, OutputPrecision, SegmentConfig};
pub use error::{ConnectivityError, ConnectivityResult};
pub use extract::{
    AssembleOptions, Extracted, REGION_AREA_ARRAY, REGION_ID_ARRAY, RegionFilter, assemble,
};
pub use grow::{GrowStats, RegionAreas, grow_small_regions};
pub use label::{
    LabelStats, Labeling, PointMap, RegionLabeler, cell_seed_cells, closest_point,
    point_seed_cells,
};
pub use region_map::RegionMap;
pub use scalar::{ScalarConnectivity, ScalarGate, ScalarSource};
pub use segment::{Segmentation, segment, segment_with_progress};
