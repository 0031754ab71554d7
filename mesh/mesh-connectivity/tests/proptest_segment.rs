//! Property-based tests for segmentation.
//!
//! These tests use proptest to generate barred grids and triangle soups and
//! verify the labeling and growing invariants.
//!
//! Run with: cargo test -p mesh-connectivity -- proptest

#![allow(clippy::unwrap_used)]

mod common;

use common::{grid, grid_edges};
use mesh_connectivity::{BarrierEdges, ExtractionMode, SegmentConfig, segment};
use mesh_types::{MeshTopology, PolyMesh};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Grid dimensions with a random subset of grid edges marked as barriers.
fn arb_barred_grid() -> impl Strategy<Value = (u32, u32, Vec<bool>)> {
    (1u32..=6, 1u32..=6).prop_flat_map(|(cols, rows)| {
        let edges = grid_edges(cols, rows).len();
        (
            Just(cols),
            Just(rows),
            prop::collection::vec(prop::bool::weighted(0.3), edges),
        )
    })
}

/// Random triangles over a random point cloud.
fn arb_soup() -> impl Strategy<Value = PolyMesh> {
    (3u32..30).prop_flat_map(|n| {
        let coords = prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), n as usize);
        let faces = prop::collection::vec(prop::array::uniform3(0..n), 1..40);
        (coords, faces).prop_map(|(coords, faces)| PolyMesh::from_polygons(&coords, &faces))
    })
}

fn barriers_from(cols: u32, rows: u32, mask: &[bool]) -> BarrierEdges {
    grid_edges(cols, rows)
        .into_iter()
        .zip(mask)
        .filter(|&(_, &barred)| barred)
        .fold(BarrierEdges::new(), |b, ((p0, p1), _)| b.with_edge(p0, p1))
}

/// Pairs of edge-adjacent cells of [`grid`] with the edge they share.
fn grid_neighbors(cols: u32, rows: u32) -> Vec<(usize, usize, (u32, u32))> {
    let stride = cols + 1;
    let cell = |i: u32, j: u32| (j * cols + i) as usize;
    let mut pairs = Vec::new();
    for j in 0..rows {
        for i in 0..cols {
            let p = j * stride + i;
            if i + 1 < cols {
                pairs.push((cell(i, j), cell(i + 1, j), (p + 1, p + 1 + stride)));
            }
            if j + 1 < rows {
                pairs.push((cell(i, j), cell(i, j + 1), (p + stride, p + stride + 1)));
            }
        }
    }
    pairs
}

fn same_region(ids: &[Option<u32>], a: usize, b: usize) -> bool {
    ids[a].is_some() && ids[a] == ids[b]
}

// =============================================================================
// Property Tests: Labeling
// =============================================================================

proptest! {
    /// Every cell lands in exactly one non-empty region.
    #[test]
    fn all_regions_partition_cells((cols, rows, mask) in arb_barred_grid()) {
        let mesh = grid(cols, rows);
        let config = SegmentConfig::all_regions()
            .with_barrier_edges(barriers_from(cols, rows, &mask));
        let result = segment(&mesh, &config).unwrap();

        prop_assert_eq!(result.mesh.cell_count(), mesh.cell_count());
        prop_assert!(result.region_ids().iter().all(Option::is_some));
        prop_assert!(result.region_sizes().iter().all(|&s| s > 0));
        prop_assert_eq!(result.region_sizes().iter().sum::<usize>(), mesh.cell_count());
        prop_assert_eq!(result.number_of_extracted_regions(), result.region_count());
    }

    /// Cells across an open edge always share a region.
    #[test]
    fn open_edges_join_regions((cols, rows, mask) in arb_barred_grid()) {
        let mesh = grid(cols, rows);
        let barriers = barriers_from(cols, rows, &mask);
        let config = SegmentConfig::all_regions().with_barrier_edges(barriers.clone());
        let result = segment(&mesh, &config).unwrap();
        let ids = result.region_ids();

        for (a, b, (p0, p1)) in grid_neighbors(cols, rows) {
            if !barriers.is_barrier(&mesh.points, p0, p1) {
                prop_assert!(same_region(ids, a, b), "cells {} and {} split", a, b);
            }
        }
    }

    /// Segmenting twice gives identical labels and output.
    #[test]
    fn segmentation_is_idempotent((cols, rows, mask) in arb_barred_grid()) {
        let mesh = grid(cols, rows);
        let config = SegmentConfig::all_regions()
            .with_barrier_edges(barriers_from(cols, rows, &mask));
        let first = segment(&mesh, &config).unwrap();
        let second = segment(&mesh, &config).unwrap();

        prop_assert_eq!(first.region_ids(), second.region_ids());
        prop_assert_eq!(first.extracted_cells, second.extracted_cells);
        prop_assert_eq!(first.mesh, second.mesh);
    }

    /// Adding a barrier only ever splits regions.
    #[test]
    fn extra_barrier_refines_regions(
        (cols, rows, mask) in arb_barred_grid(),
        extra in any::<prop::sample::Index>(),
    ) {
        let mesh = grid(cols, rows);
        let mut more = mask.clone();
        let flipped = extra.index(more.len());
        more[flipped] = true;

        let coarse = segment(
            &mesh,
            &SegmentConfig::all_regions().with_barrier_edges(barriers_from(cols, rows, &mask)),
        )
        .unwrap();
        let fine = segment(
            &mesh,
            &SegmentConfig::all_regions().with_barrier_edges(barriers_from(cols, rows, &more)),
        )
        .unwrap();

        prop_assert!(fine.region_count() >= coarse.region_count());
        let cells = mesh.cell_count();
        for a in 0..cells {
            for b in (a + 1)..cells {
                if same_region(fine.region_ids(), a, b) {
                    prop_assert!(same_region(coarse.region_ids(), a, b));
                }
            }
        }
    }

    /// The largest region has the most cells.
    #[test]
    fn largest_region_is_maximal((cols, rows, mask) in arb_barred_grid()) {
        let mesh = grid(cols, rows);
        let config = SegmentConfig::largest()
            .with_barrier_edges(barriers_from(cols, rows, &mask));
        let result = segment(&mesh, &config).unwrap();

        let largest = result.largest_region().unwrap() as usize;
        let max = result.region_sizes().iter().copied().max().unwrap();
        prop_assert_eq!(result.region_sizes()[largest], max);
        prop_assert_eq!(result.mesh.cell_count(), max);
        // First region to reach the maximum wins
        prop_assert!(result.region_sizes()[..largest].iter().all(|&s| s < max));
    }

    /// Labeling a random soup never panics and covers every cell.
    #[test]
    fn soup_partition(mesh in arb_soup()) {
        let result = segment(&mesh, &SegmentConfig::all_regions()).unwrap();

        prop_assert_eq!(result.region_sizes().iter().sum::<usize>(), mesh.cell_count());
        prop_assert!(result.mesh.validate().is_ok());
    }
}

// =============================================================================
// Property Tests: Region Growing
// =============================================================================

proptest! {
    /// Growing relabels cells but never drops or duplicates them.
    #[test]
    fn growing_conserves_cells_and_area(
        (cols, rows, mask) in arb_barred_grid(),
        threshold in 0.0..1.0f64,
    ) {
        let mesh = grid(cols, rows);
        let barriers = barriers_from(cols, rows, &mask);
        let plain = segment(
            &mesh,
            &SegmentConfig::all_regions().with_barrier_edges(barriers.clone()),
        )
        .unwrap();
        let grown = segment(
            &mesh,
            &SegmentConfig::all_regions()
                .with_barrier_edges(barriers)
                .with_region_growing(threshold),
        )
        .unwrap();

        prop_assert_eq!(grown.mesh.cell_count(), plain.mesh.cell_count());
        prop_assert_eq!(grown.region_sizes().iter().sum::<usize>(), mesh.cell_count());
        let area: f64 = grown.region_areas().iter().sum();
        prop_assert!((area - grown.total_area()).abs() < 1e-9);
        prop_assert!((grown.total_area() - f64::from(cols * rows)).abs() < 1e-9);
    }

    /// Cells only ever move into large regions.
    #[test]
    fn growing_targets_large_regions(
        (cols, rows, mask) in arb_barred_grid(),
        threshold in 0.0..1.0f64,
    ) {
        let mesh = grid(cols, rows);
        let barriers = barriers_from(cols, rows, &mask);
        let plain = segment(
            &mesh,
            &SegmentConfig::all_regions().with_barrier_edges(barriers.clone()),
        )
        .unwrap();
        let grown = segment(
            &mesh,
            &SegmentConfig::all_regions()
                .with_barrier_edges(barriers)
                .with_region_growing(threshold),
        )
        .unwrap();

        for (before, after) in plain.region_ids().iter().zip(grown.region_ids()) {
            let (Some(before), Some(after)) = (*before, *after) else {
                prop_assert!(false, "grid cells are always labeled");
                continue;
            };
            if before != after {
                prop_assert!(!grown.is_large_region(before));
                prop_assert!(grown.is_large_region(after));
            }
        }
    }

    /// Large-region extraction after growing keeps every cell that can
    /// reach a large region.
    #[test]
    fn large_regions_emit_only_large_labels(
        (cols, rows, mask) in arb_barred_grid(),
        threshold in 0.0..1.0f64,
    ) {
        let mesh = grid(cols, rows);
        let config = SegmentConfig::large_regions(threshold)
            .with_barrier_edges(barriers_from(cols, rows, &mask));
        let result = segment(&mesh, &config).unwrap();

        for &cell in &result.extracted_cells {
            let region = result.region_ids()[cell].unwrap();
            prop_assert!(result.is_large_region(region));
        }
        let stats = result.grow_stats().unwrap();
        prop_assert_eq!(
            result.mesh.cell_count() + stats.unresolved(),
            mesh.cell_count()
        );
    }
}

// =============================================================================
// Property Tests: Seeding
// =============================================================================

proptest! {
    /// A cell seed extracts the same cells as the region holding that cell.
    #[test]
    fn cell_seed_matches_specified_region(
        (cols, rows, mask) in arb_barred_grid(),
        seed in any::<prop::sample::Index>(),
    ) {
        let mesh = grid(cols, rows);
        let barriers = barriers_from(cols, rows, &mask);
        let seed = seed.index(mesh.cell_count());

        let all = segment(
            &mesh,
            &SegmentConfig::all_regions().with_barrier_edges(barriers.clone()),
        )
        .unwrap();
        let region = all.region_ids()[seed].unwrap();

        let seeded = segment(
            &mesh,
            &SegmentConfig::default()
                .with_barrier_edges(barriers.clone())
                .with_extraction(ExtractionMode::CellSeeded {
                    seeds: vec![i64::try_from(seed).unwrap()],
                }),
        )
        .unwrap();
        let specified = segment(
            &mesh,
            &SegmentConfig::default()
                .with_barrier_edges(barriers)
                .with_extraction(ExtractionMode::SpecifiedRegions {
                    region_ids: vec![i64::from(region)],
                }),
        )
        .unwrap();

        prop_assert_eq!(&seeded.extracted_cells, &specified.extracted_cells);
        prop_assert_eq!(seeded.mesh.point_count(), specified.mesh.point_count());
    }
}
