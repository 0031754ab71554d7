//! Region areas, large/small classification, and small-region growing.
//!
//! Growing moves the cells of small regions into adjacent large regions.
//! A strict pass only moves a cell across its longest edge, and only when
//! that edge borders a large region; a relaxed pass then moves any
//! remaining cell that borders a large region at all. Each pass sweeps the
//! worklist until a sweep makes no change.

use mesh_types::PolyMesh;
use tracing::debug;

use crate::adjacency::{CellLinks, cell_edge, edge_count};
use crate::region_map::RegionMap;

/// Per-region area totals and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAreas {
    /// Area of every polygon, indexed by cell.
    pub cell_areas: Vec<f64>,
    /// Summed cell area of each region.
    pub region_areas: Vec<f64>,
    /// Area of all polygons, labeled or not.
    pub total_area: f64,
    /// Whether each region is large.
    pub large: Vec<bool>,
}

impl RegionAreas {
    /// Sum cell areas per region and classify regions against
    /// `threshold * total_area`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_connectivity::{RegionAreas, RegionMap};
    /// use mesh_types::PolyMesh;
    ///
    /// let mesh = PolyMesh::from_polygons(
    ///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ///     &[[0, 1, 2]],
    /// );
    /// let regions = RegionMap::new(1);
    /// let areas = RegionAreas::compute(&mesh, &regions, 0, 0.1);
    ///
    /// assert!((areas.total_area - 0.5).abs() < 1e-12);
    /// assert!(areas.region_areas.is_empty());
    /// ```
    #[must_use]
    pub fn compute(
        mesh: &PolyMesh,
        regions: &RegionMap,
        region_count: usize,
        threshold: f64,
    ) -> Self {
        let cell_areas: Vec<f64> = (0..mesh.polys.len()).map(|c| mesh.cell_area(c)).collect();
        let mut region_areas = vec![0.0; region_count];

        for (cell, &area) in cell_areas.iter().enumerate() {
            if let Some(region) = regions.get(cell)
                && let Some(total) = region_areas.get_mut(region as usize)
            {
                *total += area;
            }
        }

        let total_area: f64 = cell_areas.iter().sum();
        let cutoff = threshold * total_area;
        let large: Vec<bool> = region_areas.iter().map(|&a| a >= cutoff).collect();

        debug!(
            regions = region_count,
            large = large.iter().filter(|&&l| l).count(),
            total_area,
            "Classified regions by area"
        );

        Self {
            cell_areas,
            region_areas,
            total_area,
            large,
        }
    }

    /// Whether `region` is large. Unknown regions are not.
    #[must_use]
    pub fn is_large(&self, region: u32) -> bool {
        self.large.get(region as usize).copied().unwrap_or(false)
    }

    /// Area of `region`, or zero if unknown.
    #[must_use]
    pub fn area(&self, region: u32) -> f64 {
        self.region_areas
            .get(region as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Counters from one growing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowStats {
    /// Cells in small regions before growing.
    pub candidates: usize,
    /// Sweeps made by the longest-edge pass.
    pub strict_sweeps: usize,
    /// Cells moved by the longest-edge pass.
    pub strict_reassigned: usize,
    /// Sweeps made by the any-edge pass.
    pub relaxed_sweeps: usize,
    /// Cells moved by the any-edge pass.
    pub relaxed_reassigned: usize,
}

impl GrowStats {
    /// Cells still in small regions after growing.
    #[must_use]
    pub const fn unresolved(&self) -> usize {
        self.candidates - self.strict_reassigned - self.relaxed_reassigned
    }
}

/// Reassign cells of small regions to adjacent large regions.
///
/// Only region labels change; `areas` is left as computed before growing.
/// Barriers and scalar gates do not apply here, only shared edges.
pub fn grow_small_regions(
    mesh: &PolyMesh,
    links: &CellLinks,
    regions: &mut RegionMap,
    areas: &RegionAreas,
) -> GrowStats {
    let mut worklist: Vec<usize> = (0..regions.cell_count())
        .filter(|&c| regions.get(c).is_some_and(|r| !areas.is_large(r)))
        .collect();

    let mut stats = GrowStats {
        candidates: worklist.len(),
        ..GrowStats::default()
    };
    let mut grower = Grower {
        mesh,
        links,
        areas,
        neighbors: Vec::new(),
    };

    (stats.strict_sweeps, stats.strict_reassigned) =
        sweep_to_fixed_point(&mut worklist, regions, |cell, regions| {
            grower.longest_edge_target(cell, regions)
        });
    (stats.relaxed_sweeps, stats.relaxed_reassigned) =
        sweep_to_fixed_point(&mut worklist, regions, |cell, regions| {
            grower.any_edge_target(cell, regions)
        });

    debug!(
        candidates = stats.candidates,
        strict_sweeps = stats.strict_sweeps,
        strict_reassigned = stats.strict_reassigned,
        relaxed_sweeps = stats.relaxed_sweeps,
        relaxed_reassigned = stats.relaxed_reassigned,
        "Grew small regions"
    );

    stats
}

/// Sweep `worklist` until a sweep moves nothing. Moved cells leave the
/// worklist. Returns `(sweeps, moved)`.
fn sweep_to_fixed_point(
    worklist: &mut Vec<usize>,
    regions: &mut RegionMap,
    mut target: impl FnMut(usize, &RegionMap) -> Option<u32>,
) -> (usize, usize) {
    let mut sweeps = 0;
    let mut moved = 0;

    while !worklist.is_empty() {
        sweeps += 1;
        let before = moved;
        let mut remaining = Vec::with_capacity(worklist.len());

        for &cell in worklist.iter() {
            if let Some(region) = target(cell, regions) {
                regions.assign(cell, region);
                moved += 1;
            } else {
                remaining.push(cell);
            }
        }

        *worklist = remaining;
        if moved == before {
            break;
        }
    }

    (sweeps, moved)
}

struct Grower<'a> {
    mesh: &'a PolyMesh,
    links: &'a CellLinks,
    areas: &'a RegionAreas,
    neighbors: Vec<usize>,
}

impl Grower<'_> {
    /// First large region across edge `(p0, p1)` of `cell`.
    fn large_neighbor_region(
        &mut self,
        regions: &RegionMap,
        cell: usize,
        p0: u32,
        p1: u32,
    ) -> Option<u32> {
        self.links
            .edge_neighbors(self.mesh, cell, p0, p1, &mut self.neighbors);
        self.neighbors
            .iter()
            .filter_map(|&n| regions.get(n))
            .find(|&r| self.areas.is_large(r))
    }

    /// The large region across the longest edge, if the longest edge
    /// borders one.
    fn longest_edge_target(&mut self, cell: usize, regions: &RegionMap) -> Option<u32> {
        let ids = self.mesh.polys.cell(cell)?;

        let mut longest: Option<(usize, f64)> = None;
        let mut longest_large: Option<(usize, f64, u32)> = None;

        for e in 0..edge_count(ids.len()) {
            let (p0, p1) = cell_edge(ids, e);
            let length_sq = self
                .mesh
                .points
                .distance_squared(p0 as usize, p1 as usize)
                .unwrap_or(0.0);

            if longest.is_none_or(|(_, l)| length_sq > l) {
                longest = Some((e, length_sq));
            }
            if longest_large.is_none_or(|(_, l, _)| length_sq > l)
                && let Some(region) = self.large_neighbor_region(regions, cell, p0, p1)
            {
                longest_large = Some((e, length_sq, region));
            }
        }

        match (longest, longest_large) {
            (Some((e, _)), Some((e_large, _, region))) if e == e_large => Some(region),
            _ => None,
        }
    }

    /// The large region across the first edge, in cycle order, that
    /// borders one.
    fn any_edge_target(&mut self, cell: usize, regions: &RegionMap) -> Option<u32> {
        let ids = self.mesh.polys.cell(cell)?;
        (0..edge_count(ids.len())).find_map(|e| {
            let (p0, p1) = cell_edge(ids, e);
            self.large_neighbor_region(regions, cell, p0, p1)
        })
    }
}
