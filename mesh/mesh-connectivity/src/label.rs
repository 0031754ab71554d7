//! Wave propagation that labels connected regions.
//!
//! A region is flooded one breadth-first layer at a time: every cell of the
//! current wave is labeled, and its unlabeled edge neighbors that are not
//! behind a barrier and pass the scalar gate form the next wave.

use mesh_types::{MeshTopology, PolyMesh};
use nalgebra::Point3;

use crate::adjacency::{CellLinks, cell_edge, edge_count};
use crate::barrier::BarrierEdges;
use crate::region_map::RegionMap;
use crate::scalar::ScalarGate;

/// Compacted ids for the points touched by labeled cells.
///
/// Ids are handed out in first-visit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointMap {
    map: Vec<Option<u32>>,
    order: Vec<u32>,
}

impl PointMap {
    /// Create a map over `point_count` points with none visited.
    #[must_use]
    pub fn new(point_count: usize) -> Self {
        Self {
            map: vec![None; point_count],
            order: Vec::new(),
        }
    }

    /// Compacted id of `point`, assigning the next one on first visit.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: point ids are u32, so at most u32::MAX points can be visited
    pub fn visit(&mut self, point: u32) -> u32 {
        let slot = &mut self.map[point as usize];
        if let Some(id) = *slot {
            return id;
        }
        let id = self.order.len() as u32;
        *slot = Some(id);
        self.order.push(point);
        id
    }

    /// Compacted id of `point`, if visited.
    #[must_use]
    pub fn get(&self, point: u32) -> Option<u32> {
        self.map.get(point as usize).copied().flatten()
    }

    /// Original point ids in compacted order.
    #[must_use]
    pub fn visited(&self) -> &[u32] {
        &self.order
    }

    /// Number of visited points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no point has been visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Counters collected while labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Cells that received a region id.
    pub cells_labeled: usize,
    /// Edges examined for neighbors.
    pub edges_tested: usize,
    /// Edges skipped because they are barriers.
    pub barrier_edges_hit: usize,
    /// Neighbor cells pushed onto the next wave.
    pub neighbors_enqueued: usize,
}

/// Output of a labeling run.
#[derive(Debug, Clone)]
pub struct Labeling {
    /// Region of each cell.
    pub regions: RegionMap,
    /// Compacted ids of the points used by labeled cells.
    pub point_map: PointMap,
    /// Cell count of each region at labeling time.
    pub region_sizes: Vec<usize>,
    /// First region to reach the largest cell count, in sweep order.
    pub largest_region: Option<u32>,
    /// Traversal counters.
    pub stats: LabelStats,
}

/// Floods regions over a mesh.
///
/// # Example
///
/// ```
/// use mesh_connectivity::{BarrierEdges, CellLinks, RegionLabeler, ScalarGate};
/// use mesh_types::PolyMesh;
///
/// let mesh = PolyMesh::from_polygons(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [1.5, 1.0, 0.0]],
///     &[[0, 1, 2], [1, 3, 2]],
/// );
/// let links = CellLinks::from_mesh(&mesh);
/// let barriers = BarrierEdges::disabled();
/// let gate = ScalarGate::disabled();
///
/// let mut labeler = RegionLabeler::new(&mesh, &links, &barriers, &gate);
/// labeler.label_all_regions(&mut |_| {});
/// let labeling = labeler.finish();
///
/// assert_eq!(labeling.region_sizes, vec![2]);
/// assert_eq!(labeling.largest_region, Some(0));
/// ```
#[derive(Debug)]
pub struct RegionLabeler<'a> {
    mesh: &'a PolyMesh,
    links: &'a CellLinks,
    barriers: &'a BarrierEdges,
    gate: &'a ScalarGate,
    regions: RegionMap,
    point_map: PointMap,
    wave: Vec<usize>,
    next_wave: Vec<usize>,
    neighbors: Vec<usize>,
    region_sizes: Vec<usize>,
    largest_region: Option<u32>,
    largest_size: usize,
    stats: LabelStats,
}

impl<'a> RegionLabeler<'a> {
    /// Create a labeler with every cell unvisited.
    #[must_use]
    pub fn new(
        mesh: &'a PolyMesh,
        links: &'a CellLinks,
        barriers: &'a BarrierEdges,
        gate: &'a ScalarGate,
    ) -> Self {
        Self {
            mesh,
            links,
            barriers,
            gate,
            regions: RegionMap::new(mesh.cell_count()),
            point_map: PointMap::new(mesh.point_count()),
            wave: Vec::new(),
            next_wave: Vec::new(),
            neighbors: Vec::new(),
            region_sizes: Vec::new(),
            largest_region: None,
            largest_size: 0,
            stats: LabelStats::default(),
        }
    }

    /// Number of regions labeled so far.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.region_sizes.len()
    }

    /// Sweep the cells in order, flooding a new region from each unvisited
    /// cell.
    ///
    /// `progress` receives the swept fraction of cells.
    pub fn label_all_regions(&mut self, progress: &mut dyn FnMut(f64)) {
        let cell_count = self.mesh.cell_count();
        let report_every = (cell_count / 10).max(1);

        for cell in 0..cell_count {
            if cell % report_every == 0 {
                progress(fraction(cell, cell_count));
            }
            if self.regions.is_labeled(cell) || !is_labelable(self.mesh, cell) {
                continue;
            }
            self.label_region([cell]);
        }
        progress(1.0);
    }

    /// Flood one new region from all `seeds` at once.
    ///
    /// Degenerate or already labeled seeds are skipped. Returns the number
    /// of cells in the new region; no region is created if it is zero.
    pub fn label_region(&mut self, seeds: impl IntoIterator<Item = usize>) -> usize {
        let mesh = self.mesh;
        self.wave.clear();
        self.wave.extend(
            seeds
                .into_iter()
                .filter(|&c| is_labelable(mesh, c) && !self.regions.is_labeled(c)),
        );
        if self.wave.is_empty() {
            return 0;
        }

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: there are never more regions than u32 cells
        let region = self.region_sizes.len() as u32;
        let size = self.flood(region);

        self.region_sizes.push(size);
        if size > self.largest_size {
            self.largest_size = size;
            self.largest_region = Some(region);
        }
        size
    }

    /// Propagate `region` from the current wave until it is exhausted.
    fn flood(&mut self, region: u32) -> usize {
        let mut wave = std::mem::take(&mut self.wave);
        let mut next_wave = std::mem::take(&mut self.next_wave);
        let mut neighbors = std::mem::take(&mut self.neighbors);
        let mut size = 0;

        while !wave.is_empty() {
            for &cell in &wave {
                if self.regions.is_labeled(cell) {
                    continue;
                }
                self.regions.assign(cell, region);
                size += 1;

                let Some(ids) = self.mesh.polys.cell(cell) else {
                    continue;
                };
                for &p in ids {
                    self.point_map.visit(p);
                }

                for e in 0..edge_count(ids.len()) {
                    let (p0, p1) = cell_edge(ids, e);
                    self.stats.edges_tested += 1;
                    if self.barriers.is_barrier(&self.mesh.points, p0, p1) {
                        self.stats.barrier_edges_hit += 1;
                        continue;
                    }

                    self.links
                        .edge_neighbors(self.mesh, cell, p0, p1, &mut neighbors);
                    for &neighbor in &neighbors {
                        if self.gate.is_scalar_connected(cell, neighbor)
                            && !self.regions.is_labeled(neighbor)
                        {
                            next_wave.push(neighbor);
                            self.stats.neighbors_enqueued += 1;
                        }
                    }
                }
            }

            std::mem::swap(&mut wave, &mut next_wave);
            next_wave.clear();
        }

        self.stats.cells_labeled += size;
        self.wave = wave;
        self.next_wave = next_wave;
        self.neighbors = neighbors;
        size
    }

    /// Consume the labeler and return its results.
    #[must_use]
    pub fn finish(self) -> Labeling {
        Labeling {
            regions: self.regions,
            point_map: self.point_map,
            region_sizes: self.region_sizes,
            largest_region: self.largest_region,
            stats: self.stats,
        }
    }
}

/// Cells with at least two points take part in labeling.
fn is_labelable(mesh: &PolyMesh, cell: usize) -> bool {
    mesh.polys.cell_size(cell) >= 2
}

#[allow(clippy::cast_precision_loss)]
fn fraction(done: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    }
}

/// Cells incident to the seed points, in seed order.
///
/// Negative and out-of-range ids are skipped.
#[must_use]
pub fn point_seed_cells(links: &CellLinks, seeds: &[i64]) -> Vec<usize> {
    seeds
        .iter()
        .filter_map(|&s| u32::try_from(s).ok())
        .filter(|&p| (p as usize) < links.point_count())
        .flat_map(|p| links.point_cells(p).iter().copied())
        .collect()
}

/// Seed cells that exist in the mesh, in seed order.
///
/// Negative and out-of-range ids are skipped.
#[must_use]
pub fn cell_seed_cells(mesh: &PolyMesh, seeds: &[i64]) -> Vec<usize> {
    seeds
        .iter()
        .filter_map(|&s| usize::try_from(s).ok())
        .filter(|&c| c < mesh.cell_count())
        .collect()
}

/// Index of the mesh point nearest to `target`.
///
/// Ties go to the lowest index. Returns `None` for a mesh without points.
#[must_use]
pub fn closest_point(mesh: &PolyMesh, target: &Point3<f64>) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (i, p) in mesh.points.iter().enumerate() {
        let d2 = nalgebra::distance_squared(&p, target);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: point ids are u32
            let id = i as u32;
            best = Some((id, d2));
        }
    }
    best.map(|(id, _)| id)
}
