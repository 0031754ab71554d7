//! Segmentation driver.
//!
//! Labels regions according to the extraction mode, optionally grows small
//! regions into large ones, and assembles the output mesh.

use hashbrown::HashSet;
use mesh_types::{MeshTopology, PolyMesh};
use tracing::{debug, info};

use crate::adjacency::CellLinks;
use crate::config::{ExtractionMode, SegmentConfig};
use crate::error::{ConnectivityError, ConnectivityResult};
use crate::extract::{AssembleOptions, RegionFilter, assemble};
use crate::grow::{GrowStats, RegionAreas, grow_small_regions};
use crate::label::{
    LabelStats, RegionLabeler, cell_seed_cells, closest_point, point_seed_cells,
};
use crate::region_map::RegionMap;
use crate::scalar::ScalarGate;

/// Result of a segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// The extracted mesh.
    pub mesh: PolyMesh,
    /// Input cell index of every output cell.
    pub extracted_cells: Vec<usize>,
    regions: RegionMap,
    region_count: usize,
    region_sizes: Vec<usize>,
    areas: RegionAreas,
    largest_region: Option<u32>,
    extracted_regions: usize,
    specified_regions: usize,
    visited_points: Vec<u32>,
    label_stats: LabelStats,
    grow_stats: Option<GrowStats>,
}

impl Segmentation {
    fn empty(mesh: &PolyMesh, specified_regions: usize) -> Self {
        Self {
            mesh: PolyMesh::new(),
            extracted_cells: Vec::new(),
            regions: RegionMap::new(mesh.cell_count()),
            region_count: 0,
            region_sizes: Vec::new(),
            areas: RegionAreas {
                cell_areas: Vec::new(),
                region_areas: Vec::new(),
                total_area: 0.0,
                large: Vec::new(),
            },
            largest_region: None,
            extracted_regions: 0,
            specified_regions,
            visited_points: Vec::new(),
            label_stats: LabelStats::default(),
            grow_stats: None,
        }
    }

    /// Final region of every input cell.
    #[must_use]
    pub fn region_map(&self) -> &RegionMap {
        &self.regions
    }

    /// Final region of every input cell, `None` where unlabeled.
    #[must_use]
    pub fn region_ids(&self) -> &[Option<u32>] {
        self.regions.as_slice()
    }

    /// Number of regions labeled, including regions emptied by growing.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Cell count of every region id after growing.
    #[must_use]
    pub fn region_sizes(&self) -> &[usize] {
        &self.region_sizes
    }

    /// Area of every region id, as computed before growing.
    #[must_use]
    pub fn region_areas(&self) -> &[f64] {
        &self.areas.region_areas
    }

    /// Whether a region is classified large.
    #[must_use]
    pub fn is_large_region(&self, region: u32) -> bool {
        self.areas.is_large(region)
    }

    /// Total area of all input polygons.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.areas.total_area
    }

    /// Region with the most cells at labeling time, first found on ties.
    #[must_use]
    pub fn largest_region(&self) -> Option<u32> {
        self.largest_region
    }

    /// Number of distinct regions among the emitted cells.
    #[must_use]
    pub fn number_of_extracted_regions(&self) -> usize {
        self.extracted_regions
    }

    /// Number of entries in the configured specified-region list.
    #[must_use]
    pub fn number_of_specified_regions(&self) -> usize {
        self.specified_regions
    }

    /// Input point ids visited by labeling, in first-visit order.
    #[must_use]
    pub fn visited_point_ids(&self) -> &[u32] {
        &self.visited_points
    }

    /// Labeling counters.
    #[must_use]
    pub fn label_stats(&self) -> LabelStats {
        self.label_stats
    }

    /// Growing counters, if growing ran.
    #[must_use]
    pub fn grow_stats(&self) -> Option<GrowStats> {
        self.grow_stats
    }

    /// Non-empty region ids sorted by descending area, ties by id.
    #[must_use]
    pub fn regions_by_area(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = (0..self.region_count)
            .filter(|&r| self.region_sizes.get(r).is_some_and(|&s| s > 0))
            .filter_map(|r| u32::try_from(r).ok())
            .collect();
        ids.sort_by(|&a, &b| {
            self.areas
                .area(b)
                .total_cmp(&self.areas.area(a))
                .then(a.cmp(&b))
        });
        ids
    }
}

/// Segment a polygon mesh into edge-connected regions and extract some of
/// them.
///
/// # Errors
///
/// Returns an error if a polygon or polyline references a missing point,
/// or if an explicit barrier edge references a point outside the mesh.
/// Attribute arrays with the wrong length are not errors: they are logged
/// and left out of the output, and a mis-sized scalar array disables
/// scalar connectivity.
///
/// # Example
///
/// ```
/// use mesh_connectivity::{segment, SegmentConfig};
/// use mesh_types::{MeshTopology, PolyMesh};
///
/// // Two triangles sharing an edge, plus one far away
/// let mesh = PolyMesh::from_polygons(
///     &[
///         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [1.5, 1.0, 0.0],
///         [5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 1.0, 0.0],
///     ],
///     &[[0, 1, 2], [1, 3, 2], [4, 5, 6]],
/// );
///
/// let result = segment(&mesh, &SegmentConfig::largest()).unwrap();
/// assert_eq!(result.region_sizes(), &[2, 1]);
/// assert_eq!(result.mesh.cell_count(), 2);
/// assert_eq!(result.mesh.point_count(), 4);
/// ```
pub fn segment(mesh: &PolyMesh, config: &SegmentConfig) -> ConnectivityResult<Segmentation> {
    segment_with_progress(mesh, config, &mut |_| {})
}

/// [`segment`] with a progress callback receiving values in `[0, 1]`.
///
/// # Errors
///
/// Same as [`segment`].
pub fn segment_with_progress(
    mesh: &PolyMesh,
    config: &SegmentConfig,
    progress: &mut dyn FnMut(f64),
) -> ConnectivityResult<Segmentation> {
    mesh.validate_topology()?;
    validate_barriers(mesh, config)?;

    let specified_regions = config.specified_region_count();
    if mesh.is_empty() {
        debug!("Empty mesh, nothing to segment");
        progress(1.0);
        return Ok(Segmentation::empty(mesh, specified_regions));
    }

    info!(
        cells = mesh.cell_count(),
        points = mesh.point_count(),
        mode = config.extraction.name(),
        "Starting segmentation"
    );

    let links = CellLinks::from_mesh(mesh);
    let gate = ScalarGate::from_mesh(mesh, config.scalar_connectivity.as_ref());
    let mut labeler = RegionLabeler::new(mesh, &links, &config.barriers, &gate);

    match &config.extraction {
        ExtractionMode::PointSeeded { seeds } => {
            labeler.label_region(point_seed_cells(&links, seeds));
        }
        ExtractionMode::CellSeeded { seeds } => {
            labeler.label_region(cell_seed_cells(mesh, seeds));
        }
        ExtractionMode::ClosestPointRegion { point } => {
            if let Some(nearest) = closest_point(mesh, point) {
                labeler.label_region(links.point_cells(nearest).iter().copied());
            }
        }
        ExtractionMode::SpecifiedRegions { .. }
        | ExtractionMode::LargestRegion
        | ExtractionMode::AllRegions
        | ExtractionMode::LargeRegions => {
            labeler.label_all_regions(&mut |f| progress(0.7 * f));
        }
    }

    let region_count = labeler.region_count();
    let labeling = labeler.finish();
    let mut regions = labeling.regions;
    debug!(
        regions = region_count,
        cells_labeled = labeling.stats.cells_labeled,
        neighbors_enqueued = labeling.stats.neighbors_enqueued,
        barrier_edges_hit = labeling.stats.barrier_edges_hit,
        "Labeled regions"
    );
    progress(0.7);

    let areas = RegionAreas::compute(mesh, &regions, region_count, config.effective_threshold());
    let grow_stats = config
        .grow_small_regions
        .then(|| grow_small_regions(mesh, &links, &mut regions, &areas));
    progress(0.85);

    let filter = RegionFilter::for_mode(&config.extraction, labeling.largest_region, region_count);
    let extracted = assemble(
        mesh,
        &regions,
        &areas,
        &filter,
        AssembleOptions {
            point_map: config
                .extraction
                .emits_all_labeled()
                .then_some(&labeling.point_map),
            color_regions: config.color_regions,
            cell_region_areas: config.cell_region_areas,
            precision: config.output_precision.resolve(mesh.points.precision()),
        },
    );

    let extracted_regions = extracted
        .cells
        .iter()
        .filter_map(|&c| regions.get(c))
        .collect::<HashSet<u32>>()
        .len();
    let region_sizes = regions.region_sizes(region_count);

    info!(
        regions = region_count,
        extracted_regions,
        cells = extracted.mesh.cell_count(),
        points = extracted.mesh.point_count(),
        "Segmentation complete"
    );
    progress(1.0);

    Ok(Segmentation {
        mesh: extracted.mesh,
        extracted_cells: extracted.cells,
        regions,
        region_count,
        region_sizes,
        areas,
        largest_region: labeling.largest_region,
        extracted_regions,
        specified_regions,
        visited_points: labeling.point_map.visited().to_vec(),
        label_stats: labeling.stats,
        grow_stats,
    })
}

fn validate_barriers(mesh: &PolyMesh, config: &SegmentConfig) -> ConnectivityResult<()> {
    if !config.barriers.enabled {
        return Ok(());
    }
    let point_count = mesh.point_count();
    match config
        .barriers
        .edges()
        .find(|&(_, p1)| p1 as usize >= point_count)
    {
        Some((p0, p1)) => Err(ConnectivityError::BarrierOutOfBounds {
            p0,
            p1,
            point_count,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barrier::BarrierEdges;
    use crate::extract::REGION_ID_ARRAY;
    use mesh_types::{ArrayValues, MeshError};

    /// Two triangles sharing an edge, plus a detached triangle.
    fn pair_and_single() -> PolyMesh {
        PolyMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [1.5, 1.0, 0.0],
                [5.0, 0.0, 0.0],
                [6.0, 0.0, 0.0],
                [5.0, 1.0, 0.0],
            ],
            &[[0, 1, 2], [1, 3, 2], [4, 5, 6]],
        )
    }

    #[test]
    fn empty_mesh_is_not_an_error() {
        let result = segment(&PolyMesh::new(), &SegmentConfig::all_regions()).expect("segment");

        assert_eq!(result.region_count(), 0);
        assert_eq!(result.mesh.cell_count(), 0);
        assert_eq!(result.number_of_extracted_regions(), 0);
        assert!(result.largest_region().is_none());
    }

    #[test]
    fn points_without_cells_are_empty() {
        let mut mesh = PolyMesh::new();
        mesh.points.push(nalgebra::Point3::origin());
        let result = segment(&mesh, &SegmentConfig::default()).expect("segment");

        assert_eq!(result.region_ids(), &[] as &[Option<u32>]);
        assert_eq!(result.mesh.point_count(), 0);
    }

    #[test]
    fn invalid_mesh_is_rejected() {
        let mut mesh = pair_and_single();
        mesh.polys.push(&[0, 1, 70]);
        let result = segment(&mesh, &SegmentConfig::default());

        assert!(matches!(
            result,
            Err(ConnectivityError::InvalidMesh(MeshError::PointOutOfBounds { point: 70, .. }))
        ));
    }

    #[test]
    fn barrier_outside_mesh_is_rejected() {
        let mesh = pair_and_single();
        let config =
            SegmentConfig::default().with_barrier_edges(BarrierEdges::new().with_edge(1, 40));

        assert!(matches!(
            segment(&mesh, &config),
            Err(ConnectivityError::BarrierOutOfBounds { p1: 40, .. })
        ));
    }

    #[test]
    fn disabled_barriers_are_not_validated() {
        let mesh = pair_and_single();
        let mut config = SegmentConfig::default();
        config.barriers.insert(1, 40);

        assert!(segment(&mesh, &config).is_ok());
    }

    #[test]
    fn all_regions_reports_everything() {
        let mesh = pair_and_single();
        let result = segment(&mesh, &SegmentConfig::all_regions()).expect("segment");

        assert_eq!(result.region_count(), 2);
        assert_eq!(result.region_sizes(), &[2, 1]);
        assert_eq!(result.number_of_extracted_regions(), 2);
        assert_eq!(result.mesh.cell_count(), 3);
        assert_eq!(result.visited_point_ids().len(), 7);

        let ids = result.mesh.cell_data.get(REGION_ID_ARRAY).expect("region ids");
        assert_eq!(ids.values, ArrayValues::Int(vec![0, 0, 1]));
    }

    #[test]
    fn regions_sorted_by_area() {
        let mesh = pair_and_single();
        let result = segment(&mesh, &SegmentConfig::all_regions()).expect("segment");

        assert_eq!(result.regions_by_area(), vec![0, 1]);
    }

    #[test]
    fn progress_is_monotone_and_complete() {
        let mesh = pair_and_single();
        let mut reports = Vec::new();
        let _ = segment_with_progress(&mesh, &SegmentConfig::default(), &mut |f| reports.push(f))
            .expect("segment");

        assert_eq!(reports.last().copied(), Some(1.0));
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert!(reports.iter().all(|f| (0.0..=1.0).contains(f)));
    }

    #[test]
    fn grow_stats_only_when_growing() {
        let mesh = pair_and_single();
        let plain = segment(&mesh, &SegmentConfig::all_regions()).expect("segment");
        assert!(plain.grow_stats().is_none());

        let grown = segment(&mesh, &SegmentConfig::all_regions().with_region_growing(0.5))
            .expect("segment");
        assert!(grown.grow_stats().is_some());
    }
}
