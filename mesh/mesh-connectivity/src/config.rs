//! Segmentation configuration.

use mesh_types::Precision;
use nalgebra::Point3;

use crate::barrier::BarrierEdges;
use crate::scalar::ScalarConnectivity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default relative area above which a region counts as large.
pub const DEFAULT_LARGE_REGION_THRESHOLD: f64 = 0.05;

/// Which cells are emitted, and how labeling is seeded.
///
/// Seeded modes flood once from their seeds; the remaining modes label
/// every region of the mesh and then filter.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExtractionMode {
    /// Flood from every cell using one of the seed points.
    PointSeeded {
        /// Seed point ids; negative or out-of-range ids are skipped.
        seeds: Vec<i64>,
    },
    /// Flood from the seed cells.
    CellSeeded {
        /// Seed cell ids; negative or out-of-range ids are skipped.
        seeds: Vec<i64>,
    },
    /// Emit the listed regions.
    SpecifiedRegions {
        /// Region ids to keep; ids that were never labeled are skipped.
        region_ids: Vec<i64>,
    },
    /// Emit the region with the most cells.
    #[default]
    LargestRegion,
    /// Emit every region.
    AllRegions,
    /// Flood from the cells using the mesh point nearest to `point`.
    ClosestPointRegion {
        /// Query location.
        point: Point3<f64>,
    },
    /// Emit every region classified as large by area.
    LargeRegions,
}

impl ExtractionMode {
    /// Whether this mode floods from explicit seeds rather than sweeping
    /// every cell.
    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        matches!(
            self,
            Self::PointSeeded { .. } | Self::CellSeeded { .. } | Self::ClosestPointRegion { .. }
        )
    }

    /// Whether this mode emits every labeled cell without filtering.
    #[must_use]
    pub const fn emits_all_labeled(&self) -> bool {
        self.is_seeded() || matches!(self, Self::AllRegions)
    }

    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PointSeeded { .. } => "point-seeded",
            Self::CellSeeded { .. } => "cell-seeded",
            Self::SpecifiedRegions { .. } => "specified-regions",
            Self::LargestRegion => "largest-region",
            Self::AllRegions => "all-regions",
            Self::ClosestPointRegion { .. } => "closest-point-region",
            Self::LargeRegions => "large-regions",
        }
    }
}

/// Precision of the output point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputPrecision {
    /// Match the input precision.
    #[default]
    Default,
    /// Force single precision.
    Single,
    /// Force double precision.
    Double,
}

impl OutputPrecision {
    /// Resolve against the input precision.
    #[must_use]
    pub const fn resolve(self, input: Precision) -> Precision {
        match self {
            Self::Default => input,
            Self::Single => Precision::Single,
            Self::Double => Precision::Double,
        }
    }
}

/// Configuration for [`segment`](crate::segment).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentConfig {
    /// Extraction mode and its parameters.
    pub extraction: ExtractionMode,
    /// Barrier edges; disabled by default.
    pub barriers: BarrierEdges,
    /// Scalar connectivity; `None` disables the scalar gate.
    pub scalar_connectivity: Option<ScalarConnectivity>,
    /// Merge small regions into adjacent large ones after labeling.
    pub grow_small_regions: bool,
    /// Fraction of total area at or above which a region is large, in `[0, 1]`.
    pub large_region_threshold: f64,
    /// Emit a per-cell `RegionId` array.
    pub color_regions: bool,
    /// Emit a per-cell `RegionArea` array.
    pub cell_region_areas: bool,
    /// Output point precision.
    pub output_precision: OutputPrecision,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionMode::LargestRegion,
            barriers: BarrierEdges::disabled(),
            scalar_connectivity: None,
            grow_small_regions: false,
            large_region_threshold: DEFAULT_LARGE_REGION_THRESHOLD,
            color_regions: true,
            cell_region_areas: false,
            output_precision: OutputPrecision::Default,
        }
    }
}

impl SegmentConfig {
    /// Extract the largest region (the default).
    #[must_use]
    pub fn largest() -> Self {
        Self::default()
    }

    /// Extract every region.
    #[must_use]
    pub fn all_regions() -> Self {
        Self::default().with_extraction(ExtractionMode::AllRegions)
    }

    /// Extract large regions after growing small ones into them.
    #[must_use]
    pub fn large_regions(threshold: f64) -> Self {
        Self::default()
            .with_extraction(ExtractionMode::LargeRegions)
            .with_region_growing(threshold)
    }

    /// Set the extraction mode.
    #[must_use]
    pub fn with_extraction(mut self, extraction: ExtractionMode) -> Self {
        self.extraction = extraction;
        self
    }

    /// Set and enable barrier edges.
    #[must_use]
    pub fn with_barrier_edges(mut self, barriers: BarrierEdges) -> Self {
        self.barriers = barriers;
        self.barriers.enabled = true;
        self
    }

    /// Enable scalar connectivity.
    #[must_use]
    pub fn with_scalar_connectivity(mut self, scalars: ScalarConnectivity) -> Self {
        self.scalar_connectivity = Some(scalars);
        self
    }

    /// Enable region growing with the given large-region threshold.
    #[must_use]
    pub fn with_region_growing(mut self, threshold: f64) -> Self {
        self.grow_small_regions = true;
        self.large_region_threshold = threshold;
        self
    }

    /// Set whether the `RegionId` array is emitted.
    #[must_use]
    pub fn with_color_regions(mut self, color: bool) -> Self {
        self.color_regions = color;
        self
    }

    /// Set whether the `RegionArea` array is emitted.
    #[must_use]
    pub fn with_cell_region_areas(mut self, areas: bool) -> Self {
        self.cell_region_areas = areas;
        self
    }

    /// Set the output point precision.
    #[must_use]
    pub fn with_output_precision(mut self, precision: OutputPrecision) -> Self {
        self.output_precision = precision;
        self
    }

    /// The large-region threshold clamped into `[0, 1]`.
    ///
    /// NaN falls back to the default.
    #[must_use]
    pub fn effective_threshold(&self) -> f64 {
        if self.large_region_threshold.is_nan() {
            DEFAULT_LARGE_REGION_THRESHOLD
        } else {
            self.large_region_threshold.clamp(0.0, 1.0)
        }
    }

    /// Add a seed id to the point or cell seed list.
    ///
    /// Any other mode, including [`ExtractionMode::ClosestPointRegion`], is
    /// replaced by [`ExtractionMode::CellSeeded`] holding just this seed.
    pub fn add_seed(&mut self, id: i64) {
        match &mut self.extraction {
            ExtractionMode::PointSeeded { seeds } | ExtractionMode::CellSeeded { seeds } => {
                seeds.push(id);
            }
            _ => {
                self.extraction = ExtractionMode::CellSeeded { seeds: vec![id] };
            }
        }
    }

    /// Remove every occurrence of a seed id.
    pub fn delete_seed(&mut self, id: i64) {
        if let ExtractionMode::PointSeeded { seeds } | ExtractionMode::CellSeeded { seeds } =
            &mut self.extraction
        {
            seeds.retain(|&s| s != id);
        }
    }

    /// Clear the seed list.
    pub fn initialize_seed_list(&mut self) {
        if let ExtractionMode::PointSeeded { seeds } | ExtractionMode::CellSeeded { seeds } =
            &mut self.extraction
        {
            seeds.clear();
        }
    }

    /// Add a region id to the specified region list.
    ///
    /// Any other mode is replaced by [`ExtractionMode::SpecifiedRegions`]
    /// holding just this id.
    pub fn add_specified_region(&mut self, id: i64) {
        if let ExtractionMode::SpecifiedRegions { region_ids } = &mut self.extraction {
            region_ids.push(id);
        } else {
            self.extraction = ExtractionMode::SpecifiedRegions {
                region_ids: vec![id],
            };
        }
    }

    /// Remove every occurrence of a specified region id.
    pub fn delete_specified_region(&mut self, id: i64) {
        if let ExtractionMode::SpecifiedRegions { region_ids } = &mut self.extraction {
            region_ids.retain(|&r| r != id);
        }
    }

    /// Clear the specified region list.
    pub fn initialize_specified_region_list(&mut self) {
        if let ExtractionMode::SpecifiedRegions { region_ids } = &mut self.extraction {
            region_ids.clear();
        }
    }

    /// Number of entries in the specified region list.
    #[must_use]
    pub fn specified_region_count(&self) -> usize {
        match &self.extraction {
            ExtractionMode::SpecifiedRegions { region_ids } => region_ids.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SegmentConfig::default();
        assert_eq!(config.extraction, ExtractionMode::LargestRegion);
        assert!(!config.barriers.enabled);
        assert!(config.scalar_connectivity.is_none());
        assert!(!config.grow_small_regions);
        assert!(config.color_regions);
        assert!(!config.cell_region_areas);
        assert_eq!(config.output_precision, OutputPrecision::Default);
    }

    #[test]
    fn presets() {
        assert_eq!(SegmentConfig::all_regions().extraction, ExtractionMode::AllRegions);

        let large = SegmentConfig::large_regions(0.25);
        assert_eq!(large.extraction, ExtractionMode::LargeRegions);
        assert!(large.grow_small_regions);
        assert!((large.large_region_threshold - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_is_clamped() {
        let mut config = SegmentConfig::default().with_region_growing(1.5);
        assert!((config.effective_threshold() - 1.0).abs() < f64::EPSILON);
        config.large_region_threshold = -0.5;
        assert!(config.effective_threshold().abs() < f64::EPSILON);
        config.large_region_threshold = f64::NAN;
        let fallback = config.effective_threshold() - DEFAULT_LARGE_REGION_THRESHOLD;
        assert!(fallback.abs() < f64::EPSILON);
    }

    #[test]
    fn barrier_builder_enables() {
        let config = SegmentConfig::default().with_barrier_edges(BarrierEdges::disabled());
        assert!(config.barriers.enabled);
    }

    #[test]
    fn seed_list_editing() {
        let mut config = SegmentConfig::default();
        config.add_seed(3);
        config.add_seed(5);
        config.add_seed(3);
        assert_eq!(
            config.extraction,
            ExtractionMode::CellSeeded {
                seeds: vec![3, 5, 3]
            }
        );

        config.delete_seed(3);
        assert_eq!(config.extraction, ExtractionMode::CellSeeded { seeds: vec![5] });

        config.initialize_seed_list();
        assert_eq!(config.extraction, ExtractionMode::CellSeeded { seeds: vec![] });
    }

    #[test]
    fn point_seeds_stay_point_seeds() {
        let mut config =
            SegmentConfig::default().with_extraction(ExtractionMode::PointSeeded { seeds: vec![] });
        config.add_seed(7);
        assert_eq!(config.extraction, ExtractionMode::PointSeeded { seeds: vec![7] });
    }

    #[test]
    fn seed_replaces_closest_point_mode() {
        let closest = ExtractionMode::ClosestPointRegion {
            point: Point3::new(1.0, 2.0, 3.0),
        };
        let mut config = SegmentConfig::default().with_extraction(closest);
        config.add_seed(4);
        assert_eq!(config.extraction, ExtractionMode::CellSeeded { seeds: vec![4] });
    }

    #[test]
    fn specified_region_editing() {
        let mut config = SegmentConfig::default();
        assert_eq!(config.specified_region_count(), 0);

        config.add_specified_region(0);
        config.add_specified_region(2);
        assert_eq!(config.specified_region_count(), 2);

        config.delete_specified_region(0);
        assert_eq!(config.specified_region_count(), 1);

        config.initialize_specified_region_list();
        assert_eq!(config.specified_region_count(), 0);
    }

    #[test]
    fn mode_classification() {
        assert!(ExtractionMode::CellSeeded { seeds: vec![] }.is_seeded());
        assert!(
            ExtractionMode::ClosestPointRegion {
                point: Point3::origin()
            }
            .emits_all_labeled()
        );
        assert!(ExtractionMode::AllRegions.emits_all_labeled());
        assert!(!ExtractionMode::AllRegions.is_seeded());
        assert!(!ExtractionMode::LargeRegions.emits_all_labeled());
        assert_eq!(ExtractionMode::LargestRegion.name(), "largest-region");
    }

    #[test]
    fn precision_resolution() {
        assert_eq!(OutputPrecision::Default.resolve(Precision::Single), Precision::Single);
        assert_eq!(OutputPrecision::Double.resolve(Precision::Single), Precision::Double);
        assert_eq!(OutputPrecision::Single.resolve(Precision::Double), Precision::Single);
    }
}
