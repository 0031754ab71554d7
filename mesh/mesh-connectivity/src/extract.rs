//! Cell selection and output mesh assembly.

use hashbrown::HashSet;
use mesh_types::{AttributeData, DataArray, Points, PolyMesh, Precision};
use tracing::warn;

use crate::config::ExtractionMode;
use crate::grow::RegionAreas;
use crate::label::PointMap;
use crate::region_map::RegionMap;

/// Name of the per-cell region id array.
pub const REGION_ID_ARRAY: &str = "RegionId";

/// Name of the per-cell region area array.
pub const REGION_AREA_ARRAY: &str = "RegionArea";

/// Which labeled cells are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionFilter {
    /// Every labeled cell.
    Labeled,
    /// Cells of one region; `None` emits nothing.
    Single(Option<u32>),
    /// Cells whose region is in the set.
    Set(HashSet<u32>),
    /// Cells whose region is classified large.
    Large,
}

impl RegionFilter {
    /// Resolve the filter for an extraction mode.
    ///
    /// Specified region ids that are negative or were never labeled are
    /// dropped.
    #[must_use]
    pub fn for_mode(mode: &ExtractionMode, largest: Option<u32>, region_count: usize) -> Self {
        match mode {
            ExtractionMode::PointSeeded { .. }
            | ExtractionMode::CellSeeded { .. }
            | ExtractionMode::ClosestPointRegion { .. }
            | ExtractionMode::AllRegions => Self::Labeled,
            ExtractionMode::LargestRegion => Self::Single(largest),
            ExtractionMode::SpecifiedRegions { region_ids } => Self::Set(
                region_ids
                    .iter()
                    .filter_map(|&r| u32::try_from(r).ok())
                    .filter(|&r| (r as usize) < region_count)
                    .collect(),
            ),
            ExtractionMode::LargeRegions => Self::Large,
        }
    }

    /// Whether a cell with label `region` is emitted.
    #[must_use]
    pub fn accepts(&self, region: Option<u32>, areas: &RegionAreas) -> bool {
        let Some(region) = region else {
            return false;
        };
        match self {
            Self::Labeled => true,
            Self::Single(only) => *only == Some(region),
            Self::Set(set) => set.contains(&region),
            Self::Large => areas.is_large(region),
        }
    }
}

/// Options for [`assemble`].
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions<'a> {
    /// Reuse this point compaction instead of building one from the
    /// emitted cells. It must cover every point of every emitted cell.
    pub point_map: Option<&'a PointMap>,
    /// Emit the `RegionId` array.
    pub color_regions: bool,
    /// Emit the `RegionArea` array.
    pub cell_region_areas: bool,
    /// Output point precision.
    pub precision: Precision,
}

/// Output mesh together with the input cells it was built from.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// The compacted mesh.
    pub mesh: PolyMesh,
    /// Input cell index of every output cell.
    pub cells: Vec<usize>,
}

/// Build the output mesh from the cells accepted by `filter`.
///
/// Cells keep their input order. Points are emitted in compacted-id order
/// and carry their point data; cells carry their cell data plus the
/// optional region arrays. Attribute arrays without one tuple per input
/// element are logged and left out.
#[must_use]
pub fn assemble(
    mesh: &PolyMesh,
    regions: &RegionMap,
    areas: &RegionAreas,
    filter: &RegionFilter,
    options: AssembleOptions<'_>,
) -> Extracted {
    let cells: Vec<usize> = (0..mesh.polys.len())
        .filter(|&c| filter.accepts(regions.get(c), areas))
        .collect();

    let rebuilt;
    let point_map = if let Some(map) = options.point_map {
        map
    } else {
        let mut map = PointMap::new(mesh.points.len());
        for ids in cells.iter().filter_map(|&c| mesh.polys.cell(c)) {
            for &p in ids {
                map.visit(p);
            }
        }
        rebuilt = map;
        &rebuilt
    };

    let mut out = PolyMesh::new();

    out.points = Points::with_capacity(options.precision, point_map.len());
    out.point_data = mesh.point_data.empty_like();
    for &p in point_map.visited() {
        out.points.push_from(&mesh.points, p as usize);
        out.point_data.push_tuple_from(&mesh.point_data, p as usize);
    }

    out.cell_data = mesh.cell_data.empty_like();
    let mut remapped = Vec::new();
    for &c in &cells {
        let Some(ids) = mesh.polys.cell(c) else {
            continue;
        };
        remapped.clear();
        remapped.extend(ids.iter().filter_map(|&p| point_map.get(p)));
        debug_assert_eq!(remapped.len(), ids.len(), "cell {c} has unmapped points");
        out.polys.push(&remapped);
        out.cell_data.push_tuple_from(&mesh.cell_data, c);
    }

    drop_mis_sized(&mesh.point_data, mesh.points.len(), &mut out.point_data);
    drop_mis_sized(&mesh.cell_data, mesh.polys.len(), &mut out.cell_data);

    if options.color_regions {
        let ids = cells
            .iter()
            .map(|&c| regions.get(c).map_or(-1, i64::from))
            .collect();
        out.cell_data.insert(DataArray::int(REGION_ID_ARRAY, 1, ids));
    }
    if options.cell_region_areas {
        let region_areas = cells
            .iter()
            .map(|&c| regions.get(c).map_or(0.0, |r| areas.area(r)))
            .collect();
        out.cell_data.insert(DataArray::float(REGION_AREA_ARRAY, 1, region_areas));
    }

    Extracted { mesh: out, cells }
}

/// Remove from `out` every array of `source` whose length is not
/// `expected` tuples.
fn drop_mis_sized(source: &AttributeData, expected: usize, out: &mut AttributeData) {
    for array in source.iter().filter(|a| a.tuple_count() != expected) {
        warn!(
            array = array.name.as_str(),
            expected,
            found = array.tuple_count(),
            "attribute array has wrong length, not copied"
        );
        out.remove(&array.name);
    }
}
