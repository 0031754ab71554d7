//! Scalar-range gating between adjacent cells.

use mesh_types::{DataArray, PolyMesh};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the scalar values used for connectivity come from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarSource {
    /// A per-cell array; a cell passes when its value is in range.
    Cell {
        /// Name of the cell data array.
        array: String,
    },
    /// A per-point array; a cell passes when any of its point values is in
    /// range, or all of them when `full` is set.
    Point {
        /// Name of the point data array.
        array: String,
        /// Require every point of the cell to be in range.
        full: bool,
    },
}

/// Scalar connectivity settings.
///
/// Two adjacent cells are connected only if both pass the range test.
///
/// # Example
///
/// ```
/// use mesh_connectivity::ScalarConnectivity;
///
/// // An inverted range collapses to the lower bound
/// let scalars = ScalarConnectivity::cell("Pressure", 2.0, 1.0);
/// assert_eq!(scalars.range(), [2.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarConnectivity {
    /// Scalar values to test.
    pub source: ScalarSource,
    range: [f64; 2],
}

impl ScalarConnectivity {
    /// Gate on a per-cell array with closed range `[lo, hi]`.
    #[must_use]
    pub fn cell(array: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            source: ScalarSource::Cell {
                array: array.into(),
            },
            range: corrected_range(lo, hi),
        }
    }

    /// Gate on a per-point array with closed range `[lo, hi]`.
    ///
    /// A cell passes if any of its points is in range.
    #[must_use]
    pub fn point(array: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            source: ScalarSource::Point {
                array: array.into(),
                full: false,
            },
            range: corrected_range(lo, hi),
        }
    }

    /// Require every point of a cell to be in range.
    ///
    /// Has no effect on cell sources.
    #[must_use]
    pub fn with_full_connectivity(mut self) -> Self {
        if let ScalarSource::Point { full, .. } = &mut self.source {
            *full = true;
        }
        self
    }

    /// Replace the range.
    #[must_use]
    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = corrected_range(lo, hi);
        self
    }

    /// The closed range `[lo, hi]`, with `hi >= lo`.
    #[must_use]
    pub const fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Name of the array being read.
    #[must_use]
    pub fn array_name(&self) -> &str {
        match &self.source {
            ScalarSource::Cell { array } | ScalarSource::Point { array, .. } => array,
        }
    }
}

impl Default for ScalarConnectivity {
    fn default() -> Self {
        Self::cell("Scalars", 0.0, 1.0)
    }
}

fn corrected_range(lo: f64, hi: f64) -> [f64; 2] {
    if hi < lo {
        warn!(lo, hi, "scalar range upper bound below lower bound, using [lo, lo]");
        [lo, lo]
    } else {
        [lo, hi]
    }
}

/// Per-cell result of the scalar range test.
///
/// A disabled gate connects every pair of cells.
#[derive(Debug, Clone, Default)]
pub struct ScalarGate {
    passes: Option<Vec<bool>>,
}

impl ScalarGate {
    /// A gate that connects everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { passes: None }
    }

    /// Evaluate `settings` against the attributes of `mesh`.
    ///
    /// If the named array is missing or does not have one tuple per
    /// element, a warning is logged and the gate is disabled.
    #[must_use]
    pub fn from_mesh(mesh: &PolyMesh, settings: Option<&ScalarConnectivity>) -> Self {
        let Some(settings) = settings else {
            return Self::disabled();
        };
        let [lo, hi] = settings.range;
        let in_range = |v: f64| v >= lo && v <= hi;

        let passes = match &settings.source {
            ScalarSource::Cell { array } => {
                let Some(values) = usable_array(mesh.cell_data.get(array), mesh.polys.len(), array)
                else {
                    return Self::disabled();
                };
                (0..mesh.polys.len())
                    .map(|c| values.component(c, 0).is_some_and(in_range))
                    .collect()
            }
            ScalarSource::Point { array, full } => {
                let Some(values) =
                    usable_array(mesh.point_data.get(array), mesh.points.len(), array)
                else {
                    return Self::disabled();
                };
                let point_passes = |p: &u32| values.component(*p as usize, 0).is_some_and(in_range);
                mesh.polys
                    .iter()
                    .map(|ids| {
                        if *full {
                            !ids.is_empty() && ids.iter().all(point_passes)
                        } else {
                            ids.iter().any(point_passes)
                        }
                    })
                    .collect()
            }
        };

        Self {
            passes: Some(passes),
        }
    }

    /// Whether scalar gating is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.passes.is_some()
    }

    /// Whether a single cell passes the range test.
    #[must_use]
    pub fn passes(&self, cell: usize) -> bool {
        self.passes
            .as_ref()
            .is_none_or(|p| p.get(cell).copied().unwrap_or(false))
    }

    /// Whether propagation may step from `cell_a` to `cell_b`.
    #[must_use]
    pub fn is_scalar_connected(&self, cell_a: usize, cell_b: usize) -> bool {
        self.passes(cell_a) && self.passes(cell_b)
    }
}

fn usable_array<'a>(
    array: Option<&'a DataArray>,
    expected: usize,
    name: &str,
) -> Option<&'a DataArray> {
    match array {
        None => {
            warn!(array = name, "scalar array not found, scalar connectivity disabled");
            None
        }
        Some(a) if a.tuple_count() != expected => {
            warn!(
                array = name,
                expected,
                found = a.tuple_count(),
                "scalar array has wrong length, scalar connectivity disabled"
            );
            None
        }
        Some(a) => Some(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_with_scalars() -> PolyMesh {
        // Three quads in a row: 0-1-2
        let mut mesh = PolyMesh::from_polygons(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [3.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [2.0, 1.0, 0.0],
                [3.0, 1.0, 0.0],
            ],
            &[[0, 1, 5, 4], [1, 2, 6, 5], [2, 3, 7, 6]],
        );
        mesh.cell_data.insert(DataArray::scalars("Density", vec![0.2, 0.5, 3.0]));
        mesh.point_data.insert(DataArray::scalars(
            "Height",
            vec![0.0, 0.0, 5.0, 5.0, 0.0, 0.0, 5.0, 5.0],
        ));
        mesh
    }

    #[test]
    fn disabled_connects_everything() {
        let gate = ScalarGate::disabled();
        assert!(!gate.is_enabled());
        assert!(gate.is_scalar_connected(0, 99));
    }

    #[test]
    fn cell_scalars_gate_both_sides() {
        let mesh = strip_with_scalars();
        let settings = ScalarConnectivity::cell("Density", 0.0, 1.0);
        let gate = ScalarGate::from_mesh(&mesh, Some(&settings));

        assert!(gate.is_enabled());
        assert!(gate.is_scalar_connected(0, 1));
        assert!(!gate.is_scalar_connected(1, 2));
        assert!(!gate.is_scalar_connected(2, 1));
    }

    #[test]
    fn range_is_closed() {
        let mesh = strip_with_scalars();
        let settings = ScalarConnectivity::cell("Density", 0.2, 0.5);
        let gate = ScalarGate::from_mesh(&mesh, Some(&settings));

        assert!(gate.is_scalar_connected(0, 1));
    }

    #[test]
    fn inverted_range_is_corrected() {
        let settings = ScalarConnectivity::cell("Density", 0.5, 0.1);
        assert_eq!(settings.range(), [0.5, 0.5]);

        let mesh = strip_with_scalars();
        let gate = ScalarGate::from_mesh(&mesh, Some(&settings));
        assert!(!gate.passes(0));
        assert!(gate.passes(1));
    }

    #[test]
    fn point_scalars_any_and_full() {
        let mesh = strip_with_scalars();

        // Middle quad has points at height 0 and 5
        let any = ScalarConnectivity::point("Height", -1.0, 1.0);
        let gate = ScalarGate::from_mesh(&mesh, Some(&any));
        assert!(gate.passes(0));
        assert!(gate.passes(1));
        assert!(!gate.passes(2));

        let full = any.with_full_connectivity();
        let gate = ScalarGate::from_mesh(&mesh, Some(&full));
        assert!(gate.passes(0));
        assert!(!gate.passes(1));
    }

    #[test]
    fn missing_array_disables_gate() {
        let mesh = strip_with_scalars();
        let settings = ScalarConnectivity::cell("Nope", 0.0, 1.0);
        let gate = ScalarGate::from_mesh(&mesh, Some(&settings));

        assert!(!gate.is_enabled());
        assert!(gate.is_scalar_connected(1, 2));
    }

    #[test]
    fn wrong_length_disables_gate() {
        let mut mesh = strip_with_scalars();
        mesh.cell_data.insert(DataArray::scalars("Density", vec![0.2]));
        let settings = ScalarConnectivity::cell("Density", 0.0, 1.0);
        let gate = ScalarGate::from_mesh(&mesh, Some(&settings));

        assert!(!gate.is_enabled());
    }

    #[test]
    fn full_flag_ignored_for_cells() {
        let settings = ScalarConnectivity::cell("Density", 0.0, 1.0).with_full_connectivity();
        assert_eq!(
            settings.source,
            ScalarSource::Cell {
                array: "Density".to_string()
            }
        );
        assert_eq!(settings.array_name(), "Density");
    }
}
