//! Barrier edges that stop region propagation.

use hashbrown::HashSet;
use mesh_types::{CellArray, Points};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Edges across which regions may not grow.
///
/// An edge is a barrier when barriers are enabled and either its length
/// falls inside the configured closed interval or its endpoints appear as
/// an explicit barrier pair. Pairs are undirected.
///
/// # Example
///
/// ```
/// use mesh_connectivity::BarrierEdges;
/// use mesh_types::Points;
///
/// let points = Points::from_coords(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.5, 0.0]]);
/// let barriers = BarrierEdges::new().with_length_range(1.0, 3.0).with_edge(0, 2);
///
/// assert!(barriers.is_barrier(&points, 0, 1)); // length 2
/// assert!(barriers.is_barrier(&points, 2, 0)); // explicit pair
/// assert!(!barriers.is_barrier(&points, 1, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarrierEdges {
    /// Whether barrier tests are applied at all.
    pub enabled: bool,
    /// Squared length interval `[min², max²]`; `None` disables the length test.
    length_range_sq: Option<(f64, f64)>,
    /// Explicit barrier pairs, stored with the smaller id first.
    edges: HashSet<(u32, u32)>,
}

impl BarrierEdges {
    /// Create an enabled barrier set with no length test and no pairs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Create a disabled barrier set.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Treat edges with length in `[min, max]` as barriers.
    ///
    /// The bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn with_length_range(mut self, min: f64, max: f64) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.length_range_sq = Some((lo * lo, hi * hi));
        self
    }

    /// Add one explicit barrier pair.
    #[must_use]
    pub fn with_edge(mut self, p0: u32, p1: u32) -> Self {
        self.insert(p0, p1);
        self
    }

    /// Add every segment of every polyline as a barrier pair.
    #[must_use]
    pub fn with_lines(mut self, lines: &CellArray) -> Self {
        for line in lines.iter() {
            for pair in line.windows(2) {
                self.insert(pair[0], pair[1]);
            }
        }
        self
    }

    /// Add one explicit barrier pair.
    pub fn insert(&mut self, p0: u32, p1: u32) {
        self.edges.insert(normalize_edge(p0, p1));
    }

    /// Number of explicit barrier pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over explicit barrier pairs (smaller id first).
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().copied()
    }

    /// Length interval as configured, if any.
    #[must_use]
    pub fn length_range(&self) -> Option<(f64, f64)> {
        self.length_range_sq.map(|(lo, hi)| (lo.sqrt(), hi.sqrt()))
    }

    /// Whether edge `(p0, p1)` blocks propagation.
    ///
    /// Out-of-range point ids never match the length test.
    #[must_use]
    pub fn is_barrier(&self, points: &Points, p0: u32, p1: u32) -> bool {
        if !self.enabled {
            return false;
        }

        if let Some((lo, hi)) = self.length_range_sq
            && let Some(d2) = points.distance_squared(p0 as usize, p1 as usize)
            && d2 >= lo
            && d2 <= hi
        {
            return true;
        }

        self.edges.contains(&normalize_edge(p0, p1))
    }
}

#[inline]
const fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}
