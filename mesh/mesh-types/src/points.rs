//! Point coordinate storage.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floating point precision of stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// 32-bit coordinates.
    Single,
    /// 64-bit coordinates.
    Double,
}

/// An ordered list of 3D points.
///
/// Coordinates keep the precision they were created with; accessors
/// always widen to `f64`.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Points, Precision};
///
/// let mut points = Points::with_precision(Precision::Single);
/// points.push(Point3::new(1.0, 2.0, 3.0));
///
/// assert_eq!(points.len(), 1);
/// assert_eq!(points.precision(), Precision::Single);
/// assert_eq!(points.get(0), Some(Point3::new(1.0, 2.0, 3.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Points {
    /// Single precision storage.
    Single(Vec<Point3<f32>>),
    /// Double precision storage.
    Double(Vec<Point3<f64>>),
}

impl Default for Points {
    fn default() -> Self {
        Self::Double(Vec::new())
    }
}

impl Points {
    /// Create an empty double precision point list.
    #[must_use]
    pub const fn new() -> Self {
        Self::Double(Vec::new())
    }

    /// Create an empty point list with the given precision.
    #[must_use]
    pub const fn with_precision(precision: Precision) -> Self {
        match precision {
            Precision::Single => Self::Single(Vec::new()),
            Precision::Double => Self::Double(Vec::new()),
        }
    }

    /// Create an empty point list with capacity for `capacity` points.
    #[must_use]
    pub fn with_capacity(precision: Precision, capacity: usize) -> Self {
        match precision {
            Precision::Single => Self::Single(Vec::with_capacity(capacity)),
            Precision::Double => Self::Double(Vec::with_capacity(capacity)),
        }
    }

    /// Create a point list from raw `[x, y, z]` triples.
    #[must_use]
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self::Double(
            coords
                .iter()
                .map(|&[x, y, z]| Point3::new(x, y, z))
                .collect(),
        )
    }

    /// Storage precision.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        match self {
            Self::Single(_) => Precision::Single,
            Self::Double(_) => Precision::Double,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(p) => p.len(),
            Self::Double(p) => p.len(),
        }
    }

    /// Check if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a point by index, widened to `f64`.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point3<f64>> {
        match self {
            Self::Single(p) => p.get(index).map(|q| q.cast::<f64>()),
            Self::Double(p) => p.get(index).copied(),
        }
    }

    /// Append a point, narrowing it if the storage is single precision.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: single precision storage is an explicit user choice
    pub fn push(&mut self, point: Point3<f64>) {
        match self {
            Self::Single(p) => p.push(Point3::new(
                point.x as f32,
                point.y as f32,
                point.z as f32,
            )),
            Self::Double(p) => p.push(point),
        }
    }

    /// Copy point `index` of `other` onto the end of this list.
    ///
    /// Does nothing if `index` is out of bounds.
    pub fn push_from(&mut self, other: &Self, index: usize) {
        if let Some(point) = other.get(index) {
            self.push(point);
        }
    }

    /// Iterate over all points, widened to `f64`.
    pub fn iter(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Squared distance between two stored points.
    ///
    /// Returns `None` if either index is out of bounds.
    #[must_use]
    pub fn distance_squared(&self, a: usize, b: usize) -> Option<f64> {
        let pa = self.get(a)?;
        let pb = self.get(b)?;
        Some(nalgebra::distance_squared(&pa, &pb))
    }
}
