//! Variable-size cell storage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A list of cells, each an ordered list of point indices.
///
/// Cells are stored back to back in `connectivity`; `offsets` holds the
/// start of each cell plus a final end marker, so cell `i` spans
/// `connectivity[offsets[i]..offsets[i + 1]]`.
///
/// Polygons are read cyclically: the last point connects back to the first.
///
/// # Example
///
/// ```
/// use mesh_types::CellArray;
///
/// let mut cells = CellArray::new();
/// cells.push(&[0, 1, 2]);
/// cells.push(&[2, 1, 3, 4]);
///
/// assert_eq!(cells.len(), 2);
/// assert_eq!(cells.cell(1), Some(&[2, 1, 3, 4][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellArray {
    offsets: Vec<usize>,
    connectivity: Vec<u32>,
}

impl Default for CellArray {
    fn default() -> Self {
        Self::new()
    }
}

impl CellArray {
    /// Create an empty cell array.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            connectivity: Vec::new(),
        }
    }

    /// Create a cell array with room for `cells` cells of `points_per_cell` points.
    #[must_use]
    pub fn with_capacity(cells: usize, points_per_cell: usize) -> Self {
        let mut offsets = Vec::with_capacity(cells + 1);
        offsets.push(0);
        Self {
            offsets,
            connectivity: Vec::with_capacity(cells * points_per_cell),
        }
    }

    /// Build a cell array from a list of cells.
    #[must_use]
    pub fn from_cells<C: AsRef<[u32]>>(cells: &[C]) -> Self {
        let mut array = Self::with_capacity(cells.len(), 4);
        for cell in cells {
            array.push(cell.as_ref());
        }
        array
    }

    /// Append a cell.
    pub fn push(&mut self, points: &[u32]) {
        self.connectivity.extend_from_slice(points);
        self.offsets.push(self.connectivity.len());
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Check if there are no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the point ids of a cell.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&[u32]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.connectivity[start..end])
    }

    /// Number of points in a cell, or zero if out of bounds.
    #[must_use]
    pub fn cell_size(&self, index: usize) -> usize {
        self.cell(index).map_or(0, <[u32]>::len)
    }

    /// Iterate over all cells in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.offsets
            .windows(2)
            .map(|w| &self.connectivity[w[0]..w[1]])
    }

    /// Total number of point references across all cells.
    #[must_use]
    pub fn connectivity_len(&self) -> usize {
        self.connectivity.len()
    }

    /// Largest point id referenced by any cell.
    #[must_use]
    pub fn max_point_id(&self) -> Option<u32> {
        self.connectivity.iter().copied().max()
    }
}
