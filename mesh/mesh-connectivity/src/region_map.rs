//! Region labels for the cells of a mesh.

/// A map from cell indices to region ids.
///
/// Cells start unlabeled. Region ids are dense and start at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    /// Region of each cell, `None` while unvisited.
    labels: Vec<Option<u32>>,
}

impl RegionMap {
    /// Create a new map with all cells unlabeled.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_connectivity::RegionMap;
    ///
    /// let map = RegionMap::new(100);
    /// assert_eq!(map.cell_count(), 100);
    /// assert_eq!(map.labeled_count(), 0);
    /// ```
    #[must_use]
    pub fn new(cell_count: usize) -> Self {
        Self {
            labels: vec![None; cell_count],
        }
    }

    /// Region of a cell.
    ///
    /// Returns `None` if the cell is unlabeled or out of bounds.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<u32> {
        self.labels.get(cell).copied().flatten()
    }

    /// Set the region of a cell.
    pub(crate) fn assign(&mut self, cell: usize, region: u32) {
        self.labels[cell] = Some(region);
    }

    /// Whether a cell has a region.
    #[must_use]
    pub fn is_labeled(&self, cell: usize) -> bool {
        self.get(cell).is_some()
    }

    /// Get the number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of labeled cells.
    #[must_use]
    pub fn labeled_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Get all cell indices in a region, ascending.
    #[must_use]
    pub fn cells_in_region(&self, region: u32) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, l)| *l == Some(region))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Cell count of each region id below `region_count`.
    ///
    /// Labels at or above `region_count` are not counted.
    #[must_use]
    pub fn region_sizes(&self, region_count: usize) -> Vec<usize> {
        let mut sizes = vec![0; region_count];
        for label in self.labels.iter().flatten() {
            if let Some(size) = sizes.get_mut(*label as usize) {
                *size += 1;
            }
        }
        sizes
    }

    /// Get labels as a slice, one per cell.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<u32>] {
        &self.labels
    }
}
