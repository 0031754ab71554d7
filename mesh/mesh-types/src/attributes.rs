//! Named attribute arrays attached to points or cells.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Values of a data array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArrayValues {
    /// Integer values.
    Int(Vec<i64>),
    /// Floating point values.
    Float(Vec<f64>),
}

impl ArrayValues {
    fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    fn empty_like(&self) -> Self {
        match self {
            Self::Int(_) => Self::Int(Vec::new()),
            Self::Float(_) => Self::Float(Vec::new()),
        }
    }
}

/// A named array holding `components` values per tuple.
///
/// # Example
///
/// ```
/// use mesh_types::DataArray;
///
/// let normals = DataArray::float("Normals", 3, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
/// assert_eq!(normals.tuple_count(), 2);
/// assert_eq!(normals.component(1, 2), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataArray {
    /// Array name, used for lookup.
    pub name: String,
    components: usize,
    /// Flat tuple storage.
    pub values: ArrayValues,
}

impl DataArray {
    /// Create a floating point array.
    #[must_use]
    pub fn float(name: impl Into<String>, components: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            components: components.max(1),
            values: ArrayValues::Float(values),
        }
    }

    /// Create an integer array.
    #[must_use]
    pub fn int(name: impl Into<String>, components: usize, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            components: components.max(1),
            values: ArrayValues::Int(values),
        }
    }

    /// Create a single-component floating point array.
    #[must_use]
    pub fn scalars(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::float(name, 1, values)
    }

    /// Create an empty array with the same name, type, and width.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            components: self.components,
            values: self.values.empty_like(),
        }
    }

    /// Number of components per tuple, at least 1.
    #[must_use]
    pub const fn components(&self) -> usize {
        self.components
    }

    /// Number of complete tuples.
    ///
    /// A zero-width array, which only deserialization can produce, has no
    /// tuples.
    #[must_use]
    pub fn tuple_count(&self) -> usize {
        self.values
            .len()
            .checked_div(self.components)
            .unwrap_or(0)
    }

    /// Read one component of one tuple as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision loss: integer arrays are ids and counts well below 2^53
    pub fn component(&self, tuple: usize, component: usize) -> Option<f64> {
        if component >= self.components {
            return None;
        }
        let index = tuple * self.components + component;
        match &self.values {
            ArrayValues::Int(v) => v.get(index).map(|&x| x as f64),
            ArrayValues::Float(v) => v.get(index).copied(),
        }
    }

    /// Append tuple `tuple` of `source` to this array.
    ///
    /// Does nothing if the arrays differ in type or width, or if the
    /// tuple is out of bounds.
    pub fn push_tuple_from(&mut self, source: &Self, tuple: usize) {
        if source.components != self.components {
            return;
        }
        let start = tuple * source.components;
        let end = start + source.components;
        match (&mut self.values, &source.values) {
            (ArrayValues::Int(dst), ArrayValues::Int(src)) => {
                if let Some(values) = src.get(start..end) {
                    dst.extend_from_slice(values);
                }
            }
            (ArrayValues::Float(dst), ArrayValues::Float(src)) => {
                if let Some(values) = src.get(start..end) {
                    dst.extend_from_slice(values);
                }
            }
            _ => {}
        }
    }
}

/// A collection of named data arrays sharing one tuple count.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeData {
    arrays: Vec<DataArray>,
}

impl AttributeData {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { arrays: Vec::new() }
    }

    /// Add an array, replacing any existing array with the same name.
    pub fn insert(&mut self, array: DataArray) {
        if let Some(existing) = self.arrays.iter_mut().find(|a| a.name == array.name) {
            *existing = array;
        } else {
            self.arrays.push(array);
        }
    }

    /// Look up an array by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Remove an array by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<DataArray> {
        let index = self.arrays.iter().position(|a| a.name == name)?;
        Some(self.arrays.remove(index))
    }

    /// Number of arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Check if there are no arrays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Iterate over all arrays.
    pub fn iter(&self) -> impl Iterator<Item = &DataArray> + '_ {
        self.arrays.iter()
    }

    /// Create an empty collection with the same array layout.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            arrays: self.arrays.iter().map(DataArray::empty_like).collect(),
        }
    }

    /// Append tuple `tuple` of every array in `source` to the matching array here.
    ///
    /// Arrays are matched by position, so `self` should come from
    /// [`AttributeData::empty_like`] on `source`.
    pub fn push_tuple_from(&mut self, source: &Self, tuple: usize) {
        for (dst, src) in self.arrays.iter_mut().zip(&source.arrays) {
            dst.push_tuple_from(src, tuple);
        }
    }
}
