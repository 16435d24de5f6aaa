//! Enumeration of the Cartesian product of parameter values.

use crate::config::ParameterSpec;
use crate::model::ParameterAssignment;

/// The full, ordered set of assignments for a [`ParameterSpec`].
///
/// Assignments are laid out in row-major order over declaration order, so the
/// last-declared parameter varies fastest. Any index can be decoded directly
/// through precomputed strides, which is what makes resuming from an
/// arbitrary index cheap.
#[derive(Debug, Clone)]
pub struct ParameterSpace<'a> {
    spec: &'a ParameterSpec,
    shape: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl<'a> ParameterSpace<'a> {
    #[must_use]
    pub fn new(spec: &'a ParameterSpec) -> Self {
        let shape = spec.grid_shape();
        let strides = compute_strides(&shape);
        let len = spec.total_points();
        Self {
            spec,
            shape,
            strides,
            len,
        }
    }

    /// Total number of assignments
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shape of the grid (value count per parameter)
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Convert a flat index to per-parameter value indices
    #[must_use]
    pub fn multi_index(&self, flat: usize) -> Option<Vec<usize>> {
        if flat >= self.len {
            return None;
        }
        let mut indices = Vec::with_capacity(self.shape.len());
        let mut remaining = flat;
        for &stride in &self.strides {
            indices.push(remaining / stride);
            remaining %= stride;
        }
        Some(indices)
    }

    /// Assignment at a flat index
    #[must_use]
    pub fn get(&self, flat: usize) -> Option<ParameterAssignment> {
        let indices = self.multi_index(flat)?;
        Some(self.assignment_at(&indices))
    }

    /// Iterate over every assignment in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = ParameterAssignment> + '_ {
        GridIndices::new(self.shape.clone(), self.len).map(|indices| self.assignment_at(&indices))
    }

    fn assignment_at(&self, indices: &[usize]) -> ParameterAssignment {
        self.spec
            .parameters()
            .iter()
            .zip(indices)
            .map(|(p, &i)| (p.name.as_str(), p.values[i].clone()))
            .collect()
    }
}

/// Compute strides for row-major order
fn compute_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return Vec::new();
    }
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Iterator over all indices in a grid
struct GridIndices {
    shape: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl GridIndices {
    fn new(shape: Vec<usize>, len: usize) -> Self {
        let current = vec![0; shape.len()];
        Self {
            shape,
            current,
            done: len == 0,
        }
    }
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current.clone();

        // Zero dimensions: a single empty point
        if self.shape.is_empty() {
            self.done = true;
            return Some(result);
        }

        // Row-major: last dimension varies fastest
        for i in (0..self.shape.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.shape[i] {
                break;
            }
            self.current[i] = 0;
            if i == 0 {
                self.done = true;
            }
        }

        Some(result)
    }
}
