//! Dense storage for tensor data.

use crate::scalar::Scalar;

/// Dense storage - contiguous array of mem components in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<ElT: Scalar> {
    data: Vec<ElT>,
}

impl<ElT: Scalar> Dense<ElT> {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![ElT::zero(); len],
        }
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<ElT>) -> Self {
        Self { data }
    }

    /// Length of storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get immutable slice of data.
    #[inline]
    pub fn as_slice(&self) -> &[ElT] {
        &self.data
    }

    /// Get mutable slice of data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ElT] {
        &mut self.data
    }

    /// Give the buffer back.
    pub fn into_vec(self) -> Vec<ElT> {
        self.data
    }
}

impl<ElT: Scalar> std::ops::Index<usize> for Dense<ElT> {
    type Output = ElT;

    #[inline]
    fn index(&self, i: usize) -> &ElT {
        &self.data[i]
    }
}

impl<ElT: Scalar> std::ops::IndexMut<usize> for Dense<ElT> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut ElT {
        &mut self.data[i]
    }
}

/// Dense storage over a caller-owned buffer, e.g. one cell of a larger
/// field.
#[derive(Debug, PartialEq)]
pub struct DenseView<'a, ElT: Scalar> {
    data: &'a mut [ElT],
}

impl<'a, ElT: Scalar> DenseView<'a, ElT> {
    /// Wrap a mutable buffer.
    pub fn new(data: &'a mut [ElT]) -> Self {
        Self { data }
    }

    /// Get immutable slice of data.
    #[inline]
    pub fn as_slice(&self) -> &[ElT] {
        self.data
    }

    /// Get mutable slice of data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ElT] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let d: Dense<f64> = Dense::zeros(5);
        assert_eq!(d.len(), 5);
        assert!(!d.is_empty());
        for i in 0..5 {
            assert_eq!(d[i], 0.0);
        }
    }

    #[test]
    fn test_index_mut() {
        let mut d = Dense::zeros(3);
        d[1] = 5.0;
        assert_eq!(d[1], 5.0);
        assert_eq!(d.into_vec(), vec![0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_view_writes_through() {
        let mut buf = vec![1.0, 2.0, 3.0];
        {
            let mut view = DenseView::new(&mut buf);
            view.as_mut_slice()[2] = 7.0;
            assert_eq!(view.as_slice(), &[1.0, 2.0, 7.0]);
        }
        assert_eq!(buf, vec![1.0, 2.0, 7.0]);
    }
}
