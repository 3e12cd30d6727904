//! CSR container keyed by one head axis and one or more tail axes.
//!
//! # Format
//!
//! For a head axis of extent `m` and tail axes of extents `[t0, t1, ...]`:
//! - `row_offsets`: length `m + 1`, non-decreasing; row `r` owns the
//!   nonzeros `row_offsets[r]..row_offsets[r + 1]`
//! - `col_ids[a]`: id along tail axis `a` of each nonzero
//! - `values`: value of each nonzero
//!
//! All nonzero arrays have length `nnz = row_offsets[m]`.
//!
//! The container is filled once, row after row, with [`Csr::push_back`] and
//! is read-only afterwards.
//!
//! # Example
//!
//! ```
//! use symtensors::sparse::Csr;
//!
//! // 2 x (2 x 2): row 0 = [[1, 0], [0, 2]], row 1 = [[0, 0], [3, 0]]
//! let mut csr = Csr::new(2, &[2, 2]);
//! csr.push_back(&[1.0, 0.0, 0.0, 2.0]).unwrap();
//! csr.push_back(&[0.0, 0.0, 3.0, 0.0]).unwrap();
//!
//! assert_eq!(csr.nnz(), 3);
//! assert_eq!(csr.row_offsets(), &[0, 2, 3]);
//! assert_eq!(csr.col_ids(0), &[0, 1, 1]);
//! assert_eq!(csr.col_ids(1), &[0, 1, 0]);
//!
//! let mut head = [0.0; 2];
//! csr.reduce_rows(&[1.0; 4], &mut head);
//! assert_eq!(head, [3.0, 3.0]);
//! ```

use std::ops::Range;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::error::TensorError;
use crate::index::{INLINE_RANK, NaturalIds};
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, compute_strides, linear_to_cartesian_into};

/// Sparse rows over a multi-axis tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Csr {
    head_extent: usize,
    tail_shape: SmallVec<[usize; INLINE_RANK]>,
    tail_strides: SmallVec<[usize; INLINE_RANK]>,
    row_offsets: Vec<usize>,
    col_ids: Vec<Vec<usize>>,
    values: Vec<f64>,
}

impl Csr {
    /// Create an empty container ready for `head_extent` calls to
    /// [`Csr::push_back`].
    pub fn new(head_extent: usize, tail_shape: &[usize]) -> Self {
        let mut row_offsets = Vec::with_capacity(head_extent + 1);
        row_offsets.push(0);
        Self {
            head_extent,
            tail_shape: SmallVec::from_slice(tail_shape),
            tail_strides: SmallVec::from_vec(compute_strides(tail_shape)),
            row_offsets,
            col_ids: vec![Vec::new(); tail_shape.len()],
            values: Vec::new(),
        }
    }

    /// Assemble a complete container from its arrays, validating the
    /// invariants of the format.
    pub fn from_parts(
        head_extent: usize,
        tail_shape: &[usize],
        row_offsets: Vec<usize>,
        col_ids: Vec<Vec<usize>>,
        values: Vec<f64>,
    ) -> Result<Self, TensorError> {
        let nnz = check_row_offsets(head_extent, &row_offsets)?;
        if col_ids.len() != tail_shape.len() {
            return Err(TensorError::CsrLengthMismatch {
                array: "col_ids",
                expected: tail_shape.len(),
                actual: col_ids.len(),
            });
        }
        for (ids, &extent) in col_ids.iter().zip(tail_shape) {
            if ids.len() != nnz {
                return Err(TensorError::CsrLengthMismatch {
                    array: "col_ids",
                    expected: nnz,
                    actual: ids.len(),
                });
            }
            if let Some(&bad) = ids.iter().find(|&&id| id >= extent) {
                return Err(TensorError::IndexOutOfBounds {
                    index: bad,
                    dim_size: extent,
                });
            }
        }
        if values.len() != nnz {
            return Err(TensorError::CsrLengthMismatch {
                array: "values",
                expected: nnz,
                actual: values.len(),
            });
        }
        Ok(Self {
            head_extent,
            tail_shape: SmallVec::from_slice(tail_shape),
            tail_strides: SmallVec::from_vec(compute_strides(tail_shape)),
            row_offsets,
            col_ids,
            values,
        })
    }

    /// Build from a dense row-major array of shape `[head_extent, tail_shape...]`.
    pub fn from_dense(
        dense: &[f64],
        head_extent: usize,
        tail_shape: &[usize],
    ) -> Result<Self, TensorError> {
        let tail_size: usize = tail_shape.iter().product();
        if dense.len() != head_extent * tail_size {
            return Err(TensorError::ShapeMismatch {
                expected: head_extent * tail_size,
                actual: dense.len(),
            });
        }
        let mut csr = Self::new(head_extent, tail_shape);
        if tail_size > 0 {
            for row in dense.chunks_exact(tail_size) {
                csr.push_back(row)?;
            }
        } else {
            for _ in 0..head_extent {
                csr.push_back(&[])?;
            }
        }
        debug!(
            "built CSR {}x{:?}: nnz={} density={:.3}",
            head_extent,
            tail_shape,
            csr.nnz(),
            csr.density()
        );
        Ok(csr)
    }

    /// Append one row given as a dense row-major slice over the tail axes.
    /// Only nonzero entries are kept.
    pub fn push_back(&mut self, dense_row: &[f64]) -> Result<(), TensorError> {
        if self.is_complete() {
            return Err(TensorError::CsrFull {
                nrows: self.head_extent,
            });
        }
        if dense_row.len() != self.tail_size() {
            return Err(TensorError::ShapeMismatch {
                expected: self.tail_size(),
                actual: dense_row.len(),
            });
        }
        let mut ids = NaturalIds::from_elem(0, self.tail_shape.len());
        for (linear, &value) in dense_row.iter().enumerate() {
            if value == 0.0 {
                continue;
            }
            linear_to_cartesian_into(linear, &self.tail_shape, &mut ids);
            for (axis_ids, &id) in self.col_ids.iter_mut().zip(ids.iter()) {
                axis_ids.push(id);
            }
            self.values.push(value);
        }
        self.row_offsets.push(self.values.len());
        trace!(
            "CSR row {} appended with {} nonzeros",
            self.row_offsets.len() - 2,
            self.row_offsets[self.row_offsets.len() - 1] - self.row_offsets[self.row_offsets.len() - 2]
        );
        Ok(())
    }

    /// Extent of the head axis.
    #[inline]
    pub fn head_extent(&self) -> usize {
        self.head_extent
    }

    /// Extents of the tail axes.
    #[inline]
    pub fn tail_shape(&self) -> &[usize] {
        &self.tail_shape
    }

    /// Number of dense entries per row.
    #[inline]
    pub fn tail_size(&self) -> usize {
        self.tail_shape.iter().product()
    }

    /// Number of rows pushed so far.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    /// Whether every head row has been pushed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.nrows() == self.head_extent
    }

    /// Number of stored nonzeros.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Fraction of dense entries that are stored.
    pub fn density(&self) -> f64 {
        let total = self.head_extent * self.tail_size();
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Row offsets.
    #[inline]
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Column ids of all nonzeros along one tail axis.
    ///
    /// # Panics
    /// Panics if `axis` is not a tail axis.
    #[inline]
    pub fn col_ids(&self, axis: usize) -> &[usize] {
        &self.col_ids[axis]
    }

    /// Values of all nonzeros.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Zero-copy view of one row.
    ///
    /// # Panics
    /// Panics if `row` has not been pushed.
    #[inline]
    pub fn get(&self, row: usize) -> CsrRow<'_> {
        assert!(
            row < self.nrows(),
            "row {} out of range for CSR with {} rows",
            row,
            self.nrows()
        );
        CsrRow {
            csr: self,
            row,
            range: self.row_offsets[row]..self.row_offsets[row + 1],
        }
    }

    /// Iterate over all pushed rows.
    pub fn rows(&self) -> impl Iterator<Item = CsrRow<'_>> + '_ {
        (0..self.nrows()).map(move |row| self.get(row))
    }

    /// Row-major linear tail position of a nonzero.
    #[inline]
    pub fn tail_linear_id(&self, nz: usize) -> usize {
        self.col_ids
            .iter()
            .zip(self.tail_strides.iter())
            .map(|(ids, &stride)| ids[nz] * stride)
            .sum()
    }

    /// Value stored at `(row, tail_ids)`, if nonzero.
    pub fn coefficient(&self, row: usize, tail_ids: &[usize]) -> Option<f64> {
        let target = cartesian_to_linear(tail_ids, &self.tail_strides);
        let range = self.row_offsets[row]..self.row_offsets[row + 1];
        range
            .into_iter()
            .find(|&nz| self.tail_linear_id(nz) == target)
            .map(|nz| self.values[nz])
    }

    /// Expand into a dense row-major array of shape `[head_extent, tail_shape...]`.
    pub fn to_dense(&self) -> Vec<f64> {
        let tail_size = self.tail_size();
        let mut dense = vec![0.0; self.head_extent * tail_size];
        for row in 0..self.nrows() {
            for nz in self.row_offsets[row]..self.row_offsets[row + 1] {
                dense[row * tail_size + self.tail_linear_id(nz)] = self.values[nz];
            }
        }
        dense
    }

    /// Scatter-add kernel: `dst[tail] += sum_r head[r] * self[r, tail]`.
    ///
    /// `dst` is accumulated into and must be zeroed by the caller for a plain
    /// product. Runs sequentially: rows may share columns.
    ///
    /// # Panics
    /// Panics if the container is incomplete or the slices have the wrong
    /// length.
    pub fn scatter_add<T: Scalar>(&self, head: &[T], dst: &mut [T]) {
        self.check_kernel_operands(head.len(), dst.len());
        for (row, &h) in head.iter().enumerate() {
            for nz in self.row_offsets[row]..self.row_offsets[row + 1] {
                dst[self.tail_linear_id(nz)] += h * T::from_real(self.values[nz]);
            }
        }
    }

    /// Per-row reduction kernel: `dst[r] = sum_tail self[r, tail] * tail[tail]`.
    ///
    /// Rows are independent; with the `parallel` feature they are reduced
    /// on the rayon thread pool.
    ///
    /// # Panics
    /// Panics if the container is incomplete or the slices have the wrong
    /// length.
    pub fn reduce_rows<T: Scalar>(&self, tail: &[T], dst: &mut [T]) {
        self.check_kernel_operands(dst.len(), tail.len());

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            dst.par_iter_mut()
                .enumerate()
                .for_each(|(row, out)| *out = self.row_dot(row, tail));
        }

        #[cfg(not(feature = "parallel"))]
        for (row, out) in dst.iter_mut().enumerate() {
            *out = self.row_dot(row, tail);
        }
    }

    #[inline]
    fn row_dot<T: Scalar>(&self, row: usize, tail: &[T]) -> T {
        let mut sum = T::zero();
        for nz in self.row_offsets[row]..self.row_offsets[row + 1] {
            sum += T::from_real(self.values[nz]) * tail[self.tail_linear_id(nz)];
        }
        sum
    }

    fn check_kernel_operands(&self, head_len: usize, tail_len: usize) {
        assert!(
            self.is_complete(),
            "CSR holds {} of {} rows",
            self.nrows(),
            self.head_extent
        );
        assert_eq!(
            head_len, self.head_extent,
            "head operand length {} does not match CSR head extent {}",
            head_len, self.head_extent
        );
        assert_eq!(
            tail_len,
            self.tail_size(),
            "tail operand length {} does not match CSR tail size {}",
            tail_len,
            self.tail_size()
        );
    }
}

/// Validate a row-offset array for `head_extent` rows and return the
/// number of nonzeros it announces.
pub(crate) fn check_row_offsets(
    head_extent: usize,
    row_offsets: &[usize],
) -> Result<usize, TensorError> {
    if row_offsets.len() != head_extent + 1 {
        return Err(TensorError::CsrLengthMismatch {
            array: "row_offsets",
            expected: head_extent + 1,
            actual: row_offsets.len(),
        });
    }
    if row_offsets[0] != 0 {
        return Err(TensorError::CorruptCsrStream {
            message: format!("first row offset is {}, expected 0", row_offsets[0]),
        });
    }
    for (row, w) in row_offsets.windows(2).enumerate() {
        if w[0] > w[1] {
            return Err(TensorError::CsrRowOffsetsNotSorted {
                row,
                curr: w[0],
                next: w[1],
            });
        }
    }
    Ok(row_offsets[head_extent])
}

/// Zero-copy view of one CSR row.
#[derive(Debug, Clone)]
pub struct CsrRow<'a> {
    csr: &'a Csr,
    row: usize,
    range: Range<usize>,
}

impl<'a> CsrRow<'a> {
    /// Head id of this row.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Number of nonzeros in the row.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.range.len()
    }

    /// Whether the row has no nonzero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Values of the row.
    #[inline]
    pub fn values(&self) -> &'a [f64] {
        &self.csr.values[self.range.clone()]
    }

    /// Column ids of the row along one tail axis.
    #[inline]
    pub fn col_ids(&self, axis: usize) -> &'a [usize] {
        &self.csr.col_ids[axis][self.range.clone()]
    }

    /// Iterate over `(row-major tail position, value)` entries.
    pub fn linear_iter(&self) -> impl Iterator<Item = (usize, f64)> + use<'a> {
        let csr = self.csr;
        self.range
            .clone()
            .map(move |nz| (csr.tail_linear_id(nz), csr.values[nz]))
    }

    /// Iterate over `(tail ids, value)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (NaturalIds, f64)> + use<'a> {
        let csr = self.csr;
        self.range.clone().map(move |nz| {
            let ids = csr.col_ids.iter().map(|axis| axis[nz]).collect();
            (ids, csr.values[nz])
        })
    }
}
