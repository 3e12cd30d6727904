//! Storage types for tensor data.
//!
//! ```text
//! TensorStorage<T> (trait)
//! ├── Dense<T>          - owned contiguous buffer
//! └── DenseView<'a, T>  - borrowed contiguous buffer
//! ```
//!
//! Storage is always a flat buffer of mem components; the layout comes from
//! the axes of the [`Tensor`](crate::tensor::Tensor) wrapping it.

mod dense;

use crate::scalar::Scalar;

pub use dense::{Dense, DenseView};

/// Flat buffer of mem components behind a tensor.
pub trait TensorStorage<T: Scalar>: std::fmt::Debug {
    /// Number of stored components.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];
}

/// Storage that owns its buffer and can allocate one.
pub trait OwnedStorage<T: Scalar>: TensorStorage<T> + Clone {
    /// Zero-filled buffer of `len` components.
    fn zeros(len: usize) -> Self;

    /// Take ownership of an existing buffer.
    fn from_vec(data: Vec<T>) -> Self;
}

impl<T: Scalar> TensorStorage<T> for Dense<T> {
    fn len(&self) -> usize {
        Dense::len(self)
    }

    fn as_slice(&self) -> &[T] {
        Dense::as_slice(self)
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        Dense::as_mut_slice(self)
    }
}

impl<T: Scalar> OwnedStorage<T> for Dense<T> {
    fn zeros(len: usize) -> Self {
        Dense::zeros(len)
    }

    fn from_vec(data: Vec<T>) -> Self {
        Dense::from_vec(data)
    }
}

impl<T: Scalar> TensorStorage<T> for DenseView<'_, T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn as_slice(&self) -> &[T] {
        DenseView::as_slice(self)
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        DenseView::as_mut_slice(self)
    }
}
