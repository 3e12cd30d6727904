//! Sparse linear maps between natural and compressed representations.
//!
//! [`Csr`] holds a rectangular map with one head axis and one or more tail
//! axes. Two tensor-level contractions are built on its kernels:
//!
//! - [`tensor_prod_csr_dense`]: `head[r] = sum_t csr[r, t] * tail[t]`
//! - [`tensor_prod_dense_csr`]: `tail[t] = sum_r head[r] * csr[r, t]`

mod csr;
mod io;

pub use csr::{Csr, CsrRow};
pub use io::CSR_BLOCK_SEPARATOR;

use log::debug;

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::storage::TensorStorage;
use crate::tensor::Tensor;

/// Contract a CSR against a tensor over its tail axes.
///
/// `dense` must have natural-layout axes whose extents are the CSR tail
/// shape; `prod` receives one value per head row in its mem buffer.
///
/// # Example
///
/// ```
/// use symtensors::natural::NaturalIndex;
/// use symtensors::sparse::{Csr, tensor_prod_csr_dense};
/// use symtensors::tensor::Tensor;
///
/// let csr = Csr::from_dense(&[1.0, 2.0, 0.0, 3.0], 2, &[2]).unwrap();
/// let j = NaturalIndex::with_cardinality("j", 2);
/// let tail = Tensor::<f64>::from_vec(vec![1.0, 1.0], vec![j.into()]).unwrap();
/// let mut head = Tensor::<f64>::zeros(vec![NaturalIndex::with_cardinality("i", 2).into()]).unwrap();
///
/// tensor_prod_csr_dense(&mut head, &csr, &tail).unwrap();
/// assert_eq!(head.data(), &[3.0, 3.0]);
/// ```
pub fn tensor_prod_csr_dense<T, SP, SD>(
    prod: &mut Tensor<T, SP>,
    csr: &Csr,
    dense: &Tensor<T, SD>,
) -> Result<(), TensorError>
where
    T: Scalar,
    SP: TensorStorage<T>,
    SD: TensorStorage<T>,
{
    check_extents(prod.len(), csr.head_extent(), "head")?;
    check_tail(dense, csr)?;
    debug!(
        "CSR x dense: {} rows, {} nonzeros",
        csr.head_extent(),
        csr.nnz()
    );
    csr.reduce_rows(dense.data(), prod.data_mut());
    Ok(())
}

/// Contract a tensor against a CSR over its head axis.
///
/// `prod` must have natural-layout axes whose extents are the CSR tail
/// shape and is overwritten; `dense` supplies one value per head row.
pub fn tensor_prod_dense_csr<T, SP, SD>(
    prod: &mut Tensor<T, SP>,
    dense: &Tensor<T, SD>,
    csr: &Csr,
) -> Result<(), TensorError>
where
    T: Scalar,
    SP: TensorStorage<T>,
    SD: TensorStorage<T>,
{
    check_extents(dense.len(), csr.head_extent(), "head")?;
    check_tail(prod, csr)?;
    debug!(
        "dense x CSR: {} rows, {} nonzeros",
        csr.head_extent(),
        csr.nnz()
    );
    let out = prod.data_mut();
    out.fill(T::zero());
    csr.scatter_add(dense.data(), out);
    Ok(())
}

fn check_extents(actual: usize, expected: usize, what: &str) -> Result<(), TensorError> {
    if actual != expected {
        return Err(TensorError::AxisMismatch {
            message: format!("{what} operand has {actual} components, CSR expects {expected}"),
        });
    }
    Ok(())
}

fn check_tail<T: Scalar, S: TensorStorage<T>>(
    tensor: &Tensor<T, S>,
    csr: &Csr,
) -> Result<(), TensorError> {
    match tensor.natural_layout_shape() {
        Some(shape) if shape == csr.tail_shape() => Ok(()),
        Some(shape) => Err(TensorError::AxisMismatch {
            message: format!(
                "tail operand has extents {:?}, CSR expects {:?}",
                shape,
                csr.tail_shape()
            ),
        }),
        None => Err(TensorError::AxisMismatch {
            message: "tail operand must be stored in natural layout".into(),
        }),
    }
}
