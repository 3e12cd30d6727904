//! Tensor contraction over shared natural axes.
//!
//! Axes are matched by name: every natural axis present in both operands
//! is summed over, every other natural axis must appear in the product.
//!
//! # Implementations
//!
//! - GEMM: all three tensors are stored in natural layout (`Natural` and
//!   `Full` indices only) and ordered as
//!   `a = [free_a..., contracted...]`, `b = [contracted..., free_b...]`,
//!   `prod = [free_a..., free_b...]`. The buffers are then plain row-major
//!   matrices and faer multiplies them.
//! - Generic: every other combination. Each stored component of `prod` is
//!   computed at its canonical natural coordinates by summing
//!   `a.get(..) * b.get(..)` over the contracted axes, so any index
//!   structure of the operands is honored.
//!
//! # Example
//!
//! ```
//! use symtensors::contract::tensor_prod;
//! use symtensors::index::FullIndex;
//! use symtensors::natural::NaturalIndex;
//! use symtensors::tensor::Tensor;
//!
//! let i = NaturalIndex::with_cardinality("i", 2);
//! let j = NaturalIndex::with_cardinality("j", 3);
//! let k = NaturalIndex::with_cardinality("k", 2);
//!
//! let a = Tensor::<f64>::from_vec(vec![1.0; 6], vec![FullIndex::new(vec![i.clone(), j.clone()]).unwrap().into()]).unwrap();
//! let b = Tensor::<f64>::from_vec(vec![1.0; 6], vec![FullIndex::new(vec![j, k.clone()]).unwrap().into()]).unwrap();
//! let mut c = Tensor::<f64>::zeros(vec![FullIndex::new(vec![i, k]).unwrap().into()]).unwrap();
//!
//! tensor_prod(&mut c, &a, &b).unwrap();
//! assert_eq!(c.data(), &[3.0; 4]);
//! ```

use faer::linalg::matmul::matmul;
use faer::{Accum, MatMut, MatRef, Par};
use log::debug;

use crate::error::TensorError;
use crate::index::TensorIndex;
use crate::natural::NaturalIndex;
use crate::scalar::Scalar;
use crate::storage::TensorStorage;
use crate::strides::linear_to_cartesian_into;
use crate::tensor::{Axis, Tensor};

/// Where a natural coordinate of an operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Coordinate `n` of the product.
    Free(usize),
    /// Contracted coordinate `n`.
    Contracted(usize),
}

/// Axis matching between `prod`, `a` and `b`.
///
/// `dleft`, `dmid` and `dright` are the GEMM dimensions: products of the
/// free extents of `a`, the contracted extents and the free extents of `b`.
#[derive(Debug, Clone)]
struct ContractionPlan {
    sources_a: Vec<Source>,
    sources_b: Vec<Source>,
    contracted_shape: Vec<usize>,
    dleft: usize,
    dmid: usize,
    dright: usize,
    gemm_order: bool,
}

fn natural_axes<T: Scalar, S: TensorStorage<T>>(
    tensor: &Tensor<T, S>,
    role: &str,
) -> Result<Vec<NaturalIndex>, TensorError> {
    let mut axes = Vec::with_capacity(tensor.natural_rank());
    for axis in tensor.axes() {
        match axis {
            Axis::Index(index) => axes.extend(index.natural_indices().iter().cloned()),
            Axis::Spectator(a) => {
                return Err(TensorError::AxisMismatch {
                    message: format!("{role} has spectator axis {} in a contraction", a.name()),
                });
            }
        }
    }
    for (i, axis) in axes.iter().enumerate() {
        if axes[..i].iter().any(|other| other.same_axis(axis)) {
            return Err(TensorError::AxisMismatch {
                message: format!("{role} has natural axis {} twice", axis.name()),
            });
        }
    }
    Ok(axes)
}

impl ContractionPlan {
    fn new(
        prod: &[NaturalIndex],
        a: &[NaturalIndex],
        b: &[NaturalIndex],
    ) -> Result<Self, TensorError> {
        let mut contracted: Vec<(usize, usize)> = Vec::new();
        for (pa, axis) in a.iter().enumerate() {
            if let Some(pb) = b.iter().position(|other| other.same_axis(axis)) {
                if axis.cardinality() != b[pb].cardinality() {
                    return Err(TensorError::ShapeMismatch {
                        expected: axis.cardinality(),
                        actual: b[pb].cardinality(),
                    });
                }
                contracted.push((pa, pb));
            }
        }
        let free = a.len() + b.len() - 2 * contracted.len();
        if prod.len() != free {
            return Err(TensorError::RankMismatch {
                expected: free,
                actual: prod.len(),
            });
        }

        let locate = |axis: &NaturalIndex| -> Result<usize, TensorError> {
            let pos = prod
                .iter()
                .position(|p| p.same_axis(axis))
                .ok_or_else(|| TensorError::IndexNotFound {
                    name: axis.name().to_string(),
                })?;
            if prod[pos].cardinality() != axis.cardinality() {
                return Err(TensorError::ShapeMismatch {
                    expected: axis.cardinality(),
                    actual: prod[pos].cardinality(),
                });
            }
            Ok(pos)
        };

        let mut sources_a = Vec::with_capacity(a.len());
        for (pa, axis) in a.iter().enumerate() {
            match contracted.iter().position(|&(ca, _)| ca == pa) {
                Some(c) => sources_a.push(Source::Contracted(c)),
                None => sources_a.push(Source::Free(locate(axis)?)),
            }
        }
        let mut sources_b = Vec::with_capacity(b.len());
        for (pb, axis) in b.iter().enumerate() {
            match contracted.iter().position(|&(_, cb)| cb == pb) {
                Some(c) => sources_b.push(Source::Contracted(c)),
                None => sources_b.push(Source::Free(locate(axis)?)),
            }
        }

        let contracted_shape: Vec<usize> = contracted
            .iter()
            .map(|&(pa, _)| a[pa].cardinality())
            .collect();
        let free_a = a.len() - contracted.len();
        let free_extent = |axes: &[NaturalIndex], sources: &[Source]| -> usize {
            axes.iter()
                .zip(sources)
                .filter(|(_, source)| matches!(source, Source::Free(_)))
                .map(|(axis, _)| axis.cardinality())
                .product()
        };
        let dleft = free_extent(a, &sources_a);
        let dright = free_extent(b, &sources_b);

        let gemm_order = sources_a
            .iter()
            .chain(&sources_b)
            .zip(
                (0..free_a)
                    .map(Source::Free)
                    .chain((0..contracted.len()).map(Source::Contracted))
                    .chain((0..contracted.len()).map(Source::Contracted))
                    .chain((free_a..free).map(Source::Free)),
            )
            .all(|(actual, expected)| *actual == expected);

        Ok(Self {
            sources_a,
            sources_b,
            dmid: contracted_shape.iter().product(),
            contracted_shape,
            dleft,
            dright,
            gemm_order,
        })
    }
}

/// Write the contraction of `a` and `b` over their shared natural axes into
/// `prod`.
///
/// # Errors
///
/// - `TensorError::AxisMismatch` if an operand has spectator axes or a
///   repeated natural axis, or `prod` has a linear-combination index
/// - `TensorError::RankMismatch` if `prod` does not have exactly the free
///   natural axes
/// - `TensorError::IndexNotFound` / `ShapeMismatch` for a free axis missing
///   from `prod` or with a different cardinality
pub fn tensor_prod<T, SP, SA, SB>(
    prod: &mut Tensor<T, SP>,
    a: &Tensor<T, SA>,
    b: &Tensor<T, SB>,
) -> Result<(), TensorError>
where
    T: Scalar,
    SP: TensorStorage<T>,
    SA: TensorStorage<T>,
    SB: TensorStorage<T>,
{
    let prod_axes = natural_axes(prod, "product")?;
    let a_axes = natural_axes(a, "left operand")?;
    let b_axes = natural_axes(b, "right operand")?;
    if prod.indices().iter().any(|index| !index.is_explicitly_stored()) {
        return Err(TensorError::AxisMismatch {
            message: "product of a contraction cannot have a linear-combination index".into(),
        });
    }
    let plan = ContractionPlan::new(&prod_axes, &a_axes, &b_axes)?;

    let natural_layout = prod.natural_layout_shape().is_some()
        && a.natural_layout_shape().is_some()
        && b.natural_layout_shape().is_some();
    if natural_layout && plan.gemm_order {
        debug!(
            "tensor_prod: GEMM path m={} k={} n={}",
            plan.dleft, plan.dmid, plan.dright
        );
        contract_gemm(prod.data_mut(), a.data(), b.data(), &plan);
    } else {
        debug!(
            "tensor_prod: generic path over {} stored components x {} contracted",
            prod.len(),
            plan.dmid
        );
        contract_generic(prod, a, b, &plan);
    }
    Ok(())
}

/// `prod(m, n) = a(m, k) * b(k, n)` on row-major buffers.
///
/// A row-major `m x k` buffer is the column-major `k x m` transpose, so the
/// product is computed as `prod^T = b^T * a^T` with faer's column-major
/// views.
fn contract_gemm<T: Scalar>(prod: &mut [T], a: &[T], b: &[T], plan: &ContractionPlan) {
    let (m, k, n) = (plan.dleft, plan.dmid, plan.dright);
    if m == 0 || n == 0 {
        return;
    }
    if k == 0 {
        prod.fill(T::zero());
        return;
    }
    let a_t = MatRef::from_column_major_slice(a, k, m);
    let b_t = MatRef::from_column_major_slice(b, n, k);
    let mut c_t = MatMut::from_column_major_slice_mut(prod, n, m);
    matmul(c_t.as_mut(), Accum::Replace, b_t, a_t, T::one(), Par::Seq);
}

fn contract_generic<T, SP, SA, SB>(
    prod: &mut Tensor<T, SP>,
    a: &Tensor<T, SA>,
    b: &Tensor<T, SB>,
    plan: &ContractionPlan,
) where
    T: Scalar,
    SP: TensorStorage<T>,
    SA: TensorStorage<T>,
    SB: TensorStorage<T>,
{
    let mut contracted = vec![0; plan.contracted_shape.len()];
    let mut a_ids = vec![0; plan.sources_a.len()];
    let mut b_ids = vec![0; plan.sources_b.len()];
    let fill = |ids: &mut [usize], sources: &[Source], free: &[usize], contracted: &[usize]| {
        for (id, source) in ids.iter_mut().zip(sources) {
            *id = match *source {
                Source::Free(p) => free[p],
                Source::Contracted(c) => contracted[c],
            };
        }
    };

    for linear in 0..prod.len() {
        let free = prod.canonical_natural_coords(linear);
        let mut sum = T::zero();
        for c in 0..plan.dmid {
            linear_to_cartesian_into(c, &plan.contracted_shape, &mut contracted);
            fill(&mut a_ids, &plan.sources_a, &free, &contracted);
            fill(&mut b_ids, &plan.sources_b, &free, &contracted);
            sum += a.get(&a_ids) * b.get(&b_ids);
        }
        prod.data_mut()[linear] = sum;
    }
}
