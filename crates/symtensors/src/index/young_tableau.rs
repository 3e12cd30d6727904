//! Young-tableau index: components live in an irreducible representation.
//!
//! The tableau is described by two CSR matrices supplied from outside:
//!
//! - `U` (compress): head = irrep component, tail = natural axes.
//!   `irrep[r] = sum_t U[r, t] * natural[t]`
//! - `V` (uncompress): head = irrep component, tail = natural axes.
//!   `natural[t] = sum_r V[r, t] * irrep[r]`
//!
//! `V` applied after `U` is a projector onto the irreducible subspace. A
//! natural component is therefore not one stored value but the weighted sum
//! `sum_r V[r, t] * mem[r]`, which is what [`YoungTableauIndex::access_id_to_mem_lin_comb`]
//! returns.

use std::sync::Arc;

use log::debug;

use super::{MemLinComb, NaturalIds, TensorIndex, uniform_cardinality};
use crate::error::TensorError;
use crate::natural::NaturalIndex;
use crate::scalar::Scalar;
use crate::sparse::Csr;
use crate::storage::TensorStorage;
use crate::strides::{compute_strides, linear_to_cartesian_into};
use crate::tensor::{Axis, Tensor};

/// Shape of a Young diagram together with its projector matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct YoungTableau {
    shape: Vec<usize>,
    compress: Csr,
    uncompress: Csr,
}

impl YoungTableau {
    /// Bundle a diagram shape with its compress (`u`) and uncompress (`v`)
    /// matrices.
    ///
    /// The shape must have positive, non-increasing row lengths whose sum is
    /// the number of tail axes of both matrices. Both matrices must be
    /// complete and share head extent and tail extents.
    pub fn new(shape: Vec<usize>, u: Csr, v: Csr) -> Result<Self, TensorError> {
        if shape.is_empty()
            || shape.contains(&0)
            || shape.windows(2).any(|w| w[0] < w[1])
        {
            return Err(TensorError::InvalidTableauShape { shape });
        }
        let rank: usize = shape.iter().sum();
        if u.tail_shape().len() != rank {
            return Err(TensorError::TableauRankMismatch {
                shape,
                tableau_rank: rank,
                rank: u.tail_shape().len(),
            });
        }
        if v.tail_shape() != u.tail_shape() || v.head_extent() != u.head_extent() {
            return Err(TensorError::AxisMismatch {
                message: format!(
                    "compress matrix is {}x{:?} but uncompress matrix is {}x{:?}",
                    u.head_extent(),
                    u.tail_shape(),
                    v.head_extent(),
                    v.tail_shape()
                ),
            });
        }
        for (name, csr) in [("compress", &u), ("uncompress", &v)] {
            if !csr.is_complete() {
                return Err(TensorError::CsrLengthMismatch {
                    array: name,
                    expected: csr.head_extent(),
                    actual: csr.nrows(),
                });
            }
        }
        Ok(Self {
            shape,
            compress: u,
            uncompress: v,
        })
    }

    /// Row lengths of the diagram.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of boxes, i.e. natural axes covered.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.iter().sum()
    }

    /// Dimension of the irreducible representation.
    #[inline]
    pub fn irrep_dim(&self) -> usize {
        self.compress.head_extent()
    }

    /// Natural to irrep matrix.
    #[inline]
    pub fn compress_matrix(&self) -> &Csr {
        &self.compress
    }

    /// Irrep to natural matrix.
    #[inline]
    pub fn uncompress_matrix(&self) -> &Csr {
        &self.uncompress
    }
}

/// Index storing the irreducible components of a Young tableau.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use symtensors::index::{TensorIndex, YoungTableau, YoungTableauIndex};
/// use symtensors::natural::NaturalIndex;
/// use symtensors::sparse::Csr;
///
/// // Symmetric rank-2 tableau over two labels: irrep = {T00, (T01+T10)/2, T11}.
/// let u = Csr::from_dense(
///     &[1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 1.0],
///     3,
///     &[2, 2],
/// )
/// .unwrap();
/// let v = Csr::from_dense(
///     &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
///     3,
///     &[2, 2],
/// )
/// .unwrap();
/// let tableau = Arc::new(YoungTableau::new(vec![2], u, v).unwrap());
///
/// let i = NaturalIndex::new("i", ["X", "Y"]);
/// let index = YoungTableauIndex::new(tableau, vec![i.clone(), i.renamed("j")]).unwrap();
/// assert_eq!(index.mem_size(), 3);
/// assert_eq!(index.access_id_to_mem_lin_comb(index.access_id(&[1, 0])).as_slice(), &[(1.0, 1)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YoungTableauIndex {
    axes: Vec<NaturalIndex>,
    cardinality: usize,
    strides: NaturalIds,
    tableau: Arc<YoungTableau>,
}

impl YoungTableauIndex {
    /// Attach a tableau to natural axes.
    ///
    /// All axes must share one cardinality, their number must equal the
    /// tableau rank, and every tail extent of the tableau matrices must
    /// equal the cardinality.
    pub fn new(tableau: Arc<YoungTableau>, axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        let cardinality = uniform_cardinality("young tableau", &axes)?;
        if axes.len() != tableau.rank() {
            return Err(TensorError::TableauRankMismatch {
                shape: tableau.shape().to_vec(),
                tableau_rank: tableau.rank(),
                rank: axes.len(),
            });
        }
        if let Some(&extent) = tableau
            .compress_matrix()
            .tail_shape()
            .iter()
            .find(|&&extent| extent != cardinality)
        {
            return Err(TensorError::CardinalityMismatch {
                structure: "young tableau",
                expected: extent,
                actual: cardinality,
            });
        }
        let shape = vec![cardinality; axes.len()];
        debug!(
            "young tableau index {:?} over {} axes of cardinality {}: irrep_dim={}",
            tableau.shape(),
            axes.len(),
            cardinality,
            tableau.irrep_dim()
        );
        Ok(Self {
            axes,
            cardinality,
            strides: NaturalIds::from_vec(compute_strides(&shape)),
            tableau,
        })
    }

    /// Shared tableau.
    #[inline]
    pub fn tableau(&self) -> &Arc<YoungTableau> {
        &self.tableau
    }

    /// Shared cardinality of the axes.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Weighted mem ids whose sum is the natural component at `access_id`.
    ///
    /// Scans every row of the uncompress matrix for a nonzero at the
    /// queried tuple. The result is empty for a component outside the
    /// irreducible subspace.
    pub fn access_id_to_mem_lin_comb(&self, access_id: usize) -> MemLinComb {
        let v = self.tableau.uncompress_matrix();
        let mut ids = NaturalIds::from_elem(0, self.axes.len());
        linear_to_cartesian_into(access_id, v.tail_shape(), &mut ids);
        (0..v.nrows())
            .filter_map(|row| v.coefficient(row, &ids).map(|coef| (coef, row)))
            .collect()
    }

    /// Weighted natural access ids whose sum is the irrep component `mem_id`
    /// (one row of the compress matrix).
    pub fn mem_id_to_access_lin_comb(&self, mem_id: usize) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.tableau
            .compress_matrix()
            .get(mem_id)
            .linear_iter()
            .map(|(access_id, coef)| (coef, access_id))
    }

    /// Project the trailing natural axes of `src` onto the irrep axis of
    /// `dst`, cell by cell over the leading axes.
    ///
    /// `dst` must end with this index; `src` must end with natural-layout
    /// axes (`Natural` or `Full`) covering the same natural axes in order,
    /// and both must share their leading axes.
    pub fn compress<T, SD, SS>(
        &self,
        dst: &mut Tensor<T, SD>,
        src: &Tensor<T, SS>,
    ) -> Result<(), TensorError>
    where
        T: Scalar,
        SD: TensorStorage<T>,
        SS: TensorStorage<T>,
    {
        let cells = self.check_operands(dst, src)?;
        let u = self.tableau.compress_matrix();
        let irrep = self.tableau.irrep_dim();
        let natural = self.size();
        debug!("compress {cells} cells: {natural} natural -> {irrep} irrep components");
        if irrep == 0 || natural == 0 {
            dst.data_mut().fill(T::zero());
            return Ok(());
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            dst.data_mut()
                .par_chunks_mut(irrep)
                .zip(src.data().par_chunks(natural))
                .for_each(|(out, cell)| u.reduce_rows(cell, out));
        }

        #[cfg(not(feature = "parallel"))]
        for (out, cell) in dst
            .data_mut()
            .chunks_mut(irrep)
            .zip(src.data().chunks(natural))
        {
            u.reduce_rows(cell, out);
        }
        Ok(())
    }

    /// Expand the irrep axis of `src` into the trailing natural axes of
    /// `dst`, cell by cell over the leading axes. Operand layout is the
    /// mirror of [`YoungTableauIndex::compress`].
    pub fn uncompress<T, SD, SS>(
        &self,
        dst: &mut Tensor<T, SD>,
        src: &Tensor<T, SS>,
    ) -> Result<(), TensorError>
    where
        T: Scalar,
        SD: TensorStorage<T>,
        SS: TensorStorage<T>,
    {
        let cells = self.check_operands(src, dst)?;
        let v = self.tableau.uncompress_matrix();
        let irrep = self.tableau.irrep_dim();
        let natural = self.size();
        debug!("uncompress {cells} cells: {irrep} irrep -> {natural} natural components");
        dst.data_mut().fill(T::zero());
        if irrep == 0 || natural == 0 {
            return Ok(());
        }
        for (out, cell) in dst
            .data_mut()
            .chunks_mut(natural)
            .zip(src.data().chunks(irrep))
        {
            v.scatter_add(cell, out);
        }
        Ok(())
    }

    /// Validate an (irrep tensor, natural tensor) pair and return the number
    /// of leading cells.
    fn check_operands<T, SI, SN>(
        &self,
        irrep: &Tensor<T, SI>,
        natural: &Tensor<T, SN>,
    ) -> Result<usize, TensorError>
    where
        T: Scalar,
        SI: TensorStorage<T>,
        SN: TensorStorage<T>,
    {
        let irrep_axes = irrep.axes();
        match irrep_axes.last().and_then(|axis| axis.as_index()) {
            Some(super::IndexKind::YoungTableau(index)) if index == self => {}
            _ => {
                return Err(TensorError::AxisMismatch {
                    message: "irrep operand must end with this young tableau index".into(),
                });
            }
        }
        let split = natural.trailing_natural_layout(&self.axes).ok_or_else(|| {
            TensorError::AxisMismatch {
                message: format!(
                    "natural operand must end with natural-layout axes {:?}",
                    self.axes.iter().map(NaturalIndex::name).collect::<Vec<_>>()
                ),
            }
        })?;
        let lead_irrep = &irrep_axes[..irrep_axes.len() - 1];
        let lead_natural = &natural.axes()[..split];
        if lead_irrep != lead_natural {
            return Err(TensorError::AxisMismatch {
                message: format!(
                    "leading axes differ: {:?} vs {:?}",
                    lead_irrep.iter().map(Axis::name).collect::<Vec<_>>(),
                    lead_natural.iter().map(Axis::name).collect::<Vec<_>>()
                ),
            });
        }
        Ok(irrep.mem_shape()[..lead_irrep.len()].iter().product())
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            cardinality: self.cardinality,
            strides: self.strides.clone(),
            tableau: Arc::clone(&self.tableau),
        }
    }
}

impl TensorIndex for YoungTableauIndex {
    fn structure_name(&self) -> &'static str {
        "young tableau"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        self.tableau.irrep_dim()
    }

    /// One access id per natural tuple.
    fn access_size(&self) -> usize {
        self.size()
    }

    fn is_explicitly_stored(&self) -> bool {
        false
    }

    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        panic!(
            "young tableau component {:?} is a linear combination, not one mem id",
            natural_ids
        )
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        natural_ids
            .iter()
            .zip(self.strides.iter())
            .map(|(&id, &stride)| id * stride)
            .sum()
    }

    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        panic!(
            "young tableau access id {access_id} is a linear combination, not one mem id"
        )
    }

    /// First natural tuple, in row-major order, contributing to the irrep
    /// component. All zeros when the compress row is empty.
    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        let mut ids = NaturalIds::from_elem(0, self.axes.len());
        if let Some((_, access_id)) = self
            .mem_id_to_access_lin_comb(mem_id)
            .min_by_key(|&(_, access_id)| access_id)
        {
            let shape = vec![self.cardinality; self.axes.len()];
            linear_to_cartesian_into(access_id, &shape, &mut ids);
        }
        ids
    }

    fn dispatch(&self, access_id: usize) -> super::Dispatch {
        panic!(
            "young tableau access id {access_id} needs IndexKind::resolve, not dispatch"
        )
    }
}
