//! Tensor built from spectator axes and structural indices.
//!
//! ```text
//! Tensor<T, S: TensorStorage<T>>
//! ├── axes: [Axis]            - Spectator(name, extent) or Index(IndexKind)
//! ├── accessor                - coordinate spaces of the index axes
//! └── storage: S              - flat row-major buffer of mem components
//! ```
//!
//! The buffer holds one value per mem coordinate: its shape is the extent of
//! every spectator axis and the `mem_size` of every index axis, in axis
//! order. Reading a natural component folds the index axes left to right:
//! each explicitly stored index either short-circuits to a constant or adds
//! its mem offset and sign; a trailing linear-combination index sums over
//! its weighted mem ids.

use std::marker::PhantomData;

use crate::accessor::{AccessIds, TensorAccessor};
use crate::domain::{Domain, DomainAxis};
use crate::error::TensorError;
use crate::index::{
    AntisymmetricIndex, DiagonalIndex, Dispatch, FullIndex, IdentityIndex, IndexKind,
    LorentzianSignIndex, Resolution, SymmetricIndex, TensorIndex, YoungTableauIndex,
};
use crate::natural::NaturalIndex;
use crate::scalar::Scalar;
use crate::storage::{Dense, OwnedStorage, TensorStorage};
use crate::strides::{cartesian_to_linear, compute_strides, linear_to_cartesian_into};

/// One axis of a tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    /// Pass-through axis, e.g. a grid coordinate.
    Spectator(DomainAxis),
    /// Structural index covering one or more natural axes.
    Index(IndexKind),
}

impl Axis {
    /// Spectator axis with a name and an extent.
    pub fn spectator(name: impl Into<String>, extent: usize) -> Self {
        Axis::Spectator(DomainAxis::new(name, extent))
    }

    #[inline]
    pub fn as_index(&self) -> Option<&IndexKind> {
        match self {
            Axis::Index(index) => Some(index),
            Axis::Spectator(_) => None,
        }
    }

    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Axis::Index(_))
    }

    /// Extent in the buffer.
    pub fn mem_extent(&self) -> usize {
        match self {
            Axis::Spectator(axis) => axis.extent(),
            Axis::Index(index) => index.mem_size(),
        }
    }

    /// Extent at the dispatch boundary.
    pub fn access_extent(&self) -> usize {
        match self {
            Axis::Spectator(axis) => axis.extent(),
            Axis::Index(index) => index.access_size(),
        }
    }

    /// Number of natural coordinates the axis consumes.
    pub fn natural_rank(&self) -> usize {
        match self {
            Axis::Spectator(_) => 1,
            Axis::Index(index) => index.rank(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Axis::Spectator(axis) => axis.name().to_string(),
            Axis::Index(index) => index.name(),
        }
    }

    fn natural_axes(&self) -> Vec<DomainAxis> {
        match self {
            Axis::Spectator(axis) => vec![axis.clone()],
            Axis::Index(index) => index
                .natural_indices()
                .iter()
                .map(|n| DomainAxis::new(n.name(), n.cardinality()))
                .collect(),
        }
    }
}

macro_rules! impl_from_axis {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Axis {
                fn from(index: $ty) -> Self {
                    Axis::Index(index.into())
                }
            }
        )*
    };
}

impl_from_axis!(
    NaturalIndex,
    FullIndex,
    SymmetricIndex,
    AntisymmetricIndex,
    DiagonalIndex,
    IdentityIndex,
    LorentzianSignIndex,
    YoungTableauIndex,
);

impl From<IndexKind> for Axis {
    fn from(index: IndexKind) -> Self {
        Axis::Index(index)
    }
}

impl From<DomainAxis> for Axis {
    fn from(axis: DomainAxis) -> Self {
        Axis::Spectator(axis)
    }
}

/// Derived layout of an axis list.
#[derive(Debug, Clone, PartialEq)]
struct Layout {
    accessor: TensorAccessor,
    index_positions: Vec<usize>,
    mem_shape: Vec<usize>,
    strides: Vec<usize>,
    natural_rank: usize,
}

impl Layout {
    fn new(axes: &[Axis]) -> Result<Self, TensorError> {
        let indices: Vec<IndexKind> = axes.iter().filter_map(Axis::as_index).cloned().collect();
        let index_positions = axes
            .iter()
            .enumerate()
            .filter(|(_, axis)| axis.is_index())
            .map(|(position, _)| position)
            .collect();
        let mem_shape: Vec<usize> = axes.iter().map(Axis::mem_extent).collect();
        Ok(Self {
            accessor: TensorAccessor::new(indices)?,
            index_positions,
            strides: compute_strides(&mem_shape),
            natural_rank: axes.iter().map(Axis::natural_rank).sum(),
            mem_shape,
        })
    }

    fn len(&self) -> usize {
        self.mem_shape.iter().product()
    }
}

/// A tensor over spectator axes and structural indices.
///
/// # Example
///
/// ```
/// use symtensors::index::AntisymmetricIndex;
/// use symtensors::natural::NaturalIndex;
/// use symtensors::tensor::{Axis, Tensor};
///
/// let i = NaturalIndex::new("i", ["X", "Y", "Z"]);
/// let anti = AntisymmetricIndex::new(vec![i.clone(), i.renamed("j")]).unwrap();
/// let mut t = Tensor::<f64>::zeros(vec![Axis::spectator("cell", 2), anti.into()]).unwrap();
/// assert_eq!(t.len(), 2 * 3);
///
/// t.set(&[1, 0, 2], 5.0).unwrap();
/// assert_eq!(t.get(&[1, 0, 2]), 5.0);
/// assert_eq!(t.get(&[1, 2, 0]), -5.0);
/// assert_eq!(t.get(&[1, 1, 1]), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<ElT: Scalar, StoreT: TensorStorage<ElT> = Dense<ElT>> {
    axes: Vec<Axis>,
    layout: Layout,
    storage: StoreT,
    _phantom: PhantomData<ElT>,
}

/// Type alias for tensors owning a dense buffer.
pub type DenseTensor<ElT> = Tensor<ElT, Dense<ElT>>;

#[inline]
fn signed<T: Scalar>(value: T, negate: bool) -> T {
    if negate { -value } else { value }
}

impl<ElT: Scalar, StoreT: OwnedStorage<ElT>> Tensor<ElT, StoreT> {
    /// Allocate a zero-filled tensor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a linear-combination index is not
    /// the last index axis or appears more than once.
    pub fn zeros(axes: Vec<Axis>) -> Result<Self, TensorError> {
        let layout = Layout::new(&axes)?;
        Ok(Self {
            storage: StoreT::zeros(layout.len()),
            axes,
            layout,
            _phantom: PhantomData,
        })
    }

    /// Wrap a buffer of mem components.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the length differs from the
    /// product of mem extents.
    pub fn from_vec(data: Vec<ElT>, axes: Vec<Axis>) -> Result<Self, TensorError> {
        Self::from_storage(StoreT::from_vec(data), axes)
    }

    /// Project a row-major array over [`Tensor::natural_domain`] into
    /// compact storage. See [`Tensor::fill_from_natural_dense`].
    pub fn from_natural_dense(dense: &[ElT], axes: Vec<Axis>) -> Result<Self, TensorError> {
        let mut tensor = Self::zeros(axes)?;
        tensor.fill_from_natural_dense(dense)?;
        Ok(tensor)
    }
}

impl<ElT: Scalar, StoreT: TensorStorage<ElT>> Tensor<ElT, StoreT> {
    /// Wrap existing storage, owned or borrowed.
    pub fn from_storage(storage: StoreT, axes: Vec<Axis>) -> Result<Self, TensorError> {
        let layout = Layout::new(&axes)?;
        if storage.len() != layout.len() {
            return Err(TensorError::ShapeMismatch {
                expected: layout.len(),
                actual: storage.len(),
            });
        }
        Ok(Self {
            axes,
            layout,
            storage,
            _phantom: PhantomData,
        })
    }

    #[inline]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Index axes, in order.
    pub fn indices(&self) -> &[IndexKind] {
        self.layout.accessor.indices()
    }

    #[inline]
    pub fn accessor(&self) -> &TensorAccessor {
        &self.layout.accessor
    }

    /// Buffer extent of every axis.
    #[inline]
    pub fn mem_shape(&self) -> &[usize] {
        &self.layout.mem_shape
    }

    /// Row-major strides of the buffer.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.layout.strides
    }

    /// Number of natural coordinates accepted by [`Tensor::get`].
    #[inline]
    pub fn natural_rank(&self) -> usize {
        self.layout.natural_rank
    }

    /// Get total number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get underlying data as slice.
    #[inline]
    pub fn data(&self) -> &[ElT] {
        self.storage.as_slice()
    }

    /// Get underlying data as mutable slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [ElT] {
        self.storage.as_mut_slice()
    }

    pub fn into_storage(self) -> StoreT {
        self.storage
    }

    /// Fill all stored elements with a value.
    pub fn fill(&mut self, value: ElT) {
        self.storage.as_mut_slice().fill(value);
    }

    /// Buffer layout: every axis with its mem extent.
    pub fn domain(&self) -> Domain {
        self.axes
            .iter()
            .map(|axis| DomainAxis::new(axis.name(), axis.mem_extent()))
            .collect()
    }

    /// Spectator axes only.
    pub fn non_indices_domain(&self) -> Domain {
        self.axes
            .iter()
            .filter_map(|axis| match axis {
                Axis::Spectator(a) => Some(a.clone()),
                Axis::Index(_) => None,
            })
            .collect()
    }

    /// Natural axes of the index axes only.
    pub fn indices_domain(&self) -> Domain {
        self.layout.accessor.natural_domain()
    }

    /// Coordinates accepted by [`Tensor::get`]: spectator axes and every
    /// natural axis, in axis order.
    pub fn natural_domain(&self) -> Domain {
        self.axes.iter().flat_map(Axis::natural_axes).collect()
    }

    /// Mem extents of the index axes.
    pub fn mem_domain(&self) -> Domain {
        self.layout.accessor.mem_domain()
    }

    /// Access extents of the index axes.
    pub fn access_domain(&self) -> Domain {
        self.layout.accessor.access_domain()
    }

    /// Component at natural coordinates.
    ///
    /// Structurally zero components read as exactly zero; sign-related
    /// components are negated; a linear-combination index sums its weighted
    /// mem values.
    ///
    /// # Panics
    ///
    /// Panics if the number of coordinates is wrong or a coordinate is out
    /// of range. Use [`Tensor::get_checked`] for untrusted input.
    pub fn get(&self, natural: &[usize]) -> ElT {
        assert_eq!(
            natural.len(),
            self.natural_rank(),
            "expected {} natural coordinates, got {}",
            self.natural_rank(),
            natural.len()
        );
        let mut offset = 0;
        let mut access = AccessIds::new();
        let mut pos = 0;
        for (axis, &stride) in self.axes.iter().zip(&self.layout.strides) {
            match axis {
                Axis::Spectator(a) => {
                    let id = natural[pos];
                    assert!(
                        id < a.extent(),
                        "coordinate {} out of range for spectator axis {} of extent {}",
                        id,
                        a.name(),
                        a.extent()
                    );
                    offset += id * stride;
                    pos += 1;
                }
                Axis::Index(index) => {
                    let ids = &natural[pos..pos + index.rank()];
                    for (n, &id) in index.natural_indices().iter().zip(ids) {
                        assert!(
                            id < n.cardinality(),
                            "id {} out of range for natural index {}",
                            id,
                            n
                        );
                    }
                    access.push(index.access_id(ids));
                    pos += index.rank();
                }
            }
        }
        self.resolve(offset, &access)
    }

    /// Component at natural coordinates, with range checks.
    pub fn get_checked(&self, natural: &[usize]) -> Result<ElT, TensorError> {
        self.check_natural(natural)?;
        Ok(self.get(natural))
    }

    /// Component at access coordinates: a spectator coordinate or an access
    /// id per axis.
    ///
    /// # Panics
    ///
    /// Panics if the number of coordinates is wrong or a spectator
    /// coordinate is out of range.
    pub fn get_access(&self, access: &[usize]) -> ElT {
        assert_eq!(
            access.len(),
            self.axes.len(),
            "expected {} access coordinates, got {}",
            self.axes.len(),
            access.len()
        );
        let mut offset = 0;
        let mut index_access = AccessIds::new();
        for ((axis, &stride), &id) in self.axes.iter().zip(&self.layout.strides).zip(access) {
            match axis {
                Axis::Spectator(a) => {
                    assert!(id < a.extent(), "coordinate {} out of range for {}", id, a.name());
                    offset += id * stride;
                }
                Axis::Index(_) => index_access.push(id),
            }
        }
        self.resolve(offset, &index_access)
    }

    /// Fold the index axes over their access ids, starting from the
    /// spectator offset.
    fn resolve(&self, mut offset: usize, access: &[usize]) -> ElT {
        let data = self.storage.as_slice();
        let mut negate = false;
        for ((index, &position), &access_id) in self
            .indices()
            .iter()
            .zip(&self.layout.index_positions)
            .zip(access)
        {
            let stride = self.layout.strides[position];
            match index.resolve(access_id) {
                Resolution::Dispatch(Dispatch::Constant(c)) => {
                    return signed(Dispatch::constant_value(c), negate);
                }
                Resolution::Dispatch(Dispatch::Stored {
                    mem_id,
                    negate: flip,
                }) => {
                    offset += mem_id * stride;
                    negate ^= flip;
                }
                Resolution::LinComb(terms) => {
                    let mut sum = ElT::zero();
                    for (coef, mem_id) in terms {
                        sum += ElT::from_real(coef) * data[offset + mem_id * stride];
                    }
                    return signed(sum, negate);
                }
            }
        }
        signed(data[offset], negate)
    }

    /// Buffer position of access coordinates, converting access ids to mem
    /// ids without sign or zero handling.
    fn trusted_offset(&self, access: &[usize]) -> usize {
        assert_eq!(
            access.len(),
            self.axes.len(),
            "expected {} access coordinates, got {}",
            self.axes.len(),
            access.len()
        );
        self.axes
            .iter()
            .zip(&self.layout.strides)
            .zip(access)
            .map(|((axis, &stride), &id)| match axis {
                Axis::Spectator(_) => id * stride,
                Axis::Index(index) => index.access_id_to_mem_id(id) * stride,
            })
            .sum()
    }

    /// Stored value behind access coordinates, for callers that already
    /// resolved signs and zeros.
    ///
    /// # Panics
    ///
    /// Panics if an access id addresses no stored value, or the index is a
    /// linear combination.
    pub fn at(&self, access: &[usize]) -> &ElT {
        let offset = self.trusted_offset(access);
        &self.storage.as_slice()[offset]
    }

    /// Mutable counterpart of [`Tensor::at`].
    pub fn at_mut(&mut self, access: &[usize]) -> &mut ElT {
        let offset = self.trusted_offset(access);
        &mut self.storage.as_mut_slice()[offset]
    }

    /// Stored value at mem coordinates, one per axis.
    ///
    /// # Panics
    ///
    /// Panics if the number of coordinates is wrong or a coordinate is out
    /// of range.
    pub fn mem(&self, mem_coords: &[usize]) -> &ElT {
        let offset = self.mem_offset(mem_coords);
        &self.storage.as_slice()[offset]
    }

    /// Mutable counterpart of [`Tensor::mem`].
    pub fn mem_mut(&mut self, mem_coords: &[usize]) -> &mut ElT {
        let offset = self.mem_offset(mem_coords);
        &mut self.storage.as_mut_slice()[offset]
    }

    fn mem_offset(&self, mem_coords: &[usize]) -> usize {
        assert_eq!(
            mem_coords.len(),
            self.axes.len(),
            "expected {} mem coordinates, got {}",
            self.axes.len(),
            mem_coords.len()
        );
        for (&id, &extent) in mem_coords.iter().zip(&self.layout.mem_shape) {
            assert!(id < extent, "mem coordinate {} out of range for extent {}", id, extent);
        }
        cartesian_to_linear(mem_coords, &self.layout.strides)
    }

    /// Store `value` at natural coordinates; sign-related components store
    /// the negated value so that [`Tensor::get`] returns `value`.
    ///
    /// # Errors
    ///
    /// - out-of-range or missing coordinates
    /// - `TensorError::StructuralComponent` for a component fixed by the
    ///   structure (e.g. an antisymmetric diagonal)
    /// - `TensorError::LinearCombinationComponent` for a tensor with a
    ///   Young-tableau index
    pub fn set(&mut self, natural: &[usize], value: ElT) -> Result<(), TensorError> {
        self.check_natural(natural)?;
        let mut offset = 0;
        let mut negate = false;
        let mut pos = 0;
        for (axis, &stride) in self.axes.iter().zip(&self.layout.strides) {
            match axis {
                Axis::Spectator(_) => {
                    offset += natural[pos] * stride;
                    pos += 1;
                }
                Axis::Index(index) => {
                    if !index.is_explicitly_stored() {
                        return Err(TensorError::LinearCombinationComponent);
                    }
                    let ids = &natural[pos..pos + index.rank()];
                    match index.dispatch(index.access_id(ids)) {
                        Dispatch::Constant(_) => return Err(TensorError::StructuralComponent),
                        Dispatch::Stored {
                            mem_id,
                            negate: flip,
                        } => {
                            offset += mem_id * stride;
                            negate ^= flip;
                        }
                    }
                    pos += index.rank();
                }
            }
        }
        self.storage.as_mut_slice()[offset] = signed(value, negate);
        Ok(())
    }

    fn check_natural(&self, natural: &[usize]) -> Result<(), TensorError> {
        if natural.len() != self.natural_rank() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.natural_rank(),
                actual: natural.len(),
            });
        }
        let mut pos = 0;
        for axis in &self.axes {
            match axis {
                Axis::Spectator(a) => {
                    if natural[pos] >= a.extent() {
                        return Err(TensorError::IndexOutOfBounds {
                            index: natural[pos],
                            dim_size: a.extent(),
                        });
                    }
                }
                Axis::Index(index) => {
                    index.check_natural_ids(&natural[pos..pos + index.rank()])?;
                }
            }
            pos += axis.natural_rank();
        }
        Ok(())
    }

    /// Canonical natural coordinates of the stored value at a buffer
    /// position: spectator coordinates pass through, every index
    /// contributes the canonical tuple of its mem id.
    ///
    /// # Panics
    ///
    /// Panics if `linear >= len()`.
    pub fn canonical_natural_coords(&self, linear: usize) -> Vec<usize> {
        assert!(linear < self.len(), "buffer position {} out of range", linear);
        let mut mem = vec![0; self.axes.len()];
        linear_to_cartesian_into(linear, &self.layout.mem_shape, &mut mem);
        let mut natural = Vec::with_capacity(self.natural_rank());
        for (axis, &id) in self.axes.iter().zip(&mem) {
            match axis {
                Axis::Spectator(_) => natural.push(id),
                Axis::Index(index) => {
                    natural.extend_from_slice(&index.mem_id_to_canonical_natural_ids(id))
                }
            }
        }
        natural
    }

    /// Every natural component, row-major over [`Tensor::natural_domain`].
    pub fn to_natural_dense(&self) -> Vec<ElT> {
        self.natural_domain()
            .iter()
            .map(|coords| self.get(&coords))
            .collect()
    }

    /// Overwrite the buffer from a row-major array over
    /// [`Tensor::natural_domain`], reading the canonical representative of
    /// every stored value. Components outside the structure are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` for a wrong array length and
    /// `TensorError::LinearCombinationComponent` when a Young-tableau index
    /// is present (use its `compress` instead).
    pub fn fill_from_natural_dense(&mut self, dense: &[ElT]) -> Result<(), TensorError> {
        if self.indices().iter().any(|index| !index.is_explicitly_stored()) {
            return Err(TensorError::LinearCombinationComponent);
        }
        let natural_shape = self.natural_domain().extents();
        let expected: usize = natural_shape.iter().product();
        if dense.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: dense.len(),
            });
        }
        let natural_strides = compute_strides(&natural_shape);
        for linear in 0..self.len() {
            let coords = self.canonical_natural_coords(linear);
            self.storage.as_mut_slice()[linear] =
                dense[cartesian_to_linear(&coords, &natural_strides)];
        }
        Ok(())
    }

    /// Rename the natural axis `from` to `to` in place. The buffer is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexNotFound` if no index axis has a natural
    /// axis named `from`, or a cardinality mismatch.
    pub fn relabel(&mut self, from: &str, to: &NaturalIndex) -> Result<(), TensorError> {
        let mut found = false;
        let mut axes = self.axes.clone();
        for axis in &mut axes {
            if let Axis::Index(index) = axis {
                if index.contains_axis(from) {
                    *index = index.relabel(from, to)?;
                    found = true;
                }
            }
        }
        if !found {
            return Err(TensorError::IndexNotFound {
                name: from.to_string(),
            });
        }
        self.layout = Layout::new(&axes)?;
        self.axes = axes;
        Ok(())
    }

    /// Natural extents if the buffer is laid out exactly like the natural
    /// domain (only spectator, `Natural` and `Full` axes).
    pub fn natural_layout_shape(&self) -> Option<Vec<usize>> {
        self.axes
            .iter()
            .all(|axis| axis.as_index().is_none_or(IndexKind::is_natural_layout))
            .then(|| self.natural_domain().extents())
    }

    /// Number of leading axes in front of a trailing block of natural-layout
    /// indices that covers exactly `natural`, in order.
    pub(crate) fn trailing_natural_layout(&self, natural: &[NaturalIndex]) -> Option<usize> {
        let mut remaining = natural.len();
        let mut split = self.axes.len();
        while remaining > 0 {
            split = split.checked_sub(1)?;
            let index = self.axes[split]
                .as_index()
                .filter(|index| index.is_natural_layout())?;
            let rank = index.rank();
            if rank > remaining {
                return None;
            }
            let expected = &natural[remaining - rank..remaining];
            let matches = index
                .natural_indices()
                .iter()
                .zip(expected)
                .all(|(a, b)| a.same_axis(b) && a.cardinality() == b.cardinality());
            if !matches {
                return None;
            }
            remaining -= rank;
        }
        Some(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DenseView;

    fn xyz(name: &str) -> NaturalIndex {
        NaturalIndex::new(name, ["X", "Y", "Z"])
    }

    #[test]
    fn test_zeros_layout() {
        let sym = SymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let t = Tensor::<f64>::zeros(vec![Axis::spectator("cell", 4), sym.into()]).unwrap();
        assert_eq!(t.mem_shape(), &[4, 6]);
        assert_eq!(t.strides(), &[6, 1]);
        assert_eq!(t.len(), 24);
        assert_eq!(t.natural_rank(), 3);
        assert_eq!(t.natural_domain().extents(), vec![4, 3, 3]);
        assert_eq!(t.non_indices_domain().names(), vec!["cell"]);
        assert_eq!(t.indices_domain().names(), vec!["a", "b"]);
        assert_eq!(t.mem_domain().extents(), vec![6]);
        assert_eq!(t.access_domain().extents(), vec![6]);
        assert_eq!(t.domain().extents(), vec![4, 6]);
    }

    #[test]
    fn test_from_vec_length() {
        assert!(matches!(
            Tensor::<f64>::from_vec(vec![0.0; 4], vec![xyz("x").into()]),
            Err(TensorError::ShapeMismatch { expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_symmetric_get_set() {
        let sym = SymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let mut t = Tensor::<f64>::zeros(vec![sym.into()]).unwrap();
        t.set(&[2, 0], 4.0).unwrap();
        assert_eq!(t.get(&[0, 2]), 4.0);
        assert_eq!(t.get(&[2, 0]), 4.0);
        assert_eq!(t.get(&[1, 1]), 0.0);
    }

    #[test]
    fn test_antisymmetric_sign() {
        let anti = AntisymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let mut t = Tensor::<f64>::zeros(vec![anti.into()]).unwrap();
        t.set(&[2, 1], 3.0).unwrap();
        assert_eq!(t.get(&[2, 1]), 3.0);
        assert_eq!(t.get(&[1, 2]), -3.0);
        assert_eq!(*t.mem(&[2]), -3.0);
        assert!(matches!(
            t.set(&[1, 1], 1.0),
            Err(TensorError::StructuralComponent)
        ));
    }

    #[test]
    fn test_composite_sign_and_constant() {
        let anti_a = AntisymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let anti_c = AntisymmetricIndex::new(vec![xyz("c"), xyz("d")]).unwrap();
        let mut t = Tensor::<f64>::zeros(vec![anti_a.into(), anti_c.into()]).unwrap();
        t.set(&[0, 1, 0, 2], 2.0).unwrap();
        assert_eq!(t.get(&[1, 0, 0, 2]), -2.0);
        assert_eq!(t.get(&[1, 0, 2, 0]), 2.0);
        assert_eq!(t.get(&[1, 1, 2, 0]), 0.0);
    }

    #[test]
    fn test_identity_and_lorentzian() {
        let delta = IdentityIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let t = Tensor::<f64>::zeros(vec![Axis::spectator("cell", 2), delta.into()]).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.get(&[1, 2, 2]), 1.0);
        assert_eq!(t.get(&[1, 2, 0]), 0.0);

        let mu = NaturalIndex::new("mu", ["T", "X", "Y", "Z"]);
        let eta = LorentzianSignIndex::new(1, vec![mu.clone(), mu.renamed("nu")]).unwrap();
        let t = Tensor::<f64>::zeros(vec![eta.into()]).unwrap();
        assert_eq!(t.get(&[0, 0]), -1.0);
        assert_eq!(t.get(&[3, 3]), 1.0);
        assert_eq!(t.get(&[0, 3]), 0.0);
    }

    #[test]
    fn test_get_checked() {
        let t = Tensor::<f64>::zeros(vec![xyz("x").into()]).unwrap();
        assert!(t.get_checked(&[2]).is_ok());
        assert!(matches!(
            t.get_checked(&[3]),
            Err(TensorError::IndexOutOfBounds { index: 3, dim_size: 3 })
        ));
        assert!(matches!(
            t.get_checked(&[0, 0]),
            Err(TensorError::WrongNumberOfIndices { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        let t = Tensor::<f64>::zeros(vec![xyz("x").into()]).unwrap();
        t.get(&[3]);
    }

    #[test]
    fn test_access_paths() {
        let diag = DiagonalIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let mut t = Tensor::<f64>::from_vec(vec![1.0, 2.0, 3.0], vec![diag.into()]).unwrap();
        assert_eq!(t.get_access(&[0]), 0.0);
        assert_eq!(t.get_access(&[2]), 2.0);
        assert_eq!(*t.at(&[3]), 3.0);
        *t.at_mut(&[1]) = 7.0;
        assert_eq!(t.get(&[0, 0]), 7.0);
    }

    #[test]
    fn test_natural_dense_roundtrip() {
        let anti = AntisymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let axes = vec![Axis::spectator("cell", 2), anti.into()];
        let mut t = Tensor::<f64>::zeros(axes.clone()).unwrap();
        t.data_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let dense = t.to_natural_dense();
        assert_eq!(dense.len(), 18);
        // cell 0, (a, b) = (1, 0) is minus mem (0, 1)
        assert_eq!(dense[3], -1.0);
        let back = Tensor::<f64>::from_natural_dense(&dense, axes).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_relabel_keeps_buffer() {
        let full = FullIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let mut t = Tensor::<f64>::from_vec((0..9).map(f64::from).collect(), vec![full.into()])
            .unwrap();
        t.relabel("b", &xyz("c")).unwrap();
        assert_eq!(t.indices_domain().names(), vec!["a", "c"]);
        assert_eq!(t.get(&[2, 1]), 7.0);
        assert!(matches!(
            t.relabel("b", &xyz("d")),
            Err(TensorError::IndexNotFound { .. })
        ));
    }

    #[test]
    fn test_borrowed_storage() {
        let mut buf = vec![0.0; 6];
        {
            let sym = SymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
            let mut t =
                Tensor::<f64, _>::from_storage(DenseView::new(&mut buf), vec![sym.into()]).unwrap();
            t.set(&[1, 0], 9.0).unwrap();
        }
        assert_eq!(buf[1], 9.0);
    }

    #[test]
    fn test_natural_layout_shape() {
        let full = FullIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let t = Tensor::<f64>::zeros(vec![Axis::spectator("s", 2), full.into()]).unwrap();
        assert_eq!(t.natural_layout_shape(), Some(vec![2, 3, 3]));
        assert_eq!(t.trailing_natural_layout(&[xyz("a"), xyz("b")]), Some(1));
        assert_eq!(t.trailing_natural_layout(&[xyz("b")]), None);

        let sym = SymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap();
        let t = Tensor::<f64>::zeros(vec![sym.into()]).unwrap();
        assert_eq!(t.natural_layout_shape(), None);
    }
}
