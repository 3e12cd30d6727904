//! Index without symmetry.

use smallvec::SmallVec;

use super::{Dispatch, INLINE_RANK, NaturalIds, TensorIndex};
use crate::error::TensorError;
use crate::natural::NaturalIndex;
use crate::strides::{cartesian_to_linear, compute_strides};

/// Index over several natural axes with no symmetry.
///
/// Every natural tuple is stored; the mem id is the row-major linear
/// position with strides given by the cardinalities of the axes to the right.
///
/// # Example
///
/// ```
/// use symtensors::index::{FullIndex, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let i = NaturalIndex::new("i", ["X", "Y", "Z"]);
/// let j = NaturalIndex::new("j", ["A", "B"]);
/// let full = FullIndex::new(vec![i, j]).unwrap();
///
/// assert_eq!(full.mem_size(), 6);
/// assert_eq!(full.mem_id(&[2, 1]), 5);
/// assert_eq!(full.mem_id_to_canonical_natural_ids(3).as_slice(), &[1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FullIndex {
    axes: Vec<NaturalIndex>,
    shape: SmallVec<[usize; INLINE_RANK]>,
    strides: SmallVec<[usize; INLINE_RANK]>,
}

impl FullIndex {
    /// Build a full index over the given axes.
    pub fn new(axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        if axes.is_empty() {
            return Err(TensorError::EmptyIndex { structure: "full" });
        }
        let shape: SmallVec<[usize; INLINE_RANK]> =
            axes.iter().map(NaturalIndex::cardinality).collect();
        let strides = SmallVec::from_vec(compute_strides(&shape));
        Ok(Self {
            axes,
            shape,
            strides,
        })
    }

    /// Cardinality of each axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Row-major strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }
}

impl TensorIndex for FullIndex {
    fn structure_name(&self) -> &'static str {
        "full"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        self.shape.iter().product()
    }

    fn access_size(&self) -> usize {
        self.mem_size()
    }

    #[inline]
    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        cartesian_to_linear(natural_ids, &self.strides)
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        self.mem_id(natural_ids)
    }

    #[inline]
    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        access_id
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        self.strides
            .iter()
            .zip(self.shape.iter())
            .map(|(&stride, &dim)| (mem_id / stride) % dim)
            .collect()
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        Dispatch::stored(access_id)
    }
}
