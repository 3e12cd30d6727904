//! Coordinate spaces of an ordered tuple of indices.
//!
//! For indices `[I0, I1, ...]` a [`TensorAccessor`] exposes
//!
//! - the natural domain: one axis per natural axis of every index,
//! - the mem domain: one axis per index, sized by `mem_size`,
//! - the access domain: one axis per index, sized by `access_size`,
//!
//! and converts between them.

use smallvec::SmallVec;

use crate::domain::{Domain, DomainAxis};
use crate::error::TensorError;
use crate::index::{IndexKind, NaturalIds, TensorIndex};

/// Access ids of a tuple of indices, one per index.
pub type AccessIds = SmallVec<[usize; 4]>;

/// Check that at most one linear-combination index is present and that it
/// comes last.
pub(crate) fn validate_linear_combination<'a>(
    indices: impl ExactSizeIterator<Item = &'a IndexKind>,
) -> Result<(), TensorError> {
    let count = indices.len();
    let lin_comb: Vec<usize> = indices
        .enumerate()
        .filter(|(_, index)| !index.is_explicitly_stored())
        .map(|(position, _)| position)
        .collect();
    match lin_comb.as_slice() {
        [] => Ok(()),
        [position] if *position + 1 == count => Ok(()),
        [position] => Err(TensorError::LinearCombinationAxisNotLast {
            position: *position,
            count,
        }),
        many => Err(TensorError::MultipleLinearCombinationAxes { count: many.len() }),
    }
}

/// Natural, mem and access coordinates of an ordered tuple of indices.
///
/// # Example
///
/// ```
/// use symtensors::accessor::TensorAccessor;
/// use symtensors::index::SymmetricIndex;
/// use symtensors::natural::NaturalIndex;
///
/// let mu = NaturalIndex::new("mu", ["T", "X", "Y", "Z"]);
/// let x = NaturalIndex::new("x", ["X", "Y", "Z"]);
/// let sym = SymmetricIndex::new(vec![x.clone(), x.renamed("y")]).unwrap();
/// let accessor = TensorAccessor::new(vec![mu.into(), sym.into()]).unwrap();
///
/// assert_eq!(accessor.natural_domain().extents(), vec![4, 3, 3]);
/// assert_eq!(accessor.mem_domain().extents(), vec![4, 6]);
/// assert_eq!(
///     accessor.access_element(&["T", "Z", "X"]).unwrap().as_slice(),
///     accessor.access_element(&["T", "X", "Z"]).unwrap().as_slice()
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TensorAccessor {
    indices: Vec<IndexKind>,
}

impl TensorAccessor {
    /// Build an accessor; a linear-combination index may only appear once
    /// and last.
    pub fn new(indices: Vec<IndexKind>) -> Result<Self, TensorError> {
        validate_linear_combination(indices.iter())?;
        Ok(Self { indices })
    }

    #[inline]
    pub fn indices(&self) -> &[IndexKind] {
        &self.indices
    }

    /// Number of natural axes over all indices.
    pub fn natural_rank(&self) -> usize {
        self.indices.iter().map(TensorIndex::rank).sum()
    }

    /// One axis per natural axis, named after it and sized by its
    /// cardinality.
    pub fn natural_domain(&self) -> Domain {
        self.indices
            .iter()
            .flat_map(|index| index.natural_indices())
            .map(|axis| DomainAxis::new(axis.name(), axis.cardinality()))
            .collect()
    }

    /// One axis per index, sized by its mem size.
    pub fn mem_domain(&self) -> Domain {
        self.indices
            .iter()
            .map(|index| DomainAxis::new(index.name(), index.mem_size()))
            .collect()
    }

    /// One axis per index, sized by its access size.
    pub fn access_domain(&self) -> Domain {
        self.indices
            .iter()
            .map(|index| DomainAxis::new(index.name(), index.access_size()))
            .collect()
    }

    /// Natural ids of a tuple of labels, one per natural axis.
    pub fn natural_element(&self, labels: &[&str]) -> Result<NaturalIds, TensorError> {
        let expected = self.natural_rank();
        if labels.len() != expected {
            return Err(TensorError::WrongNumberOfIndices {
                expected,
                actual: labels.len(),
            });
        }
        self.indices
            .iter()
            .flat_map(|index| index.natural_indices())
            .zip(labels)
            .map(|(axis, label)| axis.try_position(label))
            .collect()
    }

    /// Access ids of a tuple of labels, one per index.
    pub fn access_element(&self, labels: &[&str]) -> Result<AccessIds, TensorError> {
        let natural = self.natural_element(labels)?;
        Ok(self.access_ids_unchecked(&natural))
    }

    /// Access ids of natural ids, one per index, after range checks.
    pub fn access_element_from_ids(&self, natural_ids: &[usize]) -> Result<AccessIds, TensorError> {
        let expected = self.natural_rank();
        if natural_ids.len() != expected {
            return Err(TensorError::WrongNumberOfIndices {
                expected,
                actual: natural_ids.len(),
            });
        }
        let mut offset = 0;
        for index in &self.indices {
            let rank = index.rank();
            index.check_natural_ids(&natural_ids[offset..offset + rank])?;
            offset += rank;
        }
        Ok(self.access_ids_unchecked(natural_ids))
    }

    /// Canonical natural ids stored at a mem coordinate (one mem id per
    /// index), concatenated over all indices.
    pub fn canonical_natural_element(&self, mem_coords: &[usize]) -> Result<NaturalIds, TensorError> {
        if mem_coords.len() != self.indices.len() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.indices.len(),
                actual: mem_coords.len(),
            });
        }
        let mut natural = NaturalIds::new();
        for (index, &mem_id) in self.indices.iter().zip(mem_coords) {
            if mem_id >= index.mem_size() {
                return Err(TensorError::IndexOutOfBounds {
                    index: mem_id,
                    dim_size: index.mem_size(),
                });
            }
            natural.extend_from_slice(&index.mem_id_to_canonical_natural_ids(mem_id));
        }
        Ok(natural)
    }

    pub(crate) fn access_ids_unchecked(&self, natural_ids: &[usize]) -> AccessIds {
        let mut offset = 0;
        self.indices
            .iter()
            .map(|index| {
                let rank = index.rank();
                let id = index.access_id(&natural_ids[offset..offset + rank]);
                offset += rank;
                id
            })
            .collect()
    }
}
