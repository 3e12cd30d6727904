//! Totally antisymmetric index.

use super::combinatorics::{
    has_repeat, sort_with_parity, subset_count, subset_rank, subset_unrank,
};
use super::{Dispatch, NaturalIds, TensorIndex, to_ids, uniform_cardinality};
use crate::error::TensorError;
use crate::natural::NaturalIndex;

/// Index antisymmetric under exchange of any two natural axes.
///
/// Only the `C(d, N)` strictly increasing tuples are stored. The access
/// space encodes the sign of the permutation:
///
/// ```text
/// access id 0                                  repeated id, component is 0
/// access id 1 ..= mem_size                     even permutation of mem id - 1
/// access id access_size .. access_size+mem_size  odd permutation, negated
/// ```
///
/// # Example
///
/// ```
/// use symtensors::index::{AntisymmetricIndex, Dispatch, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let i = NaturalIndex::new("i", ["X", "Y", "Z"]);
/// let anti = AntisymmetricIndex::new(vec![i.clone(), i.renamed("j")]).unwrap();
///
/// assert_eq!(anti.mem_size(), 3);
/// assert_eq!(anti.dispatch(anti.access_id(&[1, 1])), Dispatch::ZERO);
/// assert_eq!(
///     anti.dispatch(anti.access_id(&[2, 0])),
///     Dispatch::Stored { mem_id: 1, negate: true }
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AntisymmetricIndex {
    axes: Vec<NaturalIndex>,
    cardinality: usize,
}

impl AntisymmetricIndex {
    /// Build an antisymmetric index; all axes must share one cardinality.
    pub fn new(axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        let cardinality = uniform_cardinality("antisymmetric", &axes)?;
        Ok(Self { axes, cardinality })
    }

    /// Shared cardinality of the axes.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Sort a tuple and return its mem id and permutation parity, or `None`
    /// when an id repeats.
    #[inline]
    fn sorted_rank(&self, natural_ids: &[usize]) -> Option<(usize, bool)> {
        let mut sorted = to_ids(natural_ids);
        let odd = sort_with_parity(&mut sorted);
        if has_repeat(&sorted) {
            return None;
        }
        Some((subset_rank(&sorted, self.cardinality), odd))
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            cardinality: self.cardinality,
        }
    }
}

impl TensorIndex for AntisymmetricIndex {
    fn structure_name(&self) -> &'static str {
        "antisymmetric"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        subset_count(self.cardinality, self.axes.len())
    }

    /// Zero sentinel plus the positive range. The negated range lies beyond.
    fn access_size(&self) -> usize {
        1 + self.mem_size()
    }

    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        match self.sorted_rank(natural_ids) {
            Some((mem_id, _)) => mem_id,
            None => panic!(
                "antisymmetric tuple {:?} has a repeated id and no stored value",
                natural_ids
            ),
        }
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        match self.sorted_rank(natural_ids) {
            None => 0,
            Some((mem_id, false)) => 1 + mem_id,
            Some((mem_id, true)) => self.access_size() + mem_id,
        }
    }

    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        assert!(
            access_id != 0,
            "access id 0 of an antisymmetric index has no stored value"
        );
        let access_size = self.access_size();
        if access_id < access_size {
            access_id - 1
        } else {
            access_id - access_size
        }
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        let mut ids = NaturalIds::from_elem(0, self.axes.len());
        subset_unrank(mem_id, self.cardinality, &mut ids);
        ids
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        let access_size = self.access_size();
        if access_id == 0 {
            Dispatch::ZERO
        } else if access_id < access_size {
            Dispatch::stored(access_id - 1)
        } else {
            Dispatch::Stored {
                mem_id: access_id - access_size,
                negate: true,
            }
        }
    }
}
