//! Totally symmetric index.

use super::combinatorics::{multiset_count, multiset_rank, multiset_unrank};
use super::{Dispatch, NaturalIds, TensorIndex, to_ids, uniform_cardinality};
use crate::error::TensorError;
use crate::natural::NaturalIndex;

/// Index symmetric under any permutation of its natural axes.
///
/// For rank `N` over `d` labels only the `C(d+N-1, N)` sorted tuples are
/// stored, enumerated in lexicographic order. Any permutation of a tuple maps
/// to the same mem id.
///
/// # Example
///
/// ```
/// use symtensors::index::{SymmetricIndex, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let mu = NaturalIndex::new("mu", ["X", "Y", "Z"]);
/// let nu = mu.renamed("nu");
/// let sym = SymmetricIndex::new(vec![mu, nu]).unwrap();
///
/// assert_eq!(sym.mem_size(), 6);
/// assert_eq!(sym.mem_id(&[2, 0]), sym.mem_id(&[0, 2]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricIndex {
    axes: Vec<NaturalIndex>,
    cardinality: usize,
}

impl SymmetricIndex {
    /// Build a symmetric index; all axes must share one cardinality.
    pub fn new(axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        let cardinality = uniform_cardinality("symmetric", &axes)?;
        Ok(Self { axes, cardinality })
    }

    /// Shared cardinality of the axes.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            cardinality: self.cardinality,
        }
    }
}

impl TensorIndex for SymmetricIndex {
    fn structure_name(&self) -> &'static str {
        "symmetric"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        multiset_count(self.cardinality, self.axes.len())
    }

    fn access_size(&self) -> usize {
        self.mem_size()
    }

    #[inline]
    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        let mut sorted = to_ids(natural_ids);
        sorted.sort_unstable();
        multiset_rank(&sorted, self.cardinality)
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
        let mut ids = NaturalIds::from_elem(0, self.axes.len());
        multiset_unrank(mem_id, self.cardinality, &mut ids);
        ids
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        Dispatch::stored(access_id)
    }
}
