//! Diagonal-type indices: only components with all ids equal are nonzero.
//!
//! | Index | mem_size | access ids |
//! |---|---|---|
//! | `DiagonalIndex` | d | 0 off-diagonal, `1 + id` on the diagonal |
//! | `IdentityIndex` | 0 | 0 off-diagonal, 1 on the diagonal |
//! | `LorentzianSignIndex` | 0 | 0 off-diagonal, 1 negative, 2 positive |

use super::{Dispatch, NaturalIds, TensorIndex, uniform_cardinality};
use crate::error::TensorError;
use crate::natural::NaturalIndex;

/// Shared id when all natural ids are equal.
#[inline]
fn diagonal_id(natural_ids: &[usize]) -> Option<usize> {
    let (&first, rest) = natural_ids.split_first()?;
    rest.iter().all(|&id| id == first).then_some(first)
}

/// Index storing one value per diagonal entry.
///
/// # Example
///
/// ```
/// use symtensors::index::{DiagonalIndex, Dispatch, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let i = NaturalIndex::new("i", ["X", "Y", "Z"]);
/// let diag = DiagonalIndex::new(vec![i.clone(), i.renamed("j")]).unwrap();
///
/// assert_eq!(diag.mem_size(), 3);
/// assert_eq!(diag.dispatch(diag.access_id(&[0, 1])), Dispatch::ZERO);
/// assert_eq!(diag.dispatch(diag.access_id(&[2, 2])), Dispatch::stored(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalIndex {
    axes: Vec<NaturalIndex>,
    cardinality: usize,
}

impl DiagonalIndex {
    /// Build a diagonal index; all axes must share one cardinality.
    pub fn new(axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        let cardinality = uniform_cardinality("diagonal", &axes)?;
        Ok(Self { axes, cardinality })
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            cardinality: self.cardinality,
        }
    }
}

impl TensorIndex for DiagonalIndex {
    fn structure_name(&self) -> &'static str {
        "diagonal"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        self.cardinality
    }

    fn access_size(&self) -> usize {
        1 + self.cardinality
    }

    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        match diagonal_id(natural_ids) {
            Some(id) => id,
            None => panic!(
                "off-diagonal tuple {:?} has no stored value",
                natural_ids
            ),
        }
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        diagonal_id(natural_ids).map_or(0, |id| 1 + id)
    }

    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        assert!(
            access_id != 0,
            "access id 0 of a diagonal index has no stored value"
        );
        access_id - 1
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        NaturalIds::from_elem(mem_id, self.axes.len())
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        match access_id {
            0 => Dispatch::ZERO,
            id => Dispatch::stored(id - 1),
        }
    }
}

/// Kronecker delta: one on the diagonal, zero elsewhere, nothing stored.
///
/// ```
/// use symtensors::index::{Dispatch, IdentityIndex, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let i = NaturalIndex::new("i", ["X", "Y"]);
/// let delta = IdentityIndex::new(vec![i.clone(), i.renamed("j")]).unwrap();
/// assert_eq!(delta.mem_size(), 0);
/// assert_eq!(delta.dispatch(delta.access_id(&[1, 1])), Dispatch::Constant(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityIndex {
    axes: Vec<NaturalIndex>,
}

impl IdentityIndex {
    /// Build an identity index; all axes must share one cardinality.
    pub fn new(axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        uniform_cardinality("identity", &axes)?;
        Ok(Self { axes })
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
        }
    }
}

impl TensorIndex for IdentityIndex {
    fn structure_name(&self) -> &'static str {
        "identity"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        0
    }

    fn access_size(&self) -> usize {
        2
    }

    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        panic!("identity index stores no value (tuple {:?})", natural_ids)
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        usize::from(diagonal_id(natural_ids).is_some())
    }

    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        panic!("identity index stores no value (access id {access_id})")
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        panic!("identity index stores no value (mem id {mem_id})")
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        Dispatch::Constant(if access_id == 0 { 0 } else { 1 })
    }
}

/// Fixed-signature metric diagonal: `-1` for ids below the split point, `+1`
/// from the split point on, zero off the diagonal. Nothing is stored.
///
/// ```
/// use symtensors::index::{Dispatch, LorentzianSignIndex, TensorIndex};
/// use symtensors::natural::NaturalIndex;
///
/// let mu = NaturalIndex::new("mu", ["T", "X", "Y", "Z"]);
/// let eta = LorentzianSignIndex::new(1, vec![mu.clone(), mu.renamed("nu")]).unwrap();
/// assert_eq!(eta.dispatch(eta.access_id(&[0, 0])), Dispatch::Constant(-1));
/// assert_eq!(eta.dispatch(eta.access_id(&[3, 3])), Dispatch::Constant(1));
/// assert_eq!(eta.dispatch(eta.access_id(&[0, 3])), Dispatch::Constant(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LorentzianSignIndex {
    axes: Vec<NaturalIndex>,
    split: usize,
}

impl LorentzianSignIndex {
    /// Build a signature index with `split` negative diagonal entries.
    pub fn new(split: usize, axes: Vec<NaturalIndex>) -> Result<Self, TensorError> {
        uniform_cardinality("lorentzian sign", &axes)?;
        Ok(Self { axes, split })
    }

    /// Number of leading negative entries.
    #[inline]
    pub fn split(&self) -> usize {
        self.split
    }

    pub(crate) fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        Self {
            axes: self.axes.iter().map(f).collect(),
            split: self.split,
        }
    }
}

impl TensorIndex for LorentzianSignIndex {
    fn structure_name(&self) -> &'static str {
        "lorentzian sign"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        &self.axes
    }

    fn mem_size(&self) -> usize {
        0
    }

    fn access_size(&self) -> usize {
        3
    }

    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        panic!(
            "lorentzian sign index stores no value (tuple {:?})",
            natural_ids
        )
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        match diagonal_id(natural_ids) {
            None => 0,
            Some(id) if id < self.split => 1,
            Some(_) => 2,
        }
    }

    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        panic!("lorentzian sign index stores no value (access id {access_id})")
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        panic!("lorentzian sign index stores no value (mem id {mem_id})")
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        match access_id {
            0 => Dispatch::ZERO,
            1 => Dispatch::Constant(-1),
            _ => Dispatch::Constant(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes(rank: usize, d: usize) -> Vec<NaturalIndex> {
        (0..rank)
            .map(|i| NaturalIndex::with_cardinality(format!("a{i}"), d))
            .collect()
    }

    #[test]
    fn test_diagonal() {
        let diag = DiagonalIndex::new(axes(3, 4)).unwrap();
        assert_eq!(diag.mem_size(), 4);
        assert_eq!(diag.access_size(), 5);
        assert_eq!(diag.access_id(&[2, 2, 2]), 3);
        assert_eq!(diag.access_id(&[2, 2, 1]), 0);
        assert_eq!(diag.mem_id(&[3, 3, 3]), 3);
        assert_eq!(diag.access_id_to_mem_id(3), 2);
        assert_eq!(diag.mem_id_to_canonical_natural_ids(1).as_slice(), &[1, 1, 1]);
    }

    #[test]
    fn test_diagonal_rejects_unequal_cardinality() {
        let mut a = axes(2, 3);
        a.push(NaturalIndex::with_cardinality("b", 2));
        assert!(DiagonalIndex::new(a).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_identity() {
        let delta = IdentityIndex::new(axes(2, 3)).unwrap();
        assert_eq!(delta.mem_size(), 0);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1 } else { 0 };
                assert_eq!(
                    delta.dispatch(delta.access_id(&[i, j])),
                    Dispatch::Constant(expected)
                );
            }
        }
    }

    #[test]
    fn test_identity_rejects_unequal_cardinality() {
        let mut a = axes(1, 3);
        a.push(NaturalIndex::with_cardinality("b", 2));
        let err = IdentityIndex::new(a).unwrap_err();
        assert!(matches!(
            err,
            TensorError::CardinalityMismatch { structure: "identity", expected: 3, actual: 2 }
        ));
        assert!(matches!(
            IdentityIndex::new(Vec::new()),
            Err(TensorError::EmptyIndex { structure: "identity" })
        ));
    }

    #[test]
    fn test_lorentzian_sign() {
        let eta = LorentzianSignIndex::new(1, axes(2, 4)).unwrap();
        assert_eq!(eta.mem_size(), 0);
        assert_eq!(eta.dispatch(eta.access_id(&[0, 0])), Dispatch::Constant(-1));
        for i in 1..4 {
            assert_eq!(eta.dispatch(eta.access_id(&[i, i])), Dispatch::Constant(1));
        }
        assert_eq!(eta.dispatch(eta.access_id(&[1, 2])), Dispatch::ZERO);
    }

    #[test]
    #[should_panic(expected = "stores no value")]
    fn test_identity_mem_id_panics() {
        IdentityIndex::new(axes(2, 3)).unwrap().mem_id(&[0, 0]);
    }
}
