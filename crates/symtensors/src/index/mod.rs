//! Structural tensor indices.
//!
//! Every index describes one slot-family of a tensor: a fixed tuple of
//! natural axes together with the rule that maps a natural multi-index onto
//! compact storage.
//!
//! ```text
//! TensorIndex (trait)
//! ├── NaturalIndex          - one natural axis, stored as is
//! ├── FullIndex             - no symmetry, row-major
//! ├── SymmetricIndex        - one value per sorted tuple
//! ├── AntisymmetricIndex    - one value per strictly sorted tuple, signed
//! ├── DiagonalIndex         - one value per diagonal entry
//! ├── IdentityIndex         - Kronecker delta, nothing stored
//! ├── LorentzianSignIndex   - diag(-1, .., -1, +1, .., +1), nothing stored
//! └── YoungTableauIndex     - irreducible representation, linear combination
//! ```
//!
//! [`IndexKind`] is the closed set of these variants; tensors hold an ordered
//! list of `IndexKind`s.
//!
//! Three coordinate spaces exist per index: the natural tuple (one id per
//! natural axis), the mem id (`0..mem_size`) addressing a stored value, and
//! the access id (`0..access_size`) which may add sentinel ids for components
//! that are structurally zero or negated.

pub mod antisymmetric;
pub mod combinatorics;
pub mod diagonal;
pub mod full;
pub mod symmetric;
pub mod young_tableau;

use smallvec::SmallVec;

use crate::error::TensorError;
use crate::natural::NaturalIndex;
use crate::scalar::Scalar;

pub use antisymmetric::AntisymmetricIndex;
pub use combinatorics::INLINE_RANK;
pub use diagonal::{DiagonalIndex, IdentityIndex, LorentzianSignIndex};
pub use full::FullIndex;
pub use symmetric::SymmetricIndex;
pub use young_tableau::{YoungTableau, YoungTableauIndex};

/// Natural ids of one index, kept inline for small ranks.
pub type NaturalIds = SmallVec<[usize; INLINE_RANK]>;

/// `(coefficient, mem_id)` pairs whose weighted sum yields one component.
pub type MemLinComb = SmallVec<[(f64, usize); 8]>;

/// Outcome of resolving an access id of an explicitly stored index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Component fixed by the structure (0, 1 or -1); no buffer read.
    Constant(i8),
    /// Component stored at `mem_id`, negated when `negate` is set.
    Stored { mem_id: usize, negate: bool },
}

impl Dispatch {
    /// Structurally zero component.
    pub const ZERO: Dispatch = Dispatch::Constant(0);

    /// Stored value, no sign change.
    #[inline]
    pub const fn stored(mem_id: usize) -> Self {
        Dispatch::Stored {
            mem_id,
            negate: false,
        }
    }

    /// Scalar value of a constant component.
    #[inline]
    pub fn constant_value<T: Scalar>(constant: i8) -> T {
        match constant {
            0 => T::zero(),
            1 => T::one(),
            -1 => -T::one(),
            c => T::from_real(c as f64),
        }
    }
}

/// Resolution of an access id of any index variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// One stored value or a constant.
    Dispatch(Dispatch),
    /// Weighted sum of several stored values.
    LinComb(MemLinComb),
}

/// Capability shared by all structural indices.
///
/// `mem_id`, `access_id` and `dispatch` are pure and allocation-free for
/// ranks up to [`INLINE_RANK`]. They trust their input: natural ids must be
/// in range and match the index rank.
pub trait TensorIndex {
    /// Short name of the structure, used in diagnostics.
    fn structure_name(&self) -> &'static str;

    /// Constituent natural axes, in order.
    fn natural_indices(&self) -> &[NaturalIndex];

    /// Number of natural axes represented.
    fn rank(&self) -> usize {
        self.natural_indices().len()
    }

    /// Number of distinct natural multi-indices.
    fn size(&self) -> usize {
        self.natural_indices()
            .iter()
            .map(NaturalIndex::cardinality)
            .product()
    }

    /// Number of independently stored values.
    fn mem_size(&self) -> usize;

    /// Number of addressable access ids.
    fn access_size(&self) -> usize;

    /// Whether one access resolves to at most one stored value.
    fn is_explicitly_stored(&self) -> bool {
        true
    }

    /// Mem id of a natural tuple.
    ///
    /// # Panics
    /// Panics if the tuple is structurally constant (no stored value).
    fn mem_id(&self, natural_ids: &[usize]) -> usize;

    /// Access id of a natural tuple.
    fn access_id(&self, natural_ids: &[usize]) -> usize;

    /// Mem id behind an access id, ignoring sign and zero sentinels.
    ///
    /// # Panics
    /// Panics if the access id addresses no stored value.
    fn access_id_to_mem_id(&self, access_id: usize) -> usize;

    /// Canonical natural tuple stored at a mem id.
    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds;

    /// Resolve an access id to a stored value or a constant.
    fn dispatch(&self, access_id: usize) -> Dispatch;
}

/// Check that all axes share one cardinality and return it.
pub(crate) fn uniform_cardinality(
    structure: &'static str,
    axes: &[NaturalIndex],
) -> Result<usize, TensorError> {
    let first = axes
        .first()
        .ok_or(TensorError::EmptyIndex { structure })?
        .cardinality();
    for axis in &axes[1..] {
        if axis.cardinality() != first {
            return Err(TensorError::CardinalityMismatch {
                structure,
                expected: first,
                actual: axis.cardinality(),
            });
        }
    }
    Ok(first)
}

/// Copy natural ids onto the stack.
#[inline]
pub(crate) fn to_ids(natural_ids: &[usize]) -> NaturalIds {
    NaturalIds::from_slice(natural_ids)
}

impl TensorIndex for NaturalIndex {
    fn structure_name(&self) -> &'static str {
        "natural"
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        std::slice::from_ref(self)
    }

    fn mem_size(&self) -> usize {
        self.cardinality()
    }

    fn access_size(&self) -> usize {
        self.cardinality()
    }

    #[inline]
    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        natural_ids[0]
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        natural_ids[0]
    }

    #[inline]
    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        access_id
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        let mut ids = NaturalIds::new();
        ids.push(mem_id);
        ids
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        Dispatch::stored(access_id)
    }
}

/// Closed set of index variants a tensor can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexKind {
    Natural(NaturalIndex),
    Full(FullIndex),
    Symmetric(SymmetricIndex),
    Antisymmetric(AntisymmetricIndex),
    Diagonal(DiagonalIndex),
    Identity(IdentityIndex),
    LorentzianSign(LorentzianSignIndex),
    YoungTableau(YoungTableauIndex),
}

macro_rules! delegate {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            IndexKind::Natural($inner) => $body,
            IndexKind::Full($inner) => $body,
            IndexKind::Symmetric($inner) => $body,
            IndexKind::Antisymmetric($inner) => $body,
            IndexKind::Diagonal($inner) => $body,
            IndexKind::Identity($inner) => $body,
            IndexKind::LorentzianSign($inner) => $body,
            IndexKind::YoungTableau($inner) => $body,
        }
    };
}

impl TensorIndex for IndexKind {
    fn structure_name(&self) -> &'static str {
        delegate!(self, i => i.structure_name())
    }

    fn natural_indices(&self) -> &[NaturalIndex] {
        delegate!(self, i => i.natural_indices())
    }

    fn rank(&self) -> usize {
        delegate!(self, i => i.rank())
    }

    fn size(&self) -> usize {
        delegate!(self, i => i.size())
    }

    fn mem_size(&self) -> usize {
        delegate!(self, i => i.mem_size())
    }

    fn access_size(&self) -> usize {
        delegate!(self, i => i.access_size())
    }

    fn is_explicitly_stored(&self) -> bool {
        delegate!(self, i => i.is_explicitly_stored())
    }

    #[inline]
    fn mem_id(&self, natural_ids: &[usize]) -> usize {
        delegate!(self, i => i.mem_id(natural_ids))
    }

    #[inline]
    fn access_id(&self, natural_ids: &[usize]) -> usize {
        delegate!(self, i => i.access_id(natural_ids))
    }

    #[inline]
    fn access_id_to_mem_id(&self, access_id: usize) -> usize {
        delegate!(self, i => i.access_id_to_mem_id(access_id))
    }

    fn mem_id_to_canonical_natural_ids(&self, mem_id: usize) -> NaturalIds {
        delegate!(self, i => i.mem_id_to_canonical_natural_ids(mem_id))
    }

    #[inline]
    fn dispatch(&self, access_id: usize) -> Dispatch {
        delegate!(self, i => i.dispatch(access_id))
    }
}

impl IndexKind {
    /// Resolve an access id, producing a linear combination for the
    /// Young-tableau variant and a single dispatch otherwise.
    #[inline]
    pub fn resolve(&self, access_id: usize) -> Resolution {
        match self {
            IndexKind::YoungTableau(y) => Resolution::LinComb(y.access_id_to_mem_lin_comb(access_id)),
            other => Resolution::Dispatch(other.dispatch(access_id)),
        }
    }

    /// Natural ids of every natural axis, checked against their cardinality.
    pub fn check_natural_ids(&self, natural_ids: &[usize]) -> Result<(), TensorError> {
        let axes = self.natural_indices();
        if natural_ids.len() != axes.len() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: axes.len(),
                actual: natural_ids.len(),
            });
        }
        for (axis, &id) in axes.iter().zip(natural_ids) {
            axis.check_id(id)?;
        }
        Ok(())
    }

    /// Names of the natural axes joined by commas.
    pub fn name(&self) -> String {
        let names: Vec<&str> = self.natural_indices().iter().map(NaturalIndex::name).collect();
        names.join(",")
    }

    /// Whether every stored component is one natural component, laid out
    /// row-major over the natural axes.
    pub fn is_natural_layout(&self) -> bool {
        matches!(self, IndexKind::Natural(_) | IndexKind::Full(_))
    }

    /// Whether the index contains a natural axis with the given name.
    pub fn contains_axis(&self, name: &str) -> bool {
        self.natural_indices().iter().any(|a| a.name() == name)
    }

    /// Replace the natural axis named `from` by `to`.
    ///
    /// Only the identity of the axis changes; the storage layout is kept, so
    /// `to` must have the same cardinality.
    pub fn relabel(&self, from: &str, to: &NaturalIndex) -> Result<Self, TensorError> {
        let mut found = false;
        let mut error = None;
        let relabeled = self.map_axes(|axis| {
            if axis.name() == from {
                found = true;
                if axis.cardinality() != to.cardinality() {
                    error = Some(TensorError::CardinalityMismatch {
                        structure: "relabeled",
                        expected: axis.cardinality(),
                        actual: to.cardinality(),
                    });
                }
                to.clone()
            } else {
                axis.clone()
            }
        });
        if let Some(err) = error {
            return Err(err);
        }
        if !found {
            return Err(TensorError::IndexNotFound {
                name: from.to_string(),
            });
        }
        Ok(relabeled)
    }

    /// Flip the character of every natural axis.
    pub fn swap_character(&self) -> Self {
        self.map_axes(NaturalIndex::swap_character)
    }

    /// Rebuild the index with transformed natural axes of equal cardinality.
    fn map_axes(&self, f: impl FnMut(&NaturalIndex) -> NaturalIndex) -> Self {
        match self {
            IndexKind::Natural(n) => {
                let mut f = f;
                IndexKind::Natural(f(n))
            }
            IndexKind::Full(i) => IndexKind::Full(i.map_axes(f)),
            IndexKind::Symmetric(i) => IndexKind::Symmetric(i.map_axes(f)),
            IndexKind::Antisymmetric(i) => IndexKind::Antisymmetric(i.map_axes(f)),
            IndexKind::Diagonal(i) => IndexKind::Diagonal(i.map_axes(f)),
            IndexKind::Identity(i) => IndexKind::Identity(i.map_axes(f)),
            IndexKind::LorentzianSign(i) => IndexKind::LorentzianSign(i.map_axes(f)),
            IndexKind::YoungTableau(i) => IndexKind::YoungTableau(i.map_axes(f)),
        }
    }
}

macro_rules! impl_from_index {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for IndexKind {
                fn from(index: $ty) -> Self {
                    IndexKind::$variant(index)
                }
            }
        )*
    };
}

impl_from_index!(
    Natural(NaturalIndex),
    Full(FullIndex),
    Symmetric(SymmetricIndex),
    Antisymmetric(AntisymmetricIndex),
    Diagonal(DiagonalIndex),
    Identity(IdentityIndex),
    LorentzianSign(LorentzianSignIndex),
    YoungTableau(YoungTableauIndex),
);
