//! Natural indices: the finite label sets that make up one tensor slot.
//!
//! A [`NaturalIndex`] is the uncompressed building block every structural
//! index is composed of. It carries a name (its identity, used for matching
//! axes in contractions and for relabeling), an ordered list of labels, and
//! an optional [`Character`] tag.
//!
//! # Example
//!
//! ```
//! use symtensors::natural::{Character, NaturalIndex};
//!
//! let mu = NaturalIndex::new("mu", ["T", "X", "Y", "Z"]).covariant();
//! assert_eq!(mu.cardinality(), 4);
//! assert_eq!(mu.position("Y"), Some(2));
//! assert_eq!(mu.character(), Some(Character::Covariant));
//! assert_eq!(mu.swap_character().character(), Some(Character::Contravariant));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::TensorError;

/// Variance tag of a natural index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Character {
    /// Lower index.
    Covariant,
    /// Upper index.
    Contravariant,
}

impl Character {
    /// The opposite variance.
    #[inline]
    pub fn swap(self) -> Self {
        match self {
            Character::Covariant => Character::Contravariant,
            Character::Contravariant => Character::Covariant,
        }
    }
}

/// A finite, ordered label set describing one natural tensor axis.
///
/// Labels are shared behind an `Arc`, so cloning and relabeling an index is
/// cheap and never copies the label list.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NaturalIndex {
    name: Arc<str>,
    labels: Arc<[String]>,
    character: Option<Character>,
}

impl NaturalIndex {
    /// Create an uncharacterized natural index.
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            labels: labels.into_iter().map(Into::into).collect(),
            character: None,
        }
    }

    /// Create a natural index whose labels are `0..cardinality` rendered as
    /// strings.
    ///
    /// ```
    /// use symtensors::natural::NaturalIndex;
    ///
    /// let i = NaturalIndex::with_cardinality("i", 3);
    /// assert_eq!(i.labels(), &["0", "1", "2"]);
    /// ```
    pub fn with_cardinality(name: impl Into<String>, cardinality: usize) -> Self {
        Self::new(name, (0..cardinality).map(|i| i.to_string()))
    }

    /// Name (identity) of the index.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.labels.len()
    }

    /// Label at a position.
    ///
    /// # Panics
    /// Panics if `position >= cardinality()`.
    #[inline]
    pub fn label(&self, position: usize) -> &str {
        &self.labels[position]
    }

    /// Position of a label, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Position of a label, or `TensorError::UnknownLabel`.
    pub fn try_position(&self, label: &str) -> Result<usize, TensorError> {
        self.position(label).ok_or_else(|| TensorError::UnknownLabel {
            index: self.name.to_string(),
            label: label.to_string(),
        })
    }

    /// Variance tag, if any.
    #[inline]
    pub fn character(&self) -> Option<Character> {
        self.character
    }

    /// Tag as covariant.
    pub fn covariant(self) -> Self {
        self.characterize(Character::Covariant)
    }

    /// Tag as contravariant.
    pub fn contravariant(self) -> Self {
        self.characterize(Character::Contravariant)
    }

    /// Tag with an explicit character.
    pub fn characterize(mut self, character: Character) -> Self {
        self.character = Some(character);
        self
    }

    /// Drop the variance tag.
    pub fn uncharacterize(mut self) -> Self {
        self.character = None;
        self
    }

    /// Flip covariant and contravariant. Uncharacterized indices are
    /// returned unchanged.
    pub fn swap_character(&self) -> Self {
        let mut swapped = self.clone();
        swapped.character = self.character.map(Character::swap);
        swapped
    }

    /// Same labels and character under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            labels: Arc::clone(&self.labels),
            character: self.character,
        }
    }

    /// Whether two indices refer to the same axis regardless of character.
    pub fn same_axis(&self, other: &NaturalIndex) -> bool {
        self.name == other.name
    }

    /// Check that a natural id is in range.
    #[inline]
    pub fn check_id(&self, id: usize) -> Result<(), TensorError> {
        if id >= self.cardinality() {
            return Err(TensorError::IndexOutOfBounds {
                index: id,
                dim_size: self.cardinality(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for NaturalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for NaturalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.character {
            Some(Character::Covariant) => "_",
            Some(Character::Contravariant) => "^",
            None => "",
        };
        write!(f, "{}{}{:?}", prefix, self.name, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> NaturalIndex {
        NaturalIndex::new("x", ["X", "Y", "Z"])
    }

    #[test]
    fn test_new() {
        let x = xyz();
        assert_eq!(x.name(), "x");
        assert_eq!(x.cardinality(), 3);
        assert_eq!(x.label(1), "Y");
        assert_eq!(x.character(), None);
    }

    #[test]
    fn test_position() {
        let x = xyz();
        assert_eq!(x.position("Z"), Some(2));
        assert_eq!(x.position("W"), None);
        assert!(matches!(
            x.try_position("W"),
            Err(TensorError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_character_plumbing() {
        let x = xyz().covariant();
        assert_eq!(x.character(), Some(Character::Covariant));
        let up = x.swap_character();
        assert_eq!(up.character(), Some(Character::Contravariant));
        assert_eq!(up.swap_character(), x);
        assert_eq!(x.clone().uncharacterize().character(), None);
        assert!(up.same_axis(&x));
        assert_ne!(up, x);
    }

    #[test]
    fn test_swap_uncharacterized() {
        let x = xyz();
        assert_eq!(x.swap_character(), x);
    }

    #[test]
    fn test_renamed_shares_labels() {
        let x = xyz().contravariant();
        let y = x.renamed("y");
        assert_eq!(y.name(), "y");
        assert_eq!(y.labels(), x.labels());
        assert_eq!(y.character(), Some(Character::Contravariant));
        assert!(!y.same_axis(&x));
    }

    #[test]
    fn test_check_id() {
        let x = xyz();
        assert!(x.check_id(2).is_ok());
        assert!(x.check_id(3).is_err());
    }

    #[test]
    fn test_display() {
        let x = xyz().covariant();
        assert_eq!(x.to_string(), "_x[\"X\", \"Y\", \"Z\"]");
    }
}
