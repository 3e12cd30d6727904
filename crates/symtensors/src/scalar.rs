//! Scalar trait for tensor element types.

use faer_traits::ComplexField;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

pub use faer::c64;

/// Trait for scalar types supported by symtensors.
///
/// This trait wraps faer's `ComplexField` with the arithmetic bounds needed
/// by the dispatch and contraction code. Sparse projector coefficients are
/// always real, so every scalar must be constructible from an `f64`.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
{
    /// The real type associated with this scalar.
    type Real: Scalar;

    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Embeds a real coefficient.
    fn from_real(value: f64) -> Self;
}

impl Scalar for f64 {
    type Real = f64;

    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_real(value: f64) -> Self {
        value
    }
}

impl Scalar for c64 {
    type Real = f64;

    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    #[inline]
    fn from_real(value: f64) -> Self {
        c64::new(value, 0.0)
    }
}
