//! Random tensor construction.
//!
//! Random values are drawn for the stored (mem) components only, so every
//! structural relation of the indices holds in the result.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::error::TensorError;
use crate::scalar::{Scalar, c64};
use crate::storage::Dense;
use crate::tensor::{Axis, Tensor};

/// Trait for types that can be randomly sampled from a uniform distribution.
pub trait RandomUniform: Scalar {
    /// Sample a random value from the uniform distribution [0, 1).
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;
}

impl RandomUniform for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }
}

impl RandomUniform for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }
}

/// Trait for types that can be randomly sampled from a normal distribution.
pub trait RandomNormal: Scalar {
    /// Sample a random value from the standard normal distribution.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomNormal for f64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomNormal for c64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        // Real and imaginary parts are N(0, 1/2) so that |z|^2 has mean 1.
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

impl<ElT: RandomUniform> Tensor<ElT, Dense<ElT>> {
    /// Create a tensor with uniform random stored values in [0, 1).
    pub fn random(axes: Vec<Axis>) -> Result<Self, TensorError> {
        Self::random_with_rng(axes, &mut rand::rng())
    }

    /// Create a tensor with uniform random stored values using a specific
    /// RNG, for reproducible results.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use symtensors::index::SymmetricIndex;
    /// use symtensors::natural::NaturalIndex;
    /// use symtensors::tensor::Tensor;
    ///
    /// let x = NaturalIndex::with_cardinality("x", 3);
    /// let axes = || vec![SymmetricIndex::new(vec![x.clone(), x.renamed("y")]).unwrap().into()];
    ///
    /// let t1 = Tensor::<f64>::random_with_rng(axes(), &mut StdRng::seed_from_u64(42)).unwrap();
    /// let t2 = Tensor::<f64>::random_with_rng(axes(), &mut StdRng::seed_from_u64(42)).unwrap();
    /// assert_eq!(t1.data(), t2.data());
    /// assert_eq!(t1.get(&[0, 2]), t1.get(&[2, 0]));
    /// ```
    pub fn random_with_rng<R: Rng>(axes: Vec<Axis>, rng: &mut R) -> Result<Self, TensorError> {
        let mut tensor = Self::zeros(axes)?;
        for x in tensor.data_mut() {
            *x = ElT::sample_uniform(rng);
        }
        Ok(tensor)
    }
}

impl<ElT: RandomNormal> Tensor<ElT, Dense<ElT>> {
    /// Create a tensor with standard normal random stored values.
    pub fn randn(axes: Vec<Axis>) -> Result<Self, TensorError> {
        Self::randn_with_rng(axes, &mut rand::rng())
    }

    /// Create a tensor with standard normal random stored values using a
    /// specific RNG.
    pub fn randn_with_rng<R: Rng>(axes: Vec<Axis>, rng: &mut R) -> Result<Self, TensorError> {
        let mut tensor = Self::zeros(axes)?;
        for x in tensor.data_mut() {
            *x = ElT::sample_normal(rng);
        }
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::AntisymmetricIndex;
    use crate::natural::NaturalIndex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn anti_axes() -> Vec<Axis> {
        let x = NaturalIndex::with_cardinality("x", 4);
        vec![
            Axis::spectator("cell", 3),
            AntisymmetricIndex::new(vec![x.clone(), x.renamed("y")])
                .unwrap()
                .into(),
        ]
    }

    #[test]
    fn test_random_in_range() {
        let t = Tensor::<f64>::random(anti_axes()).unwrap();
        assert_eq!(t.len(), 3 * 6);
        assert!(t.data().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_random_keeps_structure() {
        let mut rng = StdRng::seed_from_u64(7);
        let t = Tensor::<f64>::randn_with_rng(anti_axes(), &mut rng).unwrap();
        for c in 0..3 {
            for i in 0..4 {
                assert_eq!(t.get(&[c, i, i]), 0.0);
                for j in 0..4 {
                    assert_eq!(t.get(&[c, i, j]), -t.get(&[c, j, i]));
                }
            }
        }
    }

    #[test]
    fn test_random_c64_seeded() {
        let t1 = Tensor::<c64>::random_with_rng(anti_axes(), &mut StdRng::seed_from_u64(1)).unwrap();
        let t2 = Tensor::<c64>::random_with_rng(anti_axes(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(t1.data(), t2.data());
        assert!(t1.data().iter().any(|z| z.im != 0.0));
    }
}
