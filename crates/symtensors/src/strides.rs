//! Stride computation utilities.
//!
//! All compact buffers are laid out in row-major order: the last axis is
//! contiguous and the stride of an axis is the product of the extents to its
//! right.

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use symtensors::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;

    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride *= dim;
    }

    strides
}

/// Convert cartesian indices to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear index to cartesian indices, writing into `out`.
///
/// `out` must have the same length as `shape`.
#[inline]
pub fn linear_to_cartesian_into(mut linear: usize, shape: &[usize], out: &mut [usize]) {
    debug_assert_eq!(shape.len(), out.len());
    for (o, &dim) in out.iter_mut().zip(shape.iter()).rev() {
        *o = linear % dim;
        linear /= dim;
    }
}

/// Convert a linear index to cartesian indices.
pub fn linear_to_cartesian(linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    linear_to_cartesian_into(linear, shape, &mut indices);
    indices
}
