//! Combinatorial number system used by the symmetric and antisymmetric
//! indices.
//!
//! A symmetric index stores one value per non-decreasing tuple and an
//! antisymmetric index one value per strictly increasing tuple. Both sets are
//! enumerated in lexicographic order. A strictly increasing tuple `s` over
//! `d` values maps to the non-decreasing tuple `s[i] - i` over `d - n + 1`
//! values without changing the lexicographic order, so both ranks reduce to
//! [`multiset_rank`].

/// Binomial coefficient C(n, k), zero when `k > n`.
///
/// ```
/// use symtensors::index::combinatorics::binomial;
///
/// assert_eq!(binomial(5, 2), 10);
/// assert_eq!(binomial(3, 0), 1);
/// assert_eq!(binomial(2, 3), 0);
/// ```
pub const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = if k > n - k { n - k } else { k };
    let mut result = 1usize;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Number of non-decreasing tuples of length `rank` over `cardinality` values.
#[inline]
pub const fn multiset_count(cardinality: usize, rank: usize) -> usize {
    if rank == 0 {
        return 1;
    }
    if cardinality == 0 {
        return 0;
    }
    binomial(cardinality + rank - 1, rank)
}

/// Number of strictly increasing tuples of length `rank` over `cardinality`
/// values.
#[inline]
pub const fn subset_count(cardinality: usize, rank: usize) -> usize {
    binomial(cardinality, rank)
}

/// Lexicographic rank of a non-decreasing tuple among all non-decreasing
/// tuples of the same length over `cardinality` values.
///
/// # Panics
/// Debug builds panic if `sorted` is not non-decreasing or has an entry
/// `>= cardinality`.
pub fn multiset_rank(sorted: &[usize], cardinality: usize) -> usize {
    let n = sorted.len();
    let mut rank = 0;
    let mut prev = 0;
    for (i, &s) in sorted.iter().enumerate() {
        debug_assert!(s >= prev && s < cardinality);
        let remaining = n - i;
        // Tuples that agree on the prefix and take a value in prev..s at i.
        rank += multiset_count(cardinality - prev, remaining)
            - multiset_count(cardinality - s, remaining);
        prev = s;
    }
    rank
}

/// Inverse of [`multiset_rank`], written into `out`.
///
/// # Panics
/// Panics if `rank` is not below `multiset_count(cardinality, out.len())`.
pub fn multiset_unrank(mut rank: usize, cardinality: usize, out: &mut [usize]) {
    let n = out.len();
    assert!(
        rank < multiset_count(cardinality, n),
        "rank {} out of range for {} sorted tuples",
        rank,
        multiset_count(cardinality, n)
    );
    let mut value = 0;
    for (i, o) in out.iter_mut().enumerate() {
        let tail = n - i - 1;
        loop {
            let block = multiset_count(cardinality - value, tail);
            if rank < block {
                break;
            }
            rank -= block;
            value += 1;
        }
        *o = value;
    }
}

/// Lexicographic rank of a strictly increasing tuple among all strictly
/// increasing tuples of the same length over `cardinality` values.
pub fn subset_rank(sorted: &[usize], cardinality: usize) -> usize {
    let n = sorted.len();
    debug_assert!(n <= cardinality);
    let mut shifted = [0usize; INLINE_RANK];
    if n <= INLINE_RANK {
        for (i, (dst, &s)) in shifted.iter_mut().zip(sorted).enumerate() {
            *dst = s - i;
        }
        multiset_rank(&shifted[..n], cardinality + 1 - n)
    } else {
        let shifted: Vec<usize> = sorted.iter().enumerate().map(|(i, &s)| s - i).collect();
        multiset_rank(&shifted, cardinality + 1 - n)
    }
}

/// Inverse of [`subset_rank`], written into `out`.
pub fn subset_unrank(rank: usize, cardinality: usize, out: &mut [usize]) {
    let n = out.len();
    multiset_unrank(rank, cardinality + 1 - n, out);
    for (i, o) in out.iter_mut().enumerate() {
        *o += i;
    }
}

/// Sort a small tuple in place and return the parity of the permutation
/// applied (`true` for odd).
///
/// Insertion sort: tuples are a handful of entries long.
pub fn sort_with_parity(ids: &mut [usize]) -> bool {
    let mut odd = false;
    for i in 1..ids.len() {
        let mut j = i;
        while j > 0 && ids[j - 1] > ids[j] {
            ids.swap(j - 1, j);
            odd = !odd;
            j -= 1;
        }
    }
    odd
}

/// Whether a sorted tuple contains a repeated entry.
#[inline]
pub fn has_repeat(sorted: &[usize]) -> bool {
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// Tuple length up to which the index code keeps ids on the stack.
pub const INLINE_RANK: usize = 8;
