//! Tests for Young-tableau indices, covering:
//! - compress after uncompress is the identity on irreducible tensors
//! - uncompress after compress is the symmetrizing projection
//! - natural reads through the linear-combination dispatch
//! - placement rules of the linear-combination axis

use std::sync::Arc;

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use symtensors::sparse::Csr;
use symtensors::{
    AntisymmetricIndex, Axis, FullIndex, NaturalIndex, SymmetricIndex, Tensor, TensorError,
    TensorIndex, YoungTableau, YoungTableauIndex,
};

const D: usize = 3;

fn x(name: &str) -> NaturalIndex {
    NaturalIndex::new(name, ["X", "Y", "Z"])
}

/// Rank-2 tableau whose irrep components are the mem ids of `index`.
/// `sign` gives the sign of the natural component `(i, j)` relative to its
/// canonical representative.
fn rank2_tableau(
    shape: Vec<usize>,
    index: &dyn TensorIndex,
    sign: impl Fn(usize, usize) -> f64,
) -> Arc<YoungTableau> {
    let irrep = index.mem_size();
    let mut u = vec![0.0; irrep * D * D];
    let mut v = vec![0.0; irrep * D * D];
    for i in 0..D {
        for j in 0..D {
            let s = sign(i, j);
            if s == 0.0 {
                continue;
            }
            let r = index.mem_id(&[i, j]);
            let multiplicity = if i == j { 1.0 } else { 2.0 };
            u[r * D * D + i * D + j] = s / multiplicity;
            v[r * D * D + i * D + j] = s;
        }
    }
    let u = Csr::from_dense(&u, irrep, &[D, D]).unwrap();
    let v = Csr::from_dense(&v, irrep, &[D, D]).unwrap();
    Arc::new(YoungTableau::new(shape, u, v).unwrap())
}

fn symmetric_tableau() -> Arc<YoungTableau> {
    let sym = SymmetricIndex::new(vec![x("a"), x("b")]).unwrap();
    rank2_tableau(vec![2], &sym, |_, _| 1.0)
}

fn antisymmetric_tableau() -> Arc<YoungTableau> {
    let anti = AntisymmetricIndex::new(vec![x("a"), x("b")]).unwrap();
    rank2_tableau(vec![1, 1], &anti, |i, j| match i.cmp(&j) {
        std::cmp::Ordering::Less => 1.0,
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Greater => -1.0,
    })
}

fn young_axes(tableau: &Arc<YoungTableau>) -> (YoungTableauIndex, Vec<Axis>, Vec<Axis>) {
    let young = YoungTableauIndex::new(Arc::clone(tableau), vec![x("i"), x("j")]).unwrap();
    let irrep_axes = vec![Axis::spectator("cell", 2), young.clone().into()];
    let natural_axes = vec![
        Axis::spectator("cell", 2),
        FullIndex::new(vec![x("i"), x("j")]).unwrap().into(),
    ];
    (young, irrep_axes, natural_axes)
}

#[test]
fn test_compress_inverts_uncompress() {
    for tableau in [symmetric_tableau(), antisymmetric_tableau()] {
        let (young, irrep_axes, natural_axes) = young_axes(&tableau);
        let mut rng = StdRng::seed_from_u64(11);
        let irrep = Tensor::<f64>::randn_with_rng(irrep_axes.clone(), &mut rng).unwrap();

        let mut natural = Tensor::<f64>::zeros(natural_axes).unwrap();
        young.uncompress(&mut natural, &irrep).unwrap();
        let mut back = Tensor::<f64>::zeros(irrep_axes).unwrap();
        young.compress(&mut back, &natural).unwrap();

        for (a, b) in back.data().iter().zip(irrep.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_uncompress_of_compress_symmetrizes() {
    let tableau = symmetric_tableau();
    let (young, irrep_axes, natural_axes) = young_axes(&tableau);
    let mut rng = StdRng::seed_from_u64(3);
    let y = Tensor::<f64>::random_with_rng(natural_axes.clone(), &mut rng).unwrap();

    let mut irrep = Tensor::<f64>::zeros(irrep_axes).unwrap();
    young.compress(&mut irrep, &y).unwrap();
    let mut projected = Tensor::<f64>::zeros(natural_axes).unwrap();
    young.uncompress(&mut projected, &irrep).unwrap();

    for c in 0..2 {
        for i in 0..D {
            for j in 0..D {
                let expected = 0.5 * (y.get(&[c, i, j]) + y.get(&[c, j, i]));
                assert_relative_eq!(projected.get(&[c, i, j]), expected, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_uncompress_of_compress_antisymmetrizes() {
    let tableau = antisymmetric_tableau();
    let (young, irrep_axes, natural_axes) = young_axes(&tableau);
    let mut rng = StdRng::seed_from_u64(5);
    let y = Tensor::<f64>::random_with_rng(natural_axes.clone(), &mut rng).unwrap();

    let mut irrep = Tensor::<f64>::zeros(irrep_axes).unwrap();
    young.compress(&mut irrep, &y).unwrap();
    let mut projected = Tensor::<f64>::zeros(natural_axes).unwrap();
    young.uncompress(&mut projected, &irrep).unwrap();

    for c in 0..2 {
        for i in 0..D {
            for j in 0..D {
                let expected = 0.5 * (y.get(&[c, i, j]) - y.get(&[c, j, i]));
                assert_relative_eq!(projected.get(&[c, i, j]), expected, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_natural_reads_match_uncompress() {
    let tableau = antisymmetric_tableau();
    let (young, irrep_axes, natural_axes) = young_axes(&tableau);
    let irrep = Tensor::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], irrep_axes).unwrap();
    let mut natural = Tensor::<f64>::zeros(natural_axes).unwrap();
    young.uncompress(&mut natural, &irrep).unwrap();

    for c in 0..2 {
        for i in 0..D {
            for j in 0..D {
                assert_relative_eq!(irrep.get(&[c, i, j]), natural.get(&[c, i, j]));
            }
        }
    }
    assert_eq!(irrep.get(&[1, 2, 0]), -5.0);
}

#[test]
fn test_linear_combination_axis_placement() {
    let tableau = symmetric_tableau();
    let young = YoungTableauIndex::new(Arc::clone(&tableau), vec![x("i"), x("j")]).unwrap();

    let err = Tensor::<f64>::zeros(vec![young.clone().into(), x("k").into()]).unwrap_err();
    assert!(matches!(
        err,
        TensorError::LinearCombinationAxisNotLast { position: 0, count: 2 }
    ));

    let mut trailing_spectator =
        Tensor::<f64>::zeros(vec![x("k").into(), young.into(), Axis::spectator("cell", 2)]).unwrap();
    assert_eq!(trailing_spectator.mem_shape(), &[3, 6, 2]);
    assert!(matches!(
        trailing_spectator.set(&[0, 0, 1, 0], 1.0),
        Err(TensorError::LinearCombinationComponent)
    ));
    *trailing_spectator.mem_mut(&[0, 1, 1]) = 2.0;
    assert_eq!(trailing_spectator.get(&[0, 1, 0, 1]), 2.0);
    assert_eq!(trailing_spectator.get(&[0, 1, 0, 0]), 0.0);
}

#[test]
fn test_compress_rejects_mismatched_operands() {
    let tableau = symmetric_tableau();
    let (young, irrep_axes, _) = young_axes(&tableau);
    let mut irrep = Tensor::<f64>::zeros(irrep_axes).unwrap();

    let wrong_order = Tensor::<f64>::zeros(vec![
        Axis::spectator("cell", 2),
        FullIndex::new(vec![x("j"), x("i")]).unwrap().into(),
    ])
    .unwrap();
    assert!(matches!(
        young.compress(&mut irrep, &wrong_order),
        Err(TensorError::AxisMismatch { .. })
    ));

    let wrong_cells = Tensor::<f64>::zeros(vec![
        Axis::spectator("cell", 3),
        FullIndex::new(vec![x("i"), x("j")]).unwrap().into(),
    ])
    .unwrap();
    assert!(matches!(
        young.compress(&mut irrep, &wrong_cells),
        Err(TensorError::AxisMismatch { .. })
    ));
}

#[test]
fn test_sign_of_leading_axis_applies_to_combination() {
    let tableau = symmetric_tableau();
    let young = YoungTableauIndex::new(Arc::clone(&tableau), vec![x("i"), x("j")]).unwrap();
    let anti = AntisymmetricIndex::new(vec![x("a"), x("b")]).unwrap();
    let mut t = Tensor::<f64>::zeros(vec![anti.into(), young.into()]).unwrap();
    assert_eq!(t.mem_shape(), &[3, 6]);

    // anti (0, 1) is mem 0; irrep components (0, 1) and (1, 1) are mem 1 and 3.
    *t.mem_mut(&[0, 1]) = 2.0;
    *t.mem_mut(&[0, 3]) = 7.0;

    assert_eq!(t.get(&[0, 1, 0, 1]), 2.0);
    assert_eq!(t.get(&[0, 1, 1, 0]), 2.0);
    assert_eq!(t.get(&[1, 0, 0, 1]), -2.0);
    assert_eq!(t.get(&[1, 0, 1, 0]), -2.0);
    assert_eq!(t.get(&[1, 0, 1, 1]), -7.0);
    assert_eq!(t.get(&[1, 1, 1, 1]), 0.0);
}

#[test]
fn test_compress_rejects_different_leading_structure() {
    let tableau = symmetric_tableau();
    let young = YoungTableauIndex::new(Arc::clone(&tableau), vec![x("i"), x("j")]).unwrap();
    // Both leading axes hold six components.
    let sym = SymmetricIndex::new(vec![x("p"), x("q")]).unwrap();
    let grid = FullIndex::new(vec![
        NaturalIndex::with_cardinality("p", 2),
        NaturalIndex::with_cardinality("q", 3),
    ])
    .unwrap();

    let mut irrep = Tensor::<f64>::zeros(vec![sym.into(), young.clone().into()]).unwrap();
    let natural = Tensor::<f64>::zeros(vec![
        grid.into(),
        FullIndex::new(vec![x("i"), x("j")]).unwrap().into(),
    ])
    .unwrap();
    assert_eq!(irrep.mem_shape()[0], natural.mem_shape()[0]);
    assert!(matches!(
        young.compress(&mut irrep, &natural),
        Err(TensorError::AxisMismatch { .. })
    ));
    let mut expanded = natural.clone();
    assert!(matches!(
        young.uncompress(&mut expanded, &irrep),
        Err(TensorError::AxisMismatch { .. })
    ));
}
