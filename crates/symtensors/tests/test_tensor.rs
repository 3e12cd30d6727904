//! Tensors composed of spectator axes and several structural indices.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use symtensors::{
    AntisymmetricIndex, Axis, FullIndex, NaturalIndex, SymmetricIndex, Tensor, TensorError, c64,
};

fn xyz(name: &str) -> NaturalIndex {
    NaturalIndex::new(name, ["X", "Y", "Z"])
}

/// `[grid(4), Sym(a, b), Anti(c, d)]` with 4 * 6 * 3 stored values.
fn composite_axes() -> Vec<Axis> {
    vec![
        Axis::spectator("grid", 4),
        SymmetricIndex::new(vec![xyz("a"), xyz("b")]).unwrap().into(),
        AntisymmetricIndex::new(vec![xyz("c"), xyz("d")]).unwrap().into(),
    ]
}

#[test]
fn test_composite_layout() {
    let t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    assert_eq!(t.mem_shape(), &[4, 6, 3]);
    assert_eq!(t.len(), 72);
    assert_eq!(t.natural_rank(), 5);

    assert_eq!(t.natural_domain().extents(), vec![4, 3, 3, 3, 3]);
    assert_eq!(t.natural_domain().names(), vec!["grid", "a", "b", "c", "d"]);
    assert_eq!(t.non_indices_domain().names(), vec!["grid"]);
    assert_eq!(t.indices_domain().extents(), vec![3, 3, 3, 3]);
    assert_eq!(t.mem_domain().extents(), vec![6, 3]);
    assert_eq!(t.domain().extents(), vec![4, 6, 3]);
}

#[test]
fn test_composite_signs() {
    let mut t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    t.set(&[2, 0, 1, 0, 2], 3.0).unwrap();

    // Symmetric pair swapped: same value. Antisymmetric pair swapped: negated.
    assert_eq!(t.get(&[2, 1, 0, 0, 2]), 3.0);
    assert_eq!(t.get(&[2, 0, 1, 2, 0]), -3.0);
    assert_eq!(t.get(&[2, 1, 0, 2, 0]), -3.0);
    assert_eq!(t.get(&[1, 1, 0, 2, 0]), 0.0);
    assert_eq!(t.get(&[2, 1, 0, 1, 1]), 0.0);

    // Writing through the transposed antisymmetric pair stores the negation.
    t.set(&[3, 2, 2, 2, 1], 5.0).unwrap();
    assert_eq!(t.get(&[3, 2, 2, 1, 2]), -5.0);

    assert!(matches!(
        t.set(&[0, 0, 0, 1, 1], 1.0),
        Err(TensorError::StructuralComponent)
    ));
}

#[test]
fn test_checked_reads() {
    let t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    assert!(matches!(
        t.get_checked(&[0, 0, 0, 0]),
        Err(TensorError::WrongNumberOfIndices { expected: 5, actual: 4 })
    ));
    assert!(matches!(
        t.get_checked(&[4, 0, 0, 0, 1]),
        Err(TensorError::IndexOutOfBounds { index: 4, dim_size: 4 })
    ));
    assert!(t.get_checked(&[0, 0, 3, 0, 1]).is_err());
    assert_eq!(t.get_checked(&[3, 2, 1, 0, 1]).unwrap(), 0.0);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_get_panics_out_of_range() {
    let t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    t.get(&[0, 0, 0, 5, 1]);
}

#[test]
fn test_natural_dense_roundtrip() {
    let mut rng = StdRng::seed_from_u64(7);
    let t = Tensor::<f64>::random_with_rng(composite_axes(), &mut rng).unwrap();
    let dense = t.to_natural_dense();
    assert_eq!(dense.len(), 4 * 81);

    let back = Tensor::<f64>::from_natural_dense(&dense, composite_axes()).unwrap();
    assert_eq!(back, t);

    assert!(matches!(
        Tensor::<f64>::from_natural_dense(&dense[1..], composite_axes()),
        Err(TensorError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_canonical_coords_cover_buffer() {
    let t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    let first = t.canonical_natural_coords(0);
    assert_eq!(first, vec![0, 0, 0, 0, 1]);
    let last = t.canonical_natural_coords(t.len() - 1);
    assert_eq!(last, vec![3, 2, 2, 1, 2]);
}

#[test]
fn test_labels_address_components() {
    let mut t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    let ids = t.accessor().natural_element(&["Z", "Y", "X", "Z"]).unwrap();
    assert_eq!(ids.as_slice(), &[2, 1, 0, 2]);

    let mut coords = vec![1];
    coords.extend_from_slice(&ids);
    t.set(&coords, 2.5).unwrap();
    assert_eq!(t.get(&[1, 1, 2, 2, 0]), -2.5);

    let access = t.accessor().access_element(&["Z", "Y", "X", "Z"]).unwrap();
    assert_eq!(t.get_access(&[1, access[0], access[1]]), 2.5);

    assert!(matches!(
        t.accessor().natural_element(&["Z", "Y", "W", "Z"]),
        Err(TensorError::UnknownLabel { .. })
    ));
}

#[test]
fn test_relabel_keeps_values() {
    let mut t = Tensor::<f64>::zeros(composite_axes()).unwrap();
    t.set(&[0, 0, 1, 0, 1], 1.5).unwrap();
    t.relabel("c", &xyz("p")).unwrap();
    assert_eq!(t.natural_domain().names(), vec!["grid", "a", "b", "p", "d"]);
    assert_eq!(t.get(&[0, 1, 0, 1, 0]), -1.5);

    assert!(matches!(
        t.relabel("c", &xyz("q")),
        Err(TensorError::IndexNotFound { .. })
    ));
    assert!(t.relabel("d", &NaturalIndex::with_cardinality("q", 2)).is_err());
}

#[test]
fn test_complex_entries() {
    let mut t = Tensor::<c64>::zeros(vec![
        AntisymmetricIndex::new(vec![xyz("i"), xyz("j")]).unwrap().into(),
    ])
    .unwrap();
    t.set(&[0, 2], c64::new(1.0, -2.0)).unwrap();
    let swapped = t.get(&[2, 0]);
    assert_relative_eq!(swapped.re, -1.0);
    assert_relative_eq!(swapped.im, 2.0);
}

#[test]
fn test_full_index_matches_plain_buffer() {
    let data: Vec<f64> = (0..27).map(f64::from).collect();
    let t = Tensor::<f64>::from_vec(
        data.clone(),
        vec![FullIndex::new(vec![xyz("a"), xyz("b"), xyz("c")]).unwrap().into()],
    )
    .unwrap();
    assert_eq!(t.natural_layout_shape(), Some(vec![3, 3, 3]));
    assert_eq!(t.to_natural_dense(), data);
    assert_eq!(*t.at(&[14]), 14.0);
}
