//! Diagonal, identity and metric-signature tensors.

use symtensors::{
    DiagonalIndex, FullIndex, IdentityIndex, LorentzianSignIndex, NaturalIndex, Tensor,
    TensorError,
};

fn xyz(name: &str) -> NaturalIndex {
    NaturalIndex::new(name, ["X", "Y", "Z"])
}

#[test]
fn test_diagonal_reads_and_writes() {
    let diag = DiagonalIndex::new(vec![xyz("i"), xyz("j"), xyz("k")]).unwrap();
    let mut t = Tensor::<f64>::zeros(vec![diag.into()]).unwrap();
    assert_eq!(t.len(), 3);

    t.set(&[1, 1, 1], 4.0).unwrap();
    assert_eq!(t.data(), &[0.0, 4.0, 0.0]);
    assert_eq!(t.get(&[1, 1, 1]), 4.0);
    assert_eq!(t.get(&[1, 1, 0]), 0.0);
    assert!(matches!(
        t.set(&[0, 1, 1], 1.0),
        Err(TensorError::StructuralComponent)
    ));
}

#[test]
fn test_diagonal_natural_dense() {
    let diag = DiagonalIndex::new(vec![xyz("i"), xyz("j")]).unwrap();
    let t = Tensor::<f64>::from_vec(vec![1.0, 2.0, 3.0], vec![diag.clone().into()]).unwrap();
    let dense = t.to_natural_dense();
    assert_eq!(dense, vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0]);

    // Off-diagonal input is dropped on the way back.
    let mut noisy = dense.clone();
    noisy[1] = 7.0;
    let back = Tensor::<f64>::from_natural_dense(&noisy, vec![diag.into()]).unwrap();
    assert_eq!(back.data(), t.data());
}

#[test]
fn test_identity_components() {
    let delta = IdentityIndex::new(vec![xyz("i"), xyz("j")]).unwrap();
    let mut t = Tensor::<f64>::zeros(vec![delta.into()]).unwrap();
    assert_eq!(t.mem_shape(), &[0]);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(t.get(&[i, j]), if i == j { 1.0 } else { 0.0 });
        }
    }
    assert!(matches!(
        t.set(&[0, 0], 2.0),
        Err(TensorError::StructuralComponent)
    ));
}

#[test]
fn test_identity_short_circuits_other_axes() {
    // The identity axis contributes no stored value, so the buffer is empty
    // even though the full axis has nine components.
    let t = Tensor::<f64>::zeros(vec![
        IdentityIndex::new(vec![xyz("i"), xyz("j")]).unwrap().into(),
        FullIndex::new(vec![xyz("k"), xyz("l")]).unwrap().into(),
    ])
    .unwrap();
    assert!(t.is_empty());
    assert_eq!(t.get(&[2, 2, 0, 1]), 1.0);
    assert_eq!(t.get(&[2, 1, 0, 1]), 0.0);
}

#[test]
fn test_lorentzian_signature() {
    let mu = NaturalIndex::new("mu", ["T", "X", "Y", "Z"]);
    let eta = LorentzianSignIndex::new(1, vec![mu.clone(), mu.renamed("nu")]).unwrap();
    let t = Tensor::<f64>::zeros(vec![eta.into()]).unwrap();
    let diagonal: Vec<f64> = (0..4).map(|i| t.get(&[i, i])).collect();
    assert_eq!(diagonal, vec![-1.0, 1.0, 1.0, 1.0]);
    assert_eq!(t.get(&[0, 1]), 0.0);

    let ids = t.accessor().natural_element(&["T", "T"]).unwrap();
    assert_eq!(t.get(&ids), -1.0);
    assert_eq!(t.access_domain().extents(), vec![3]);
}

#[test]
fn test_mixed_cardinality_rejected() {
    let err = DiagonalIndex::new(vec![xyz("i"), NaturalIndex::with_cardinality("j", 2)]).unwrap_err();
    assert!(matches!(err, TensorError::CardinalityMismatch { .. }));
    assert!(err.is_configuration_error());
}
