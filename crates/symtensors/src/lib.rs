//! symtensors - tensors with algebraic index symmetries
//!
//! Components of a symmetric, antisymmetric, diagonal or otherwise
//! structured tensor are addressed through one natural multi-index API,
//! while only the independent values are stored.
//!
//! # Architecture
//!
//! ```text
//! NaturalIndex            - one named axis with labels and a character
//!     ↓
//! index::IndexKind        - Full, Symmetric, Antisymmetric, Diagonal,
//!                           Identity, LorentzianSign, YoungTableau
//!     ↓
//! accessor::TensorAccessor - natural / mem / access coordinates
//!     ↓
//! tensor::Tensor          - spectator axes + indices over a flat buffer
//!     ↓
//! sparse::Csr, contract   - compress/uncompress and contractions
//! ```
//!
//! # Example
//!
//! ```
//! use symtensors::{NaturalIndex, SymmetricIndex, Tensor};
//!
//! let x = NaturalIndex::new("x", ["X", "Y", "Z"]);
//! let sym = SymmetricIndex::new(vec![x.clone(), x.renamed("y")]).unwrap();
//!
//! // 6 independent components instead of 9
//! let mut t = Tensor::<f64>::zeros(vec![sym.into()]).unwrap();
//! assert_eq!(t.len(), 6);
//!
//! t.set(&[0, 2], 1.5).unwrap();
//! assert_eq!(t.get(&[2, 0]), 1.5);
//! ```

pub mod accessor;
pub mod contract;
pub mod domain;
pub mod error;
pub mod index;
pub mod natural;
pub mod random;
pub mod scalar;
pub mod sparse;
pub mod storage;
pub mod strides;
pub mod tensor;

pub use accessor::TensorAccessor;
pub use contract::tensor_prod;
pub use domain::{Domain, DomainAxis};
pub use error::TensorError;
pub use index::{
    AntisymmetricIndex, DiagonalIndex, FullIndex, IdentityIndex, IndexKind, LorentzianSignIndex,
    SymmetricIndex, TensorIndex, YoungTableau, YoungTableauIndex,
};
pub use natural::{Character, NaturalIndex};
pub use scalar::{Scalar, c64};
pub use sparse::Csr;
pub use storage::{Dense, DenseView, OwnedStorage, TensorStorage};
pub use tensor::{Axis, DenseTensor, Tensor};
