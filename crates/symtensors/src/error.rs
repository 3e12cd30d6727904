//! Error types for symtensors.

use thiserror::Error;

/// Errors that can occur while building or using symmetric tensors.
///
/// Variants fall in two groups. Configuration errors describe an ill-formed
/// index composition and are reported by constructors before any data flows.
/// The remaining variants report a violated precondition at a checked entry
/// point.
#[derive(Debug, Error)]
pub enum TensorError {
    /// Axes grouped under one symmetry have different cardinalities.
    #[error("{structure} index groups axes of unequal cardinality: expected {expected}, got {actual}")]
    CardinalityMismatch {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An index was built without any natural axis.
    #[error("{structure} index requires at least one natural axis")]
    EmptyIndex { structure: &'static str },

    /// Tableau rows must be positive and non-increasing.
    #[error("invalid Young tableau shape {shape:?}")]
    InvalidTableauShape { shape: Vec<usize> },

    /// Tableau shape does not match the rank of the index it describes.
    #[error("Young tableau {shape:?} has {tableau_rank} boxes but the index has rank {rank}")]
    TableauRankMismatch {
        shape: Vec<usize>,
        tableau_rank: usize,
        rank: usize,
    },

    /// A linear-combination index is followed by further index axes.
    #[error("linear-combination index at position {position} must be the last of {count} index axes")]
    LinearCombinationAxisNotLast { position: usize, count: usize },

    /// More than one linear-combination index in one tensor.
    #[error("at most one linear-combination index is supported per tensor, got {count}")]
    MultipleLinearCombinationAxes { count: usize },

    /// Shape mismatch between data length and expected size.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// Wrong number of indices provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Operation requires specific tensor rank.
    #[error("expected tensor of rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// Label is not part of a natural index.
    #[error("label {label:?} is not part of natural index {index:?}")]
    UnknownLabel { index: String, label: String },

    /// Natural index not found among the axes of a tensor.
    #[error("natural index {name:?} not found")]
    IndexNotFound { name: String },

    /// Write to a component fixed by the index structure (zero, one or a sign).
    #[error("component is structurally constant and cannot be written")]
    StructuralComponent,

    /// Write through a natural coordinate on a linear-combination index.
    #[error("component of a linear-combination index cannot be written through natural coordinates")]
    LinearCombinationComponent,

    /// Axis layout of a tensor does not match what an operation expects.
    #[error("axis mismatch: {message}")]
    AxisMismatch { message: String },

    /// CSR arrays disagree in length.
    #[error("CSR length mismatch in {array}: expected {expected}, got {actual}")]
    CsrLengthMismatch {
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    /// CSR row offsets are not monotonically non-decreasing.
    #[error("CSR row offsets decrease at row {row}: {curr} > {next}")]
    CsrRowOffsetsNotSorted { row: usize, curr: usize, next: usize },

    /// More rows pushed than the head axis holds.
    #[error("CSR already holds all {nrows} rows")]
    CsrFull { nrows: usize },

    /// A persisted CSR stream does not follow the expected layout.
    #[error("corrupt CSR stream: {message}")]
    CorruptCsrStream { message: String },

    /// I/O failure while persisting or loading a CSR container.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TensorError {
    /// Whether this error describes an ill-formed index composition.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            TensorError::CardinalityMismatch { .. }
                | TensorError::EmptyIndex { .. }
                | TensorError::InvalidTableauShape { .. }
                | TensorError::TableauRankMismatch { .. }
                | TensorError::LinearCombinationAxisNotLast { .. }
                | TensorError::MultipleLinearCombinationAxes { .. }
        )
    }
}
