use thiserror::Error;

use crate::store::Kind;

/// Errors reported by synthesis and store operations.
///
/// A failed operation never leaves a half-built object behind: the store is
/// only touched after the result has been fully constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevError {
    #[error("specification is not reversible: {0}")]
    NotReversible(String),

    #[error("line count mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("cannot embed function: {0}")]
    EmbeddingError(String),

    #[error("no circuit with at most {bound} gates exists")]
    Unsynthesizable { bound: usize },

    #[error("no {kind} entry{}", at_index(.index))]
    NotFound { kind: Kind, index: Option<usize> },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("BDD manager is full: {0}")]
    CapacityExceeded(String),

    #[error("SAT solver failure: {0}")]
    Solver(String),
}

fn at_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at index {}", i),
        None => String::new(),
    }
}

pub type Result<T, E = RevError> = std::result::Result<T, E>;

impl RevError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        RevError::MalformedInput(msg.into())
    }
}
