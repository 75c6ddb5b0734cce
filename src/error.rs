use thiserror::Error;

/// Top-level error type for the HPMC convex shape subsystem.
#[derive(Debug, Error)]
pub enum HpmcError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors raised while validating a shape submission.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    #[error("shape must have at least one vertex")]
    NoVertices,

    #[error("invalid vertex {index}: {reason}")]
    InvalidVertex { index: usize, reason: String },

    #[error("parameter {parameter} = {value} is out of range")]
    InvalidParameter { parameter: &'static str, value: f64 },
}

/// Errors raised by the parameter table and its runtime mirror.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("unknown particle type: {0}")]
    UnknownType(String),

    #[error("type count mismatch: simulation declares {expected} types, table holds {found}")]
    TypeCountMismatch { expected: usize, found: usize },

    #[error("type index {index} is out of range for {count} types")]
    TypeIndexOutOfRange { index: usize, count: usize },

    #[error("shape table is not attached")]
    NotAttached,
}

/// Convenience type alias for results using [`HpmcError`].
pub type Result<T> = std::result::Result<T, HpmcError>;
