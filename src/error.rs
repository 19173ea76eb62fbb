use thiserror::Error;

/// Top-level error type for the Seamkit drafting kernel.
#[derive(Debug, Error)]
pub enum SeamkitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Part(#[from] PartError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("cannot shift {requested} along a curve of length {length}")]
    OutOfCurve { requested: f64, length: f64 },

    #[error("point is {distance} away from the curve")]
    NotOnCurve { distance: f64 },
}

/// Errors related to the point table and path model of a part.
#[derive(Debug, Error)]
pub enum PartError {
    #[error("point not found: {0}")]
    InvalidReference(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("key already names another point: {0}")]
    KeyTaken(String),
}

/// Errors related to drafting operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("offset construction failed: {0}")]
    OffsetConstructionFailure(String),
}

/// Convenience type alias for results using [`SeamkitError`].
pub type Result<T> = std::result::Result<T, SeamkitError>;
