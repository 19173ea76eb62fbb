//! Geometric kernel for drafting 2D garment patterns.
//!
//! A [`Part`] owns a table of named points and the paths drawn over them.
//! Paths are chains of straight lines and cubic Bezier curves; the offset
//! operation derives seam allowances from them.

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod part;

pub use error::{GeometryError, OperationError, PartError, Result, SeamkitError};
pub use part::{Part, Path, PathId, PathOp, PointId};
