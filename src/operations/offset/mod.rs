mod assemble;
mod raw_offset;
mod self_intersect;
pub mod stack;
mod stitch;

pub use stack::{find_intersections, IntersectionRecord, StackEntry};

use crate::error::{OperationError, Result};
use crate::math::TOLERANCE;
use crate::part::{Part, Path};

/// Stem used for generated point keys when none is given.
const DEFAULT_STEM: &str = "offset";

/// Tuning knobs for [`PathOffset2D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Largest accepted deviation of an offset curve from the ideal offset,
    /// as a percentage of the offset distance.
    pub tolerance_percent: f64,
    /// Source curves at or below this length are never subdivided.
    pub min_subdivide_length: f64,
    /// Maximum number of nested subdivisions of one source curve.
    pub max_depth: u32,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            tolerance_percent: 10.0,
            min_subdivide_length: 20.0,
            max_depth: 20,
        }
    }
}

/// Offsets a path by a signed perpendicular distance.
///
/// Positive distances move to the left of the direction of travel as seen
/// on screen, which is outward for a clockwise outline. The result keeps
/// the source's open/closed topology and is drawn over new points stored
/// in the part.
///
/// Pipeline:
/// 1. decompose the source into line and curve segments
/// 2. offset each segment, subdividing curves that miss the tolerance
/// 3. trim self-intersections
/// 4. bridge gaps between consecutive pieces with lines
/// 5. assemble the pieces into a new path
#[derive(Debug)]
pub struct PathOffset2D {
    path: Path,
    distance: f64,
    options: OffsetOptions,
    stem: String,
}

impl PathOffset2D {
    /// Creates a new path offset operation.
    #[must_use]
    pub fn new(path: Path, distance: f64) -> Self {
        Self {
            path,
            distance,
            options: OffsetOptions::default(),
            stem: DEFAULT_STEM.to_owned(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: OffsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the stem of the generated point keys (`stem.N`, `stemStart`,
    /// `stemEnd`).
    #[must_use]
    pub fn named(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Executes the offset, storing the result points in `part`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a zero or non-finite
    /// distance, `OperationError::OffsetConstructionFailure` when the source
    /// has no segment long enough to offset, and `PartError::InvalidReference`
    /// when the source refers to a missing point.
    pub fn execute(&self, part: &mut Part) -> Result<Path> {
        if !self.distance.is_finite() || self.distance.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "offset distance must be finite and non-zero, got {}",
                self.distance
            ))
            .into());
        }

        let closed = self.path.is_closed();
        let segments = self.path.segments(part)?;

        // Step 1: Offset each segment.
        let raw = raw_offset::build(&segments, self.distance, &self.options);
        if raw.is_empty() {
            return Err(OperationError::OffsetConstructionFailure(
                "source path has no segment to offset".to_owned(),
            )
            .into());
        }
        tracing::debug!(
            source = segments.len(),
            offset = raw.len(),
            distance = self.distance,
            "offset segments"
        );

        // Step 2: Trim self-intersections.
        let repaired = self_intersect::repair(raw, closed);
        tracing::debug!(remaining = repaired.len(), "repaired self-intersections");

        // Step 3: Bridge gaps between consecutive pieces.
        let stitched = stitch::fill_gaps(&repaired, closed);
        tracing::debug!(entries = stitched.len(), closed, "filled gaps");

        // Step 4: Emit the result path.
        let mut path = assemble::build(&stitched, closed, &self.stem, part)?;
        path.render = self.path.render;
        path.attributes.clone_from(&self.path.attributes);
        Ok(path)
    }
}
