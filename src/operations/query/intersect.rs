use crate::error::Result;
use crate::operations::offset::{find_intersections, IntersectionRecord};
use crate::part::{Part, Path};

/// Finds the places where a path crosses itself.
///
/// Segments meeting at a shared endpoint do not count, so a simple outline
/// reports nothing.
#[derive(Debug)]
pub struct PathSelfIntersect<'a> {
    path: &'a Path,
}

impl<'a> PathSelfIntersect<'a> {
    /// Creates a new `PathSelfIntersect` query.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    /// Executes the query, returning one record per crossing pair of
    /// segments, indexed by position in [`Path::segments`].
    ///
    /// # Errors
    ///
    /// Returns an error if the path refers to a missing point.
    pub fn execute(&self, part: &Part) -> Result<Vec<IntersectionRecord>> {
        Ok(find_intersections(&self.path.segments(part)?))
    }
}
