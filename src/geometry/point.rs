use std::fmt;

use crate::math::Point2;

/// A named drafting point: coordinates plus an optional human description.
///
/// Points are plain values. Storing one under a key copies it into the
/// owning part's table; later writes to that key replace the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub description: Option<String>,
}

impl Point {
    /// Creates a point without description.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            description: None,
        }
    }

    /// Returns this point with a description attached.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the coordinates as a math point.
    #[must_use]
    pub fn coords(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<Point2> for Point {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<&Point> for Point2 {
    fn from(p: &Point) -> Self {
        p.coords()
    }
}

impl fmt::Display for Point {
    /// Formats as `x,y`, the coordinate token used in rendered path data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
