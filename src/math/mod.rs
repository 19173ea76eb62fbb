pub mod bezier;
pub mod intersect_2d;
pub mod polynomial;
pub mod primitives;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Control points of a cubic Bezier: start, first control, second control, end.
pub type CubicPoints = [Point2; 4];

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// An axis-aligned bounding box in the Y-down drafting plane.
///
/// `min` is the top-left corner, `max` the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum (top-left) corner of the bounding box.
    pub min: Point2,
    /// Maximum (bottom-right) corner of the bounding box.
    pub max: Point2,
}

impl Aabb {
    /// Creates the smallest box containing both points.
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates the smallest box containing every point, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_corners(*first, *first), |bbox, p| bbox.extend(*p)),
        )
    }

    /// Returns a box grown to also contain `point`.
    #[must_use]
    pub fn extend(self, point: Point2) -> Self {
        Self {
            min: Point2::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point2::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    /// Returns the union of two boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        self.extend(other.min).extend(other.max)
    }

    /// Returns a box grown by `margin` on every side.
    #[must_use]
    pub fn expand(self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Returns `true` when the two boxes overlap (touching counts).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
