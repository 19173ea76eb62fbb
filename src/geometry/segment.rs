use crate::math::bezier::{
    at_shared_endpoint, bezier_length, bezier_point, bezier_split, curve_curve_crossings,
    find_boundary, line_curve_crossings,
};
use crate::math::intersect_2d::{lerp, segment_segment_intersect_2d, Crossing};
use crate::math::{Aabb, CubicPoints, Point2};

/// An atomic, coordinate-resolved piece of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A straight line from the first to the second point.
    Line([Point2; 2]),
    /// A cubic Bezier: start, control 1, control 2, end.
    Curve(CubicPoints),
}

impl Segment {
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Line([p0, _]) => *p0,
            Self::Curve([p0, ..]) => *p0,
        }
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Line([_, p1]) => *p1,
            Self::Curve([.., p3]) => *p3,
        }
    }

    #[must_use]
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::Curve(_))
    }

    /// Length of the segment (flattened for curves).
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line([p0, p1]) => (p1 - p0).norm(),
            Self::Curve(c) => bezier_length(c),
        }
    }

    /// Evaluates the segment at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line([p0, p1]) => lerp(p0, p1, t),
            Self::Curve(c) => bezier_point(c, t),
        }
    }

    /// Splits at `t`, returning the leading and trailing pieces.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Line([p0, p1]) => {
                let mid = lerp(p0, p1, t);
                (Self::Line([*p0, mid]), Self::Line([mid, *p1]))
            }
            Self::Curve(c) => {
                let (head, tail) = bezier_split(c, t);
                (Self::Curve(head), Self::Curve(tail))
            }
        }
    }

    /// Returns the segment with its start moved to `point`.
    #[must_use]
    pub fn with_start(mut self, point: Point2) -> Self {
        match &mut self {
            Self::Line(pts) => pts[0] = point,
            Self::Curve(pts) => pts[0] = point,
        }
        self
    }

    /// Returns the segment with its end moved to `point`.
    #[must_use]
    pub fn with_end(mut self, point: Point2) -> Self {
        match &mut self {
            Self::Line(pts) => pts[1] = point,
            Self::Curve(pts) => pts[3] = point,
        }
        self
    }

    /// Returns the same geometry traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match *self {
            Self::Line([p0, p1]) => Self::Line([p1, p0]),
            Self::Curve([p0, p1, p2, p3]) => Self::Curve([p3, p2, p1, p0]),
        }
    }

    /// Axis-aligned bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Line([p0, p1]) => Aabb::from_corners(*p0, *p1),
            Self::Curve(c) => find_boundary(c),
        }
    }

    /// Interior crossings with another segment.
    ///
    /// `t_a` refers to `self` and `t_b` to `other`. Touches at an endpoint
    /// shared by both segments are not crossings.
    #[must_use]
    pub fn crossings(&self, other: &Self) -> Vec<Crossing> {
        let hits = match (self, other) {
            (Self::Line([a0, a1]), Self::Line([b0, b1])) => {
                segment_segment_intersect_2d(a0, a1, b0, b1)
                    .into_iter()
                    .collect()
            }
            (Self::Line([a0, a1]), Self::Curve(c)) => line_curve_crossings(a0, a1, c),
            (Self::Curve(c), Self::Line([b0, b1])) => line_curve_crossings(b0, b1, c)
                .into_iter()
                .map(|h| Crossing {
                    point: h.point,
                    t_a: h.t_b,
                    t_b: h.t_a,
                })
                .collect(),
            (Self::Curve(a), Self::Curve(b)) => curve_curve_crossings(a, b),
        };

        let ends_a = [self.start(), self.end()];
        let ends_b = [other.start(), other.end()];
        hits.into_iter()
            .filter(|h| {
                !at_shared_endpoint(&h.point, [&ends_a[0], &ends_a[1]], [&ends_b[0], &ends_b[1]])
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn line_split_and_ends() {
        let line = Segment::Line([p(0.0, 0.0), p(10.0, 0.0)]);
        let (head, tail) = line.split_at(0.3);
        assert_eq!(head.end(), p(3.0, 0.0));
        assert_eq!(tail.start(), p(3.0, 0.0));
        assert_relative_eq!(head.length() + tail.length(), 10.0);
    }

    #[test]
    fn reversed_swaps_ends() {
        let curve = Segment::Curve([p(0.0, 0.0), p(1.0, 2.0), p(3.0, 2.0), p(4.0, 0.0)]);
        let rev = curve.reversed();
        assert_eq!(rev.start(), p(4.0, 0.0));
        assert_eq!(rev.end(), p(0.0, 0.0));
        assert_relative_eq!(rev.length(), curve.length(), epsilon = 1e-9);
    }

    #[test]
    fn with_end_moves_only_end() {
        let curve = Segment::Curve([p(0.0, 0.0), p(1.0, 2.0), p(3.0, 2.0), p(4.0, 0.0)]);
        let moved = curve.with_end(p(5.0, 1.0));
        assert_eq!(moved.start(), p(0.0, 0.0));
        assert_eq!(moved.end(), p(5.0, 1.0));
    }

    #[test]
    fn crossing_lines() {
        let a = Segment::Line([p(0.0, 0.0), p(10.0, 10.0)]);
        let b = Segment::Line([p(0.0, 10.0), p(10.0, 0.0)]);
        let hits = a.crossings(&b);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].point.x, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn shared_endpoint_is_not_a_crossing() {
        let a = Segment::Line([p(0.0, 0.0), p(10.0, 0.0)]);
        let b = Segment::Line([p(10.0, 0.0), p(10.0, 10.0)]);
        assert!(a.crossings(&b).is_empty());
    }

    #[test]
    fn curve_line_parameters_follow_argument_order() {
        let curve = Segment::Curve([p(0.0, 0.0), p(0.0, 40.0), p(40.0, 40.0), p(40.0, 0.0)]);
        let line = Segment::Line([p(-10.0, 20.0), p(50.0, 20.0)]);
        let from_curve = curve.crossings(&line);
        let from_line = line.crossings(&curve);
        assert_eq!(from_curve.len(), 2);
        assert_eq!(from_line.len(), 2);
        for h in &from_curve {
            let on_curve = curve.point_at(h.t_a);
            let on_line = line.point_at(h.t_b);
            assert_relative_eq!(on_curve.y, 20.0, epsilon = 1e-6);
            assert_relative_eq!(on_line.x, on_curve.x, epsilon = 1e-6);
        }
    }

    #[test]
    fn curve_bounding_box() {
        let curve = Segment::Curve([p(0.0, 0.0), p(0.0, 40.0), p(40.0, 40.0), p(40.0, 0.0)]);
        let bbox = curve.bounding_box();
        assert_relative_eq!(bbox.max.y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.x, 40.0);
    }
}
