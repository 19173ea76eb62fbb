//! Cubic Bezier evaluation, measurement, splitting and intersection.

use super::intersect_2d::Crossing;
use super::polynomial::{cubic_roots, quadratic_roots};
use super::{Aabb, CubicPoints, Point2, TOLERANCE};

/// Number of chords used to flatten a curve when measuring its length.
pub const BEZIER_LENGTH_STEPS: u32 = 100;

/// Curves shorter than this never report curve-curve intersections.
pub const MIN_INTERSECT_LENGTH: f64 = 10.0;

/// Bounding-box size at which curve-curve subdivision stops.
const CURVE_INTERSECT_RESOLUTION: f64 = 1e-4;

/// Subdivision depth limit for curve-curve intersection.
const CURVE_INTERSECT_MAX_DEPTH: u32 = 40;

/// Upper bound on box pairs examined by one curve-curve query.
const CURVE_INTERSECT_MAX_PAIRS: usize = 200_000;

/// Hits closer than this are the same intersection.
const MERGE_DISTANCE: f64 = 1e-2;

/// Distance under which a point counts as sitting on an endpoint.
pub const ENDPOINT_TOLERANCE: f64 = 1e-3;

/// Largest distance from the line at which a line-curve root is accepted.
const ON_LINE_TOLERANCE: f64 = 1e-3;

/// Samples used for the coarse pass of [`bezier_delta`].
const DELTA_SAMPLES: u32 = 100;

/// Which extreme of a curve [`find_edge`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Smallest X.
    Left,
    /// Largest X.
    Right,
    /// Smallest Y (Y grows downwards).
    Top,
    /// Largest Y.
    Bottom,
}

/// Evaluates the curve at parameter `t`.
#[must_use]
pub fn bezier_point(curve: &CubicPoints, t: f64) -> Point2 {
    let [p0, p1, p2, p3] = curve;
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point2::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Approximate arc length, summing the chords of a flattened curve.
#[must_use]
pub fn bezier_length(curve: &CubicPoints) -> f64 {
    let mut length = 0.0;
    let mut previous = curve[0];
    for i in 1..=BEZIER_LENGTH_STEPS {
        let point = bezier_point(curve, f64::from(i) / f64::from(BEZIER_LENGTH_STEPS));
        length += (point - previous).norm();
        previous = point;
    }
    length
}

/// Splits the curve at `t` using de Casteljau's construction.
///
/// The trailing half is the same as splitting the reversed curve at `1 - t`.
#[must_use]
pub fn bezier_split(curve: &CubicPoints, t: f64) -> (CubicPoints, CubicPoints) {
    let [p0, p1, p2, p3] = *curve;
    let p01 = p0 + (p1 - p0) * t;
    let p12 = p1 + (p2 - p1) * t;
    let p23 = p2 + (p3 - p2) * t;
    let p012 = p01 + (p12 - p01) * t;
    let p123 = p12 + (p23 - p12) * t;
    let mid = p012 + (p123 - p012) * t;
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}

/// Parameter of the curve point closest to `target`.
///
/// A coarse scan picks the best sample, then a shrinking local search
/// refines it.
#[must_use]
pub fn bezier_delta(curve: &CubicPoints, target: &Point2) -> f64 {
    let dist_at = |t: f64| (bezier_point(curve, t) - target).norm_squared();

    let mut best_t = 0.0;
    let mut best_d = dist_at(0.0);
    for i in 1..=DELTA_SAMPLES {
        let t = f64::from(i) / f64::from(DELTA_SAMPLES);
        let d = dist_at(t);
        if d < best_d {
            best_t = t;
            best_d = d;
        }
    }

    let mut step = 1.0 / f64::from(DELTA_SAMPLES);
    for _ in 0..200 {
        if step < 1e-12 {
            break;
        }
        let mut improved = false;
        for candidate in [best_t - step, best_t + step] {
            let candidate = candidate.clamp(0.0, 1.0);
            let d = dist_at(candidate);
            if d < best_d {
                best_t = candidate;
                best_d = d;
                improved = true;
            }
        }
        if !improved {
            step *= 0.5;
        }
    }
    best_t
}

/// Polynomial coefficients `[a, b, c, d]` of `a·t³ + b·t² + c·t + d` for one
/// scalar component of a cubic.
fn cubic_coefficients(v0: f64, v1: f64, v2: f64, v3: f64) -> [f64; 4] {
    [
        -v0 + 3.0 * v1 - 3.0 * v2 + v3,
        3.0 * v0 - 6.0 * v1 + 3.0 * v2,
        -3.0 * v0 + 3.0 * v1,
        v0,
    ]
}

/// Crossings of the segment `a → b` with the curve.
///
/// `t_a` is the parameter on the segment and `t_b` the parameter on the
/// curve. Endpoints are not filtered.
#[must_use]
pub fn line_curve_crossings(a: &Point2, b: &Point2, curve: &CubicPoints) -> Vec<Crossing> {
    let dir = b - a;
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return Vec::new();
    }

    // Signed distances of the control points from the line.
    let len = len_sq.sqrt();
    let [d0, d1, d2, d3] = curve.map(|p| (dir.x * (p.y - a.y) - dir.y * (p.x - a.x)) / len);
    let [c3, c2, c1, c0] = cubic_coefficients(d0, d1, d2, d3);

    let eps = 1e-9;
    let mut hits: Vec<Crossing> = Vec::new();
    for t in cubic_roots(c3, c2, c1, c0) {
        if t < -eps || t > 1.0 + eps {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        let point = bezier_point(curve, t);
        let s = (point - a).dot(&dir) / len_sq;
        if s < -eps || s > 1.0 + eps {
            continue;
        }
        let off_line = (dir.x * (point.y - a.y) - dir.y * (point.x - a.x)) / len;
        if off_line.abs() > ON_LINE_TOLERANCE {
            continue;
        }
        if hits.iter().any(|h| (h.point - point).norm() < MERGE_DISTANCE) {
            continue;
        }
        hits.push(Crossing {
            point,
            t_a: s.clamp(0.0, 1.0),
            t_b: t,
        });
    }
    hits
}

/// Intersection points of the segment `a → b` with the curve.
///
/// Points that coincide with an endpoint of the segment or of the curve are
/// left out.
#[must_use]
pub fn line_curve_intersections(a: &Point2, b: &Point2, curve: &CubicPoints) -> Vec<Point2> {
    let ends = [*a, *b, curve[0], curve[3]];
    line_curve_crossings(a, b, curve)
        .into_iter()
        .map(|h| h.point)
        .filter(|p| ends.iter().all(|e| (e - p).norm() > TOLERANCE))
        .collect()
}

/// Points where the curve crosses the vertical line `x = value`.
#[must_use]
pub fn curve_crosses_x(curve: &CubicPoints, value: f64) -> Vec<Point2> {
    axis_crossings(curve, value, |p| p.x)
}

/// Points where the curve crosses the horizontal line `y = value`.
#[must_use]
pub fn curve_crosses_y(curve: &CubicPoints, value: f64) -> Vec<Point2> {
    axis_crossings(curve, value, |p| p.y)
}

fn axis_crossings(curve: &CubicPoints, value: f64, axis: impl Fn(&Point2) -> f64) -> Vec<Point2> {
    let [a, b, c, d] = cubic_coefficients(
        axis(&curve[0]) - value,
        axis(&curve[1]) - value,
        axis(&curve[2]) - value,
        axis(&curve[3]) - value,
    );
    let mut points: Vec<Point2> = Vec::new();
    for t in cubic_roots(a, b, c, d) {
        if !(-1e-9..=1.0 + 1e-9).contains(&t) {
            continue;
        }
        let point = bezier_point(curve, t.clamp(0.0, 1.0));
        if points.iter().all(|q| (q - point).norm() >= MERGE_DISTANCE) {
            points.push(point);
        }
    }
    points
}

/// Crossings of two curves found by recursive bounding-box subdivision.
///
/// Either curve shorter than [`MIN_INTERSECT_LENGTH`] yields no crossings.
/// Hits at shared endpoints are not filtered here.
#[must_use]
pub fn curve_curve_crossings(a: &CubicPoints, b: &CubicPoints) -> Vec<Crossing> {
    if bezier_length(a) < MIN_INTERSECT_LENGTH || bezier_length(b) < MIN_INTERSECT_LENGTH {
        return Vec::new();
    }

    #[derive(Clone, Copy)]
    struct Piece {
        curve: CubicPoints,
        t0: f64,
        t1: f64,
    }

    let whole = |curve: &CubicPoints| Piece {
        curve: *curve,
        t0: 0.0,
        t1: 1.0,
    };
    let halves = |piece: &Piece| {
        let (left, right) = bezier_split(&piece.curve, 0.5);
        let mid = (piece.t0 + piece.t1) * 0.5;
        [
            Piece {
                curve: left,
                t0: piece.t0,
                t1: mid,
            },
            Piece {
                curve: right,
                t0: mid,
                t1: piece.t1,
            },
        ]
    };

    let mut hits: Vec<Crossing> = Vec::new();
    let mut queue = vec![(whole(a), whole(b), 0_u32)];
    let mut examined = 0_usize;

    while let Some((pa, pb, depth)) = queue.pop() {
        examined += 1;
        if examined > CURVE_INTERSECT_MAX_PAIRS {
            tracing::warn!(
                found = hits.len(),
                "curve-curve intersection gave up; curves likely overlap"
            );
            break;
        }

        let (Some(box_a), Some(box_b)) =
            (Aabb::from_points(&pa.curve), Aabb::from_points(&pb.curve))
        else {
            continue;
        };
        if !box_a.overlaps(&box_b) {
            continue;
        }

        let small = |bbox: &Aabb| {
            bbox.width() < CURVE_INTERSECT_RESOLUTION && bbox.height() < CURVE_INTERSECT_RESOLUTION
        };
        if (small(&box_a) && small(&box_b)) || depth >= CURVE_INTERSECT_MAX_DEPTH {
            let t_a = (pa.t0 + pa.t1) * 0.5;
            let t_b = (pb.t0 + pb.t1) * 0.5;
            let point = bezier_point(a, t_a);
            if hits.iter().all(|h| (h.point - point).norm() >= MERGE_DISTANCE) {
                hits.push(Crossing { point, t_a, t_b });
            }
            continue;
        }

        for left in halves(&pa) {
            for right in halves(&pb) {
                queue.push((left, right, depth + 1));
            }
        }
    }

    hits.sort_by(|x, y| x.t_a.total_cmp(&y.t_a));
    hits
}

/// Intersection points of two curves, skipping points where the curves share
/// an endpoint.
#[must_use]
pub fn curve_curve_intersections(a: &CubicPoints, b: &CubicPoints) -> Vec<Point2> {
    curve_curve_crossings(a, b)
        .into_iter()
        .filter(|h| !at_shared_endpoint(&h.point, [&a[0], &a[3]], [&b[0], &b[3]]))
        .map(|h| h.point)
        .collect()
}

/// Returns `true` when `point` sits on an endpoint of both segments.
#[must_use]
pub fn at_shared_endpoint(point: &Point2, ends_a: [&Point2; 2], ends_b: [&Point2; 2]) -> bool {
    let near = |e: &&Point2| (*e - point).norm() < ENDPOINT_TOLERANCE;
    ends_a.iter().any(near) && ends_b.iter().any(near)
}

/// Handle length for a cubic approximating a quarter circle of `radius`.
#[must_use]
pub fn bezier_circle(radius: f64) -> f64 {
    radius * 4.0 * (std::f64::consts::SQRT_2 - 1.0) / 3.0
}

/// Parameters in `[0, 1]` where the derivative vanishes along either axis.
#[must_use]
pub fn bezier_extrema(curve: &CubicPoints) -> Vec<f64> {
    let [p0, p1, p2, p3] = curve.map(|p| p.coords);
    // curve'(t) / 3 = a·t² + b·t + c per axis
    let a = -p0 + p1 * 3.0 - p2 * 3.0 + p3;
    let b = p0 * 2.0 - p1 * 4.0 + p2 * 2.0;
    let c = p1 - p0;

    quadratic_roots(a.x, b.x, c.x)
        .into_iter()
        .chain(quadratic_roots(a.y, b.y, c.y))
        .filter(|t| (0.0..=1.0).contains(t))
        .collect()
}

/// Tight axis-aligned bounding box of the curve.
#[must_use]
pub fn find_boundary(curve: &CubicPoints) -> Aabb {
    bezier_extrema(curve)
        .into_iter()
        .fold(Aabb::from_corners(curve[0], curve[3]), |bbox, t| {
            bbox.extend(bezier_point(curve, t))
        })
}

/// The most extreme point of the curve in the given direction.
#[must_use]
pub fn find_edge(curve: &CubicPoints, edge: Edge) -> Point2 {
    let key = |p: &Point2| match edge {
        Edge::Left => -p.x,
        Edge::Right => p.x,
        Edge::Top => -p.y,
        Edge::Bottom => p.y,
    };
    bezier_extrema(curve)
        .into_iter()
        .map(|t| bezier_point(curve, t))
        .chain([curve[3]])
        .fold(curve[0], |best, p| if key(&p) > key(&best) { p } else { best })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn golden() -> CubicPoints {
        [p(50.0, 50.0), p(0.0, 0.0), p(0.0, 100.0), p(100.0, 100.0)]
    }

    #[test]
    fn point_at_ends_and_middle() {
        let c = golden();
        assert_eq!(bezier_point(&c, 0.0), c[0]);
        assert_eq!(bezier_point(&c, 1.0), c[3]);
        let mid = bezier_point(&c, 0.5);
        assert_relative_eq!(mid.x, 18.75);
        assert_relative_eq!(mid.y, 56.25);
    }

    /// A quadratic raised to a cubic, as pattern software exports it.
    fn elevated(q0: Point2, q1: Point2, q2: Point2) -> CubicPoints {
        [
            q0,
            q0 + (q1 - q0) * (2.0 / 3.0),
            q2 + (q1 - q2) * (2.0 / 3.0),
            q2,
        ]
    }

    #[test]
    fn near_quadratic_curve_has_no_phantom_crossing() {
        let c = elevated(p(165.0, 1117.0), p(828.7, 1992.8), p(936.2, 527.8));
        assert!(line_curve_crossings(&p(-196.2, -108.1), &p(1398.7, -233.4), &c).is_empty());

        let a = p(0.0, 1300.0);
        let b = p(1200.0, 900.0);
        let hits = line_curve_crossings(&a, &b, &c);
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_relative_eq!(hit.point.x, 1200.0 * hit.t_a, epsilon = 1e-6);
            assert_relative_eq!(hit.point.y, 1300.0 - 400.0 * hit.t_a, epsilon = 1e-6);
            let on_curve = bezier_point(&c, hit.t_b);
            assert_relative_eq!(on_curve.x, hit.point.x, epsilon = 1e-9);
        }
        assert_relative_eq!(hits[0].point.x, 246.2848, epsilon = 1e-3);
        assert_relative_eq!(hits[1].point.x, 873.3978, epsilon = 1e-3);
    }

    #[test]
    fn length_golden_value() {
        assert_relative_eq!(bezier_length(&golden()), 151.8028, epsilon = 1e-3);
    }

    #[test]
    fn length_of_straight_curve() {
        let c = [p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0), p(30.0, 0.0)];
        assert_relative_eq!(bezier_length(&c), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn split_golden_value() {
        let (head, tail) = bezier_split(&golden(), 0.44);
        assert_relative_eq!(head[0].x, 50.0);
        assert_relative_eq!(head[1].x, 28.0, epsilon = 1e-9);
        assert_relative_eq!(head[1].y, 28.0, epsilon = 1e-9);
        assert_relative_eq!(head[2].x, 15.68, epsilon = 1e-9);
        assert_relative_eq!(head[2].y, 35.04, epsilon = 1e-9);
        assert_relative_eq!(head[3].x, 17.299, epsilon = 1e-3);
        assert_relative_eq!(head[3].y, 49.824, epsilon = 1e-3);
        assert_eq!(head[3], tail[0]);
        assert_eq!(tail[3], p(100.0, 100.0));
    }

    #[test]
    fn split_preserves_length() {
        let c = golden();
        for t in [0.1, 0.37, 0.5, 0.82] {
            let (head, tail) = bezier_split(&c, t);
            let sum = bezier_length(&head) + bezier_length(&tail);
            assert_relative_eq!(sum, bezier_length(&c), max_relative = 1e-3);
        }
    }

    #[test]
    fn delta_recovers_parameter() {
        let c = golden();
        for t in [0.0, 0.13, 0.44, 0.9, 1.0] {
            let target = bezier_point(&c, t);
            assert_relative_eq!(bezier_delta(&c, &target), t, epsilon = 1e-6);
        }
    }

    #[test]
    fn line_crosses_curve() {
        let c = golden();
        let hits = line_curve_intersections(&p(0.0, 50.0), &p(100.0, 50.0), &c);
        // The curve starts on this line at (50, 50); that endpoint is excluded.
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert_relative_eq!(hits[0].y, 50.0, epsilon = 1e-9);
        assert!(hits[0].x < 50.0);
    }

    #[test]
    fn short_line_misses_curve() {
        let hits = line_curve_intersections(&p(60.0, 0.0), &p(60.0, 10.0), &golden());
        assert!(hits.is_empty());
    }

    #[test]
    fn axis_crossings() {
        let c = golden();
        let hits = curve_crosses_y(&c, 75.0);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].y, 75.0, epsilon = 1e-9);
        assert!(curve_crosses_x(&c, 10.0).is_empty());
        let hits = curve_crosses_x(&c, 20.0);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn curve_curve_golden_value() {
        let a = golden();
        let b = [p(0.0, 0.0), p(50.0, 50.0), p(100.0, 100.0), p(0.0, 100.0)];
        let mut hits = curve_curve_intersections(&a, &b);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        hits.sort_by(|x, y| x.y.total_cmp(&y.y));
        assert_relative_eq!(hits[0].x, 38.111, epsilon = 1e-2);
        assert_relative_eq!(hits[0].y, 40.187, epsilon = 1e-2);
        assert_relative_eq!(hits[1].x, 51.358, epsilon = 1e-2);
        assert_relative_eq!(hits[1].y, 89.883, epsilon = 1e-2);
    }

    #[test]
    fn curves_sharing_an_endpoint_do_not_intersect() {
        let a = [p(0.0, 0.0), p(30.0, -20.0), p(60.0, -20.0), p(90.0, 0.0)];
        let b = [p(90.0, 0.0), p(120.0, 20.0), p(150.0, 20.0), p(180.0, 0.0)];
        assert!(curve_curve_intersections(&a, &b).is_empty());
    }

    #[test]
    fn short_curves_never_intersect() {
        let a = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 1.0), p(3.0, 0.0)];
        let b = [p(0.0, 1.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 1.0)];
        assert!(curve_curve_intersections(&a, &b).is_empty());
    }

    #[test]
    fn circle_constant() {
        assert_relative_eq!(bezier_circle(100.0), 55.2285, epsilon = 1e-4);
    }

    #[test]
    fn circle_quadrant_accuracy() {
        let r = 100.0;
        let k = bezier_circle(r);
        let quadrant = [p(r, 0.0), p(r, -k), p(k, -r), p(0.0, -r)];
        for i in 0..=20 {
            let q = bezier_point(&quadrant, f64::from(i) / 20.0);
            let err = (q.coords.norm() - r).abs() / r;
            assert!(err < 0.003, "err={err}");
        }
    }

    #[test]
    fn boundary_uses_extrema() {
        let bbox = find_boundary(&golden());
        assert_relative_eq!(bbox.max.x, 100.0);
        assert_relative_eq!(bbox.max.y, 100.0);
        assert!(bbox.min.x > 0.0 && bbox.min.x < 50.0, "min.x={}", bbox.min.x);
        assert!(bbox.min.y > 0.0 && bbox.min.y < 50.0, "min.y={}", bbox.min.y);
        for i in 0..=100 {
            let q = bezier_point(&golden(), f64::from(i) / 100.0);
            assert!(q.x >= bbox.min.x - 1e-9 && q.y >= bbox.min.y - 1e-9);
        }
    }

    #[test]
    fn edges() {
        let c = golden();
        let left = find_edge(&c, Edge::Left);
        assert_relative_eq!(left.x, find_boundary(&c).min.x);
        assert_eq!(find_edge(&c, Edge::Right), p(100.0, 100.0));
        assert_eq!(find_edge(&c, Edge::Bottom), p(100.0, 100.0));
        let top = find_edge(&c, Edge::Top);
        assert_relative_eq!(top.y, find_boundary(&c).min.y);
    }
}
