use super::{Point2, Vector2, TOLERANCE};

/// A crossing between two parametric segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// The intersection point.
    pub point: Point2,
    /// Parameter on the first segment (0..1).
    pub t_a: f64,
    /// Parameter on the second segment (0..1).
    pub t_b: f64,
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
/// Parallelism is judged on the normalized directions so the test does not
/// depend on the magnitude of `d1` and `d2`.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    let scale = d1.norm() * d2.norm();
    if scale < TOLERANCE || (cross / scale).abs() < 1e-9 {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Intersection of the infinite lines through `a0, a1` and `b0, b1`.
///
/// Returns `None` for parallel or degenerate lines.
#[must_use]
pub fn beam_beam_intersect_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    let da = a1 - a0;
    let db = b1 - b0;
    line_line_intersect_2d(a0, &da, b0, &db).map(|(t, _)| a0 + da * t)
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns the crossing with both parameters in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Crossing> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Small epsilon to include endpoints.
    let eps = 1e-9;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some(Crossing {
            point: a0 + da * t,
            t_a: t,
            t_b: u.clamp(0.0, 1.0),
        })
    } else {
        None
    }
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}
