//! Point arithmetic in the Y-down drafting plane.
//!
//! Angles are in degrees, counter-clockwise as seen on screen: `0` points
//! right, `90` points up (negative Y), `180` left and `270` down.

use crate::error::{GeometryError, Result};

use super::bezier::bezier_point;
use super::{CubicPoints, Point2, TOLERANCE};

/// Default number of parametric steps used by [`shift_along`].
pub const SHIFT_ALONG_STEPS: u32 = 1000;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Signed X difference `b.x - a.x`.
#[must_use]
pub fn delta_x(a: &Point2, b: &Point2) -> f64 {
    b.x - a.x
}

/// Signed Y difference `b.y - a.y`.
#[must_use]
pub fn delta_y(a: &Point2, b: &Point2) -> f64 {
    b.y - a.y
}

/// Direction from `a` to `b` in degrees, in `[0, 360)`.
///
/// Coincident points yield `0`.
#[must_use]
pub fn angle(a: &Point2, b: &Point2) -> f64 {
    let dx = delta_x(a, b);
    let dy = delta_y(a, b);

    if dx.abs() < TOLERANCE && dy.abs() < TOLERANCE {
        return 0.0;
    }
    if dx.abs() < TOLERANCE {
        return if dy > 0.0 { 270.0 } else { 90.0 };
    }
    if dy.abs() < TOLERANCE {
        return if dx > 0.0 { 0.0 } else { 180.0 };
    }

    let theta = (dx / distance(a, b)).clamp(-1.0, 1.0).acos().to_degrees();
    if dy > 0.0 {
        360.0 - theta
    } else {
        theta
    }
}

/// Rotates `point` around `pivot` by `degrees`.
#[must_use]
pub fn rotate(point: &Point2, pivot: &Point2, degrees: f64) -> Point2 {
    let radius = distance(pivot, point);
    let rad = (angle(pivot, point) + degrees).to_radians();
    Point2::new(pivot.x + radius * rad.cos(), pivot.y - radius * rad.sin())
}

/// Moves `point` by `distance` in the direction `degrees`.
#[must_use]
pub fn shift(point: &Point2, degrees: f64, distance: f64) -> Point2 {
    let helper = Point2::new(point.x + distance, point.y);
    rotate(&helper, point, degrees)
}

/// Moves from `a` toward `b` by an absolute `distance`.
///
/// The result may lie beyond `b`, and a negative distance moves away from it.
/// Coincident points leave `a` unchanged.
#[must_use]
pub fn shift_towards(a: &Point2, b: &Point2, distance: f64) -> Point2 {
    let dx = delta_x(a, b);
    let dy = delta_y(a, b);

    if dx.abs() < TOLERANCE && dy.abs() < TOLERANCE {
        return *a;
    }
    if dx.abs() < TOLERANCE {
        return Point2::new(a.x, a.y + distance.copysign(dy));
    }
    if dy.abs() < TOLERANCE {
        return Point2::new(a.x + distance.copysign(dx), a.y);
    }
    shift(a, angle(a, b), distance)
}

/// Moves from `a` toward `b` by a fraction of their distance.
#[must_use]
pub fn shift_fraction_towards(a: &Point2, b: &Point2, fraction: f64) -> Point2 {
    shift_towards(a, b, distance(a, b) * fraction)
}

/// Mirrors `point` around the vertical line `x = axis`.
#[must_use]
pub fn flip_x(point: &Point2, axis: f64) -> Point2 {
    Point2::new(2.0 * axis - point.x, point.y)
}

/// Mirrors `point` around the horizontal line `y = axis`.
#[must_use]
pub fn flip_y(point: &Point2, axis: f64) -> Point2 {
    Point2::new(point.x, 2.0 * axis - point.y)
}

/// Walks `distance` along a cubic curve, measured on a polyline of `steps`
/// equal parametric steps.
///
/// Returns the first sampled point whose accumulated length exceeds
/// `distance`. A non-positive distance returns the curve start.
///
/// # Errors
///
/// Returns [`GeometryError::OutOfCurve`] when the curve is shorter than
/// `distance`.
pub fn shift_along(curve: &CubicPoints, distance: f64, steps: u32) -> Result<Point2> {
    if distance <= 0.0 {
        return Ok(curve[0]);
    }
    let steps = steps.max(1);
    let mut length = 0.0;
    let mut previous = curve[0];
    for i in 1..=steps {
        let point = bezier_point(curve, f64::from(i) / f64::from(steps));
        length += (point - previous).norm();
        if length > distance {
            return Ok(point);
        }
        previous = point;
    }
    if distance - length < TOLERANCE {
        return Ok(curve[3]);
    }
    Err(GeometryError::OutOfCurve {
        requested: distance,
        length,
    }
    .into())
}
