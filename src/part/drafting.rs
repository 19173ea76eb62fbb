//! Key-based drafting calls on a [`Part`].
//!
//! These wrap the coordinate math of [`crate::math`] so drafting code can
//! work with point keys. Results are returned as coordinates; storing them
//! is up to the caller.

use crate::error::{GeometryError, Result};
use crate::math::bezier::{
    bezier_delta, bezier_length, bezier_point, bezier_split, curve_crosses_x, curve_crosses_y,
    curve_curve_intersections, find_edge, line_curve_intersections, Edge,
};
use crate::math::intersect_2d::{beam_beam_intersect_2d, segment_segment_intersect_2d};
use crate::math::primitives::{self, SHIFT_ALONG_STEPS};
use crate::math::{CubicPoints, Point2};
use crate::operations::offset::PathOffset2D;

use super::{Part, PathId};

/// Largest distance between a point and a curve for the point to split it.
const ON_CURVE_TOLERANCE: f64 = 1e-2;

impl Part {
    /// Resolves four point keys into the control points of a curve.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve(&self, keys: [&str; 4]) -> Result<CubicPoints> {
        Ok([
            self.coords(keys[0])?,
            self.coords(keys[1])?,
            self.coords(keys[2])?,
            self.coords(keys[3])?,
        ])
    }

    fn pair(&self, a: &str, b: &str) -> Result<(Point2, Point2)> {
        Ok((self.coords(a)?, self.coords(b)?))
    }

    /// Distance between two stored points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::distance(&a, &b))
    }

    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn delta_x(&self, a: &str, b: &str) -> Result<f64> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::delta_x(&a, &b))
    }

    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn delta_y(&self, a: &str, b: &str) -> Result<f64> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::delta_y(&a, &b))
    }

    /// Direction from `a` to `b` in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn angle(&self, a: &str, b: &str) -> Result<f64> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::angle(&a, &b))
    }

    /// Rotates `point` around `pivot`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn rotate(&self, point: &str, pivot: &str, degrees: f64) -> Result<Point2> {
        let (point, pivot) = self.pair(point, pivot)?;
        Ok(primitives::rotate(&point, &pivot, degrees))
    }

    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn shift(&self, point: &str, degrees: f64, distance: f64) -> Result<Point2> {
        Ok(primitives::shift(&self.coords(point)?, degrees, distance))
    }

    /// Moves from `a` toward `b` by an absolute distance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn shift_towards(&self, a: &str, b: &str, distance: f64) -> Result<Point2> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::shift_towards(&a, &b, distance))
    }

    /// Moves from `a` toward `b` by a fraction of their distance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn shift_fraction_towards(&self, a: &str, b: &str, fraction: f64) -> Result<Point2> {
        let (a, b) = self.pair(a, b)?;
        Ok(primitives::shift_fraction_towards(&a, &b, fraction))
    }

    /// Walks `distance` along a curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OutOfCurve`] when the curve is too short, or
    /// [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn shift_along(&self, curve: [&str; 4], distance: f64) -> Result<Point2> {
        primitives::shift_along(&self.curve(curve)?, distance, SHIFT_ALONG_STEPS)
    }

    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn flip_x(&self, point: &str, axis: f64) -> Result<Point2> {
        Ok(primitives::flip_x(&self.coords(point)?, axis))
    }

    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn flip_y(&self, point: &str, axis: f64) -> Result<Point2> {
        Ok(primitives::flip_y(&self.coords(point)?, axis))
    }

    /// Arc length of a curve.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve_length(&self, curve: [&str; 4]) -> Result<f64> {
        Ok(bezier_length(&self.curve(curve)?))
    }

    /// Splits a curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn split_curve(&self, curve: [&str; 4], t: f64) -> Result<(CubicPoints, CubicPoints)> {
        Ok(bezier_split(&self.curve(curve)?, t.clamp(0.0, 1.0)))
    }

    /// Splits a curve where it passes through the stored point `at`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotOnCurve`] when `at` does not lie on the
    /// curve, or [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn split_curve_at_point(
        &self,
        curve: [&str; 4],
        at: &str,
    ) -> Result<(CubicPoints, CubicPoints)> {
        let curve = self.curve(curve)?;
        let target = self.coords(at)?;
        let t = bezier_delta(&curve, &target);
        let miss = primitives::distance(&bezier_point(&curve, t), &target);
        if miss > ON_CURVE_TOLERANCE {
            return Err(GeometryError::NotOnCurve { distance: miss }.into());
        }
        Ok(bezier_split(&curve, t))
    }

    /// Points where the segment `from → to` crosses a curve.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve_crosses_line(
        &self,
        curve: [&str; 4],
        from: &str,
        to: &str,
    ) -> Result<Vec<Point2>> {
        let (from, to) = self.pair(from, to)?;
        Ok(line_curve_intersections(&from, &to, &self.curve(curve)?))
    }

    /// Points where two curves cross.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curves_cross(&self, a: [&str; 4], b: [&str; 4]) -> Result<Vec<Point2>> {
        Ok(curve_curve_intersections(&self.curve(a)?, &self.curve(b)?))
    }

    /// Points where a curve crosses the vertical line `x = value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve_crosses_x(&self, curve: [&str; 4], value: f64) -> Result<Vec<Point2>> {
        Ok(curve_crosses_x(&self.curve(curve)?, value))
    }

    /// Points where a curve crosses the horizontal line `y = value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve_crosses_y(&self, curve: [&str; 4], value: f64) -> Result<Vec<Point2>> {
        Ok(curve_crosses_y(&self.curve(curve)?, value))
    }

    /// The most extreme point of a curve in one direction.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn curve_edge(&self, curve: [&str; 4], edge: Edge) -> Result<Point2> {
        Ok(find_edge(&self.curve(curve)?, edge))
    }

    /// Crossing of the segments `a0 → a1` and `b0 → b1`, endpoints included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn lines_cross(&self, a0: &str, a1: &str, b0: &str, b1: &str) -> Result<Option<Point2>> {
        let (a0, a1) = self.pair(a0, a1)?;
        let (b0, b1) = self.pair(b0, b1)?;
        Ok(segment_segment_intersect_2d(&a0, &a1, &b0, &b1).map(|c| c.point))
    }

    /// Crossing of the infinite lines through `a0, a1` and `b0, b1`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::InvalidReference`] for an unknown key.
    pub fn beams_cross(&self, a0: &str, a1: &str, b0: &str, b1: &str) -> Result<Option<Point2>> {
        let (a0, a1) = self.pair(a0, a1)?;
        let (b0, b1) = self.pair(b0, b1)?;
        Ok(beam_beam_intersect_2d(&a0, &a1, &b0, &b1))
    }

    // --- Offsets ---

    /// Offsets the stored path `source` and stores the result as `result`.
    ///
    /// Generated points are keyed `result.N`, with `resultStart` and
    /// `resultEnd` naming the ends.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PartError::PathNotFound`] for an unknown source and
    /// any error of [`PathOffset2D::execute`].
    pub fn offset_path(&mut self, source: &str, distance: f64, result: &str) -> Result<PathId> {
        let path = self.path(source)?.clone();
        let offset = PathOffset2D::new(path, distance)
            .named(result)
            .execute(self)?;
        Ok(self.add_path(result, offset))
    }

    /// Parses `text` as a path and stores its offset as `result`.
    ///
    /// # Errors
    ///
    /// Returns the parse errors of [`Part::parse_path`] and any error of
    /// [`PathOffset2D::execute`].
    pub fn offset_path_from_string(
        &mut self,
        text: &str,
        distance: f64,
        result: &str,
    ) -> Result<PathId> {
        let path = self.parse_path(text)?;
        let offset = PathOffset2D::new(path, distance)
            .named(result)
            .execute(self)?;
        Ok(self.add_path(result, offset))
    }
}
