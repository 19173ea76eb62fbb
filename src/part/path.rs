use std::collections::BTreeMap;

use crate::error::{PartError, Result};
use crate::geometry::Segment;
use crate::math::{Aabb, TOLERANCE};

use super::{Part, PointId};

slotmap::new_key_type! {
    /// Unique identifier for a path stored in a part.
    pub struct PathId;
}

/// A single drawing instruction of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    /// Start of the path (`M`).
    Move(PointId),
    /// Straight line to a point (`L`).
    Line(PointId),
    /// Cubic Bezier through two control points to an end point (`C`).
    Curve {
        cp1: PointId,
        cp2: PointId,
        to: PointId,
    },
    /// Straight line back to the start, ending the path (`z`).
    Close,
}

/// An ordered sequence of line and curve instructions over a part's points.
///
/// A path always begins with exactly one `Move`. Instructions after `Close`
/// are ignored when the path is decomposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
    /// Whether the path is drawn by renderers and counted in boundaries.
    pub render: bool,
    /// Rendering attributes, opaque to the kernel.
    pub attributes: BTreeMap<String, String>,
}

impl Path {
    /// Starts a new path at `start`.
    #[must_use]
    pub fn new(start: PointId) -> Self {
        Self {
            ops: vec![PathOp::Move(start)],
            render: true,
            attributes: BTreeMap::new(),
        }
    }

    /// Appends a straight line to `to`.
    #[must_use]
    pub fn line(mut self, to: PointId) -> Self {
        self.ops.push(PathOp::Line(to));
        self
    }

    /// Appends a cubic Bezier to `to`.
    #[must_use]
    pub fn curve(mut self, cp1: PointId, cp2: PointId, to: PointId) -> Self {
        self.ops.push(PathOp::Curve { cp1, cp2, to });
        self
    }

    /// Closes the path.
    #[must_use]
    pub fn close(mut self) -> Self {
        if !self.is_closed() {
            self.ops.push(PathOp::Close);
        }
        self
    }

    /// Sets a rendering attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ops.contains(&PathOp::Close)
    }

    /// The point the path starts at.
    #[must_use]
    pub fn start(&self) -> PointId {
        match self.ops.first() {
            Some(PathOp::Move(id)) => *id,
            _ => unreachable!("a path always starts with a move"),
        }
    }

    /// The last point the path draws to.
    #[must_use]
    pub fn end(&self) -> PointId {
        self.drawn_ops()
            .filter_map(op_target)
            .last()
            .unwrap_or_else(|| self.start())
    }

    fn drawn_ops(&self) -> impl Iterator<Item = &PathOp> {
        self.ops.iter().take_while(|op| **op != PathOp::Close)
    }

    /// Decomposes the path into coordinate-resolved line and curve segments.
    ///
    /// A closed path gets an explicit closing line unless it already ends on
    /// its start point.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if a referenced point no
    /// longer exists.
    pub fn segments(&self, part: &Part) -> Result<Vec<Segment>> {
        let start = part.coords_by_id(self.start())?;
        let mut current = start;
        let mut segments = Vec::with_capacity(self.ops.len());

        for op in self.drawn_ops() {
            match *op {
                PathOp::Move(_) | PathOp::Close => {}
                PathOp::Line(to) => {
                    let to = part.coords_by_id(to)?;
                    segments.push(Segment::Line([current, to]));
                    current = to;
                }
                PathOp::Curve { cp1, cp2, to } => {
                    let to_pt = part.coords_by_id(to)?;
                    segments.push(Segment::Curve([
                        current,
                        part.coords_by_id(cp1)?,
                        part.coords_by_id(cp2)?,
                        to_pt,
                    ]));
                    current = to_pt;
                }
            }
        }

        if self.is_closed() && (current - start).norm() > TOLERANCE {
            segments.push(Segment::Line([current, start]));
        }
        Ok(segments)
    }

    /// Total length of the path.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if a referenced point no
    /// longer exists.
    pub fn length(&self, part: &Part) -> Result<f64> {
        Ok(self.segments(part)?.iter().map(Segment::length).sum())
    }

    /// Bounding box of the path, or `None` if it draws nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if a referenced point no
    /// longer exists.
    pub fn bounding_box(&self, part: &Part) -> Result<Option<Aabb>> {
        Ok(self
            .segments(part)?
            .iter()
            .map(Segment::bounding_box)
            .reduce(Aabb::union))
    }

    /// Returns the same path drawn in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut stops = vec![self.start()];
        let mut draws = Vec::new();
        for op in self.drawn_ops() {
            match *op {
                PathOp::Line(to) => {
                    draws.push(None);
                    stops.push(to);
                }
                PathOp::Curve { cp1, cp2, to } => {
                    draws.push(Some((cp2, cp1)));
                    stops.push(to);
                }
                PathOp::Move(_) | PathOp::Close => {}
            }
        }

        let mut reversed = Self {
            ops: vec![PathOp::Move(self.end())],
            render: self.render,
            attributes: self.attributes.clone(),
        };
        for (i, draw) in draws.iter().enumerate().rev() {
            let to = stops[i];
            reversed.ops.push(match draw {
                None => PathOp::Line(to),
                Some((cp1, cp2)) => PathOp::Curve {
                    cp1: *cp1,
                    cp2: *cp2,
                    to,
                },
            });
        }
        if self.is_closed() {
            reversed.ops.push(PathOp::Close);
        }
        reversed
    }

    /// Serializes the path as grammar text over point keys, e.g. `M a L b z`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if a referenced point no
    /// longer exists.
    pub fn to_grammar(&self, part: &Part) -> Result<String> {
        self.serialize(|id| {
            part.key_of(id)
                .map(str::to_owned)
                .ok_or_else(|| PartError::InvalidReference(format!("{id:?}")).into())
        })
    }

    /// Serializes the path with resolved coordinates, e.g. `M 0,0 L 10,0 z`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if a referenced point no
    /// longer exists.
    pub fn to_path_data(&self, part: &Part) -> Result<String> {
        self.serialize(|id| part.point_by_id(id).map(ToString::to_string))
    }

    fn serialize(&self, token: impl Fn(PointId) -> Result<String>) -> Result<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.ops.len() * 2);
        for op in &self.ops {
            match *op {
                PathOp::Move(to) => {
                    out.push("M".to_owned());
                    out.push(token(to)?);
                }
                PathOp::Line(to) => {
                    out.push("L".to_owned());
                    out.push(token(to)?);
                }
                PathOp::Curve { cp1, cp2, to } => {
                    out.push("C".to_owned());
                    out.push(token(cp1)?);
                    out.push(token(cp2)?);
                    out.push(token(to)?);
                }
                PathOp::Close => {
                    out.push("z".to_owned());
                    break;
                }
            }
        }
        Ok(out.join(" "))
    }
}

fn op_target(op: &PathOp) -> Option<PointId> {
    match *op {
        PathOp::Move(to) | PathOp::Line(to) | PathOp::Curve { to, .. } => Some(to),
        PathOp::Close => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;

    fn square(part: &mut Part) -> Path {
        let a = part.new_point("a", 0.0, 0.0);
        let b = part.new_point("b", 10.0, 0.0);
        let c = part.new_point("c", 10.0, 10.0);
        let d = part.new_point("d", 0.0, 10.0);
        Path::new(a).line(b).line(c).line(d).close()
    }

    #[test]
    fn closed_path_gets_closing_segment() {
        let mut part = Part::new();
        let path = square(&mut part);
        let segments = path.segments(&part).unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].end(), Point2::new(0.0, 0.0));
        assert_relative_eq!(path.length(&part).unwrap(), 40.0);
    }

    #[test]
    fn closing_on_start_adds_no_segment() {
        let mut part = Part::new();
        let a = part.new_point("a", 0.0, 0.0);
        let b = part.new_point("b", 10.0, 0.0);
        let c = part.new_point("c", 5.0, 5.0);
        let path = Path::new(a).line(b).line(c).line(a).close();
        assert_eq!(path.segments(&part).unwrap().len(), 3);
    }

    #[test]
    fn start_and_end() {
        let mut part = Part::new();
        let path = square(&mut part);
        assert_eq!(part.key_of(path.start()), Some("a"));
        assert_eq!(part.key_of(path.end()), Some("d"));
    }

    #[test]
    fn grammar_and_render() {
        let mut part = Part::new();
        let a = part.new_point("a", 0.0, 0.0);
        let b = part.new_point("b", 10.0, 0.0);
        let c1 = part.new_point("c1", 10.0, 5.0);
        let c2 = part.new_point("c2", 5.0, 10.0);
        let c = part.new_point("c", 0.0, 10.0);
        let path = Path::new(a).line(b).curve(c1, c2, c).close();
        assert_eq!(path.to_grammar(&part).unwrap(), "M a L b C c1 c2 c z");
        assert_eq!(
            path.to_path_data(&part).unwrap(),
            "M 0,0 L 10,0 C 10,5 5,10 0,10 z"
        );
    }

    #[test]
    fn reversed_path() {
        let mut part = Part::new();
        let a = part.new_point("a", 0.0, 0.0);
        let b = part.new_point("b", 10.0, 0.0);
        let c1 = part.new_point("c1", 10.0, 5.0);
        let c2 = part.new_point("c2", 5.0, 10.0);
        let c = part.new_point("c", 0.0, 10.0);
        let path = Path::new(a).line(b).curve(c1, c2, c);
        let rev = path.reversed();
        assert_eq!(rev.to_grammar(&part).unwrap(), "M c C c2 c1 b L a");
        assert_relative_eq!(
            rev.length(&part).unwrap(),
            path.length(&part).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn stale_reference_fails() {
        let mut part = Part::new();
        let path = square(&mut part);
        part.remove_point("c").unwrap();
        assert!(path.segments(&part).is_err());
        assert!(path.to_grammar(&part).is_err());
    }

    #[test]
    fn bounding_box_of_path() {
        let mut part = Part::new();
        let path = square(&mut part);
        let bbox = path.bounding_box(&part).unwrap().unwrap();
        assert_eq!(bbox.min, Point2::new(0.0, 0.0));
        assert_eq!(bbox.max, Point2::new(10.0, 10.0));

        let lone = Path::new(part.point_id("a").unwrap());
        assert!(lone.bounding_box(&part).unwrap().is_none());
    }
}
