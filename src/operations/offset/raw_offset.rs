use crate::geometry::Segment;
use crate::math::bezier::{bezier_length, bezier_point, bezier_split};
use crate::math::intersect_2d::beam_beam_intersect_2d;
use crate::math::primitives::{angle, distance, shift};
use crate::math::{CubicPoints, Point2, TOLERANCE};

use super::stack::StackEntry;
use super::OffsetOptions;

/// Parameters at which an offset curve is compared with the ideal offset.
const SAMPLE_PARAMS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Parameter step used to estimate the local direction of a curve.
///
/// The normal at a sample comes from the chord to a point this far ahead,
/// not from the chord between neighbouring samples, which would tilt it by
/// half the turning between them.
const NORMAL_STEP: f64 = 0.01;

/// Offsets every segment independently.
///
/// Zero-length lines and curves are dropped. Curves whose offset misses
/// the tolerance are split and offset again, so one source curve may
/// produce several entries.
#[must_use]
pub fn build(segments: &[Segment], distance: f64, options: &OffsetOptions) -> Vec<StackEntry> {
    let mut entries = Vec::with_capacity(segments.len());
    for segment in segments {
        match *segment {
            Segment::Line([p0, p1]) => {
                if (p1 - p0).norm() < TOLERANCE {
                    continue;
                }
                entries.push(StackEntry::new(
                    *segment,
                    offset_line(&p0, &p1, distance),
                    0,
                ));
            }
            Segment::Curve(curve) => {
                if bezier_length(&curve) < TOLERANCE {
                    continue;
                }
                push_curve(&mut entries, &curve, distance, 0, options);
            }
        }
    }
    entries
}

/// Shifts both endpoints perpendicular to the line.
fn offset_line(p0: &Point2, p1: &Point2, d: f64) -> Segment {
    let normal = angle(p0, p1) + 90.0;
    Segment::Line([shift(p0, normal, d), shift(p1, normal, d)])
}

fn push_curve(
    entries: &mut Vec<StackEntry>,
    curve: &CubicPoints,
    d: f64,
    depth: u32,
    options: &OffsetOptions,
) {
    let offset = offset_curve(curve, d);
    let (score, worst_t) = tolerance_score(curve, &offset, d);

    if score > options.tolerance_percent && bezier_length(curve) > options.min_subdivide_length {
        if depth < options.max_depth {
            tracing::trace!(depth, score, worst_t, "subdividing curve offset");
            let (head, tail) = bezier_split(curve, worst_t);
            push_curve(entries, &head, d, depth + 1, options);
            push_curve(entries, &tail, d, depth + 1, options);
            return;
        }
        tracing::warn!(
            depth,
            score,
            "subdivision depth limit reached; keeping offset curve out of tolerance"
        );
    }

    entries.push(StackEntry::new(
        Segment::Curve(*curve),
        Segment::Curve(offset),
        depth,
    ));
}

/// Tiller–Hanson offset: shifts the three legs of the control polygon and
/// intersects neighbouring legs to find the new control points.
#[must_use]
pub fn offset_curve(curve: &CubicPoints, d: f64) -> CubicPoints {
    let [p0, p1, p2, p3] = *curve;
    // A handle collapsed onto its endpoint has no direction; borrow one
    // from a point just inside the curve.
    let h1 = if distance(&p0, &p1) > TOLERANCE {
        p1
    } else {
        bezier_point(curve, NORMAL_STEP)
    };
    let h2 = if distance(&p2, &p3) > TOLERANCE {
        p2
    } else {
        bezier_point(curve, 1.0 - NORMAL_STEP)
    };

    let leg = |a: &Point2, b: &Point2| {
        let normal = angle(a, b) + 90.0;
        (shift(a, normal, d), shift(b, normal, d))
    };
    let first = leg(&p0, &h1);
    let spine = leg(&h1, &h2);
    let last = leg(&h2, &p3);

    let cp1 = beam_beam_intersect_2d(&first.0, &first.1, &spine.0, &spine.1).unwrap_or(first.1);
    let cp2 = beam_beam_intersect_2d(&spine.0, &spine.1, &last.0, &last.1).unwrap_or(last.0);

    [first.0, cp1, cp2, last.1]
}

/// Worst deviation of `offset` from the ideal offset of `original`, as a
/// percentage of `|d|`, together with the parameter where it occurs.
#[must_use]
pub fn tolerance_score(original: &CubicPoints, offset: &CubicPoints, d: f64) -> (f64, f64) {
    let mut worst = (0.0, 0.5);
    for t in SAMPLE_PARAMS {
        let here = bezier_point(original, t);
        let ahead = bezier_point(original, t + NORMAL_STEP);
        let direction = if distance(&here, &ahead) > TOLERANCE {
            angle(&here, &ahead)
        } else {
            angle(&bezier_point(original, t - NORMAL_STEP), &here)
        };
        let ideal = shift(&here, direction + 90.0, d);
        let deviation = distance(&ideal, &bezier_point(offset, t)) / d.abs() * 100.0;
        if deviation > worst.0 {
            worst = (deviation, t);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::bezier::bezier_circle;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn line_endpoints_move_by_distance_along_normal() {
        let a = p(3.0, 4.0);
        let b = p(23.0, 19.0);
        let Segment::Line([o0, o1]) = offset_line(&a, &b, 7.5) else {
            panic!("line offset must be a line");
        };
        assert_relative_eq!(distance(&a, &o0), 7.5, epsilon = 1e-9);
        assert_relative_eq!(distance(&b, &o1), 7.5, epsilon = 1e-9);
        // perpendicular to the source line
        let dir = b - a;
        assert_relative_eq!((o0 - a).dot(&dir), 0.0, epsilon = 1e-9);
        assert_relative_eq!((o1 - b).dot(&dir), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn positive_distance_is_left_of_travel_on_screen() {
        // Travelling right, angle + 90 points up, which is negative Y.
        let Segment::Line([o0, _]) = offset_line(&p(0.0, 0.0), &p(10.0, 0.0), 2.0) else {
            panic!("line offset must be a line");
        };
        assert_relative_eq!(o0.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(o0.y, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_lines_are_dropped() {
        let segments = [
            Segment::Line([p(1.0, 1.0), p(1.0, 1.0)]),
            Segment::Line([p(0.0, 0.0), p(10.0, 0.0)]),
        ];
        let entries = build(&segments, 1.0, &OffsetOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original, segments[1]);
    }

    #[test]
    fn zero_length_curves_are_dropped() {
        let dot = p(5.0, 5.0);
        let segments = [Segment::Curve([dot; 4])];
        assert!(build(&segments, 3.0, &OffsetOptions::default()).is_empty());
    }

    #[test]
    fn score_uses_the_local_normal() {
        // Scaling a quarter circle about its centre moves every point
        // radially, so only the local normal sees it as a clean offset.
        let r = 100.0;
        let k = bezier_circle(r);
        let quadrant = [p(r, 0.0), p(r, -k), p(k, -r), p(0.0, -r)];
        let inner = quadrant.map(|q| Point2::from(q.coords * 0.9));
        let (score, _) = tolerance_score(&quadrant, &inner, 10.0);
        assert!(score < 1.0, "score={score}");
    }

    #[test]
    fn straight_curve_offsets_exactly() {
        let curve = [p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0), p(30.0, 0.0)];
        let offset = offset_curve(&curve, 5.0);
        for q in offset {
            assert_relative_eq!(q.y, -5.0, epsilon = 1e-9);
        }
        let (score, _) = tolerance_score(&curve, &offset, 5.0);
        assert!(score < 1e-6, "score={score}");
    }

    #[test]
    fn degenerate_handle_still_offsets() {
        let curve = [p(0.0, 0.0), p(0.0, 0.0), p(50.0, 50.0), p(100.0, 0.0)];
        let offset = offset_curve(&curve, 5.0);
        assert!(offset.iter().all(|q| q.x.is_finite() && q.y.is_finite()));
        assert_relative_eq!(distance(&offset[0], &curve[0]), 5.0, epsilon = 1e-9);
        assert_relative_eq!(distance(&offset[3], &curve[3]), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn quarter_circle_within_tolerance() {
        let r = 100.0;
        let k = bezier_circle(r);
        let quadrant = [p(r, 0.0), p(r, -k), p(k, -r), p(0.0, -r)];
        let entries = build(
            &[Segment::Curve(quadrant)],
            -10.0,
            &OffsetOptions::default(),
        );
        assert_eq!(entries.len(), 1);
        for i in 0..=20 {
            let q = entries[0].offset.point_at(f64::from(i) / 20.0);
            assert_relative_eq!(q.coords.norm(), 110.0, epsilon = 1.0);
        }
    }

    #[test]
    fn tight_curve_is_subdivided() {
        let curve = [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)];
        let entries = build(&[Segment::Curve(curve)], 5.0, &OffsetOptions::default());
        assert!(entries.len() > 1);
        assert!(entries.iter().all(|e| e.depth > 0));
        for pair in entries.windows(2) {
            assert!(distance(&pair[0].offset.end(), &pair[1].offset.start()) < 1e-6);
        }
        assert_eq!(entries[0].original.start(), curve[0]);
        assert_eq!(entries[entries.len() - 1].original.end(), curve[3]);
    }

    #[test]
    fn depth_cap_stops_subdivision() {
        let curve = [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)];
        let options = OffsetOptions {
            max_depth: 0,
            ..OffsetOptions::default()
        };
        let entries = build(&[Segment::Curve(curve)], 5.0, &options);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn short_curves_are_accepted_as_is() {
        let curve = [p(0.0, 0.0), p(8.0, 0.0), p(8.0, 8.0), p(0.0, 8.0)];
        let entries = build(&[Segment::Curve(curve)], 5.0, &OffsetOptions::default());
        assert_eq!(entries.len(), 1);
    }
}
