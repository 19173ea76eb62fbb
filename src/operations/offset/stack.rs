use crate::geometry::Segment;
use crate::math::intersect_2d::Crossing;
use crate::math::Point2;

/// One working entry of an offset: a source segment and its offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackEntry {
    /// The piece of the source path this entry was offset from.
    pub original: Segment,
    /// The offset geometry.
    pub offset: Segment,
    /// How many times the source curve was subdivided to reach this piece.
    pub depth: u32,
    /// Set once the entry was trimmed at a self-intersection.
    pub from_intersection_split: bool,
}

impl StackEntry {
    #[must_use]
    pub fn new(original: Segment, offset: Segment, depth: u32) -> Self {
        Self {
            original,
            offset,
            depth,
            from_intersection_split: false,
        }
    }

    /// Splits the entry at offset parameter `t`, snapping both pieces to `at`.
    ///
    /// The source segment is split at the same parameter.
    #[must_use]
    pub fn split_at(&self, t: f64, at: Point2) -> (Self, Self) {
        let (head, tail) = self.offset.split_at(t);
        let (orig_head, orig_tail) = self.original.split_at(t);
        let piece = |original, offset| Self {
            original,
            offset,
            depth: self.depth,
            from_intersection_split: true,
        };
        (
            piece(orig_head, head.with_end(at)),
            piece(orig_tail, tail.with_start(at)),
        )
    }
}

/// Crossings found between two segments of an ordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRecord {
    /// Position of the earlier segment.
    pub index_a: usize,
    /// Position of the later segment, always greater than `index_a`.
    pub index_b: usize,
    /// The crossings, `t_a` on the earlier and `t_b` on the later segment.
    pub crossings: Vec<Crossing>,
}

impl IntersectionRecord {
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.crossings.iter().map(|c| c.point)
    }
}

/// Scans every pair of segments for interior crossings.
///
/// Touches at an endpoint shared by both segments are not reported, so a
/// connected chain of segments yields no records unless it truly crosses
/// itself.
#[must_use]
pub fn find_intersections(segments: &[Segment]) -> Vec<IntersectionRecord> {
    let mut records = Vec::new();
    for (index_a, a) in segments.iter().enumerate() {
        for (index_b, b) in segments.iter().enumerate().skip(index_a + 1) {
            let crossings = a.crossings(b);
            if !crossings.is_empty() {
                records.push(IntersectionRecord {
                    index_a,
                    index_b,
                    crossings,
                });
            }
        }
    }
    records
}
