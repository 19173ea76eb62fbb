use crate::geometry::Segment;
use crate::math::TOLERANCE;

use super::stack::StackEntry;

/// Joins consecutive entries whose ends do not meet with straight lines.
///
/// When `closed` is set the last entry is joined back to the first as well.
#[must_use]
pub fn fill_gaps(entries: &[StackEntry], closed: bool) -> Vec<StackEntry> {
    let count = entries.len();
    let mut out = Vec::with_capacity(count * 2);

    for (k, current) in entries.iter().enumerate() {
        out.push(*current);
        if k + 1 == count && !closed {
            break;
        }
        let next = &entries[(k + 1) % count];
        let from = current.offset.end();
        let to = next.offset.start();
        if (to - from).norm() > TOLERANCE {
            out.push(StackEntry::new(
                Segment::Line([current.original.end(), next.original.start()]),
                Segment::Line([from, to]),
                0,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn entry(x0: f64, y0: f64, x1: f64, y1: f64) -> StackEntry {
        let line = Segment::Line([Point2::new(x0, y0), Point2::new(x1, y1)]);
        StackEntry::new(line, line, 0)
    }

    #[test]
    fn open_chain_gets_inner_connectors_only() {
        let entries = vec![entry(0.0, -1.0, 10.0, -1.0), entry(11.0, 0.0, 11.0, 10.0)];
        let filled = fill_gaps(&entries, false);
        assert_eq!(filled.len(), 3);
        assert_eq!(filled[1].offset.start(), Point2::new(10.0, -1.0));
        assert_eq!(filled[1].offset.end(), Point2::new(11.0, 0.0));
        assert_eq!(filled[2].offset.end(), Point2::new(11.0, 10.0));
    }

    #[test]
    fn closed_chain_is_joined_back_to_start() {
        let entries = vec![entry(0.0, -1.0, 10.0, -1.0), entry(11.0, 0.0, 0.0, 0.0)];
        let filled = fill_gaps(&entries, true);
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[3].offset.start(), Point2::new(0.0, 0.0));
        assert_eq!(filled[3].offset.end(), Point2::new(0.0, -1.0));
    }

    #[test]
    fn meeting_entries_need_no_connector() {
        let entries = vec![entry(0.0, 0.0, 10.0, 0.0), entry(10.0, 0.0, 10.0, 10.0)];
        assert_eq!(fill_gaps(&entries, false).len(), 2);
    }

    #[test]
    fn empty_stack_stays_empty() {
        assert!(fill_gaps(&[], true).is_empty());
    }
}
