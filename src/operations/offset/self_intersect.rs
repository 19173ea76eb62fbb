use crate::math::intersect_2d::Crossing;

use super::stack::StackEntry;

/// Pieces shorter than this are dropped after trimming.
const MIN_PIECE_LENGTH: f64 = 1e-6;

/// Removes self-intersections from the offset entries.
///
/// Each pass takes the earliest entry A that crosses a later entry B, at the
/// crossing closest to A's start. A keeps its part before the crossing, B
/// keeps its part after it and the entries between them are discarded. On a
/// closed path the loop on the other side of the crossing is discarded
/// instead when it is the shorter one. Passes repeat until nothing crosses.
#[must_use]
pub fn repair(mut entries: Vec<StackEntry>, closed: bool) -> Vec<StackEntry> {
    let max_passes = entries.len() * 4 + 4;
    for _ in 0..max_passes {
        let Some((i, j, crossing)) = first_crossing(&entries) else {
            return entries;
        };
        tracing::trace!(i, j, x = crossing.point.x, y = crossing.point.y, "trimming crossing");
        entries = trim(&entries, i, j, &crossing, closed);
    }
    tracing::warn!(
        remaining = entries.len(),
        "self-intersection repair did not converge"
    );
    entries
}

/// Finds the smallest `i` crossing any later entry, with the crossing that
/// lies closest to the start of entry `i`.
fn first_crossing(entries: &[StackEntry]) -> Option<(usize, usize, Crossing)> {
    for (i, a) in entries.iter().enumerate() {
        let best = entries
            .iter()
            .enumerate()
            .skip(i + 1)
            .flat_map(|(j, b)| a.offset.crossings(&b.offset).into_iter().map(move |c| (j, c)))
            .min_by(|x, y| x.1.t_a.total_cmp(&y.1.t_a));
        if let Some((j, crossing)) = best {
            return Some((i, j, crossing));
        }
    }
    None
}

fn trim(
    entries: &[StackEntry],
    i: usize,
    j: usize,
    crossing: &Crossing,
    closed: bool,
) -> Vec<StackEntry> {
    let (a_head, a_tail) = entries[i].split_at(crossing.t_a, crossing.point);
    let (b_head, b_tail) = entries[j].split_at(crossing.t_b, crossing.point);

    let length = |list: &[StackEntry]| list.iter().map(|e| e.offset.length()).sum::<f64>();
    let keep_inner = closed && {
        let inner =
            a_tail.offset.length() + length(&entries[i + 1..j]) + b_head.offset.length();
        let outer = b_tail.offset.length()
            + length(&entries[j + 1..])
            + length(&entries[..i])
            + a_head.offset.length();
        inner > outer
    };

    let trimmed: Vec<StackEntry> = if keep_inner {
        std::iter::once(a_tail)
            .chain(entries[i + 1..j].iter().copied())
            .chain(std::iter::once(b_head))
            .collect()
    } else {
        entries[..i]
            .iter()
            .copied()
            .chain([a_head, b_tail])
            .chain(entries[j + 1..].iter().copied())
            .collect()
    };

    trimmed
        .into_iter()
        .filter(|e| e.offset.length() > MIN_PIECE_LENGTH)
        .collect()
}
