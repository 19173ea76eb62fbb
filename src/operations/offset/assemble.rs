use crate::error::{OperationError, PartError, Result};
use crate::geometry::Segment;
use crate::part::{Part, Path};

use super::stack::StackEntry;

/// Turns the final entries into a path over new points of `part`.
///
/// Points are stored under generated `stem.N` keys; consecutive entries
/// share their joining point. A closed result ends with `Close` in place of
/// its last straight entry, and its last curve ends on the start point. The
/// start and end points are also reachable as `{stem}Start` and
/// `{stem}End`.
///
/// # Errors
///
/// Returns [`OperationError::OffsetConstructionFailure`] for an empty stack
/// and [`PartError::KeyTaken`] if an alias is already a point's own key. On
/// error no point is added.
pub fn build(entries: &[StackEntry], closed: bool, stem: &str, part: &mut Part) -> Result<Path> {
    let first = entries.first().ok_or_else(|| {
        OperationError::OffsetConstructionFailure("no segments left to assemble".to_owned())
    })?;
    let aliases = [format!("{stem}Start"), format!("{stem}End")];
    if let Some(taken) = aliases.iter().find(|key| part.is_primary_key(key)) {
        return Err(PartError::KeyTaken(taken.clone()).into());
    }

    let start = part.add_generated_point(stem, first.offset.start());
    let mut path = Path::new(start);
    let last = entries.len() - 1;

    for (k, entry) in entries.iter().enumerate() {
        let closing = closed && k == last;
        path = match entry.offset {
            Segment::Line(_) if closing => break,
            Segment::Line([_, to]) => path.line(part.add_generated_point(stem, to)),
            Segment::Curve([_, cp1, cp2, to]) => {
                let cp1 = part.add_generated_point(stem, cp1);
                let cp2 = part.add_generated_point(stem, cp2);
                let to = if closing {
                    start
                } else {
                    part.add_generated_point(stem, to)
                };
                path.curve(cp1, cp2, to)
            }
        };
    }
    if closed {
        path = path.close();
    }

    let [start_alias, end_alias] = aliases;
    part.add_alias(start_alias, path.start())?;
    part.add_alias(end_alias, path.end())?;
    Ok(path)
}
