use crate::error::Result;
use crate::math::Aabb;
use crate::part::{Part, PathId};

/// Computes the axis-aligned bounding box of a collection of paths.
///
/// Paths that are not rendered, or draw nothing, are skipped. When no
/// path contributes the collection has no boundary.
#[derive(Debug)]
pub struct Boundary {
    paths: Vec<PathId>,
    margin: f64,
}

impl Boundary {
    /// Creates a new `Boundary` query over `paths`.
    #[must_use]
    pub fn new(paths: Vec<PathId>) -> Self {
        Self { paths, margin: 0.0 }
    }

    /// Creates a `Boundary` query over every path of `part`.
    #[must_use]
    pub fn of_part(part: &Part) -> Self {
        Self::new(part.path_ids().collect())
    }

    /// Grows the result by `margin` on every side.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Executes the query, returning the box or `None` if no path counts.
    ///
    /// # Errors
    ///
    /// Returns an error if a path or one of its points is missing.
    pub fn execute(&self, part: &Part) -> Result<Option<Aabb>> {
        let mut bbox: Option<Aabb> = None;
        for id in &self.paths {
            let path = part.path_by_id(*id)?;
            if !path.render {
                continue;
            }
            if let Some(path_box) = path.bounding_box(part)? {
                bbox = Some(match bbox {
                    Some(acc) => acc.union(path_box),
                    None => path_box,
                });
            }
        }
        Ok(bbox.map(|b| b.expand(self.margin)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;

    fn part() -> Part {
        let mut part = Part::new();
        for (key, x, y) in [
            ("a", 50.0, 50.0),
            ("c1", 0.0, 0.0),
            ("c2", 0.0, 100.0),
            ("b", 100.0, 100.0),
            ("f", 120.0, 10.0),
            ("g", 130.0, 20.0),
        ] {
            part.new_point(key, x, y);
        }
        part
    }

    #[test]
    fn union_of_curve_and_line() {
        let mut part = part();
        part.add_path_from_str("curve", "M a C c1 c2 b").unwrap();
        part.add_path_from_str("line", "M f L g").unwrap();
        let bbox = Boundary::of_part(&part).execute(&part).unwrap().unwrap();
        // The curve bulges left of its endpoints; the line sets the right edge.
        assert!(bbox.min.x > 0.0 && bbox.min.x < 50.0);
        assert!(bbox.min.y > 0.0 && bbox.min.y < 50.0);
        assert_eq!(bbox.max, Point2::new(130.0, 100.0));
    }

    #[test]
    fn margin_grows_every_side() {
        let mut part = part();
        let line = part.add_path_from_str("line", "M f L g").unwrap();
        let bbox = Boundary::new(vec![line])
            .margin(5.0)
            .execute(&part)
            .unwrap()
            .unwrap();
        assert_relative_eq!(bbox.min.x, 115.0);
        assert_relative_eq!(bbox.min.y, 5.0);
        assert_relative_eq!(bbox.max.x, 135.0);
        assert_relative_eq!(bbox.max.y, 25.0);
    }

    #[test]
    fn hidden_and_empty_collections_have_no_boundary() {
        let mut part = part();
        assert!(Boundary::of_part(&part).execute(&part).unwrap().is_none());

        let hidden = part.add_path_from_str("hidden", "M f L g").unwrap();
        part.path_mut("hidden").unwrap().render = false;
        assert!(Boundary::new(vec![hidden])
            .execute(&part)
            .unwrap()
            .is_none());
    }

    #[test]
    fn removed_path_is_an_error() {
        let mut part = part();
        let line = part.add_path_from_str("line", "M f L g").unwrap();
        part.remove_path("line").unwrap();
        assert!(Boundary::new(vec![line]).execute(&part).is_err());
    }
}
