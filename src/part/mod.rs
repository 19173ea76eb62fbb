pub mod drafting;
mod parse;
pub mod path;

pub use path::{Path, PathId, PathOp};

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{PartError, Result};
use crate::geometry::Point;
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a point in a part's point table.
    pub struct PointId;
}

/// One pattern piece: an isolated point table plus the paths drawn over it.
///
/// Points and paths are stored in arenas and referenced through typed
/// handles. String keys are resolved to handles once, with an explicit
/// error for unknown keys. Independent parts share no state.
#[derive(Debug, Default)]
pub struct Part {
    points: SlotMap<PointId, Point>,
    keys: HashMap<String, PointId>,
    names: SecondaryMap<PointId, String>,
    paths: SlotMap<PathId, Path>,
    path_keys: HashMap<String, PathId>,
    generated: usize,
}

impl Part {
    /// Creates a new, empty part.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Stores `point` under `key` and returns its handle.
    ///
    /// Writing to an existing key replaces the stored value and keeps the
    /// handle, so paths already referencing it follow the new position.
    /// Writing to an alias re-points the alias at a fresh point instead.
    pub fn add_point(&mut self, key: impl Into<String>, point: Point) -> PointId {
        let key = key.into();
        if let Some(&id) = self.keys.get(&key) {
            if self.names.get(id).is_some_and(|name| *name == key) {
                if let Some(slot) = self.points.get_mut(id) {
                    *slot = point;
                    return id;
                }
            }
        }
        let id = self.points.insert(point);
        self.names.insert(id, key.clone());
        self.keys.insert(key, id);
        id
    }

    /// Stores a new point at `(x, y)` under `key`.
    pub fn new_point(&mut self, key: impl Into<String>, x: f64, y: f64) -> PointId {
        self.add_point(key, Point::new(x, y))
    }

    /// Stores a point produced by an operation under a fresh key `stem.N`.
    pub(crate) fn add_generated_point(&mut self, stem: &str, point: Point2) -> PointId {
        loop {
            self.generated += 1;
            let key = format!("{stem}.{}", self.generated);
            if !self.keys.contains_key(&key) {
                return self.add_point(key, Point::from(point));
            }
        }
    }

    /// Makes `alias` another key for the point behind `id`.
    ///
    /// An existing alias of that name is re-pointed; the primary key of
    /// another point is never taken over.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if `id` is not in the table
    /// and [`PartError::KeyTaken`] if `alias` names a different point.
    pub fn add_alias(&mut self, alias: impl Into<String>, id: PointId) -> Result<()> {
        let alias = alias.into();
        if !self.points.contains_key(id) {
            return Err(PartError::InvalidReference(alias).into());
        }
        if self.is_primary_key(&alias) && self.keys.get(&alias) != Some(&id) {
            return Err(PartError::KeyTaken(alias).into());
        }
        self.keys.insert(alias, id);
        Ok(())
    }

    /// Returns `true` if `key` is the primary key of a stored point rather
    /// than an alias.
    #[must_use]
    pub fn is_primary_key(&self, key: &str) -> bool {
        self.keys
            .get(key)
            .and_then(|id| self.names.get(*id))
            .is_some_and(|name| name == key)
    }

    /// Returns the point stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the key is unknown.
    pub fn point(&self, key: &str) -> Result<&Point> {
        self.point_by_id(self.point_id(key)?)
    }

    /// Resolves `key` to its handle.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the key is unknown.
    pub fn point_id(&self, key: &str) -> Result<PointId> {
        self.keys
            .get(key)
            .copied()
            .ok_or_else(|| PartError::InvalidReference(key.to_owned()).into())
    }

    /// Returns the point behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the point was removed.
    pub fn point_by_id(&self, id: PointId) -> Result<&Point> {
        self.points
            .get(id)
            .ok_or_else(|| PartError::InvalidReference(format!("{id:?}")).into())
    }

    /// Returns the coordinates stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the key is unknown.
    pub fn coords(&self, key: &str) -> Result<Point2> {
        self.point(key).map(Point::coords)
    }

    /// Returns the coordinates behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the point was removed.
    pub fn coords_by_id(&self, id: PointId) -> Result<Point2> {
        self.point_by_id(id).map(Point::coords)
    }

    /// Returns the primary key of a point.
    #[must_use]
    pub fn key_of(&self, id: PointId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn has_point(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Removes the point stored under `key`, together with all its aliases.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if the key is unknown.
    pub fn remove_point(&mut self, key: &str) -> Result<Point> {
        let id = self.point_id(key)?;
        self.keys.retain(|_, v| *v != id);
        self.names.remove(id);
        self.points
            .remove(id)
            .ok_or_else(|| PartError::InvalidReference(key.to_owned()).into())
    }

    /// Copies the point stored under `from` to the key `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidReference`] if `from` is unknown.
    pub fn clone_point(&mut self, from: &str, to: impl Into<String>) -> Result<PointId> {
        let point = self.point(from)?.clone();
        Ok(self.add_point(to, point))
    }

    /// Iterates over `(key, point)` pairs by primary key.
    pub fn points(&self) -> impl Iterator<Item = (&str, &Point)> {
        self.names
            .iter()
            .filter_map(|(id, name)| self.points.get(id).map(|p| (name.as_str(), p)))
    }

    // --- Path operations ---

    /// Stores `path` under `key`, replacing any previous path of that name.
    pub fn add_path(&mut self, key: impl Into<String>, path: Path) -> PathId {
        let key = key.into();
        if let Some(&id) = self.path_keys.get(&key) {
            if let Some(slot) = self.paths.get_mut(id) {
                *slot = path;
                return id;
            }
        }
        let id = self.paths.insert(path);
        self.path_keys.insert(key, id);
        id
    }

    /// Parses path grammar text and stores the result under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or names an unknown point.
    pub fn add_path_from_str(&mut self, key: impl Into<String>, text: &str) -> Result<PathId> {
        let path = self.parse_path(text)?;
        Ok(self.add_path(key, path))
    }

    /// Parses path grammar text (`M a L b C c d e z`) against this part.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::InvalidPath`] for grammar violations and
    /// [`PartError::InvalidReference`] for unknown point keys.
    pub fn parse_path(&self, text: &str) -> Result<Path> {
        parse::parse_path(text, self)
    }

    /// Returns the path stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::PathNotFound`] if the key is unknown.
    pub fn path(&self, key: &str) -> Result<&Path> {
        self.path_keys
            .get(key)
            .and_then(|id| self.paths.get(*id))
            .ok_or_else(|| PartError::PathNotFound(key.to_owned()).into())
    }

    /// Returns a mutable reference to the path stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::PathNotFound`] if the key is unknown.
    pub fn path_mut(&mut self, key: &str) -> Result<&mut Path> {
        self.path_keys
            .get(key)
            .and_then(|id| self.paths.get_mut(*id))
            .ok_or_else(|| PartError::PathNotFound(key.to_owned()).into())
    }

    /// Returns the path behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::PathNotFound`] if the path was removed.
    pub fn path_by_id(&self, id: PathId) -> Result<&Path> {
        self.paths
            .get(id)
            .ok_or_else(|| PartError::PathNotFound(format!("{id:?}")).into())
    }

    /// Removes the path stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PartError::PathNotFound`] if the key is unknown.
    pub fn remove_path(&mut self, key: &str) -> Result<Path> {
        self.path_keys
            .remove(key)
            .and_then(|id| self.paths.remove(id))
            .ok_or_else(|| PartError::PathNotFound(key.to_owned()).into())
    }

    /// Iterates over the handles of every stored path.
    pub fn path_ids(&self) -> impl Iterator<Item = PathId> + '_ {
        self.paths.keys()
    }

    /// Iterates over `(key, path)` pairs.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.path_keys
            .iter()
            .filter_map(|(key, id)| self.paths.get(*id).map(|p| (key.as_str(), p)))
    }
}
