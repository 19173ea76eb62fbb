mod bounding_box;
mod intersect;

pub use bounding_box::Boundary;
pub use intersect::PathSelfIntersect;
