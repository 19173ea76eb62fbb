pub mod point;
pub mod segment;

pub use point::Point;
pub use segment::Segment;
