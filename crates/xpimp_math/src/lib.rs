// Re-export glam for convenience
pub use glam::*;

// Importer math types
mod aabb;
mod axis;
mod interval;

pub use aabb::Aabb;
pub use axis::{AxisKey, AXIS_KEY_DIGITS};
pub use interval::Interval;
