use crate::{Interval, Vec3};

/// Axis-aligned bounding box of a reconstructed mesh.
///
/// Defined by three intervals (one per axis). [`Aabb::EMPTY`] contains
/// nothing and is the identity for [`Aabb::include_point`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Bounds of a point set; empty for an empty set.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        positions
            .iter()
            .fold(Self::EMPTY, |aabb, p| aabb.include_point(*p))
    }

    /// Grow the box so it contains `p`.
    pub fn include_point(&self, p: Vec3) -> Self {
        Self {
            x: self.x.include(p.x),
            y: self.y.include(p.y),
            z: self.z.include(p.z),
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
