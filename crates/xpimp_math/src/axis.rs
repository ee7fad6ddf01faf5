use crate::Vec3;

/// Number of decimal digits kept when canonicalizing an axis.
pub const AXIS_KEY_DIGITS: i32 = 6;

/// Hashable, exactly comparable key for a rotation axis.
///
/// Axes arrive as floats and are used to group rotation samples. Each
/// component is rounded to [`AXIS_KEY_DIGITS`] decimal places and stored as
/// a fixed-point integer, so `-0.0` and `0.0` (and values that differ only
/// past the sixth decimal) map to the same key. Signs are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisKey {
    x: i64,
    y: i64,
    z: i64,
}

impl AxisKey {
    pub fn new(axis: Vec3) -> Self {
        let scale = 10f64.powi(AXIS_KEY_DIGITS);
        let quantize = |c: f32| (f64::from(c) * scale).round() as i64;
        Self {
            x: quantize(axis.x),
            y: quantize(axis.y),
            z: quantize(axis.z),
        }
    }
}
