// Vector utilities for DVec3
//
// Extends glam::DVec3 with the operations the tracing core needs beyond
// what glam already provides (dot, cross, length, lerp...).

use crate::{MathError, MathResult};
use glam::DVec3;

/// Squared length below which a vector counts as zero.
const ZERO_LENGTH_SQUARED: f64 = 1e-24;

/// Extension trait for DVec3.
pub trait Vec3Ext {
    /// Normalize, failing on a zero-length vector instead of producing NaN.
    fn try_unit(self) -> MathResult<DVec3>;

    /// Mirror this direction about a surface normal: `d - 2(d.n)n`.
    fn mirror(self, normal: DVec3) -> DVec3;

    /// Rotate about a unit axis by `angle` radians (Rodrigues' formula).
    fn rotate_about(self, axis: DVec3, angle: f64) -> DVec3;

    /// Rec. 709 luminance when the vector holds a linear RGB color.
    fn luminance(self) -> f64;

    /// True when every component is (almost) zero.
    fn is_near_zero(self) -> bool;
}

impl Vec3Ext for DVec3 {
    fn try_unit(self) -> MathResult<DVec3> {
        let len_sq = self.length_squared();
        if len_sq <= ZERO_LENGTH_SQUARED || !len_sq.is_finite() {
            return Err(MathError::ZeroLength);
        }
        Ok(self / len_sq.sqrt())
    }

    #[inline]
    fn mirror(self, normal: DVec3) -> DVec3 {
        self - 2.0 * self.dot(normal) * normal
    }

    fn rotate_about(self, axis: DVec3, angle: f64) -> DVec3 {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * axis.dot(self) * (1.0 - cos)
    }

    #[inline]
    fn luminance(self) -> f64 {
        0.2126 * self.x + 0.7152 * self.y + 0.0722 * self.z
    }

    #[inline]
    fn is_near_zero(self) -> bool {
        self.length_squared() <= ZERO_LENGTH_SQUARED
    }
}
