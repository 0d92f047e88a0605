//! Orthonormal basis for local shape and shading frames.

use crate::{MathError, MathResult, Vec3Ext};
use glam::DVec3;

/// Three mutually orthogonal unit vectors forming a right-handed frame.
///
/// `e_z` is the primary direction (plane normal or symmetry axis of a shape,
/// surface normal of a shading frame). The fields are private so the
/// orthonormality invariant can only be changed through [`rotate`].
///
/// [`rotate`]: OrthonormalBasis::rotate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthonormalBasis {
    e_x: DVec3,
    e_y: DVec3,
    e_z: DVec3,
}

impl OrthonormalBasis {
    /// The world frame.
    pub const IDENTITY: Self = Self {
        e_x: DVec3::X,
        e_y: DVec3::Y,
        e_z: DVec3::Z,
    };

    /// Build a frame around `primary`, picking an arbitrary `e_x`.
    pub fn from_direction(primary: DVec3) -> MathResult<Self> {
        Ok(Self::from_unit(primary.try_unit()?))
    }

    /// Build a frame around a vector that is already unit length.
    ///
    /// Used on hot paths (shading frames around surface normals) where the
    /// caller guarantees the precondition.
    #[inline]
    pub fn from_unit(e_z: DVec3) -> Self {
        let (e_x, _) = e_z.any_orthonormal_pair();
        Self {
            e_x,
            e_y: e_z.cross(e_x),
            e_z,
        }
    }

    /// Build a frame around `primary` whose `e_x` lies in the plane spanned by
    /// `primary` and `reference`.
    pub fn with_reference(primary: DVec3, reference: DVec3) -> MathResult<Self> {
        let e_z = primary.try_unit()?;
        let e_x = (reference - reference.dot(e_z) * e_z)
            .try_unit()
            .map_err(|_| MathError::ParallelReference)?;
        let e_y = e_z.cross(e_x);
        Ok(Self { e_x, e_y, e_z })
    }

    #[inline]
    pub fn e_x(&self) -> DVec3 {
        self.e_x
    }

    #[inline]
    pub fn e_y(&self) -> DVec3 {
        self.e_y
    }

    #[inline]
    pub fn e_z(&self) -> DVec3 {
        self.e_z
    }

    /// Express a global vector in this frame.
    #[inline]
    pub fn to_local(&self, v: DVec3) -> DVec3 {
        DVec3::new(v.dot(self.e_x), v.dot(self.e_y), v.dot(self.e_z))
    }

    /// Map local coordinates back to the global frame.
    #[inline]
    pub fn to_global(&self, v: DVec3) -> DVec3 {
        v.x * self.e_x + v.y * self.e_y + v.z * self.e_z
    }

    /// Rotate the frame in place about a unit `axis` by `angle` radians.
    ///
    /// The rotated vectors are re-orthonormalized so repeated small rotations
    /// (object spin over many frames) do not drift.
    pub fn rotate(&mut self, axis: DVec3, angle: f64) {
        let e_z = self.e_z.rotate_about(axis, angle).normalize();
        let e_x = self.e_x.rotate_about(axis, angle);
        let e_x = (e_x - e_x.dot(e_z) * e_z).normalize();
        self.e_z = e_z;
        self.e_x = e_x;
        self.e_y = e_z.cross(e_x);
    }
}

impl Default for OrthonormalBasis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_orthonormal(basis: &OrthonormalBasis) {
        for v in [basis.e_x(), basis.e_y(), basis.e_z()] {
            assert!((v.length() - 1.0).abs() < 1e-9, "not unit: {v:?}");
        }
        assert!(basis.e_x().dot(basis.e_y()).abs() < 1e-9);
        assert!(basis.e_y().dot(basis.e_z()).abs() < 1e-9);
        assert!(basis.e_z().dot(basis.e_x()).abs() < 1e-9);
        // Right-handed
        assert!((basis.e_x().cross(basis.e_y()) - basis.e_z()).length() < 1e-9);
    }

    #[test]
    fn test_from_direction() {
        for dir in [
            DVec3::Z,
            -DVec3::Z,
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-0.3, 0.0, 1e-3),
        ] {
            let basis = OrthonormalBasis::from_direction(dir).unwrap();
            assert_orthonormal(&basis);
            assert!((basis.e_z() - dir.normalize()).length() < 1e-12);
        }
    }

    #[test]
    fn test_from_zero_direction_fails() {
        assert_eq!(
            OrthonormalBasis::from_direction(DVec3::ZERO),
            Err(MathError::ZeroLength)
        );
    }

    #[test]
    fn test_with_reference() {
        let basis =
            OrthonormalBasis::with_reference(DVec3::Y, DVec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_orthonormal(&basis);
        assert!((basis.e_x() - DVec3::X).length() < 1e-12);

        let parallel = OrthonormalBasis::with_reference(DVec3::Y, DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(parallel, Err(MathError::ParallelReference));
    }

    #[test]
    fn test_local_global_round_trip() {
        let basis = OrthonormalBasis::with_reference(
            DVec3::new(0.3, -1.2, 0.7),
            DVec3::new(1.0, 0.5, 0.0),
        )
        .unwrap();

        for v in [
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-4.5, 0.25, 9.0),
            DVec3::new(1e-3, -1e3, 7.0),
        ] {
            let back = basis.to_global(basis.to_local(v));
            assert!((back - v).length() < 1e-9 * v.length().max(1.0));
        }
    }

    #[test]
    fn test_rotate_keeps_orthonormal() {
        let mut basis = OrthonormalBasis::from_direction(DVec3::new(1.0, 1.0, 0.0)).unwrap();
        let axis = DVec3::new(0.2, 0.9, -0.4).normalize();
        for _ in 0..1000 {
            basis.rotate(axis, 0.0137);
        }
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_rotate_half_turn() {
        let mut basis = OrthonormalBasis::IDENTITY;
        basis.rotate(DVec3::Y, PI);
        assert!((basis.e_z() + DVec3::Z).length() < 1e-12);
        assert!((basis.e_x() + DVec3::X).length() < 1e-12);
        assert!((basis.e_y() - DVec3::Y).length() < 1e-12);
    }
}
