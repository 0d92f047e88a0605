//! Cone (lateral surface) primitive.

use super::Pose;
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::roots::solve_quadratic;
use lumen_math::{DVec3, Interval, Vec3Ext};
use rand::RngCore;
use std::f64::consts::PI;

/// Lateral surface of a right circular cone.
///
/// The base circle of `radius` lies in the local `xy` plane at `z = 0`; the
/// apex sits at `z = height` on the local axis.
#[derive(Debug, Clone)]
pub struct Cone {
    pose: Pose,
    radius: f64,
    height: f64,
}

impl Cone {
    /// Cone with its base centered at `base_center`, pointing along `axis`.
    pub fn new(base_center: DVec3, axis: DVec3, radius: f64, height: f64) -> RenderResult<Self> {
        Self::with_pose(Pose::facing(base_center, axis)?, radius, height)
    }

    pub fn with_pose(pose: Pose, radius: f64, height: f64) -> RenderResult<Self> {
        Ok(Self {
            pose,
            radius: require_positive("cone radius", radius)?,
            height: require_positive("cone height", height)?,
        })
    }

    pub fn apex(&self) -> DVec3 {
        self.pose.point_to_global(DVec3::new(0.0, 0.0, self.height))
    }

    /// Radius over height.
    fn slope(&self) -> f64 {
        self.radius / self.height
    }
}

impl Hittable for Cone {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (o, d) = self.pose.ray_to_local(ray);
        let k2 = self.slope() * self.slope();

        // x^2 + y^2 = k^2 (h - z)^2
        let above = self.height - o.z;
        let a = d.x * d.x + d.y * d.y - k2 * d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.y * d.y + k2 * above * d.z);
        let c = o.x * o.x + o.y * o.y - k2 * above * above;
        let (t0, t1) = solve_quadratic(a, b, c)?;

        let range = Interval::beyond(t_min);
        let span = Interval::new(0.0, self.height);
        let t = [t0, t1]
            .into_iter()
            .find(|&t| range.surrounds(t) && span.contains(o.z + t * d.z))?;

        let local = o + t * d;
        let gradient = DVec3::new(local.x, local.y, k2 * (self.height - local.z));
        // The gradient vanishes at the apex; fall back to the axis there
        let normal = gradient
            .try_unit()
            .map(|n| self.pose.vector_to_global(n))
            .unwrap_or_else(|_| self.pose.basis().e_z());
        Some(Intersection::new(t, ray.at(t), normal))
    }

    fn surface_area(&self) -> f64 {
        PI * self.radius * self.radius.hypot(self.height)
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        (0..n)
            .map(|_| {
                // Area grows linearly with distance from the apex
                let s = gen_f64(rng).sqrt();
                let (sin_phi, cos_phi) = (2.0 * PI * gen_f64(rng)).sin_cos();
                let r = self.radius * s;
                self.pose.point_to_global(DVec3::new(
                    r * cos_phi,
                    r * sin_phi,
                    self.height * (1.0 - s),
                ))
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let (r, z) = (0.5 * self.radius, 0.5 * self.height);
        [
            DVec3::new(r, 0.0, z),
            DVec3::new(-r, 0.0, z),
            DVec3::new(0.0, r, z),
            DVec3::new(0.0, -r, z),
        ]
        .into_iter()
        .map(|p| self.pose.point_to_global(p))
        .collect()
    }

    fn position(&self) -> DVec3 {
        self.pose.position()
    }

    fn translate(&mut self, delta: DVec3) {
        self.pose.translate(delta);
    }

    fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64) {
        self.pose.rotate_about(pivot, axis, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::test_support::{assert_close, ray_towards};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cone() -> Cone {
        // Base radius 1 at z = 0, apex at z = 2
        Cone::new(DVec3::ZERO, DVec3::Z, 1.0, 2.0).unwrap()
    }

    #[test]
    fn test_cone_side_hit() {
        // At z = 1 the cone radius is 0.5
        let ray = ray_towards(DVec3::new(-5.0, 0.0, 1.0), DVec3::new(0.0, 0.0, 1.0));
        let hit = cone().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-9);
        assert_close(hit.point, DVec3::new(-0.5, 0.0, 1.0), 1e-9);

        // Outward normal tilts up towards the apex
        assert!(hit.normal.x < 0.0 && hit.normal.z > 0.0);
        assert_close(hit.normal, DVec3::new(-2.0, 0.0, 1.0).normalize(), 1e-9);
    }

    #[test]
    fn test_cone_height_bounds() {
        // Passes through the mirrored nappe above the apex
        let ray = ray_towards(DVec3::new(-5.0, 0.0, 3.0), DVec3::new(0.0, 0.0, 3.0));
        assert!(cone().intersect(&ray, 0.0).is_none());

        // Passes below the base
        let ray = ray_towards(DVec3::new(-5.0, 0.0, -0.5), DVec3::new(0.0, 0.0, -0.5));
        assert!(cone().intersect(&ray, 0.0).is_none());
    }

    #[test]
    fn test_cone_along_axis_through_base() {
        // Enters through the open base and hits the apex region from inside
        let ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::Z).unwrap();
        let hit = cone().intersect(&ray, 0.0).unwrap();
        assert!((hit.point - DVec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_cone_samples_on_surface() {
        let cone = cone();
        let mut rng = StdRng::seed_from_u64(4);
        for p in cone.sample_surface_points(200, &mut rng) {
            let expected_r = 0.5 * (2.0 - p.z);
            assert!((p.x.hypot(p.y) - expected_r).abs() < 1e-9);
        }
        assert!((cone.surface_area() - PI * 5.0_f64.sqrt()).abs() < 1e-12);
    }
}
