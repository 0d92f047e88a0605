//! Torus and half torus primitives.

use super::Pose;
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderError, RenderResult};
use lumen_math::roots::{solve_quadratic, solve_quartic};
use lumen_math::{DVec3, Interval};
use rand::RngCore;
use std::f64::consts::PI;

/// A ring torus around the local `z` axis.
///
/// `major` is the distance from the center to the tube center line, `minor`
/// the tube radius. A half torus keeps only the part with azimuth
/// `atan2(y, x)` in `[0, pi]`, i.e. local `y >= 0`.
#[derive(Debug, Clone)]
pub struct Torus {
    pose: Pose,
    major: f64,
    minor: f64,
    half: bool,
}

impl Torus {
    pub fn new(center: DVec3, axis: DVec3, major: f64, minor: f64) -> RenderResult<Self> {
        Self::with_pose(Pose::facing(center, axis)?, major, minor, false)
    }

    /// Half torus; `pose` fixes which half through its local `y` axis.
    pub fn half(pose: Pose, major: f64, minor: f64) -> RenderResult<Self> {
        Self::with_pose(pose, major, minor, true)
    }

    pub fn with_pose(pose: Pose, major: f64, minor: f64, half: bool) -> RenderResult<Self> {
        let major = require_positive("torus major radius", major)?;
        let minor = require_positive("torus minor radius", minor)?;
        if minor >= major {
            return Err(RenderError::InvalidGeometry(format!(
                "torus minor radius {minor} must be below major radius {major}"
            )));
        }
        Ok(Self {
            pose,
            major,
            minor,
            half,
        })
    }

    pub fn is_half(&self) -> bool {
        self.half
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    fn in_sweep(&self, local: DVec3) -> bool {
        !self.half || local.y >= -1e-9
    }
}

impl Hittable for Torus {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (origin, direction) = self.pose.ray_to_local(ray);

        // Reject against the bounding sphere, and start the quartic from its
        // entry point so the coefficients stay well conditioned.
        let bound = self.major + self.minor;
        let half_b = origin.dot(direction);
        let c = origin.length_squared() - bound * bound;
        let (enter, exit) = solve_quadratic(1.0, 2.0 * half_b, c)?;
        if exit <= t_min {
            return None;
        }
        let shift = enter.max(0.0);
        let o = origin + shift * direction;
        let d = direction;

        let r2 = self.major * self.major;
        let g = d.length_squared();
        let h = 2.0 * o.dot(d);
        let i = o.length_squared() + r2 - self.minor * self.minor;
        let planar_dd = d.x * d.x + d.y * d.y;
        let planar_od = o.x * d.x + o.y * d.y;
        let planar_oo = o.x * o.x + o.y * o.y;

        let coeffs = [
            g * g,
            2.0 * g * h,
            h * h + 2.0 * g * i - 4.0 * r2 * planar_dd,
            2.0 * h * i - 8.0 * r2 * planar_od,
            i * i - 4.0 * r2 * planar_oo,
        ];

        let range = Interval::beyond(t_min);
        let (t, local) = solve_quartic(coeffs)
            .into_iter()
            .map(|root| root + shift)
            .filter(|&t| range.surrounds(t))
            .map(|t| (t, origin + t * direction))
            .find(|(_, local)| self.in_sweep(*local))?;

        // Analytic gradient of F(p) = (|p|^2 + R^2 - r^2)^2 - 4R^2 (x^2 + y^2)
        let sum = local.length_squared() + r2 - self.minor * self.minor;
        let gradient = 4.0 * sum * local - 8.0 * r2 * DVec3::new(local.x, local.y, 0.0);
        let normal = self.pose.vector_to_global(gradient.normalize());

        Some(Intersection::new(t, ray.at(t), normal))
    }

    fn surface_area(&self) -> f64 {
        let full = 4.0 * PI * PI * self.major * self.minor;
        if self.half {
            0.5 * full
        } else {
            full
        }
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        let sweep = if self.half { PI } else { 2.0 * PI };
        let mut points = Vec::with_capacity(n);
        while points.len() < n {
            let theta = 2.0 * PI * gen_f64(rng);
            // Area density is proportional to the distance from the axis
            let ring = self.major + self.minor * theta.cos();
            if gen_f64(rng) * (self.major + self.minor) > ring {
                continue;
            }
            let phi = sweep * gen_f64(rng);
            let local = DVec3::new(
                ring * phi.cos(),
                ring * phi.sin(),
                self.minor * theta.sin(),
            );
            points.push(self.pose.point_to_global(local));
        }
        points
    }

    fn key_points(&self) -> Vec<DVec3> {
        let outer = self.major + self.minor;
        [
            DVec3::new(outer, 0.0, 0.0),
            DVec3::new(0.0, outer, 0.0),
            DVec3::new(-outer, 0.0, 0.0),
            DVec3::new(0.0, -outer, 0.0),
        ]
        .into_iter()
        .filter(|p| self.in_sweep(*p))
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

    fn torus() -> Torus {
        Torus::new(DVec3::ZERO, DVec3::Z, 2.0, 0.5).unwrap()
    }

    #[test]
    fn test_torus_hit_outer_wall() {
        let ray = ray_towards(DVec3::new(-10.0, 0.0, 0.0), DVec3::ZERO);
        let hit = torus().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 7.5).abs() < 1e-7, "t = {}", hit.t);
        assert_close(hit.point, DVec3::new(-2.5, 0.0, 0.0), 1e-7);
        assert_close(hit.normal, -DVec3::X, 1e-7);
    }

    #[test]
    fn test_torus_hit_from_hole() {
        // From the center, the first wall is the inner equator
        let ray = Ray::new(DVec3::ZERO, DVec3::X).unwrap();
        let hit = torus().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-7);
        assert_close(hit.normal, -DVec3::X, 1e-7);
    }

    #[test]
    fn test_torus_miss_through_hole() {
        let ray = ray_towards(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO);
        assert!(torus().intersect(&ray, 0.0).is_none());
    }

    #[test]
    fn test_torus_miss_bounding_sphere() {
        let ray = ray_towards(DVec3::new(-10.0, 5.0, 0.0), DVec3::new(0.0, 5.0, 0.0));
        assert!(torus().intersect(&ray, 0.0).is_none());
    }

    #[test]
    fn test_torus_from_above_hits_tube_top() {
        let ray = ray_towards(DVec3::new(2.0, 0.0, 5.0), DVec3::new(2.0, 0.0, 0.0));
        let hit = torus().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-7);
        assert_close(hit.normal, DVec3::Z, 1e-7);
    }

    #[test]
    fn test_torus_never_returns_root_below_t_min() {
        let torus = torus();
        let ray = ray_towards(DVec3::new(-10.0, 0.0, 0.0), DVec3::ZERO);
        // Roots along this line are at 7.5, 8.5, 11.5 and 12.5
        for (t_min, expected) in [(0.0, 7.5), (8.0, 8.5), (9.0, 11.5), (12.0, 12.5)] {
            let hit = torus.intersect(&ray, t_min).unwrap();
            assert!(hit.t > t_min);
            assert!((hit.t - expected).abs() < 1e-7, "t_min {t_min}: {}", hit.t);
        }
        assert!(torus.intersect(&ray, 12.5).is_none());
    }

    #[test]
    fn test_half_torus_cuts_azimuth() {
        let half = Torus::half(Pose::at(DVec3::ZERO), 2.0, 0.5).unwrap();

        // The y > 0 half is present
        let ray = ray_towards(DVec3::new(0.0, 10.0, 0.0), DVec3::ZERO);
        let hit = half.intersect(&ray, 0.0).unwrap();
        assert!((hit.point.y - 2.5).abs() < 1e-7);

        // Coming from -y the near half is missing, the far half is hit
        let ray = ray_towards(DVec3::new(0.0, -10.0, 0.0), DVec3::ZERO);
        let hit = half.intersect(&ray, 0.0).unwrap();
        assert!((hit.point.y - 1.5).abs() < 1e-7);

        assert!((half.surface_area() - 2.0 * PI * PI * 2.0 * 0.5).abs() < 1e-9);
        assert_eq!(half.key_points().len(), 3);
    }

    #[test]
    fn test_torus_samples_on_surface() {
        let torus = torus();
        let mut rng = StdRng::seed_from_u64(12);
        for p in torus.sample_surface_points(300, &mut rng) {
            let ring = p.x.hypot(p.y) - 2.0;
            assert!((ring.hypot(p.z) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_torus_rejects_self_intersecting_radii() {
        assert!(Torus::new(DVec3::ZERO, DVec3::Z, 1.0, 1.5).is_err());
    }
}
