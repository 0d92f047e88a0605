//! Open cylinder (tube) primitive.

use super::Pose;
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::roots::solve_quadratic;
use lumen_math::{DVec3, Interval};
use rand::RngCore;
use std::f64::consts::PI;

/// Lateral surface of a cylinder of `radius` around local `z`, spanning
/// `-half_length <= z <= half_length`.
///
/// The normal points away from the axis unless the tube faces inward, as the
/// bore of a thick-walled pipe does.
#[derive(Debug, Clone)]
pub struct Tube {
    pose: Pose,
    radius: f64,
    half_length: f64,
    inward: bool,
}

impl Tube {
    pub fn new(center: DVec3, axis: DVec3, radius: f64, length: f64) -> RenderResult<Self> {
        Self::with_pose(Pose::facing(center, axis)?, radius, 0.5 * length)
    }

    pub fn with_pose(pose: Pose, radius: f64, half_length: f64) -> RenderResult<Self> {
        Ok(Self {
            pose,
            radius: require_positive("tube radius", radius)?,
            half_length: require_positive("tube half length", half_length)?,
            inward: false,
        })
    }

    /// Flip the normal towards the axis.
    pub fn facing_inward(mut self) -> Self {
        self.inward = true;
        self
    }
}

impl Hittable for Tube {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (origin, direction) = self.pose.ray_to_local(ray);

        let a = direction.x * direction.x + direction.y * direction.y;
        // Parallel to the axis: never crosses the lateral surface
        if a < 1e-12 {
            return None;
        }
        let b = 2.0 * (origin.x * direction.x + origin.y * direction.y);
        let c = origin.x * origin.x + origin.y * origin.y - self.radius * self.radius;
        let (t0, t1) = solve_quadratic(a, b, c)?;

        let range = Interval::beyond(t_min);
        let t = [t0, t1].into_iter().find(|&t| {
            range.surrounds(t) && (origin.z + t * direction.z).abs() <= self.half_length
        })?;

        let local = origin + t * direction;
        let radial = DVec3::new(local.x, local.y, 0.0) / self.radius;
        let normal = self
            .pose
            .vector_to_global(if self.inward { -radial } else { radial });
        Some(Intersection::new(t, ray.at(t), normal))
    }

    fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.half_length
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        (0..n)
            .map(|_| {
                let (sin_phi, cos_phi) = (2.0 * PI * gen_f64(rng)).sin_cos();
                let z = (2.0 * gen_f64(rng) - 1.0) * self.half_length;
                self.pose.point_to_global(DVec3::new(
                    self.radius * cos_phi,
                    self.radius * sin_phi,
                    z,
                ))
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let r = self.radius;
        [
            DVec3::new(r, 0.0, 0.0),
            DVec3::new(-r, 0.0, 0.0),
            DVec3::new(0.0, r, 0.0),
            DVec3::new(0.0, -r, 0.0),
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

    fn tube() -> Tube {
        // Radius 1 around y, from y = -1 to y = 1
        Tube::new(DVec3::ZERO, DVec3::Y, 1.0, 2.0).unwrap()
    }

    #[test]
    fn test_tube_hit_outside() {
        let ray = ray_towards(DVec3::new(-5.0, 0.5, 0.0), DVec3::new(0.0, 0.5, 0.0));
        let hit = tube().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert_close(hit.normal, -DVec3::X, 1e-9);
    }

    #[test]
    fn test_tube_hit_from_inside() {
        let ray = Ray::new(DVec3::ZERO, DVec3::Z).unwrap();
        let hit = tube().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-9);
        assert_close(hit.normal, DVec3::Z, 1e-9);
    }

    #[test]
    fn test_inward_tube_normal_faces_axis() {
        let ray = ray_towards(DVec3::new(-5.0, 0.5, 0.0), DVec3::new(0.0, 0.5, 0.0));
        let inner = tube().facing_inward();

        let hit = inner.intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert_close(hit.normal, DVec3::X, 1e-9);

        let far = inner.intersect(&ray, hit.t).unwrap();
        assert!((far.t - 6.0).abs() < 1e-9);
        assert_close(far.normal, -DVec3::X, 1e-9);
    }

    #[test]
    fn test_tube_axial_bounds() {
        // Crosses the infinite cylinder above the end of the tube
        let ray = ray_towards(DVec3::new(-5.0, 1.5, 0.0), DVec3::new(0.0, 1.5, 0.0));
        assert!(tube().intersect(&ray, 0.0).is_none());

        // Enters through the open end and leaves through the wall
        let ray = ray_towards(DVec3::new(0.0, 3.0, 0.0), DVec3::new(1.0, -1.0, 0.0) * 2.0);
        let hit = tube().intersect(&ray, 0.0).unwrap();
        assert!((hit.point.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tube_parallel_to_axis() {
        let ray = Ray::new(DVec3::new(0.5, -5.0, 0.0), DVec3::Y).unwrap();
        assert!(tube().intersect(&ray, 0.0).is_none());
    }
}
