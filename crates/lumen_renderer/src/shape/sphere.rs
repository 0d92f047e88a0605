//! Sphere primitive.

use super::Pose;
use crate::error::require_positive;
use crate::sampling::uniform_sphere;
use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::roots::solve_quadratic;
use lumen_math::{DVec3, Interval};
use rand::RngCore;
use std::f64::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    pose: Pose,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64) -> RenderResult<Self> {
        Ok(Self {
            pose: Pose::at(center),
            radius: require_positive("sphere radius", radius)?,
        })
    }

    pub fn center(&self) -> DVec3 {
        self.pose.position()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let oc = ray.origin() - self.center();
        let half_b = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Direction is unit length, so a = 1
        let (t0, t1) = solve_quadratic(1.0, 2.0 * half_b, c)?;

        // Find the nearest root in the acceptable range
        let range = Interval::beyond(t_min);
        let t = [t0, t1].into_iter().find(|t| range.surrounds(*t))?;

        let point = ray.at(t);
        let normal = (point - self.center()) / self.radius;
        Some(Intersection::new(t, point, normal))
    }

    fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        (0..n)
            .map(|_| self.center() + self.radius * uniform_sphere(rng))
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let basis = self.pose.basis();
        [basis.e_x(), basis.e_y(), basis.e_z()]
            .into_iter()
            .flat_map(|axis| [axis, -axis])
            .map(|axis| self.center() + self.radius * axis)
            .collect()
    }

    fn position(&self) -> DVec3 {
        self.center()
    }

    fn translate(&mut self, delta: DVec3) {
        self.pose.translate(delta);
    }

    fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64) {
        self.pose.rotate_about(pivot, axis, angle);
    }
}
