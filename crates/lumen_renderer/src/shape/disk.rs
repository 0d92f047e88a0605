//! Flat disk primitive.

use super::{unit_coordinate, Pose};
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::{DVec2, DVec3, Interval, EPSILON};
use rand::RngCore;
use std::f64::consts::PI;

/// A disk in the local `xy` plane, normal along local `z`.
#[derive(Debug, Clone)]
pub struct Disk {
    pose: Pose,
    radius: f64,
}

impl Disk {
    pub fn new(center: DVec3, normal: DVec3, radius: f64) -> RenderResult<Self> {
        Self::with_pose(Pose::facing(center, normal)?, radius)
    }

    pub fn with_pose(pose: Pose, radius: f64) -> RenderResult<Self> {
        Ok(Self {
            pose,
            radius: require_positive("disk radius", radius)?,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn normal(&self) -> DVec3 {
        self.pose.basis().e_z()
    }
}

impl Hittable for Disk {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (origin, direction) = self.pose.ray_to_local(ray);

        // Ray is parallel to the plane
        if direction.z.abs() < EPSILON {
            return None;
        }

        let t = -origin.z / direction.z;
        if !Interval::beyond(t_min).surrounds(t) {
            return None;
        }

        let local = origin + t * direction;
        if local.x * local.x + local.y * local.y > self.radius * self.radius {
            return None;
        }

        let point = ray.at(t);
        Some(Intersection::new(t, point, self.normal()).with_uv(self.texture_coordinates(point)))
    }

    fn surface_area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        (0..n)
            .map(|_| {
                // sqrt keeps the density uniform in area
                let r = self.radius * gen_f64(rng).sqrt();
                let (sin_phi, cos_phi) = (2.0 * PI * gen_f64(rng)).sin_cos();
                self.pose
                    .point_to_global(DVec3::new(r * cos_phi, r * sin_phi, 0.0))
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let half = 0.5 * self.radius;
        [
            DVec3::ZERO,
            DVec3::new(half, 0.0, 0.0),
            DVec3::new(-half, 0.0, 0.0),
            DVec3::new(0.0, half, 0.0),
            DVec3::new(0.0, -half, 0.0),
        ]
        .into_iter()
        .map(|p| self.pose.point_to_global(p))
        .collect()
    }

    fn texture_coordinates(&self, point: DVec3) -> DVec2 {
        let local = self.pose.point_to_local(point);
        DVec2::new(
            unit_coordinate(local.x, self.radius),
            unit_coordinate(local.y, self.radius),
        )
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
