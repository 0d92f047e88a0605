//! Flat annulus primitive.

use super::Pose;
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderError, RenderResult};
use lumen_math::{DVec2, DVec3, Interval, EPSILON};
use rand::RngCore;
use std::f64::consts::PI;

/// An annulus `inner <= rho <= outer` in the local `xy` plane.
#[derive(Debug, Clone)]
pub struct Ring {
    pose: Pose,
    inner: f64,
    outer: f64,
}

impl Ring {
    pub fn new(center: DVec3, normal: DVec3, inner: f64, outer: f64) -> RenderResult<Self> {
        Self::with_pose(Pose::facing(center, normal)?, inner, outer)
    }

    pub fn with_pose(pose: Pose, inner: f64, outer: f64) -> RenderResult<Self> {
        let outer = require_positive("ring outer radius", outer)?;
        if !(inner.is_finite() && inner >= 0.0 && inner < outer) {
            return Err(RenderError::InvalidGeometry(format!(
                "ring inner radius must lie in [0, {outer}), got {inner}"
            )));
        }
        Ok(Self { pose, inner, outer })
    }

    pub fn normal(&self) -> DVec3 {
        self.pose.basis().e_z()
    }
}

impl Hittable for Ring {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (origin, direction) = self.pose.ray_to_local(ray);
        if direction.z.abs() < EPSILON {
            return None;
        }

        let t = -origin.z / direction.z;
        if !Interval::beyond(t_min).surrounds(t) {
            return None;
        }

        let local = origin + t * direction;
        let rho_sq = local.x * local.x + local.y * local.y;
        if !Interval::new(self.inner * self.inner, self.outer * self.outer).contains(rho_sq) {
            return None;
        }

        let point = ray.at(t);
        Some(Intersection::new(t, point, self.normal()).with_uv(self.texture_coordinates(point)))
    }

    fn surface_area(&self) -> f64 {
        PI * (self.outer * self.outer - self.inner * self.inner)
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        let inner_sq = self.inner * self.inner;
        let span = self.outer * self.outer - inner_sq;
        (0..n)
            .map(|_| {
                let r = (inner_sq + gen_f64(rng) * span).sqrt();
                let (sin_phi, cos_phi) = (2.0 * PI * gen_f64(rng)).sin_cos();
                self.pose
                    .point_to_global(DVec3::new(r * cos_phi, r * sin_phi, 0.0))
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let mid = 0.5 * (self.inner + self.outer);
        [
            DVec3::new(mid, 0.0, 0.0),
            DVec3::new(-mid, 0.0, 0.0),
            DVec3::new(0.0, mid, 0.0),
            DVec3::new(0.0, -mid, 0.0),
        ]
        .into_iter()
        .map(|p| self.pose.point_to_global(p))
        .collect()
    }

    /// `u` runs around the ring, `v` from the inner to the outer edge.
    fn texture_coordinates(&self, point: DVec3) -> DVec2 {
        let local = self.pose.point_to_local(point);
        let phi = local.y.atan2(local.x).rem_euclid(2.0 * PI);
        let rho = local.x.hypot(local.y);
        DVec2::new(
            phi / (2.0 * PI),
            ((rho - self.inner) / (self.outer - self.inner)).clamp(0.0, 1.0),
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
