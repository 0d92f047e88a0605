//! Flat rectangle primitive.

use super::{unit_coordinate, Pose};
use crate::error::require_positive;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::{DVec2, DVec3, Interval, EPSILON};
use rand::RngCore;

/// A rectangle spanning `[-half_width, half_width]` along local `x` and
/// `[-half_height, half_height]` along local `y`.
#[derive(Debug, Clone)]
pub struct Rectangle {
    pose: Pose,
    half_width: f64,
    half_height: f64,
}

impl Rectangle {
    /// Rectangle centered at `center` with the given normal; `width_axis`
    /// fixes the direction of the width edges.
    pub fn new(
        center: DVec3,
        normal: DVec3,
        width_axis: DVec3,
        width: f64,
        height: f64,
    ) -> RenderResult<Self> {
        Self::with_pose(
            Pose::oriented(center, normal, width_axis)?,
            0.5 * width,
            0.5 * height,
        )
    }

    pub fn with_pose(pose: Pose, half_width: f64, half_height: f64) -> RenderResult<Self> {
        Ok(Self {
            pose,
            half_width: require_positive("rectangle half width", half_width)?,
            half_height: require_positive("rectangle half height", half_height)?,
        })
    }

    pub fn normal(&self) -> DVec3 {
        self.pose.basis().e_z()
    }
}

impl Hittable for Rectangle {
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
        if local.x.abs() > self.half_width || local.y.abs() > self.half_height {
            return None;
        }

        let point = ray.at(t);
        Some(Intersection::new(t, point, self.normal()).with_uv(self.texture_coordinates(point)))
    }

    fn surface_area(&self) -> f64 {
        4.0 * self.half_width * self.half_height
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        (0..n)
            .map(|_| {
                let x = (2.0 * gen_f64(rng) - 1.0) * self.half_width;
                let y = (2.0 * gen_f64(rng) - 1.0) * self.half_height;
                self.pose.point_to_global(DVec3::new(x, y, 0.0))
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        let (hx, hy) = (0.5 * self.half_width, 0.5 * self.half_height);
        [
            DVec3::ZERO,
            DVec3::new(hx, hy, 0.0),
            DVec3::new(-hx, hy, 0.0),
            DVec3::new(hx, -hy, 0.0),
            DVec3::new(-hx, -hy, 0.0),
        ]
        .into_iter()
        .map(|p| self.pose.point_to_global(p))
        .collect()
    }

    fn texture_coordinates(&self, point: DVec3) -> DVec2 {
        let local = self.pose.point_to_local(point);
        DVec2::new(
            unit_coordinate(local.x, self.half_width),
            unit_coordinate(local.y, self.half_height),
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
