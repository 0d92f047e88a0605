//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm in the triangle's local frame.

use super::Pose;
use crate::sampling::gen_f64;
use crate::{Hittable, Intersection, Ray, RenderError, RenderResult};
use lumen_math::{DVec2, DVec3, Interval, Vec3Ext, EPSILON};
use rand::RngCore;

/// A triangle primitive.
///
/// The pose sits at the centroid with local `z` along the face normal
/// (counter-clockwise winding of the given vertices); vertices are stored in
/// local coordinates so the triangle moves with its pose.
#[derive(Debug, Clone)]
pub struct Triangle {
    pose: Pose,
    /// Vertices in local coordinates (z = 0)
    vertices: [DVec3; 3],
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Fails when the vertices are collinear.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3) -> RenderResult<Self> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).try_unit().map_err(|_| {
            RenderError::InvalidGeometry(format!(
                "degenerate triangle {v0:?}, {v1:?}, {v2:?}"
            ))
        })?;

        let centroid = (v0 + v1 + v2) / 3.0;
        let pose = Pose::oriented(centroid, normal, edge1)?;
        let vertices = [v0, v1, v2].map(|v| {
            let local = pose.point_to_local(v);
            // Flatten rounding noise off the plane
            DVec3::new(local.x, local.y, 0.0)
        });

        Ok(Self { pose, vertices })
    }

    /// The vertices in world space.
    pub fn vertices(&self) -> [DVec3; 3] {
        self.vertices.map(|v| self.pose.point_to_global(v))
    }

    pub fn normal(&self) -> DVec3 {
        self.pose.basis().e_z()
    }

    /// Barycentric `(u, v)` of a local point with respect to vertices 1 and 2.
    fn barycentric(&self, local: DVec3) -> DVec2 {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let p = local - v0;

        let d11 = edge1.dot(edge1);
        let d12 = edge1.dot(edge2);
        let d22 = edge2.dot(edge2);
        let dp1 = p.dot(edge1);
        let dp2 = p.dot(edge2);
        let denom = d11 * d22 - d12 * d12;

        DVec2::new(
            (d22 * dp1 - d12 * dp2) / denom,
            (d11 * dp2 - d12 * dp1) / denom,
        )
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        let (origin, direction) = self.pose.ray_to_local(ray);
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = direction.cross(edge2);
        let det = edge1.dot(h);

        // Ray is parallel to triangle
        if det.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = origin - v0;
        let u = f * s.dot(h);
        if !(-EPSILON..=1.0 + EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * direction.dot(q);
        if v < -EPSILON || u + v > 1.0 + EPSILON {
            return None;
        }

        let t = f * edge2.dot(q);
        if !Interval::beyond(t_min).surrounds(t) {
            return None;
        }

        Some(Intersection::new(t, ray.at(t), self.normal()).with_uv(DVec2::new(u, v)))
    }

    fn surface_area(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        let [v0, v1, v2] = self.vertices;
        (0..n)
            .map(|_| {
                let r1 = gen_f64(rng).sqrt();
                let r2 = gen_f64(rng);
                let local = (1.0 - r1) * v0 + r1 * (1.0 - r2) * v1 + r1 * r2 * v2;
                self.pose.point_to_global(local)
            })
            .collect()
    }

    fn key_points(&self) -> Vec<DVec3> {
        // Centroid is the local origin
        std::iter::once(DVec3::ZERO)
            .chain(self.vertices.iter().map(|v| 0.5 * *v))
            .map(|p| self.pose.point_to_global(p))
            .collect()
    }

    fn texture_coordinates(&self, point: DVec3) -> DVec2 {
        self.barycentric(self.pose.point_to_local(point))
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
