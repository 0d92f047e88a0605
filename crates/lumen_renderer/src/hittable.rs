//! Hittable trait, Intersection and HitRecord for ray-shape intersection.

use crate::{ObjectId, Ray};
use lumen_math::{DVec2, DVec3};
use rand::RngCore;

/// A ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f64,
    /// Point of intersection
    pub point: DVec3,
    /// Geometric (outward) unit normal; not flipped towards the ray
    pub normal: DVec3,
    /// Surface parameterization of the hit point, `(0, 0)` where undefined
    pub uv: DVec2,
}

impl Intersection {
    /// Build an intersection with texture coordinates `(0, 0)`.
    pub fn new(t: f64, point: DVec3, normal: DVec3) -> Self {
        Self {
            t,
            point,
            normal,
            uv: DVec2::ZERO,
        }
    }

    /// Attach texture coordinates.
    pub fn with_uv(mut self, uv: DVec2) -> Self {
        self.uv = uv;
        self
    }

    /// The nearer of two optional hits.
    pub fn nearest(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// An intersection tagged with the scene object that was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub intersection: Intersection,
    /// Handle of the hit object inside its scene
    pub object: ObjectId,
}

impl HitRecord {
    #[inline]
    pub fn t(&self) -> f64 {
        self.intersection.t
    }

    #[inline]
    pub fn point(&self) -> DVec3 {
        self.intersection.point
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.intersection.normal
    }

    #[inline]
    pub fn uv(&self) -> DVec2 {
        self.intersection.uv
    }

    /// The normal flipped to face against `direction`.
    #[inline]
    pub fn facing_normal(&self, direction: DVec3) -> DVec3 {
        if direction.dot(self.normal()) > 0.0 {
            -self.normal()
        } else {
            self.normal()
        }
    }
}

/// Trait for geometry that can be hit by rays and sampled for lighting.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t > t_min + EPSILON`, if any.
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection>;

    /// Total surface area.
    fn surface_area(&self) -> f64;

    /// `n` points distributed uniformly by area over the surface.
    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3>;

    /// A small deterministic point set used in place of random sampling.
    fn key_points(&self) -> Vec<DVec3>;

    /// Texture coordinates of a surface point, in `[0, 1]^2`.
    fn texture_coordinates(&self, _point: DVec3) -> DVec2 {
        DVec2::ZERO
    }

    /// Reference position (center) of the shape.
    fn position(&self) -> DVec3;

    /// Move the shape by `delta`.
    fn translate(&mut self, delta: DVec3);

    /// Rotate the shape by `angle` radians about the unit `axis` through `pivot`.
    fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64);
}
