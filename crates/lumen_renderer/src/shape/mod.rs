//! Analytic shapes.
//!
//! Every primitive is described in a canonical local frame given by its
//! [`Pose`]: the local `z` axis is the plane normal (disk, ring, rectangle,
//! triangle) or the symmetry axis (tube, cone, torus). Rays are mapped into
//! that frame, intersected in closed form, and the hit is mapped back.
//!
//! [`Shape`] is the closed set of shapes a scene object can carry.

mod composite;
mod cone;
mod disk;
mod rectangle;
mod ring;
mod sphere;
mod torus;
mod triangle;
mod tube;

pub use composite::{CompositeKind, CompositeShape};
pub use cone::Cone;
pub use disk::Disk;
pub use rectangle::Rectangle;
pub use ring::Ring;
pub use sphere::Sphere;
pub use torus::Torus;
pub use triangle::Triangle;
pub use tube::Tube;

use crate::{Hittable, Intersection, Ray, RenderResult};
use lumen_math::{DVec2, DVec3, OrthonormalBasis, Vec3Ext};
use rand::RngCore;

/// Position and orientation of a shape's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    position: DVec3,
    basis: OrthonormalBasis,
}

impl Pose {
    pub fn new(position: DVec3, basis: OrthonormalBasis) -> Self {
        Self { position, basis }
    }

    /// Pose at `position` with the world axes as local frame.
    pub fn at(position: DVec3) -> Self {
        Self::new(position, OrthonormalBasis::IDENTITY)
    }

    /// Pose at `position` whose local `z` axis points along `axis`.
    pub fn facing(position: DVec3, axis: DVec3) -> RenderResult<Self> {
        Ok(Self::new(position, OrthonormalBasis::from_direction(axis)?))
    }

    /// Pose whose local `z` is `axis` and local `x` is fixed by `reference`.
    pub fn oriented(position: DVec3, axis: DVec3, reference: DVec3) -> RenderResult<Self> {
        Ok(Self::new(
            position,
            OrthonormalBasis::with_reference(axis, reference)?,
        ))
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn basis(&self) -> &OrthonormalBasis {
        &self.basis
    }

    /// Ray origin and direction expressed in the local frame.
    #[inline]
    pub fn ray_to_local(&self, ray: &Ray) -> (DVec3, DVec3) {
        (
            self.basis.to_local(ray.origin() - self.position),
            self.basis.to_local(ray.direction()),
        )
    }

    #[inline]
    pub fn point_to_local(&self, point: DVec3) -> DVec3 {
        self.basis.to_local(point - self.position)
    }

    #[inline]
    pub fn point_to_global(&self, local: DVec3) -> DVec3 {
        self.position + self.basis.to_global(local)
    }

    #[inline]
    pub fn vector_to_global(&self, local: DVec3) -> DVec3 {
        self.basis.to_global(local)
    }

    pub fn translate(&mut self, delta: DVec3) {
        self.position += delta;
    }

    pub fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64) {
        self.position = pivot + (self.position - pivot).rotate_about(axis, angle);
        self.basis.rotate(axis, angle);
    }
}

/// Every shape a scene object can carry.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Disk(Disk),
    Ring(Ring),
    Rectangle(Rectangle),
    Tube(Tube),
    Cone(Cone),
    Triangle(Triangle),
    /// Full torus or half torus (see [`Torus::half`]).
    Torus(Torus),
    Composite(CompositeShape),
}

impl Shape {
    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Shape::Sphere(s) => s,
            Shape::Disk(s) => s,
            Shape::Ring(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Tube(s) => s,
            Shape::Cone(s) => s,
            Shape::Triangle(s) => s,
            Shape::Torus(s) => s,
            Shape::Composite(s) => s,
        }
    }

    fn as_hittable_mut(&mut self) -> &mut dyn Hittable {
        match self {
            Shape::Sphere(s) => s,
            Shape::Disk(s) => s,
            Shape::Ring(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Tube(s) => s,
            Shape::Cone(s) => s,
            Shape::Triangle(s) => s,
            Shape::Torus(s) => s,
            Shape::Composite(s) => s,
        }
    }
}

impl Hittable for Shape {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        self.as_hittable().intersect(ray, t_min)
    }

    fn surface_area(&self) -> f64 {
        self.as_hittable().surface_area()
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        self.as_hittable().sample_surface_points(n, rng)
    }

    fn key_points(&self) -> Vec<DVec3> {
        self.as_hittable().key_points()
    }

    fn texture_coordinates(&self, point: DVec3) -> DVec2 {
        self.as_hittable().texture_coordinates(point)
    }

    fn position(&self) -> DVec3 {
        self.as_hittable().position()
    }

    fn translate(&mut self, delta: DVec3) {
        self.as_hittable_mut().translate(delta)
    }

    fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64) {
        self.as_hittable_mut().rotate_about(pivot, axis, angle)
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Sphere, Disk, Ring, Rectangle, Tube, Cone, Triangle, Torus);

impl From<CompositeShape> for Shape {
    fn from(shape: CompositeShape) -> Self {
        Shape::Composite(shape)
    }
}

/// Map a local coordinate in `[-half, half]` to `[0, 1]`.
#[inline]
pub(crate) fn unit_coordinate(value: f64, half: f64) -> f64 {
    (0.5 * (value / half + 1.0)).clamp(0.0, 1.0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::EPSILON;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pose_round_trip() {
        let pose = Pose::oriented(
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(0.0, 1.0, 1.0),
            DVec3::X,
        )
        .unwrap();
        let p = DVec3::new(4.0, 5.0, -6.0);
        assert!((pose.point_to_global(pose.point_to_local(p)) - p).length() < 1e-12);
    }

    #[test]
    fn test_pose_rotate_about_pivot() {
        let mut pose = Pose::at(DVec3::new(2.0, 0.0, 0.0));
        pose.rotate_about(DVec3::ZERO, DVec3::Z, FRAC_PI_2);
        assert!((pose.position() - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);
        assert!((pose.basis().e_x() - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_shape_dispatch() {
        let shape: Shape = Sphere::new(DVec3::ZERO, 2.0).unwrap().into();
        assert!((shape.surface_area() - 16.0 * std::f64::consts::PI).abs() < 1e-9);
        assert_eq!(shape.position(), DVec3::ZERO);
    }

    /// One of every shape, each crossed by a ray along `+z` through
    /// `(0.3, 0.2)`.
    fn every_shape() -> Vec<(&'static str, Shape)> {
        let around_y = Pose::facing(DVec3::ZERO, DVec3::Y).unwrap();
        // Local y >= 0 is global z <= 0, the side the ray enters from
        let half_pose = Pose::oriented(DVec3::ZERO, DVec3::Y, DVec3::X).unwrap();
        vec![
            ("sphere", Sphere::new(DVec3::ZERO, 1.0).unwrap().into()),
            ("disk", Disk::new(DVec3::ZERO, DVec3::Z, 1.0).unwrap().into()),
            ("ring", Ring::new(DVec3::ZERO, DVec3::Z, 0.2, 1.0).unwrap().into()),
            (
                "rectangle",
                Rectangle::new(DVec3::ZERO, DVec3::Z, DVec3::X, 2.0, 2.0)
                    .unwrap()
                    .into(),
            ),
            ("tube", Tube::new(DVec3::ZERO, DVec3::Y, 1.0, 2.0).unwrap().into()),
            ("cone", Cone::new(DVec3::ZERO, DVec3::Y, 1.0, 2.0).unwrap().into()),
            (
                "triangle",
                Triangle::new(
                    DVec3::new(-1.0, -1.0, 0.0),
                    DVec3::new(1.0, -1.0, 0.0),
                    DVec3::new(0.0, 1.0, 0.0),
                )
                .unwrap()
                .into(),
            ),
            ("torus", Torus::new(DVec3::ZERO, DVec3::Y, 1.0, 0.4).unwrap().into()),
            ("half torus", Torus::half(half_pose, 1.0, 0.4).unwrap().into()),
            (
                "box",
                CompositeShape::cuboid(Pose::at(DVec3::ZERO), DVec3::ONE)
                    .unwrap()
                    .into(),
            ),
            (
                "cylinder",
                CompositeShape::cylinder(around_y, 1.0, 1.0).unwrap().into(),
            ),
            (
                "cylindrical shell",
                CompositeShape::cylindrical_shell(around_y, 0.5, 1.0, 1.0)
                    .unwrap()
                    .into(),
            ),
            (
                "tetrahedron",
                CompositeShape::tetrahedron(Pose::at(DVec3::ZERO), 2.0)
                    .unwrap()
                    .into(),
            ),
            (
                "octahedron",
                CompositeShape::octahedron(Pose::at(DVec3::ZERO), 1.0)
                    .unwrap()
                    .into(),
            ),
            (
                "capped half torus",
                CompositeShape::half_torus_with_spherical_caps(half_pose, 1.0, 0.4)
                    .unwrap()
                    .into(),
            ),
        ]
    }

    #[test]
    fn test_no_hit_at_or_before_t_min() {
        let ray = Ray::new(DVec3::new(0.3, 0.2, -5.0), DVec3::Z).unwrap();

        for (name, shape) in every_shape() {
            let first = shape
                .intersect(&ray, 0.0)
                .unwrap_or_else(|| panic!("{name}: expected a hit"));

            // Restarting from the first hit must move strictly past it
            if let Some(next) = shape.intersect(&ray, first.t) {
                assert!(next.t > first.t + EPSILON, "{name}: {} after {}", next.t, first.t);
            }

            // Walking every crossing keeps t increasing and terminates
            let mut t_min = 0.0;
            let mut crossings = 0;
            while let Some(hit) = shape.intersect(&ray, t_min) {
                assert!(hit.t > t_min + EPSILON, "{name}: {} after {}", hit.t, t_min);
                t_min = hit.t;
                crossings += 1;
                assert!(crossings <= 8, "{name}: too many crossings");
            }
            assert!(crossings >= 1, "{name}");
        }
    }

    #[test]
    fn test_facing_rejects_zero_axis() {
        assert!(Pose::facing(DVec3::ZERO, DVec3::ZERO).is_err());
    }
}
