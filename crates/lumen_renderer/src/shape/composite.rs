//! Composite shapes assembled from primitives.
//!
//! A composite owns its children by value. Intersection keeps the closest
//! child hit, area sums the children and surface sampling first picks a child
//! in proportion to its area.

use super::{Disk, Pose, Rectangle, Ring, Shape, Sphere, Torus, Triangle, Tube};
use crate::error::require_positive;
use crate::{Hittable, Intersection, Ray, RenderError, RenderResult};
use lumen_math::{DVec3, Vec3Ext};
use rand::distributions::{Distribution, WeightedIndex};
use rand::RngCore;

/// The assembly a composite was built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Box,
    Cylinder,
    CylindricalShell,
    Tetrahedron,
    Octahedron,
    HalfTorusWithSphericalCaps,
    Custom,
}

#[derive(Debug, Clone)]
pub struct CompositeShape {
    kind: CompositeKind,
    center: DVec3,
    children: Vec<Shape>,
    weights: WeightedIndex<f64>,
}

impl CompositeShape {
    /// Assemble a composite from arbitrary children around `center`.
    pub fn from_children(center: DVec3, children: Vec<Shape>) -> RenderResult<Self> {
        Self::build(CompositeKind::Custom, center, children)
    }

    fn build(kind: CompositeKind, center: DVec3, children: Vec<Shape>) -> RenderResult<Self> {
        let weights = WeightedIndex::new(children.iter().map(Hittable::surface_area))
            .map_err(|e| RenderError::InvalidGeometry(format!("{kind:?} children: {e}")))?;
        Ok(Self {
            kind,
            center,
            children,
            weights,
        })
    }

    /// Closed box with the given half extents along the pose axes.
    pub fn cuboid(pose: Pose, half_extents: DVec3) -> RenderResult<Self> {
        let basis = pose.basis();
        let axes = [basis.e_x(), basis.e_y(), basis.e_z()];
        let half = half_extents.to_array();
        for h in half {
            require_positive("box half extent", h)?;
        }

        let mut faces: Vec<Shape> = Vec::with_capacity(6);
        for a in 0..3 {
            let (u, v) = ((a + 1) % 3, (a + 2) % 3);
            for sign in [1.0, -1.0] {
                let normal = sign * axes[a];
                let center = pose.position() + half[a] * normal;
                let face_pose = Pose::oriented(center, normal, axes[u])?;
                faces.push(Rectangle::with_pose(face_pose, half[u], half[v])?.into());
            }
        }
        Self::build(CompositeKind::Box, pose.position(), faces)
    }

    /// Closed cylinder: a tube along the pose `z` axis and two end disks.
    pub fn cylinder(pose: Pose, radius: f64, half_length: f64) -> RenderResult<Self> {
        let axis = pose.basis().e_z();
        let mut children: Vec<Shape> = vec![Tube::with_pose(pose, radius, half_length)?.into()];
        for sign in [1.0, -1.0] {
            let cap = Pose::facing(pose.position() + sign * half_length * axis, sign * axis)?;
            children.push(Disk::with_pose(cap, radius)?.into());
        }
        Self::build(CompositeKind::Cylinder, pose.position(), children)
    }

    /// Thick-walled pipe: outer tube, inward-facing bore and two end rings.
    ///
    /// Every normal points out of the solid wall.
    pub fn cylindrical_shell(
        pose: Pose,
        inner_radius: f64,
        outer_radius: f64,
        half_length: f64,
    ) -> RenderResult<Self> {
        let axis = pose.basis().e_z();
        let mut children: Vec<Shape> = vec![
            Tube::with_pose(pose, outer_radius, half_length)?.into(),
            Tube::with_pose(pose, inner_radius, half_length)?
                .facing_inward()
                .into(),
        ];
        for sign in [1.0, -1.0] {
            let cap = Pose::facing(pose.position() + sign * half_length * axis, sign * axis)?;
            children.push(Ring::with_pose(cap, inner_radius, outer_radius)?.into());
        }
        Self::build(CompositeKind::CylindricalShell, pose.position(), children)
    }

    /// Regular tetrahedron inscribed in a sphere of `circumradius`.
    pub fn tetrahedron(pose: Pose, circumradius: f64) -> RenderResult<Self> {
        let scale = require_positive("tetrahedron circumradius", circumradius)? / 3f64.sqrt();
        let vertices = [
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
            DVec3::new(-1.0, -1.0, 1.0),
        ]
        .map(|v| pose.point_to_global(scale * v));

        // Counter-clockwise seen from outside
        let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]]
            .into_iter()
            .map(|[a, b, c]| Triangle::new(vertices[a], vertices[b], vertices[c]).map(Shape::from))
            .collect::<RenderResult<Vec<_>>>()?;
        Self::build(CompositeKind::Tetrahedron, pose.position(), faces)
    }

    /// Regular octahedron with its vertices on the pose axes.
    pub fn octahedron(pose: Pose, circumradius: f64) -> RenderResult<Self> {
        let r = require_positive("octahedron circumradius", circumradius)?;
        let basis = pose.basis();

        let mut faces: Vec<Shape> = Vec::with_capacity(8);
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                for sz in [1.0, -1.0] {
                    let a = pose.position() + sx * r * basis.e_x();
                    let b = pose.position() + sy * r * basis.e_y();
                    let c = pose.position() + sz * r * basis.e_z();
                    // Odd octants flip the winding
                    let face = if sx * sy * sz > 0.0 {
                        Triangle::new(a, b, c)?
                    } else {
                        Triangle::new(a, c, b)?
                    };
                    faces.push(face.into());
                }
            }
        }
        Self::build(CompositeKind::Octahedron, pose.position(), faces)
    }

    /// Half torus (local `y >= 0`) whose open ends are closed by spheres of
    /// the tube radius.
    pub fn half_torus_with_spherical_caps(
        pose: Pose,
        major: f64,
        minor: f64,
    ) -> RenderResult<Self> {
        let ends = [major, -major].map(|x| pose.point_to_global(DVec3::new(x, 0.0, 0.0)));
        let children = vec![
            Torus::half(pose, major, minor)?.into(),
            Sphere::new(ends[0], minor)?.into(),
            Sphere::new(ends[1], minor)?.into(),
        ];
        Self::build(
            CompositeKind::HalfTorusWithSphericalCaps,
            pose.position(),
            children,
        )
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }
}

impl Hittable for CompositeShape {
    fn intersect(&self, ray: &Ray, t_min: f64) -> Option<Intersection> {
        self.children
            .iter()
            .map(|child| child.intersect(ray, t_min))
            .fold(None, Intersection::nearest)
    }

    fn surface_area(&self) -> f64 {
        self.children.iter().map(Hittable::surface_area).sum()
    }

    fn sample_surface_points(&self, n: usize, rng: &mut dyn RngCore) -> Vec<DVec3> {
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            let child = &self.children[self.weights.sample(rng)];
            points.extend(child.sample_surface_points(1, rng));
        }
        points
    }

    fn key_points(&self) -> Vec<DVec3> {
        self.children.iter().flat_map(Hittable::key_points).collect()
    }

    fn position(&self) -> DVec3 {
        self.center
    }

    fn translate(&mut self, delta: DVec3) {
        self.center += delta;
        for child in &mut self.children {
            child.translate(delta);
        }
    }

    fn rotate_about(&mut self, pivot: DVec3, axis: DVec3, angle: f64) {
        self.center = pivot + (self.center - pivot).rotate_about(axis, angle);
        for child in &mut self.children {
            child.rotate_about(pivot, axis, angle);
        }
    }
}
