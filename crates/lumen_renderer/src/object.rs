//! Scene objects: a shape bound to a material plus motion state.

use crate::shape::Shape;
use crate::{Hittable, Material};
use lumen_math::{DVec3, Vec3Ext};

/// A renderable object.
///
/// Position and orientation live in the shape's pose. Motion is described by
/// three vectors whose direction is an axis and whose length is a rate:
/// `velocity` (units per second), `angular_velocity` (orbit about the world
/// origin, radians per second) and `spin` (rotation about the object's own
/// position, radians per second).
#[derive(Debug, Clone)]
pub struct Object {
    name: String,
    material: Material,
    shape: Shape,
    velocity: DVec3,
    angular_velocity: DVec3,
    spin: DVec3,
    visible: bool,
}

impl Object {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>, material: Material) -> Self {
        Self {
            name: name.into(),
            material,
            shape: shape.into(),
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            spin: DVec3::ZERO,
            visible: true,
        }
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: DVec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_spin(mut self, spin: DVec3) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> DVec3 {
        self.shape.position()
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_light(&self) -> bool {
        self.material.is_light()
    }

    /// Advance the object by `dt` seconds: translate, orbit about the world
    /// origin (carrying the velocity along), then spin in place.
    pub fn evolve(&mut self, dt: f64) {
        self.shape.translate(self.velocity * dt);

        if let Ok(axis) = self.angular_velocity.try_unit() {
            let angle = self.angular_velocity.length() * dt;
            self.shape.rotate_about(DVec3::ZERO, axis, angle);
            self.velocity = self.velocity.rotate_about(axis, angle);
        }

        if let Ok(axis) = self.spin.try_unit() {
            let angle = self.spin.length() * dt;
            let pivot = self.shape.position();
            self.shape.rotate_about(pivot, axis, angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Disk, Sphere};
    use crate::Color;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_evolve_translates() {
        let sphere = Sphere::new(DVec3::ZERO, 1.0).unwrap();
        let mut object = Object::new("ball", sphere, Material::default())
            .with_velocity(DVec3::new(1.0, 2.0, 0.0));
        object.evolve(0.5);
        assert!((object.position() - DVec3::new(0.5, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_evolve_orbits_origin() {
        let sphere = Sphere::new(DVec3::new(2.0, 0.0, 0.0), 0.5).unwrap();
        let mut object = Object::new("moon", sphere, Material::default())
            .with_angular_velocity(DVec3::new(0.0, 0.0, FRAC_PI_2));
        object.evolve(1.0);
        assert!((object.position() - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);

        // Half a turn more at twice the step
        object.evolve(2.0);
        assert!((object.position() - DVec3::new(0.0, -2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_evolve_rotates_velocity_with_orbit() {
        let sphere = Sphere::new(DVec3::ZERO, 0.5).unwrap();
        let mut object = Object::new("marble", sphere, Material::default())
            .with_velocity(DVec3::X)
            .with_angular_velocity(DVec3::new(0.0, 0.0, FRAC_PI_2));
        object.evolve(1.0);
        assert!((object.velocity() - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_spin_keeps_position() {
        let disk = Disk::new(DVec3::new(1.0, 1.0, 1.0), DVec3::Z, 1.0).unwrap();
        let mut object = Object::new("lamp", disk, Material::light(Color::ONE))
            .with_spin(DVec3::new(FRAC_PI_2, 0.0, 0.0));
        object.evolve(1.0);
        assert!((object.position() - DVec3::ONE).length() < 1e-12);
        let Shape::Disk(disk) = object.shape() else {
            panic!("shape changed variant");
        };
        assert!((disk.normal() + DVec3::Y).length() < 1e-12);
        assert!(object.is_light());
    }
}
