//! Scene: the object arena, its light sources and the background.

use crate::hittable::HitRecord;
use crate::{Color, Hittable, Object, Ray};

/// Handle of an object inside its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A collection of objects to render.
///
/// Objects are only ever appended, so an [`ObjectId`] stays valid for the
/// lifetime of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Object>,
    /// Ids of objects whose material emits light
    lights: Vec<ObjectId>,
    background: Color,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            background,
        }
    }

    /// Add an object and return its handle.
    pub fn add(&mut self, object: Object) -> ObjectId {
        let id = ObjectId::new(self.objects.len());
        if object.is_light() {
            self.lights.push(id);
        }
        log::debug!(
            "Added object {} '{}' (light: {})",
            id.index(),
            object.name(),
            object.is_light()
        );
        self.objects.push(object);
        id
    }

    /// Look up an object by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from another scene with more objects.
    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Handles of the light-emitting objects, visible or not.
    pub fn lights(&self) -> &[ObjectId] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Show or hide an object; returns false for an unknown handle.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        match self.objects.get_mut(id.index()) {
            Some(object) => {
                object.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Advance every object by `dt` seconds.
    pub fn evolve(&mut self, dt: f64) {
        for object in &mut self.objects {
            object.evolve(dt);
        }
    }

    /// Closest hit beyond epsilon among the visible objects.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        for (index, object) in self.objects.iter().enumerate() {
            if !object.is_visible() {
                continue;
            }
            let Some(intersection) = object.shape().intersect(ray, 0.0) else {
                continue;
            };
            if closest.map_or(true, |c| intersection.t < c.t()) {
                closest = Some(HitRecord {
                    intersection,
                    object: ObjectId::new(index),
                });
            }
        }
        closest
    }
}
