//! Surface materials and the light interaction model.
//!
//! A [`Material`] chooses, per hit, one of three interactions (diffuse,
//! reflective, refractive) from a normalized probability table, optionally
//! corrected with Schlick's Fresnel approximation, and then re-spawns the ray
//! along the sampled direction with an updated throughput.

use crate::hittable::HitRecord;
use crate::sampling::{cosine_hemisphere, gen_f64, sample_cone};
use crate::{Color, Ray, RenderError, RenderResult, Texture};
use lumen_math::{DVec3, Vec3Ext};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

/// Reflective weights closer than this to 0 or 1 skip the Fresnel rescale.
const FRESNEL_CUTOFF: f64 = 1e-9;

/// The ways a ray can continue after hitting a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    Diffuse,
    Reflective,
    Refractive,
}

impl InteractionType {
    /// All interactions, in selection order.
    pub const ALL: [Self; 3] = [Self::Diffuse, Self::Reflective, Self::Refractive];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Diffuse => 0,
            Self::Reflective => 1,
            Self::Refractive => 2,
        }
    }
}

/// Surface description shared by every renderer.
///
/// Interaction probabilities always sum to one; they are renormalized
/// whenever they are set.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    color: Color,
    specular_color: Color,
    emission: Color,
    /// 0 = perfect specular, 1 = widest glossy cone
    roughness: f64,
    refractive_index: f64,
    /// Stored for media support, not used by transport
    mean_free_path: f64,
    fresnel: bool,
    probabilities: [f64; 3],
    texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::splat(0.8))
    }
}

impl Material {
    /// Lambertian surface with the given albedo.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            specular_color: Color::ONE,
            emission: Color::ZERO,
            roughness: 0.0,
            refractive_index: 1.0,
            mean_free_path: f64::INFINITY,
            fresnel: false,
            probabilities: [1.0, 0.0, 0.0],
            texture: None,
        }
    }

    /// Perfect mirror tinted by `specular`.
    pub fn mirror(specular: Color) -> Self {
        Self {
            specular_color: specular,
            probabilities: [0.0, 1.0, 0.0],
            ..Self::diffuse(Color::ZERO)
        }
    }

    /// Clear dielectric with Fresnel-weighted reflection.
    ///
    /// The reflective weight at normal incidence is Schlick's `R0` for the
    /// given index against air.
    pub fn glass(refractive_index: f64) -> Self {
        let ior = refractive_index.max(1.0);
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        Self {
            refractive_index: ior,
            fresnel: true,
            probabilities: [0.0, r0, 1.0 - r0],
            ..Self::diffuse(Color::ONE)
        }
    }

    /// Emitter; rays terminate when they hit it.
    pub fn light(emission: Color) -> Self {
        Self {
            emission,
            ..Self::diffuse(Color::ZERO)
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_specular_color(mut self, specular_color: Color) -> Self {
        self.specular_color = specular_color;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Roughness is clamped to `[0, 1]`.
    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Indices below 1 are raised to 1.
    pub fn with_refractive_index(mut self, refractive_index: f64) -> Self {
        self.refractive_index = refractive_index.max(1.0);
        self
    }

    pub fn with_mean_free_path(mut self, mean_free_path: f64) -> Self {
        self.mean_free_path = mean_free_path;
        self
    }

    pub fn with_fresnel(mut self, fresnel: bool) -> Self {
        self.fresnel = fresnel;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_interaction_probabilities(
        mut self,
        weights: impl IntoIterator<Item = (InteractionType, f64)>,
    ) -> RenderResult<Self> {
        self.set_interaction_probabilities(weights)?;
        Ok(self)
    }

    /// Replace the interaction table with normalized `weights`.
    ///
    /// Missing interactions get zero; repeated ones accumulate. Fails on
    /// negative or non-finite weights and on a zero total, leaving the
    /// current table untouched.
    pub fn set_interaction_probabilities(
        &mut self,
        weights: impl IntoIterator<Item = (InteractionType, f64)>,
    ) -> RenderResult<()> {
        let mut table = [0.0; 3];
        for (kind, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RenderError::InvalidProbabilities(format!(
                    "{kind:?} has weight {weight}"
                )));
            }
            table[kind.index()] += weight;
        }

        let total: f64 = table.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(RenderError::InvalidProbabilities(format!(
                "total weight must be positive, got {total}"
            )));
        }
        self.probabilities = table.map(|p| p / total);
        Ok(())
    }

    #[inline]
    pub fn probability(&self, kind: InteractionType) -> f64 {
        self.probabilities[kind.index()]
    }

    pub fn probabilities(&self) -> [f64; 3] {
        self.probabilities
    }

    /// The interaction with the largest stored probability; ties go to the
    /// earlier interaction in [`InteractionType::ALL`].
    pub fn most_likely_interaction(&self) -> InteractionType {
        let mut best = InteractionType::Diffuse;
        for kind in InteractionType::ALL {
            if self.probability(kind) > self.probability(best) {
                best = kind;
            }
        }
        best
    }

    /// Interaction distribution for a ray travelling along `direction` onto a
    /// surface with unit `normal`.
    ///
    /// With Fresnel enabled the stored reflective weight acts as `R0` and is
    /// replaced by Schlick's `R`; the other two weights are scaled by
    /// `(1 - R) / (1 - R0) = 1 - (1 - cos)^5`, which keeps the sum at one.
    pub fn effective_probabilities(&self, direction: DVec3, normal: DVec3) -> [f64; 3] {
        let p = self.probabilities;
        if !self.fresnel {
            return p;
        }

        let r0 = p[InteractionType::Reflective.index()];
        if r0 <= FRESNEL_CUTOFF {
            return p;
        }
        if r0 >= 1.0 - FRESNEL_CUTOFF {
            return [0.0, 1.0, 0.0];
        }

        let cos_i = direction.dot(normal).abs().min(1.0);
        let grazing = (1.0 - cos_i).powi(5);
        let scale = 1.0 - grazing;
        [p[0] * scale, r0 + (1.0 - r0) * grazing, p[2] * scale]
    }

    /// Sample an interaction and re-spawn `ray` accordingly.
    ///
    /// Returns the interaction that was actually performed, which is
    /// `Reflective` when refraction hits total internal reflection.
    pub fn interact(
        &self,
        ray: &mut Ray,
        hit: &HitRecord,
        apply_roughness: bool,
        rng: &mut dyn RngCore,
    ) -> RenderResult<InteractionType> {
        let probabilities = self.effective_probabilities(ray.direction(), hit.normal());
        let sample = gen_f64(rng);

        let mut cumulative = 0.0;
        for kind in InteractionType::ALL {
            let probability = probabilities[kind.index()];
            cumulative += probability;
            if probability > 0.0 && sample < cumulative {
                return Ok(self.scatter_as(kind, probability, ray, hit, apply_roughness, rng));
            }
        }
        Err(RenderError::InteractionNotSelected {
            sample,
            total: cumulative,
        })
    }

    /// Perform `kind` unconditionally, compensating the throughput by
    /// `probability` where the interaction model calls for it.
    ///
    /// Deterministic renderers pass a probability of one.
    pub fn scatter_as(
        &self,
        kind: InteractionType,
        probability: f64,
        ray: &mut Ray,
        hit: &HitRecord,
        apply_roughness: bool,
        rng: &mut dyn RngCore,
    ) -> InteractionType {
        match kind {
            InteractionType::Diffuse => {
                let normal = hit.facing_normal(ray.direction());
                let direction = cosine_hemisphere(normal, rng);
                ray.respawn(hit.point(), direction);
                ray.attenuate(self.get_color(hit) / probability);
                InteractionType::Diffuse
            }
            InteractionType::Reflective => {
                self.reflect(probability, ray, hit, apply_roughness, rng);
                InteractionType::Reflective
            }
            InteractionType::Refractive => {
                self.refract(probability, ray, hit, apply_roughness, rng)
            }
        }
    }

    fn is_rough(&self, apply_roughness: bool) -> bool {
        apply_roughness && self.roughness > 0.0
    }

    fn reflect(
        &self,
        probability: f64,
        ray: &mut Ray,
        hit: &HitRecord,
        apply_roughness: bool,
        rng: &mut dyn RngCore,
    ) {
        let normal = hit.facing_normal(ray.direction());
        let mirrored = ray.direction().mirror(normal);

        if self.is_rough(apply_roughness) {
            let glossy = sample_cone(mirrored, self.roughness * FRAC_PI_2, rng);
            // Keep the path above the surface
            let direction = if glossy.dot(normal) > 0.0 {
                glossy
            } else {
                mirrored
            };
            ray.respawn(hit.point(), direction);
            ray.attenuate(self.specular_color / probability);
        } else {
            ray.respawn(hit.point(), mirrored);
            ray.attenuate(self.specular_color);
        }
    }

    fn refract(
        &self,
        probability: f64,
        ray: &mut Ray,
        hit: &HitRecord,
        apply_roughness: bool,
        rng: &mut dyn RngCore,
    ) -> InteractionType {
        let direction = ray.direction();
        let entering = direction.dot(hit.normal()) < 0.0;
        let (normal, eta) = if entering {
            (hit.normal(), 1.0 / self.refractive_index)
        } else {
            (-hit.normal(), self.refractive_index)
        };

        let cos_i = (-direction).dot(normal).min(1.0);
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            log::trace!("total internal reflection at depth {}", ray.depth());
            self.reflect(probability, ray, hit, apply_roughness, rng);
            return InteractionType::Reflective;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let refracted = (eta * direction + (eta * cos_i - cos_t) * normal).normalize();

        if self.is_rough(apply_roughness) {
            let glossy = sample_cone(refracted, self.roughness * FRAC_PI_2, rng);
            // Transmitted paths must stay on the far side
            let out = if glossy.dot(normal) < 0.0 {
                glossy
            } else {
                refracted
            };
            ray.respawn(hit.point(), out);
            ray.attenuate(self.get_color(hit) / probability);
        } else {
            ray.respawn(hit.point(), refracted);
            ray.attenuate(self.get_color(hit));
        }
        InteractionType::Refractive
    }

    /// Base color at the hit, from the texture when one is attached.
    pub fn get_color(&self, hit: &HitRecord) -> Color {
        match &self.texture {
            Some(texture) => {
                let uv = hit.uv();
                texture.sample(uv.x, uv.y)
            }
            None => self.color,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn specular_color(&self) -> Color {
        self.specular_color
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    /// True when the material emits light.
    pub fn is_light(&self) -> bool {
        !self.emission.is_near_zero()
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    pub fn mean_free_path(&self) -> f64 {
        self.mean_free_path
    }

    pub fn fresnel(&self) -> bool {
        self.fresnel
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }
}
