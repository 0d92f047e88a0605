//! Noise-free preview transport.
//!
//! Each vertex performs its material's most likely interaction without
//! roughness or probability compensation. The first diffuse vertex gathers
//! direct light from the lights' key points and ends the path.

use super::nee::{direct_lighting, LightSampling};
use crate::{Color, InteractionType, Ray, RenderConfig, Scene};
use rand::RngCore;

pub(super) fn trace(
    mut ray: Ray,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    while ray.depth() < config.max_depth {
        let Some(hit) = scene.intersect(&ray) else {
            // Never darker than ambient, so unlit reflections stay readable
            ray.gather(scene.background().max(config.ambient));
            break;
        };

        let material = scene.object(hit.object).material();
        if material.is_light() {
            ray.gather(material.emission());
            break;
        }

        let kind = material.most_likely_interaction();
        if kind == InteractionType::Diffuse {
            let direct = direct_lighting(
                scene,
                &hit,
                ray.direction(),
                material.get_color(&hit),
                LightSampling::KeyPoints,
                config.ambient,
                rng,
            );
            ray.gather(direct);
            break;
        }
        material.scatter_as(kind, 1.0, &mut ray, &hit, false, rng);
    }

    ray.radiance()
}
