//! Whitted-style tracing: follow specular and refractive bounces, gather
//! direct light once at the first diffuse vertex.

use super::nee::{direct_lighting, LightSampling};
use super::russian_roulette;
use crate::{Color, InteractionType, Ray, RenderConfig, RenderResult, Scene};
use rand::RngCore;

pub(super) fn trace(
    mut ray: Ray,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    while ray.depth() < config.max_depth {
        if !russian_roulette(&mut ray, config, rng) {
            break;
        }

        let Some(hit) = scene.intersect(&ray) else {
            ray.gather(scene.background());
            break;
        };

        let material = scene.object(hit.object).material();
        if material.is_light() {
            ray.gather(material.emission());
            break;
        }

        let incoming = ray.direction();
        let throughput = ray.throughput();
        let p_diffuse = material.effective_probabilities(incoming, hit.normal())
            [InteractionType::Diffuse.index()];

        if material.interact(&mut ray, &hit, true, rng)? == InteractionType::Diffuse {
            let direct = direct_lighting(
                scene,
                &hit,
                incoming,
                material.get_color(&hit),
                LightSampling::Stochastic(config.light_samples),
                config.ambient,
                rng,
            );
            ray.add_radiance(throughput / p_diffuse * direct);
            break;
        }
    }

    Ok(ray.radiance())
}
