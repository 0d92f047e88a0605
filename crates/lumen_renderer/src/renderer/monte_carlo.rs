//! Plain Monte Carlo transport.
//!
//! The path's value is decided at its last vertex: the weighted emission of
//! the light it hits, the weighted background on a miss, or nothing when it
//! is cut by depth or Russian roulette.

use super::russian_roulette;
use crate::{Color, Ray, RenderConfig, RenderResult, Scene};
use rand::RngCore;

pub(super) fn trace(
    mut ray: Ray,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    while ray.depth() < config.max_depth {
        if !russian_roulette(&mut ray, config, rng) {
            return Ok(Color::ZERO);
        }

        let Some(hit) = scene.intersect(&ray) else {
            return Ok(ray.throughput() * scene.background());
        };

        let material = scene.object(hit.object).material();
        if material.is_light() {
            return Ok(ray.throughput() * material.emission());
        }
        material.interact(&mut ray, &hit, true, rng)?;
    }

    log::trace!("path reached max depth {}", config.max_depth);
    Ok(Color::ZERO)
}
