//! Parallel tracing of ray batches.
//!
//! Each ray gets its own generator seeded from the batch seed and the ray's
//! index, so a batch produces the same colors however rayon schedules it.

use crate::{Color, Ray, RenderResult, Renderer, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// Odd 64-bit constant (golden ratio) used to spread ray indices over seeds.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed of the generator for ray `index` within a batch.
#[inline]
pub fn ray_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(SEED_MIX)
}

/// Trace every ray in parallel and return the colors in input order.
///
/// Fails with the first interaction error encountered.
pub fn trace_batch(
    renderer: &Renderer,
    scene: &Scene,
    rays: &[Ray],
    seed: u64,
) -> RenderResult<Vec<Color>> {
    let start = Instant::now();

    let colors = rays
        .par_iter()
        .enumerate()
        .map(|(index, ray)| {
            let mut rng = StdRng::seed_from_u64(ray_seed(seed, index));
            renderer.trace_ray(*ray, scene, &mut rng)
        })
        .collect::<RenderResult<Vec<_>>>()?;

    log::info!(
        "Traced {} rays ({:?}) in {:.2?}",
        rays.len(),
        renderer.strategy(),
        start.elapsed()
    );
    Ok(colors)
}
