//! Renderer family.
//!
//! Every strategy turns one camera [`Ray`] into one RGB radiance value by
//! repeatedly intersecting the scene and letting the hit material decide how
//! the path continues. They differ in how interactions are chosen and in how
//! light is gathered:
//!
//! | strategy | interaction | light gathering |
//! |---|---|---|
//! | `Simple` | none | base color of the first hit |
//! | `Deterministic` | most likely, no roughness | NEE over key points at the first diffuse hit |
//! | `MonteCarlo` | sampled | emitter hit returns the path's terminal value |
//! | `PathTracer` | sampled | emission accumulated in the ray |
//! | `PathTracerNee` | sampled | NEE at every diffuse vertex |
//! | `RayTracer` | sampled | NEE at the first diffuse vertex, then stop |

mod deterministic;
mod monte_carlo;
mod nee;
mod path_tracer;
mod ray_tracer;
mod simple;

pub use nee::LightSampling;

use crate::sampling::gen_f64;
use crate::{Color, Ray, RenderConfig, RenderResult, Scene};
use lumen_math::{Interval, Vec3Ext};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Survival probability bounds for Russian roulette.
const ROULETTE_SURVIVAL: Interval = Interval {
    min: 0.1,
    max: 0.95,
};

/// Transport algorithm used by a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Simple,
    Deterministic,
    MonteCarlo,
    PathTracer,
    PathTracerNee,
    /// Whitted-style: specular chains, direct light at the first diffuse hit
    RayTracer,
}

/// Traces rays through a scene with a fixed strategy and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    strategy: Strategy,
    config: RenderConfig,
}

/// Mean radiance of repeated traces of one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadianceEstimate {
    pub mean: Color,
    /// Per-channel standard error of the mean
    pub std_error: Color,
    pub samples: u32,
}

impl Renderer {
    pub fn new(strategy: Strategy, config: RenderConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Radiance arriving along `ray` (towards its origin).
    ///
    /// The only error is an interaction-selection failure, which means a
    /// material's probability table is inconsistent.
    pub fn trace_ray(
        &self,
        ray: Ray,
        scene: &Scene,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Color> {
        let config = &self.config;
        match self.strategy {
            Strategy::Simple => Ok(simple::trace(&ray, scene)),
            Strategy::Deterministic => Ok(deterministic::trace(ray, scene, config, rng)),
            Strategy::MonteCarlo => monte_carlo::trace(ray, scene, config, rng),
            Strategy::PathTracer => path_tracer::trace(ray, scene, config, false, rng),
            Strategy::PathTracerNee => path_tracer::trace(ray, scene, config, true, rng),
            Strategy::RayTracer => ray_tracer::trace(ray, scene, config, rng),
        }
    }

    /// Trace `ray` `samples` times and report the mean with its standard
    /// error (Welford's running variance).
    pub fn estimate(
        &self,
        ray: Ray,
        scene: &Scene,
        samples: u32,
        rng: &mut dyn RngCore,
    ) -> RenderResult<RadianceEstimate> {
        let mut mean = Color::ZERO;
        let mut m2 = Color::ZERO;
        for i in 1..=samples {
            let value = self.trace_ray(ray, scene, rng)?;
            let delta = value - mean;
            mean += delta / i as f64;
            m2 += delta * (value - mean);
        }

        let std_error = if samples > 1 {
            let var = m2 / ((samples - 1) as f64 * samples as f64);
            Color::new(var.x.sqrt(), var.y.sqrt(), var.z.sqrt())
        } else {
            Color::ZERO
        };

        Ok(RadianceEstimate {
            mean,
            std_error,
            samples,
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Strategy::PathTracerNee, RenderConfig::default())
    }
}

/// Apply Russian roulette to a path.
///
/// Below the configured start depth every path survives. After that a path
/// survives with probability `clamp(luminance(throughput), 0.1, 0.95)` and
/// its throughput is divided by that probability. Returns false when the
/// path is terminated.
pub(crate) fn russian_roulette(
    ray: &mut Ray,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> bool {
    if !config.russian_roulette || ray.depth() < config.roulette_start_depth {
        return true;
    }

    let survival = ROULETTE_SURVIVAL.clamp(ray.throughput().luminance());
    if gen_f64(rng) >= survival {
        log::trace!("roulette terminated path at depth {}", ray.depth());
        return false;
    }
    ray.attenuate(Color::splat(1.0 / survival));
    true
}
