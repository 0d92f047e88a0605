//! Render configuration.

use crate::Color;
use serde::{Deserialize, Serialize};

/// Settings shared by every renderer strategy.
///
/// Passed by reference into the transport loop; missing fields fall back to
/// [`RenderConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of surface interactions per path
    pub max_depth: u32,
    /// Terminate low-throughput paths stochastically
    pub russian_roulette: bool,
    /// Depth from which Russian roulette applies
    pub roulette_start_depth: u32,
    /// Stochastic shadow-ray samples per light for NEE, at least one is taken
    pub light_samples: u32,
    /// Returned by NEE when no light sample is visible
    pub ambient: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            russian_roulette: true,
            roulette_start_depth: 3,
            light_samples: 4,
            ambient: Color::splat(0.02),
        }
    }
}

impl RenderConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_russian_roulette(mut self, enabled: bool) -> Self {
        self.russian_roulette = enabled;
        self
    }

    pub fn with_roulette_start_depth(mut self, depth: u32) -> Self {
        self.roulette_start_depth = depth;
        self
    }

    /// At least one sample per light is always taken.
    pub fn with_light_samples(mut self, samples: u32) -> Self {
        self.light_samples = samples.max(1);
        self
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }
}
