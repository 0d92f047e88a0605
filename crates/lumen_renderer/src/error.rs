//! Error types for scene construction and transport.

use lumen_math::MathError;
use thiserror::Error;

/// Errors raised while building a scene or tracing a ray.
///
/// Construction errors surface at scene build time; the only error a trace
/// can return is [`RenderError::InteractionNotSelected`], which means a
/// material's probabilities were corrupted upstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid interaction probabilities: {0}")]
    InvalidProbabilities(String),

    #[error("no interaction selected for sample {sample} (cumulative probability {total})")]
    InteractionNotSelected { sample: f64, total: f64 },

    #[error("invalid texture: {0}")]
    InvalidTexture(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Check that a geometric parameter is finite and strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> RenderResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RenderError::InvalidGeometry(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
