//! Lumen math - vector algebra shared by the tracing core.
//!
//! Re-exports `glam` and adds the pieces the renderer needs on top of it:
//! a `t`-range [`Interval`], an [`OrthonormalBasis`] for local frames,
//! [`Vec3Ext`] helpers and the polynomial root finders used by the
//! analytic shape intersections.

// Re-export glam for convenience
pub use glam::*;

mod error;
mod interval;
mod onb;
pub mod roots;
mod vector;

pub use error::{MathError, MathResult};
pub use interval::Interval;
pub use onb::OrthonormalBasis;
pub use vector::Vec3Ext;

/// Offset used everywhere to reject self-intersections and shadow acne.
pub const EPSILON: f64 = 1e-6;
