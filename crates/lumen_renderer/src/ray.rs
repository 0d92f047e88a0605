//! Ray type for path tracing.
//!
//! Besides origin and direction a ray carries the transport state of the
//! path it belongs to: accumulated radiance, throughput and bounce depth.
//! Rays are mutated in place while traced and never shared between traces.

use crate::Color;
use lumen_math::{DVec3, MathResult, Vec3Ext, EPSILON};

/// A ray with origin, unit direction and path state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    origin: DVec3,
    /// Direction vector (always unit length)
    direction: DVec3,
    /// Radiance gathered so far along the path
    radiance: Color,
    /// Monte Carlo path weight, starts at white
    throughput: Color,
    /// Number of surface interactions so far
    depth: u32,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    ///
    /// Fails when `direction` has zero length.
    pub fn new(origin: DVec3, direction: DVec3) -> MathResult<Self> {
        Ok(Self::from_unit(origin, direction.try_unit()?))
    }

    /// Create a ray from an already normalized direction.
    #[inline]
    pub(crate) fn from_unit(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            radiance: Color::ZERO,
            throughput: Color::ONE,
            depth: 0,
        }
    }

    /// Create a ray leaving `point` along a unit `direction`, nudged off the
    /// surface so it cannot hit it again at `t ~ 0`.
    #[inline]
    pub(crate) fn leaving(point: DVec3, direction: DVec3) -> Self {
        Self::from_unit(point + EPSILON * direction, direction)
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the ray's unit direction.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Radiance accumulated along the path.
    #[inline]
    pub fn radiance(&self) -> Color {
        self.radiance
    }

    /// Current path throughput.
    #[inline]
    pub fn throughput(&self) -> Color {
        self.throughput
    }

    /// Number of bounces taken so far.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }

    /// Continue the path from `point` along a new unit `direction`.
    ///
    /// The origin is offset by epsilon along the new direction and the depth
    /// counter advances by one.
    pub(crate) fn respawn(&mut self, point: DVec3, direction: DVec3) {
        self.origin = point + EPSILON * direction;
        self.direction = direction;
        self.depth += 1;
    }

    /// Multiply the throughput component-wise by `factor`.
    #[inline]
    pub(crate) fn attenuate(&mut self, factor: Color) {
        self.throughput *= factor;
    }

    /// Add `throughput * emitted` to the accumulated radiance.
    #[inline]
    pub(crate) fn gather(&mut self, emitted: Color) {
        self.radiance += self.throughput * emitted;
    }

    /// Add an already weighted contribution to the accumulated radiance.
    #[inline]
    pub(crate) fn add_radiance(&mut self, contribution: Color) {
        self.radiance += contribution;
    }
}
