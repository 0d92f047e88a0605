//! Random direction sampling shared by materials and shapes.
//!
//! Every function takes the generator explicitly; nothing here owns an RNG.

use lumen_math::{DVec3, OrthonormalBasis};
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Cosine-weighted direction on the hemisphere around a unit `normal`.
///
/// Uses `cos(theta) = sqrt(u1)`, `phi = 2 pi u2`, so the pdf is `cos(theta) / pi`.
pub fn cosine_hemisphere(normal: DVec3, rng: &mut dyn RngCore) -> DVec3 {
    let u1 = gen_f64(rng);
    let u2 = gen_f64(rng);

    let cos_theta = u1.sqrt();
    let sin_theta = (1.0 - u1).max(0.0).sqrt();
    let (sin_phi, cos_phi) = (2.0 * PI * u2).sin_cos();

    let local = DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
    OrthonormalBasis::from_unit(normal).to_global(local)
}

/// Cosine-biased direction inside the cone of `half_angle` radians around a
/// unit `axis`.
///
/// A zero half-angle returns the axis itself.
pub fn sample_cone(axis: DVec3, half_angle: f64, rng: &mut dyn RngCore) -> DVec3 {
    if half_angle <= 0.0 {
        return axis;
    }
    let sin_max = half_angle.min(PI / 2.0).sin();

    let u1 = gen_f64(rng);
    let u2 = gen_f64(rng);

    // Cosine-weighted distribution truncated to the cone
    let sin_theta = (u1 * sin_max * sin_max).sqrt();
    let cos_theta = (1.0 - sin_theta * sin_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = (2.0 * PI * u2).sin_cos();

    let local = DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
    OrthonormalBasis::from_unit(axis).to_global(local)
}

/// Uniform point on the unit sphere (two-angle map).
pub fn uniform_sphere(rng: &mut dyn RngCore) -> DVec3 {
    let z = 1.0 - 2.0 * gen_f64(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let (sin_phi, cos_phi) = (2.0 * PI * gen_f64(rng)).sin_cos();
    DVec3::new(r * cos_phi, r * sin_phi, z)
}
