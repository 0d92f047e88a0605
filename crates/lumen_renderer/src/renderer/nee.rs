//! Next-event estimation: direct lighting through explicit shadow rays.

use crate::hittable::HitRecord;
use crate::{Color, Hittable, Ray, Scene};
use lumen_math::{DVec3, Vec3Ext};
use rand::RngCore;
use std::f64::consts::PI;

/// How points on a light are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSampling {
    /// The light's fixed key points
    KeyPoints,
    /// This many uniform-by-area samples per light
    Stochastic(u32),
}

/// Relative distance within which a shadow-ray hit counts as the sample point.
const TARGET_TOLERANCE: f64 = 1e-6;

/// Radiance reflected towards `incoming` by a Lambertian surface of `albedo`
/// at `hit`, from every light in the scene.
///
/// Each sample point `y` on a light is tested with a shadow ray; it counts
/// only when the first thing the ray reaches is `y` itself, so samples on the
/// far side of a light are occluded by the light's own front. The geometry
/// term is evaluated at `y`. Each light contributes the mean over all of its
/// samples, occluded ones adding zero. When nothing is visible at all the
/// `ambient` term is returned instead.
pub(crate) fn direct_lighting(
    scene: &Scene,
    hit: &HitRecord,
    incoming: DVec3,
    albedo: Color,
    sampling: LightSampling,
    ambient: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let normal = hit.facing_normal(incoming);
    let origin = hit.point();

    let mut total = Color::ZERO;
    let mut any_visible = false;

    for &light_id in scene.lights() {
        let light = scene.object(light_id);
        if light_id == hit.object || !light.is_visible() {
            continue;
        }

        let shape = light.shape();
        let targets = match sampling {
            LightSampling::KeyPoints => shape.key_points(),
            LightSampling::Stochastic(n) => shape.sample_surface_points(n.max(1) as usize, rng),
        };
        if targets.is_empty() {
            continue;
        }
        let area = shape.surface_area();

        let mut sum = Color::ZERO;
        let mut accepted = 0u32;
        for &target in &targets {
            let offset = target - origin;
            let dist_sq = offset.length_squared();
            let Ok(direction) = offset.try_unit() else {
                continue;
            };
            let cos_surface = normal.dot(direction);
            if cos_surface <= 0.0 {
                continue;
            }

            let shadow = Ray::leaving(origin, direction);
            let Some(blocker) = scene.intersect(&shadow) else {
                continue;
            };
            let tolerance = TARGET_TOLERANCE * (1.0 + dist_sq.sqrt());
            if blocker.object != light_id || (blocker.point() - target).length() > tolerance {
                continue;
            }

            // The blocker is `y`, so its normal is the light's normal there
            let cos_light = blocker.normal().dot(direction).abs();
            sum += light.material().emission() * (cos_surface * cos_light * area / dist_sq);
            accepted += 1;
        }

        if accepted > 0 {
            any_visible = true;
            total += sum / targets.len() as f64;
        }
    }

    if any_visible {
        albedo / PI * total
    } else {
        log::trace!("no light visible from {origin:?}, using ambient");
        ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Disk, Sphere};
    use crate::{Material, Object};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Unit sphere at the origin under a disk light of radius 1 at z = -3.
    fn lit_sphere() -> Scene {
        let mut scene = Scene::new(Color::ZERO);
        scene.add(Object::new(
            "ball",
            Sphere::new(DVec3::ZERO, 1.0).unwrap(),
            Material::diffuse(Color::splat(0.5)),
        ));
        scene.add(Object::new(
            "lamp",
            Disk::new(DVec3::new(0.0, 0.0, -3.0), DVec3::Z, 1.0).unwrap(),
            Material::light(Color::ONE),
        ));
        scene
    }

    fn front_hit(scene: &Scene) -> HitRecord {
        let ray = Ray::new(DVec3::new(0.0, 0.0, -2.0), DVec3::Z).unwrap();
        scene.intersect(&ray).unwrap()
    }

    #[test]
    fn test_key_points_match_geometry_term() {
        let scene = lit_sphere();
        let hit = front_hit(&scene);
        let mut rng = StdRng::seed_from_u64(0);
        let direct = direct_lighting(
            &scene,
            &hit,
            DVec3::Z,
            Color::splat(0.5),
            LightSampling::KeyPoints,
            Color::ZERO,
            &mut rng,
        );

        // Center at distance 2, four rim-midway points at distance sqrt(4.25)
        let area = PI;
        let center = area / 4.0;
        let off_axis = (4.0 / 4.25) * area / 4.25;
        let expected = 0.5 / PI * (center + 4.0 * off_axis) / 5.0;
        assert!((direct - Color::splat(expected)).length() < 1e-9);
    }

    #[test]
    fn test_stochastic_converges_to_disk_irradiance() {
        let scene = lit_sphere();
        let hit = front_hit(&scene);
        let mut rng = StdRng::seed_from_u64(42);

        let n = 4000;
        let mut mean = 0.0;
        for _ in 0..n {
            mean += direct_lighting(
                &scene,
                &hit,
                DVec3::Z,
                Color::splat(0.5),
                LightSampling::Stochastic(4),
                Color::ZERO,
                &mut rng,
            )
            .x;
        }
        mean /= n as f64;

        // albedo * Le * R^2 / (h^2 + R^2)
        assert!((mean - 0.1).abs() < 0.003, "mean {mean}");
    }

    #[test]
    fn test_occluded_returns_ambient() {
        let mut scene = lit_sphere();
        scene.add(Object::new(
            "blocker",
            Disk::new(DVec3::new(0.0, 0.0, -2.5), DVec3::Z, 5.0).unwrap(),
            Material::default(),
        ));
        let hit = front_hit(&scene);
        let mut rng = StdRng::seed_from_u64(1);

        let ambient = Color::splat(0.02);
        for sampling in [LightSampling::KeyPoints, LightSampling::Stochastic(8)] {
            let direct = direct_lighting(
                &scene,
                &hit,
                DVec3::Z,
                Color::ONE,
                sampling,
                ambient,
                &mut rng,
            );
            assert_eq!(direct, ambient);
        }
    }

    #[test]
    fn test_back_side_sees_no_light() {
        let scene = lit_sphere();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 3.0), -DVec3::Z).unwrap();
        let hit = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let direct = direct_lighting(
            &scene,
            &hit,
            -DVec3::Z,
            Color::ONE,
            LightSampling::Stochastic(8),
            Color::ZERO,
            &mut rng,
        );
        assert_eq!(direct, Color::ZERO);
    }

    /// Floor point at the origin under a sphere lamp of radius 0.5 centered
    /// two units above it.
    fn floor_under_ball_lamp() -> (Scene, HitRecord) {
        let mut scene = Scene::new(Color::ZERO);
        scene.add(Object::new(
            "floor",
            Disk::new(DVec3::ZERO, DVec3::Z, 10.0).unwrap(),
            Material::diffuse(Color::ONE),
        ));
        scene.add(Object::new(
            "lamp",
            Sphere::new(DVec3::new(0.0, 0.0, 2.0), 0.5).unwrap(),
            Material::light(Color::ONE),
        ));
        let ray = Ray::new(DVec3::new(0.0, -1.0, 1.0), DVec3::new(0.0, 1.0, -1.0)).unwrap();
        let hit = scene.intersect(&ray).unwrap();
        (scene, hit)
    }

    #[test]
    fn test_sphere_light_key_points_use_sample_geometry() {
        let (scene, hit) = floor_under_ball_lamp();
        let mut rng = StdRng::seed_from_u64(0);
        let direct = direct_lighting(
            &scene,
            &hit,
            DVec3::new(0.0, 1.0, -1.0),
            Color::ONE,
            LightSampling::KeyPoints,
            Color::ZERO,
            &mut rng,
        );

        // Only the bottom pole faces the floor point: cos 1, cos 1, distance 1.5.
        // The other five poles are hidden behind the lamp's own front.
        let area = PI * 0.25;
        let expected = 1.0 / PI * (area / 2.25) / 6.0;
        assert!((direct - Color::splat(expected)).length() < 1e-9, "{direct:?}");
    }

    #[test]
    fn test_sphere_light_converges_to_irradiance() {
        let (scene, hit) = floor_under_ball_lamp();
        let mut rng = StdRng::seed_from_u64(17);

        let n = 8000;
        let mut mean = 0.0;
        for _ in 0..n {
            mean += direct_lighting(
                &scene,
                &hit,
                DVec3::new(0.0, 1.0, -1.0),
                Color::ONE,
                LightSampling::Stochastic(4),
                Color::ZERO,
                &mut rng,
            )
            .x;
        }
        mean /= n as f64;

        // albedo * Le * (r / d)^2 for a sphere straight overhead
        assert!((mean - 0.0625).abs() < 0.003, "mean {mean}");
    }

    #[test]
    fn test_zero_light_samples_still_sample() {
        let scene = lit_sphere();
        let hit = front_hit(&scene);
        let mut rng = StdRng::seed_from_u64(5);
        let direct = direct_lighting(
            &scene,
            &hit,
            DVec3::Z,
            Color::splat(0.5),
            LightSampling::Stochastic(0),
            Color::ZERO,
            &mut rng,
        );
        assert!(direct.x > 0.0);
    }
}
