//! Path tracing with radiance accumulated along the ray, optionally with
//! next-event estimation at diffuse vertices.

use super::nee::{direct_lighting, LightSampling};
use super::russian_roulette;
use crate::{Color, InteractionType, Ray, RenderConfig, RenderResult, Scene};
use rand::RngCore;

pub(super) fn trace(
    mut ray: Ray,
    scene: &Scene,
    config: &RenderConfig,
    nee: bool,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    // Set when the previous vertex already sampled the lights directly, so an
    // emitter hit right after it must not be counted twice.
    let mut nee_at_previous = false;

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
            if !nee_at_previous {
                ray.gather(material.emission());
            }
            break;
        }

        let incoming = ray.direction();
        let throughput = ray.throughput();
        let p_diffuse = material.effective_probabilities(incoming, hit.normal())
            [InteractionType::Diffuse.index()];

        let kind = material.interact(&mut ray, &hit, true, rng)?;
        nee_at_previous = nee && kind == InteractionType::Diffuse;

        if nee_at_previous {
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
        }
    }

    Ok(ray.radiance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Disk, Rectangle, Sphere};
    use crate::{Material, Object};
    use lumen_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Diffuse floor under a large square light, seen from above.
    fn floor_under_light() -> Scene {
        let mut scene = Scene::new(Color::ZERO);
        scene.add(Object::new(
            "floor",
            Rectangle::new(DVec3::ZERO, DVec3::Z, DVec3::X, 100.0, 100.0).unwrap(),
            Material::diffuse(Color::splat(0.5)),
        ));
        scene.add(Object::new(
            "lamp",
            Rectangle::new(DVec3::new(0.0, 0.0, 1.0), -DVec3::Z, DVec3::X, 2.0, 2.0).unwrap(),
            Material::light(Color::ONE),
        ));
        scene
    }

    #[test]
    fn test_nee_and_plain_paths_agree() {
        let scene = floor_under_light();
        let config = RenderConfig::default().with_ambient(Color::ZERO);
        let mut rng = StdRng::seed_from_u64(17);
        // Looks down onto the floor through a gap beside the lamp
        let origin = DVec3::new(1.5, 0.0, 0.5);
        let ray = Ray::new(origin, DVec3::new(-0.5, 0.0, -0.5)).unwrap();

        let n = 20_000;
        let mut plain = 0.0;
        let mut with_nee = 0.0;
        for _ in 0..n {
            plain += trace(ray, &scene, &config, false, &mut rng).unwrap().x;
            with_nee += trace(ray, &scene, &config, true, &mut rng).unwrap().x;
        }
        plain /= n as f64;
        with_nee /= n as f64;

        assert!(with_nee > 0.0);
        assert!((plain - with_nee).abs() < 0.1 * with_nee, "{plain} vs {with_nee}");
    }

    #[test]
    fn test_emitter_after_nee_not_double_counted() {
        // Diffuse ball under a disk lamp: bounces off the ball either reach
        // the lamp or escape. If the emitter hit after NEE were counted too,
        // the NEE estimate would come out about twice as large.
        let mut scene = Scene::new(Color::ZERO);
        scene.add(Object::new(
            "ball",
            Sphere::new(DVec3::ZERO, 1.0).unwrap(),
            Material::diffuse(Color::ONE),
        ));
        scene.add(Object::new(
            "lamp",
            Disk::new(DVec3::new(0.0, 0.0, 3.0), -DVec3::Z, 1.0).unwrap(),
            Material::light(Color::ONE),
        ));
        let config = RenderConfig::default().with_ambient(Color::ZERO);
        let ray = Ray::new(DVec3::new(0.0, -5.0, 0.5), DVec3::Y).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let n = 10_000;
        let mut plain = 0.0;
        let mut with_nee = 0.0;
        for _ in 0..n {
            plain += trace(ray, &scene, &config, false, &mut rng).unwrap().x;
            with_nee += trace(ray, &scene, &config, true, &mut rng).unwrap().x;
        }
        plain /= n as f64;
        with_nee /= n as f64;
        assert!(with_nee > 0.0);
        assert!((plain - with_nee).abs() < 0.15 * with_nee, "{plain} vs {with_nee}");
    }

    #[test]
    fn test_zero_light_samples_from_config_still_lights() {
        // Configs built without the builder can carry a zero sample count
        let config = RenderConfig {
            light_samples: 0,
            ..RenderConfig::default().with_ambient(Color::ZERO)
        };
        let scene = floor_under_light();
        let ray = Ray::new(DVec3::new(1.5, 0.0, 0.5), DVec3::new(-0.5, 0.0, -0.5)).unwrap();
        let mut rng = StdRng::seed_from_u64(23);

        let color = trace(ray, &scene, &config, true, &mut rng).unwrap();
        assert!(color.x > 0.0);
    }

    #[test]
    fn test_background_accumulates() {
        let scene = Scene::new(Color::splat(0.4));
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z).unwrap();
        let color = trace(ray, &scene, &RenderConfig::default(), true, &mut rng).unwrap();
        assert_eq!(color, Color::splat(0.4));
    }
}
