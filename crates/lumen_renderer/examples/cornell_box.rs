//! Cornell box example.
//!
//! Renders the classic box with a glass ball and a rotated block, then saves
//! the result as PNG.

use anyhow::Result;
use lumen_renderer::shape::{CompositeShape, Pose, Rectangle, Sphere};
use lumen_renderer::{
    trace_batch, Color, DVec3, Material, Object, Ray, RenderConfig, Renderer, Scene, Strategy,
};
use std::time::Instant;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 320;
const SAMPLES_PER_PIXEL: u32 = 32;

fn main() -> Result<()> {
    env_logger::init();

    println!("Lumen Path Tracer - Cornell Box");
    println!("===============================");

    let start = Instant::now();
    let scene = build_scene()?;
    println!("Scene built with {} objects in {:?}", scene.len(), start.elapsed());

    let rays = camera_rays(
        DVec3::new(0.0, 0.0, 3.4),
        DVec3::ZERO,
        DVec3::Y,
        40.0,
    )?;

    let config = RenderConfig::default().with_max_depth(12).with_light_samples(2);
    let renderer = Renderer::new(Strategy::PathTracerNee, config);

    println!(
        "Rendering {}x{} @ {} spp...",
        WIDTH, HEIGHT, SAMPLES_PER_PIXEL
    );
    let start = Instant::now();
    let mut accumulated = vec![Color::ZERO; rays.len()];
    for pass in 0..SAMPLES_PER_PIXEL {
        let colors = trace_batch(&renderer, &scene, &rays, u64::from(pass))?;
        for (sum, color) in accumulated.iter_mut().zip(colors) {
            *sum += color;
        }
    }
    println!("Rendered in {:?}", start.elapsed());

    let image = image::RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let color = accumulated[(y * WIDTH + x) as usize] / f64::from(SAMPLES_PER_PIXEL);
        image::Rgb([to_byte(color.x), to_byte(color.y), to_byte(color.z)])
    });

    let filename = "cornell_box.png";
    image.save(filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new(Color::ZERO);

    let white = Material::diffuse(Color::splat(0.73));
    let red = Material::diffuse(Color::new(0.65, 0.05, 0.05));
    let green = Material::diffuse(Color::new(0.12, 0.45, 0.15));

    // Walls of a 2x2x2 box centered at the origin, open towards +z
    scene.add(Object::new(
        "floor",
        Rectangle::new(DVec3::new(0.0, -1.0, 0.0), DVec3::Y, DVec3::X, 2.0, 2.0)?,
        white.clone(),
    ));
    scene.add(Object::new(
        "ceiling",
        Rectangle::new(DVec3::new(0.0, 1.0, 0.0), -DVec3::Y, DVec3::X, 2.0, 2.0)?,
        white.clone(),
    ));
    scene.add(Object::new(
        "back wall",
        Rectangle::new(DVec3::new(0.0, 0.0, -1.0), DVec3::Z, DVec3::X, 2.0, 2.0)?,
        white.clone(),
    ));
    scene.add(Object::new(
        "left wall",
        Rectangle::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::X, DVec3::Z, 2.0, 2.0)?,
        red,
    ));
    scene.add(Object::new(
        "right wall",
        Rectangle::new(DVec3::new(1.0, 0.0, 0.0), -DVec3::X, DVec3::Z, 2.0, 2.0)?,
        green,
    ));

    scene.add(Object::new(
        "lamp",
        Rectangle::new(DVec3::new(0.0, 0.99, 0.0), -DVec3::Y, DVec3::X, 0.5, 0.5)?,
        Material::light(Color::splat(15.0)),
    ));

    let block_axis = DVec3::new(0.3, 0.0, 1.0).normalize();
    scene.add(Object::new(
        "block",
        CompositeShape::cuboid(
            Pose::oriented(DVec3::new(-0.35, -0.4, -0.3), DVec3::Y, block_axis)?,
            DVec3::new(0.3, 0.3, 0.6),
        )?,
        white,
    ));
    scene.add(Object::new(
        "glass ball",
        Sphere::new(DVec3::new(0.4, -0.65, 0.3), 0.35)?,
        Material::glass(1.5),
    ));

    Ok(scene)
}

/// One pinhole ray per pixel, row-major from the top-left corner.
fn camera_rays(look_from: DVec3, look_at: DVec3, up: DVec3, vfov_degrees: f64) -> Result<Vec<Ray>> {
    let forward = (look_at - look_from).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(forward);

    let half_height = (vfov_degrees.to_radians() / 2.0).tan();
    let half_width = half_height * f64::from(WIDTH) / f64::from(HEIGHT);

    let mut rays = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let u = (2.0 * (f64::from(x) + 0.5) / f64::from(WIDTH) - 1.0) * half_width;
            let v = (1.0 - 2.0 * (f64::from(y) + 0.5) / f64::from(HEIGHT)) * half_height;
            rays.push(Ray::new(look_from, forward + u * right + v * true_up)?);
        }
    }
    Ok(rays)
}

/// Gamma 2 and quantize.
fn to_byte(value: f64) -> u8 {
    (value.max(0.0).sqrt().min(0.999) * 256.0) as u8
}
