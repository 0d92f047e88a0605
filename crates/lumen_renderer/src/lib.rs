//! Lumen renderer - analytic-shape path tracing core.
//!
//! Rays are intersected in closed form against spheres, disks, rings,
//! rectangles, tubes, cones, triangles, tori and their composites. Materials
//! pick diffuse, reflective or refractive continuations, and a family of
//! renderers turns each camera ray into one RGB radiance value.
//!
//! ```no_run
//! use lumen_renderer::shape::Sphere;
//! use lumen_renderer::{
//!     Color, DVec3, Material, Object, Ray, RenderConfig, Renderer, Scene, Strategy,
//! };
//! use rand::SeedableRng;
//!
//! let mut scene = Scene::new(Color::ZERO);
//! scene.add(Object::new(
//!     "lamp",
//!     Sphere::new(DVec3::new(0.0, 0.0, 5.0), 1.0)?,
//!     Material::light(Color::ONE),
//! ));
//!
//! let renderer = Renderer::new(Strategy::PathTracerNee, RenderConfig::default());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let ray = Ray::new(DVec3::ZERO, DVec3::Z)?;
//! let _color = renderer.trace_ray(ray, &scene, &mut rng)?;
//! # Ok::<(), lumen_renderer::RenderError>(())
//! ```

mod batch;
mod config;
mod error;
mod hittable;
mod material;
mod object;
mod ray;
mod renderer;
pub mod sampling;
mod scene;
pub mod shape;
mod texture;

pub use batch::{ray_seed, trace_batch};
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Intersection};
pub use material::{InteractionType, Material};
pub use object::Object;
pub use ray::Ray;
pub use renderer::{LightSampling, RadianceEstimate, Renderer, Strategy};
pub use scene::{ObjectId, Scene};
pub use shape::Shape;
pub use texture::Texture;

/// Re-export common math types from lumen_math
pub use lumen_math::{DVec2, DVec3, Interval, OrthonormalBasis, EPSILON};

/// Linear RGB color
pub type Color = DVec3;
