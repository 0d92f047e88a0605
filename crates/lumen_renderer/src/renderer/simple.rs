//! First-hit base color, no transport.

use crate::{Color, Ray, Scene};

pub(super) fn trace(ray: &Ray, scene: &Scene) -> Color {
    match scene.intersect(ray) {
        Some(hit) => scene.object(hit.object).material().get_color(&hit),
        None => scene.background(),
    }
}
