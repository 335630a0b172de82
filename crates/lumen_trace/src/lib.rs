//! Lumen - CPU path tracing core.
//!
//! A recursive, BVH-accelerated ray/geometry intersection engine: given a
//! scene of primitives and a ray, find the nearest surface hit, ask the
//! surface material how light scatters, and recurse to estimate a pixel's
//! color.

mod bvh;
mod camera;
mod hittable;
mod material;
mod renderer;
mod sphere;
mod texture;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal};
pub use renderer::{
    color_to_rgba, ray_color, render, render_parallel, render_pixel, ImageBuffer, RenderConfig,
    RenderError,
};
pub use sphere::Sphere;
pub use texture::{SolidColor, Texture};

/// Re-export the math types the tracing API is written in terms of.
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform f32 in [0, 1) from any RNG behind a trait object.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
