//! Recursive integrator and frame rendering.
//!
//! `ray_color` is the light-transport recursion; the rest is the frame
//! plumbing around it: per-pixel multi-sampling, gamma conversion, and a
//! row-parallel render over rayon workers with one independent RNG per row.

use crate::{Camera, Color, Hittable, Ray};
use lumen_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors from the output edge of the renderer.
///
/// The tracing core itself has no failure states; misses and absorption are
/// ordinary `None` results.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when a ray escapes the scene
    pub background: Color,
    /// Use the sky gradient instead of the solid background
    pub use_sky_gradient: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: true,
        }
    }
}

/// Compute the color seen along a ray.
///
/// Terminal states: depth exhausted (black), escape (background), or
/// absorption (black). A hit otherwise scatters and recurses, attenuating
/// the returned color. The near bound of the hit search excludes t close
/// to 0 so a bounce cannot re-hit its own origin surface.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    match world.hit(ray, Interval::new(0.001, f32::INFINITY)) {
        Some(rec) => match rec.material.scatter(ray, &rec, rng) {
            Some((attenuation, scattered)) => {
                attenuation * ray_color(&scattered, world, depth - 1, config, rng)
            }
            None => Color::ZERO,
        },
        None => {
            if config.use_sky_gradient {
                sky_gradient(ray)
            } else {
                config.background
            }
        }
    }
}

/// White-to-blue gradient over the ray's vertical direction.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
}

/// Gamma-2 correction.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an unclamped linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Average `samples_per_pixel` jittered rays through pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Image buffer of linear colors.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Gamma-corrected RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Encode and write the buffer as an image file (format by extension).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Render the whole frame on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the frame with rows dispatched across rayon workers.
///
/// Each row gets its own `StdRng` derived from `seed` and the row index, so
/// the output is deterministic for a given seed and the workers share no
/// random state.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    seed: u64,
) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;

    log::info!(
        "rendering {}x{} @ {} spp, depth {}",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );

    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(y as u64));
            (0..width)
                .map(|x| render_pixel(camera, world, x, y, config, &mut rng))
                .collect()
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for (y, row) in rows.into_iter().enumerate() {
        for (x, color) in row.into_iter().enumerate() {
            image.set(x as u32, y as u32, color);
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, Hittable, HittableList, Lambertian, Sphere, Vec3};
    use std::sync::Arc;

    fn one_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::new(Color::splat(0.5)),
        )));
        world
    }

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_sky_gradient_blends_up_to_blue() {
        let up = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new_simple(Vec3::ZERO, -Vec3::Y));

        // Up is the blue end (less red), down the white end
        assert!(up.x < down.x);
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = one_sphere_world();
        let config = RenderConfig::default();
        let mut rng = test_rng();

        // Even a ray pointing straight at the sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = ray_color(&ray, &world, 0, &config, &mut rng);
        assert_eq!(color, Color::ZERO);

        // And a ray that would escape to the background
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        let color = ray_color(&ray, &world, 0, &config, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_escape_returns_background() {
        let world = one_sphere_world();
        let config = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            use_sky_gradient: false,
            ..Default::default()
        };
        let mut rng = test_rng();

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        let color = ray_color(&ray, &world, 10, &config, &mut rng);
        assert_eq!(color, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_unit_sphere_end_to_end() {
        let world = one_sphere_world();

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = world
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();

        assert!((rec.t - 0.5).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);

        // The bounce contributes at most the albedo times the sky
        let config = RenderConfig::default();
        let mut rng = test_rng();
        let color = ray_color(&ray, &world, 5, &config, &mut rng);
        assert!(color.max_element() <= 0.5 + 1e-4);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-4);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(4.0, 1.0, 0.0)), [255, 255, 0, 255]);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let world = BvhNode::from_list(one_sphere_world());

        let mut camera = Camera::new().with_resolution(10, 10);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            ..Default::default()
        };

        let mut rng = test_rng();
        let color = render_pixel(&camera, &world, 5, 5, &config, &mut rng);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_render_parallel_is_deterministic() {
        let world = BvhNode::from_list(one_sphere_world());

        let mut camera = Camera::new().with_resolution(8, 6);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 3,
            ..Default::default()
        };

        let a = render_parallel(&camera, &world, &config, 7);
        let b = render_parallel(&camera, &world, &config, 7);

        assert_eq!(a.width, 8);
        assert_eq!(a.height, 6);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Color::ONE);

        assert_eq!(image.get(3, 1), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);

        let rgba = image.to_rgba();
        assert_eq!(rgba.len(), 4 * 2 * 4);
        assert_eq!(&rgba[(1 * 4 + 3) * 4..], &[255, 255, 255, 255]);
    }
}
