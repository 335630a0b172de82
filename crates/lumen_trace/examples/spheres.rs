//! Random-spheres demo scene.
//!
//! Builds a grid of diffuse, metal and glass spheres (one of them moving),
//! wraps them in a BVH, renders in parallel, and writes a PNG.

use anyhow::Result;
use lumen_trace::{
    render_parallel, BvhNode, Camera, Color, Dielectric, Hittable, HittableList, Lambertian,
    Metal, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let world = build_scene(11);
    log::info!("scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_resolution(800, 450)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::Y,
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        ..Default::default()
    };

    let start = Instant::now();
    let image = render_parallel(&camera, &world, &config, 42);
    log::info!("rendered in {:?}", start.elapsed());

    let filename = "spheres.png";
    image.save(filename)?;
    log::info!("saved to {filename}");

    Ok(())
}

fn build_scene(extent: i32) -> BvhNode {
    let mut rng = StdRng::seed_from_u64(3);
    let mut world = HittableList::new();

    // Ground
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    )));

    for a in -extent..extent {
        for b in -extent..extent {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let object: Arc<dyn Hittable> = match rng.gen::<f32>() {
                x if x < 0.8 => {
                    let albedo = Color::new(rng.gen(), rng.gen(), rng.gen())
                        * Color::new(rng.gen(), rng.gen(), rng.gen());
                    let center2 = center + Vec3::new(0.0, rng.gen::<f32>() * 0.5, 0.0);
                    Arc::new(Sphere::new_moving(
                        center,
                        center2,
                        0.2,
                        Lambertian::new(albedo),
                    ))
                }
                x if x < 0.95 => {
                    let albedo = Color::new(
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                    );
                    let fuzz = 0.5 * rng.gen::<f32>();
                    Arc::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz)))
                }
                _ => Arc::new(Sphere::new(center, 0.2, Dielectric::new(1.5))),
            };
            world.add(object);
        }
    }

    // Three showcase spheres
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    BvhNode::from_list(world)
}
