//! Simple path tracer example.
//!
//! Renders the classic random-spheres scene and saves it in PPM format.
//!
//! Optional environment overrides:
//! - `LUMEN_WIDTH`, `LUMEN_SPP`, `LUMEN_DEPTH`: image width and quality
//! - `LUMEN_SEED`: render on all cores with this seed
//! - `LUMEN_OUTPUT`: output path, `-` for stdout (default `output.ppm`)

use anyhow::{Context, Result};
use lumen_renderer::{
    render_parallel, render_to, write_ppm, Camera, Color, Dielectric, HittableList, Lambertian,
    Material, Metal, Point3, Sphere, Vec3, DEFAULT_BUCKET_ROWS,
};
use lumen_math::random_vec3;
use rand::{Rng, RngCore};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let width: u32 = env_or("LUMEN_WIDTH", 400)?;
    let samples: u32 = env_or("LUMEN_SPP", 50)?;
    let depth: u32 = env_or("LUMEN_DEPTH", 10)?;
    let output = std::env::var("LUMEN_OUTPUT").unwrap_or_else(|_| "output.ppm".to_string());

    let world = build_scene(&mut rand::thread_rng());
    log::info!("Created {} objects", world.len());

    let mut camera = Camera::new()
        .with_image(16.0 / 9.0, width)
        .with_quality(samples, depth)
        .with_position(
            Point3::new(13.0, 2.0, 3.0), // look_from
            Point3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),    // vup
        )
        .with_lens(20.0, 0.6, 10.0);

    let out: Box<dyn Write> = if output == "-" {
        Box::new(BufWriter::new(std::io::stdout().lock()))
    } else {
        let file = File::create(&output).with_context(|| format!("creating {}", output))?;
        Box::new(BufWriter::new(file))
    };

    match std::env::var("LUMEN_SEED") {
        Ok(seed) => {
            let seed = seed.parse::<u64>().context("LUMEN_SEED must be an integer")?;
            let image = render_parallel(&mut camera, &world, seed, DEFAULT_BUCKET_ROWS)?;
            write_ppm(&image, out)?;
        }
        Err(_) => {
            render_to(&mut camera, &world, &mut rand::thread_rng(), out)?;
        }
    }

    log::info!("Saved to {}", output);
    Ok(())
}

/// Parse an environment variable, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn build_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    // Ground
    world.add(Box::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));

    // Small random spheres
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                glass.clone()
            };
            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    // Three main spheres
    world.add(Box::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass)));
    world.add(Box::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}
