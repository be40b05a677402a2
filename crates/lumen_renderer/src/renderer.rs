//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's max depth
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling
//! - Gamma-corrected PPM output (see [`crate::ppm`])

use crate::camera::CameraError;
use crate::ppm::PpmWriter;
use crate::{Camera, Color, Hittable};
use lumen_math::{Interval, Ray};
use rand::RngCore;
use std::io::Write;
use std::time::Instant;
use thiserror::Error;

/// Lower bound on hit distance. Keeps scattered rays from re-hitting the
/// surface they start on because of floating point error (shadow acne).
pub const RAY_T_MIN: f64 = 1e-4;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image expected {expected} pixels but {written} were written")]
    PixelCountMismatch { expected: u64, written: u64 },
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color, until the ray
/// escapes to the sky, is absorbed, or `depth` runs out.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(RAY_T_MIN, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        // Absorbed
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
///
/// Blends white at the horizon-down direction into sky blue straight up.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Render a single pixel with multi-sampling.
///
/// Returns the averaged linear color. The camera must be initialized.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Image buffer holding linear colors in row-major order.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to gamma-corrected RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| crate::ppm::color_to_bytes(*color))
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer.
///
/// Initializes the camera, then evaluates every pixel in row-major order
/// on the calling thread.
pub fn render(
    camera: &mut Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> Result<ImageBuffer, RenderError> {
    camera.initialize()?;
    let start = log_start(camera);

    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    for j in 0..camera.image_height() {
        log::debug!("Scanlines remaining: {}", camera.image_height() - j);
        for i in 0..camera.image_width() {
            image.set(i, j, render_pixel(camera, world, i, j, rng));
        }
    }

    log::info!("Done in {:?}", start.elapsed());
    Ok(image)
}

/// Render the scene, streaming each pixel to `out` as PPM as soon as it is
/// computed. Returns the sink once the image is complete.
pub fn render_to<W: Write>(
    camera: &mut Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    out: W,
) -> Result<W, RenderError> {
    camera.initialize()?;
    let start = log_start(camera);

    let mut writer = PpmWriter::new(out, camera.image_width(), camera.image_height())?;
    for j in 0..camera.image_height() {
        log::debug!("Scanlines remaining: {}", camera.image_height() - j);
        for i in 0..camera.image_width() {
            writer.write_pixel(render_pixel(camera, world, i, j, rng))?;
        }
    }

    let out = writer.finish()?;
    log::info!("Done in {:?}", start.elapsed());
    Ok(out)
}

pub(crate) fn log_start(camera: &Camera) -> Instant {
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel(),
        camera.max_depth()
    );
    Instant::now()
}
