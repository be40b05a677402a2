//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials. Scenes are built from [`Sphere`]s in a [`HittableList`], the
//! [`Camera`] generates jittered rays per pixel, and [`ray_color`] follows
//! each ray through the scene until it escapes to the sky, is absorbed, or
//! runs out of bounces.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lumen_renderer::{render_to, Camera, HittableList, Lambertian, Sphere, Vec3};
//!
//! let mut world = HittableList::new();
//! world.add(Box::new(Sphere::new(
//!     Vec3::new(0.0, 0.0, -1.0),
//!     0.5,
//!     Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5))),
//! )));
//!
//! let mut camera = Camera::new().with_image(16.0 / 9.0, 400);
//! render_to(&mut camera, &world, &mut rand::thread_rng(), std::io::stdout().lock())?;
//! ```

mod bucket;
mod camera;
mod hittable;
mod material;
mod ppm;
mod renderer;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, DEFAULT_BUCKET_ROWS};
pub use camera::{Camera, CameraError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use ppm::{color_to_bytes, linear_to_gamma, write_ppm, PpmWriter};
pub use renderer::{
    ray_color, render, render_pixel, render_to, sky_gradient, ImageBuffer, RenderError,
    RAY_T_MIN,
};
pub use sphere::Sphere;

/// Re-export the math types from lumen_math
pub use lumen_math::{Interval, Point3, Ray, Vec3};
