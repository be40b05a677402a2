//! Bucket-based parallel rendering.
//!
//! Divides the image into buckets of whole scanlines that are rendered
//! independently on the rayon pool. Buckets are reassembled in index order,
//! so the final image is row-major no matter which bucket finished first.

use crate::renderer::{log_start, render_pixel, ImageBuffer, RenderError};
use crate::{Camera, Color, Hittable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Default bucket height in scanlines.
pub const DEFAULT_BUCKET_ROWS: u32 = 16;

/// A horizontal band of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// First scanline of the bucket
    pub y: u32,
    /// Image width in pixels
    pub width: u32,
    /// Number of scanlines in the bucket
    pub height: u32,
    /// Position of this bucket from the top of the image
    pub index: usize,
}

impl Bucket {
    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate top-to-bottom buckets covering a `width x height` image.
///
/// The last bucket is shorter when `height` is not a multiple of
/// `bucket_rows`. A `bucket_rows` of zero is treated as one.
pub fn generate_buckets(width: u32, height: u32, bucket_rows: u32) -> Vec<Bucket> {
    let bucket_rows = bucket_rows.max(1);

    (0..height)
        .step_by(bucket_rows as usize)
        .enumerate()
        .map(|(index, y)| Bucket {
            y,
            width,
            height: bucket_rows.min(height - y),
            index,
        })
        .collect()
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut StdRng,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        let j = bucket.y + local_y;
        for i in 0..bucket.width {
            pixels.push(render_pixel(camera, world, i, j, rng));
        }
    }

    pixels
}

/// Seed for one bucket, derived from the render seed.
fn bucket_seed(seed: u64, index: usize) -> u64 {
    // Spread consecutive indices across the seed space (golden ratio step)
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render the scene on the rayon pool.
///
/// Each bucket draws from its own `StdRng` seeded from `seed` and the bucket
/// index, so the output depends only on `seed` and `bucket_rows`, not on
/// thread scheduling.
pub fn render_parallel(
    camera: &mut Camera,
    world: &dyn Hittable,
    seed: u64,
    bucket_rows: u32,
) -> Result<ImageBuffer, RenderError> {
    camera.initialize()?;
    let start = log_start(camera);

    let camera: &Camera = camera;
    let buckets = generate_buckets(camera.image_width(), camera.image_height(), bucket_rows);
    log::debug!("Rendering {} buckets in parallel", buckets.len());

    let results: Vec<Vec<Color>> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(bucket_seed(seed, bucket.index));
            let pixels = render_bucket(bucket, camera, world, &mut rng);
            log::debug!("Bucket {} done", bucket.index);
            pixels
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    image.pixels = results.into_iter().flatten().collect();

    log::info!("Done in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(100, 64, 16);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 64);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(10, 50, 16);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[3].y, 48);
        assert_eq!(buckets[3].height, 2);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 10 * 50);
    }

    #[test]
    fn test_buckets_are_top_to_bottom() {
        let buckets = generate_buckets(8, 40, 8);
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
            assert_eq!(bucket.y, i as u32 * 8);
        }
    }

    #[test]
    fn test_zero_bucket_rows() {
        let buckets = generate_buckets(4, 3, 0);
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(|b| b.height == 1));
    }

    #[test]
    fn test_bucket_seeds_differ() {
        assert_ne!(bucket_seed(7, 0), bucket_seed(7, 1));
        assert_ne!(bucket_seed(7, 0), bucket_seed(8, 0));
    }
}
