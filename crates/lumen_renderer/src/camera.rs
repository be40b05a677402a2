//! Camera for ray generation.

use lumen_math::{random_in_unit_disk, Point3, Ray, Vec3};
use rand::{Rng, RngCore};
use thiserror::Error;

/// Configuration problems detected by [`Camera::initialize`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("image_width must be at least 1")]
    ZeroImageWidth,

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f64),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("focus distance must be finite and positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("defocus angle must be finite and non-negative, got {0}")]
    InvalidDefocusAngle(f64),

    #[error("degenerate view: look_from, look_at and vup do not define a camera basis")]
    DegenerateView,
}

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// to validate the settings and derive the viewing geometry.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    aspect_ratio: f64,
    image_width: u32,
    samples_per_pixel: u32,
    max_depth: u32,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    image_height: u32,
    samples_scale: f64,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            // Cached values (initialized to defaults)
            image_height: 0,
            samples_scale: 0.0,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set the image shape. Height is derived from width and aspect ratio.
    pub fn with_image(mut self, aspect_ratio: f64, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    ///
    /// `vfov` and `defocus_angle` are in degrees. A defocus angle of zero
    /// disables depth of field.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Validate settings and derive the viewing geometry.
    ///
    /// Must be called before generating rays.
    pub fn initialize(&mut self) -> Result<(), CameraError> {
        self.validate()?;

        // Image height is floored and at least one pixel
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);
        self.samples_scale = 1.0 / self.samples_per_pixel as f64;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, center {:?}, basis u={:?} v={:?} w={:?}",
            self.image_width,
            self.image_height,
            self.center,
            self.u,
            self.v,
            self.w
        );

        Ok(())
    }

    fn validate(&self) -> Result<(), CameraError> {
        if self.samples_per_pixel == 0 {
            return Err(CameraError::ZeroSamples);
        }
        if self.image_width == 0 {
            return Err(CameraError::ZeroImageWidth);
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFieldOfView(self.vfov));
        }
        if !self.focus_dist.is_finite() || self.focus_dist <= 0.0 {
            return Err(CameraError::InvalidFocusDistance(self.focus_dist));
        }
        if !self.defocus_angle.is_finite() || self.defocus_angle < 0.0 {
            return Err(CameraError::InvalidDefocusAngle(self.defocus_angle));
        }

        // Both the view direction and its cross with vup must be non-zero
        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 || self.vup.cross(view).length_squared() == 0.0 {
            return Err(CameraError::DegenerateView);
        }

        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The sample point is jittered within the pixel square, and the origin
    /// is jittered across the defocus disk when depth of field is enabled.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Derived image height. Zero until [`Camera::initialize`] succeeds.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }

    /// Camera center (the look-from point once initialized).
    pub fn center(&self) -> Point3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5, 0.0)
}
