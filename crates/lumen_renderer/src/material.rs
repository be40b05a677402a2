//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use lumen_math::{near_zero, random_unit_vector, reflect, refract, Ray, Vec3};
use rand::{Rng, RngCore};

/// Color type alias (linear RGB values typically 0-1)
pub type Color = Vec3;

/// A scattered ray and the color filter applied to the light it carries.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Fraction of the incoming light passed on, per channel
    pub attenuation: Color,
    /// Continuation ray leaving the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable once built and shared between objects, hence
/// `Send + Sync`.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some(ScatterResult)` if the ray scatters,
    /// or `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let scatter_direction = diffuse_direction(rec.normal, random_unit_vector(rng));

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Normal plus a unit sample, falling back to the normal when they cancel.
#[inline]
fn diffuse_direction(normal: Vec3, unit_sample: Vec3) -> Vec3 {
    let direction = normal + unit_sample;
    // Catch degenerate scatter direction
    if near_zero(direction) {
        normal
    } else {
        direction
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize();
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the ray below the surface, which counts as absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// index over the index of the enclosing medium
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>()
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(
        ray: &Ray,
        p: Vec3,
        outward_normal: Vec3,
        material: &'a dyn Material,
    ) -> HitRecord<'a> {
        let t = (p - ray.origin()).length() / ray.direction().length();
        HitRecord::new(ray, t, p, outward_normal, material)
    }

    #[test]
    fn test_diffuse_direction_falls_back_to_normal() {
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let cancelling = Vec3::new(1e-10, -1.0, -1e-10);
        assert_eq!(diffuse_direction(normal, cancelling), normal);

        let sample = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(diffuse_direction(normal, sample), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_lambertian_always_scatters_outwards() {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let mat = Lambertian::new(albedo);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = record(&ray, Vec3::new(0.0, 0.0, -0.5), Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..500 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("diffuse scatters");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(!near_zero(result.scattered.direction()));
            // normal + unit vector never points below the tangent plane
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_without_fuzz_is_a_mirror() {
        let albedo = Color::new(0.8, 0.8, 0.8);
        let mat = Metal::new(albedo, 0.0);
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(2);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = reflect(incoming, Vec3::Y).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, albedo);
    }

    #[test]
    fn test_metal_grazing_into_surface_is_absorbed() {
        let mat = Metal::new(Color::ONE, 0.0);
        // Direction along the surface: mirror direction has dot(n) == 0
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X);
        // Normal held fixed so the record does not re-orient it
        let rec = HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            material: &mat,
            t: 1.0,
            front_face: true,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
        assert_eq!(Metal::new(Color::ONE, 0.3).fuzz(), 0.3);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_into_surface() {
        let mat = Metal::new(Color::ONE, 1.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..500 {
            if let Some(result) = mat.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_dielectric_index_one_passes_straight_through() {
        let mat = Dielectric::new(1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = record(&ray, Vec3::new(0.0, 0.0, -0.5), Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass scatters");
            assert_eq!(result.attenuation, Color::ONE);
            assert!((result.scattered.direction() - Vec3::NEG_Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Leaving glass at a steep angle: ratio 1.5 * sin(60deg) > 1
        let incoming = Vec3::new((60f64).to_radians().sin(), (60f64).to_radians().cos(), 0.0);
        let ray = Ray::new(Vec3::ZERO, incoming);
        // Outward normal along +y makes this a back-face hit
        let rec = record(&ray, incoming, Vec3::Y, &mat);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass scatters");
            let expected = reflect(incoming, rec.normal);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        // Normal incidence on glass
        assert!((Dielectric::reflectance(1.0, 1.5) - 0.04).abs() < 1e-12);
        // Grazing incidence reflects everything
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-12);
        // Matched indices never reflect head-on
        assert_eq!(Dielectric::reflectance(1.0, 1.0), 0.0);
    }
}
