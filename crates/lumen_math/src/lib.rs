//! Lumen math - vectors, intervals and rays for the path tracer.
//!
//! Everything is double precision. `Vec3` is glam's `DVec3` and doubles as a
//! point, a direction, or a linear RGB color depending on context.

// Re-export glam's f64 vector for convenience
pub use glam::DVec3;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    near_zero, random_in_unit_disk, random_unit_vector, random_vec3, reflect, refract,
};

/// 3-component double precision vector.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
