//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Interval, Point3, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Built fresh for every successful intersection query and borrowed from the
/// object that was hit, so it never outlives the scene.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a hit record, orienting `outward_normal` against the ray.
    ///
    /// `outward_normal` must have unit length.
    pub fn new(
        ray: &Ray,
        t: f64,
        p: Point3,
        outward_normal: Vec3,
        material: &'a dyn Material,
    ) -> Self {
        let (front_face, normal) = face_normal(ray, outward_normal);
        Self {
            p,
            normal,
            material,
            t,
            front_face,
        }
    }
}

/// Orient the geometric normal against the incoming ray.
///
/// Returns `(front_face, normal)`. If the ray and outward normal point the
/// same way the ray started inside the surface and the normal is flipped.
fn face_normal(ray: &Ray, outward_normal: Vec3) -> (bool, Vec3) {
    let front_face = ray.direction().dot(outward_normal) < 0.0;
    let normal = if front_face {
        outward_normal
    } else {
        -outward_normal
    };
    (front_face, normal)
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .finish_non_exhaustive()
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `t` inside `ray_t`.
    ///
    /// Returns `None` when the ray misses or every root lies outside the
    /// interval.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// A list of hittable objects, itself hittable.
///
/// Traversal is linear in the number of objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Create a list holding a single object.
    pub fn with_object(object: Box<dyn Hittable>) -> Self {
        let mut list = Self::new();
        list.add(object);
        list
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            // Shrink the search to anything strictly nearer than the best hit
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max)) {
                closest = Some(rec);
            }
        }

        closest
    }
}
