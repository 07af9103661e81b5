/*

    Declare primitives: AxisAlignedBox, Sphere

    Every primitive implements Shape so the scene can test
    heterogeneous shapes uniformly through Arc<dyn Shape>.
*/

use std::fmt::Debug;

use crate::interval::Interval;
use crate::material::{HeapAllocMaterial, Lambertian};
use crate::ray::{Ray, HitRecord};
use crate::prelude::*;

pub type HeapAllocatedShape = Arc<dyn Shape>;


// =======================================================================================================
// Shape Trait
// =======================================================================================================
pub trait Shape : Debug + Send + Sync {
    /// Fill `rec` with the first hit inside `ray_t` and return true, or return false
    /// leaving `rec` unspecified.
    fn intersect(&self, ray: &Ray, ray_t: &Interval, rec: &mut HitRecord) -> bool;

    fn hit(&self, ray: &Ray, ray_t: &Interval) -> Option<HitRecord> {
        let mut rec = HitRecord::default();
        if self.intersect(ray, ray_t, &mut rec) { Some(rec) } else { None }
    }
}


// =======================================================================================================
// Axis Aligned Box (impl Shape)
// =======================================================================================================

/// Tolerance used to decide which face a hit point lies on
pub const NORMAL_BIAS: Float = 1e-4;

// Outward normals in the order faces are tested: -x, +x, -y, +y, -z, +z
const FACE_NORMALS: [Vector3; 6] = [
    Vector3::NEG_X, Vector3::X,
    Vector3::NEG_Y, Vector3::Y,
    Vector3::NEG_Z, Vector3::Z,
];

/// Box spanned by two opposite corners. `box_min <= box_max` per axis is expected
/// but not enforced, and a flat axis (min == max) is legal.
#[derive(Debug, Clone)]
pub struct AxisAlignedBox {
    pub box_min: Vector3,
    pub box_max: Vector3,
    pub material: HeapAllocMaterial,
}

impl Default for AxisAlignedBox {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::ZERO, Arc::new(Lambertian::default()))
    }
}

impl AxisAlignedBox {
    pub fn new(box_min: Vector3, box_max: Vector3, material: HeapAllocMaterial) -> Self {
        Self {
            box_min,
            box_max,
            material,
        }
    }

    /// Slab method: narrow `ray_t` against the pair of planes on each axis.
    /// Returns the narrowed [entry, exit] interval, or None as soon as an axis
    /// leaves it empty (remaining axes are skipped).
    ///
    /// A zero direction component gives infinite slab bounds. If the origin also lies
    /// exactly on that slab plane the bound is NaN, which loses both comparisons below
    /// and so leaves the interval untouched for that axis.
    pub fn clip(&self, ray: &Ray, ray_t: &Interval) -> Option<Interval> {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..NUM_AXES {
            // Sign taken from the reciprocal so that a -0.0 component counts as negative
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.box_min[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (self.box_max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_min { t_min = t0; }
            if t1 < t_max { t_max = t1; }

            if t_max <= t_min {
                return None;
            }
        }

        Some(Interval::new(t_min, t_max))
    }

    /// Outward normal of the first face (-x, +x, -y, +y, -z, +z) that `point` lies on
    /// within NORMAL_BIAS. Zero vector if it lies on none of them.
    pub fn face_normal(&self, point: &Vector3) -> Vector3 {
        FACE_NORMALS
            .iter()
            .enumerate()
            .find(|(face, _)| {
                let axis = face / 2;
                let plane = if face % 2 == 0 { self.box_min[axis] } else { self.box_max[axis] };
                (point[axis] - plane).abs() < NORMAL_BIAS
            })
            .map(|(_, normal)| *normal)
            .unwrap_or(Vector3::ZERO)
    }
}

impl Shape for AxisAlignedBox {

    fn intersect(&self, ray: &Ray, ray_t: &Interval, rec: &mut HitRecord) -> bool {
        let Some(clipped) = self.clip(ray, ray_t) else {
            return false;
        };

        rec.t = clipped.min;
        rec.point = ray.at(rec.t);

        // Zero normal is possible through floating point error at edges/corners,
        // it is passed on as is
        let outward_normal = self.face_normal(&rec.point);
        rec.set_face_normal(ray, outward_normal);
        rec.material = Some(Arc::clone(&self.material));
        true
    }
}


// =======================================================================================================
// Sphere (impl Shape)
// =======================================================================================================
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: Float,
    pub material: HeapAllocMaterial,
}

impl Sphere {
    pub fn new(center: Vector3, radius: Float, material: HeapAllocMaterial) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Shape for Sphere {

    fn intersect(&self, ray: &Ray, ray_t: &Interval, rec: &mut HitRecord) -> bool {
        // No surface to hit, and the normal below would be 0/0
        if self.radius <= 0.0 {
            return false;
        }

        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 { // Negative square root
            return false;
        }

        // Nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.point = ray.at(rec.t);
        let outward_normal = (rec.point - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.material = Some(Arc::clone(&self.material));
        true
    }
}
