
use crate::material::HeapAllocMaterial;
use crate::prelude::*;


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3, // not required to be normalized, components may be (signed) zero
}

impl Ray {

    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction,
        }
    }

    #[inline]
    pub fn at(&self, t: Float) -> Vector3 {
        self.origin + self.direction * t // r(t) = o + dt
    }

    /// A surface is hit from the front if its outward normal opposes the ray.
    /// Grazing hits (and zero normals) count as back faces.
    #[inline]
    pub fn is_front_face(&self, outward_normal: Vector3) -> bool {
         self.direction.dot(outward_normal) < 0.0
    }
}


// t is a single scalar that encaptures which HitRecord is closer
// to the ray origin, so t=0 is at ray origin, smaller t is, closer the object is.
//
// Records are owned by the caller and filled in by Shape::intersect, nothing
// here is read back by the shape that writes it.
//
// DISCLAIMER: This struct is based on the approach presented in Ray Tracing in One Weekend book.
#[derive(Debug, Default, Clone)]
pub struct HitRecord {
    pub point: Vector3,
    pub normal: Vector3, // oriented against the incoming ray, see set_face_normal()
    pub t: Float,
    pub front_face: bool,
    pub material: Option<HeapAllocMaterial>,
}

impl HitRecord {

    /// Store `outward_normal` flipped to face the ray, and remember which side was hit
    #[inline]
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vector3) {
        self.front_face = ray.is_front_face(outward_normal);
        self.normal = if self.front_face { outward_normal } else { -outward_normal };
    }

    pub fn material_type(&self) -> Option<&str> {
        self.material.as_deref().map(|m| m.get_type())
    }
}
