/*

    Declare numeric types used throughout this repo.

    WARNING: If you like to use f32 instead of f64
    during computations, you need to change both of these:
    pub type Float = f32;
    pub type Vector3 = Vec3;
*/

use bevy_math::DVec3;

pub type Float = f64; // WARNING: If you want to change it to f32, don't forget to update Vector3
pub type Vector3 = DVec3;

/// Number of spatial axes, used when iterating slabs (0 = x, 1 = y, 2 = z)
pub const NUM_AXES: usize = 3;

/// Component-wise comparison within `eps`
pub fn approx_eq_vec(a: &Vector3, b: &Vector3, eps: Float) -> bool {
    (0..NUM_AXES).all(|axis| (a[axis] - b[axis]).abs() <= eps)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_indexing_matches_fields() {
        let v = Vector3::new(1.0, -2.0, 3.5);
        assert_eq!(v[0], v.x);
        assert_eq!(v[1], v.y);
        assert_eq!(v[2], v.z);
    }

    #[test]
    fn test_approx_helpers() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0 + 1e-7, 2.0, 3.0 - 1e-7);
        assert!(approx_eq_vec(&a, &b, 1e-6));
        assert!(!approx_eq_vec(&a, &Vector3::ZERO, 1e-6));
    }
}
