/*

    Responsible for creating a struct that represents
    ranges from a to b and functionality to check if
    x is in range [a,b] or (a,b).

    See also associated constants of Interval class:
    - EMPTY: (inf, -inf)
    - UNIVERSE: (-inf, inf)
    - NONNEGATIVE: (0, inf)

    Intervals are used as the acceptable range of ray
    parameter t during intersection tests. Shapes narrow
    a copy of it, the caller's interval is never mutated.
*/

use crate::numeric::{Float};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Interval {

    pub const EMPTY: Self = Self {
        min: FloatConst::INF,
        max: FloatConst::NEG_INF,
    };

    pub const UNIVERSE: Self = Self {
        min: FloatConst::NEG_INF,
        max: FloatConst::INF,
    };

    pub const NONNEGATIVE: Self = Self {
        min: 0.0,
        max: FloatConst::INF,
    };

    pub fn new(min: Float, max: Float) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn positive(epsilon: Float) -> Self {
        // [epsilon, inf)
        Self {
            min: epsilon,
            max: FloatConst::INF,
        }
    }

    /// True if no t can satisfy min < t < max (also true when a bound is NaN)
    pub fn is_empty(&self) -> bool {
        !(self.max > self.min)
    }

    pub fn size(&self) -> Float {
        self.max - self.min
    }

    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn surrounds(&self, x: Float) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: Float) -> Float {
        if x < self.min { self.min }
        else if x > self.max { self.max }
        else { x }
    }

    pub fn expand(&mut self, x: Float) {
        if x < self.min { self.min = x; }
        if x > self.max { self.max = x; }
    }

    /// Same lower bound, upper bound replaced (used to shrink towards the closest hit)
    pub fn with_max(&self, max: Float) -> Self {
        Self::new(self.min, max)
    }
}


pub trait FloatConst: Copy {
    const INF: Self;
    const NEG_INF: Self;
}

impl FloatConst for f32 {
    const INF: Self = f32::INFINITY;
    const NEG_INF: Self = f32::NEG_INFINITY;
}

impl FloatConst for f64 {
    const INF: Self = f64::INFINITY;
    const NEG_INF: Self = f64::NEG_INFINITY;
}
