//! Math utilities and types
//!
//! Positions handed to the audio device are plain nalgebra vectors.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math utility functions
pub mod utils {
    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Inverse of [`lerp`]: where `value` sits between `a` and `b`
    ///
    /// Returns 0.0 when `a == b`. The result is not clamped.
    pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
        if (b - a).abs() <= f32::EPSILON {
            return 0.0;
        }
        (value - a) / (b - a)
    }
}
