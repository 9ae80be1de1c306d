//! Math types for HUD layout.
//!
//! Re-exports the SIMD-accelerated [`glam`] types together with a couple of
//! scalar helpers used by the layout code.
//!
//! ```
//! use hudkit_core::math::{Vec2, safe_recip};
//!
//! let size = Vec2::new(200.0, 40.0);
//! assert_eq!(size.x * safe_recip(size.x), 1.0);
//! assert!(safe_recip(0.0).is_finite());
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::*;

/// Smallest span length used when taking a reciprocal.
pub const SPAN_EPSILON: f32 = 1e-5;

/// Reciprocal of `value`, substituting [`SPAN_EPSILON`] for values at or
/// below it so the result is always finite.
#[inline]
pub fn safe_recip(value: f32) -> f32 {
    1.0 / value.max(SPAN_EPSILON)
}

/// Component of `v` on the given axis (`vertical == true` selects `y`).
#[inline]
pub fn axis(v: Vec2, vertical: bool) -> f32 {
    if vertical { v.y } else { v.x }
}

/// Build a vector from align-axis and off-axis components.
#[inline]
pub fn from_axes(align: f32, off: f32, vertical: bool) -> Vec2 {
    if vertical {
        Vec2::new(off, align)
    } else {
        Vec2::new(align, off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_recip_guards_zero() {
        assert!(safe_recip(0.0).is_finite());
        assert!(safe_recip(-3.0).is_finite());
        assert_eq!(safe_recip(4.0), 0.25);
    }

    #[test]
    fn test_axes_round_trip() {
        let v = from_axes(3.0, 7.0, true);
        assert_eq!(v, Vec2::new(7.0, 3.0));
        assert_eq!(axis(v, true), 3.0);
        assert_eq!(axis(v, false), 7.0);
    }
}
