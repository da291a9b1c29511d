//! Sample scalar types.
//!
//! Filters are written once, generic over [`Sample`], and monomorphized for
//! the three storage types a host can hand over:
//!
//! - `u8` - 8-bit integer planes
//! - `u16` - 9 to 16-bit integer planes
//! - `f32` - 32-bit float planes
//!
//! Unlike a normalizing pixel trait, [`Sample`] works in the plane's *native*
//! domain: a 10-bit sample of 940 converts to `940.0`, not `0.918`. Clamp
//! ranges from [`PlaneFormat::range`](crate::PlaneFormat::range) use the same
//! domain, so interpolation results can be clamped without rescaling.
//!
//! # Example
//!
//! ```
//! use warpfx_core::{Sample, SampleRange};
//!
//! let range = SampleRange::new(16.0, 235.0);
//! assert_eq!(u8::from_f32(300.0, range), 235);
//! assert_eq!(u8::from_f32(99.6, range), 100);
//! assert_eq!(200u16.to_f32(), 200.0);
//! ```

use crate::format::SampleRange;

/// Scalar type stored in a plane.
pub trait Sample: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// Storage width in bytes.
    const BYTES: usize;

    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// Converts to `f32` without rescaling.
    fn to_f32(self) -> f32;

    /// Converts from `f32`, clamping into `range` first.
    ///
    /// Integer types round to nearest.
    fn from_f32(v: f32, range: SampleRange) -> Self;
}

impl Sample for u8 {
    const BYTES: usize = 1;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32, range: SampleRange) -> Self {
        range.clamp(v).clamp(0.0, 255.0).round() as u8
    }
}

impl Sample for u16 {
    const BYTES: usize = 2;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32, range: SampleRange) -> Self {
        range.clamp(v).clamp(0.0, 65535.0).round() as u16
    }
}

impl Sample for f32 {
    const BYTES: usize = 4;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32, range: SampleRange) -> Self {
        range.clamp(v)
    }
}
