//! Windowed sinc kernels.
//!
//! The Lanczos rows of a [`CoefficientTable`](crate::CoefficientTable) are
//! sampled from [`lanczos`], which is built on the normalized [`sinc`].
//!
//! # Usage
//!
//! ```rust
//! use warpfx_math::lanczos;
//!
//! assert_eq!(lanczos(0.0, 2.0), 1.0);
//! assert!(lanczos(1.0, 2.0).abs() < 1e-6);
//! ```

use std::f64::consts::PI;

/// Normalized sinc: `sin(πx) / (πx)`, with `sinc(0) = 1`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Lanczos kernel of half-width `a`, zero outside `(-a, a)`.
#[inline]
pub fn lanczos(x: f64, a: f64) -> f64 {
    if x.abs() >= a {
        0.0
    } else {
        sinc(x) * sinc(x / a)
    }
}
