//! # warpfx-math
//!
//! Resampling maths for warpfx geometric filters.
//!
//! This crate provides the numeric building blocks behind every warp:
//!
//! - [`CoefficientTable`] - Quantized interpolation weights for the
//!   [`Kernel`]s nearest, linear, cubic, Lanczos-4 and Lanczos-6
//! - [`Resampler`] - Separable sub-pixel sampling of a
//!   [`Plane`](warpfx_core::Plane), clamped to the plane's value range
//! - [`Projection`], [`RadialMap`] - Fisheye mapping functions and the
//!   mirror radius model
//! - Windowed sinc helpers ([`sinc`], [`lanczos`])
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{Plane, SampleRange};
//! use warpfx_math::{CoefficientTable, Kernel, Resampler};
//!
//! let plane: Plane<f32> = Plane::filled(16, 16, 0.5);
//! let table = CoefficientTable::build(Kernel::Lanczos6, 64);
//! let rs = Resampler::new(&table, SampleRange::new(0.0, 1.0));
//!
//! let v = rs.sample_at(&plane, 7.3, 8.9);
//! assert!((v - 0.5).abs() < 1e-5);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - `DVec2` source-coordinate vectors
//! - `warpfx-core` - Planes and sample types
//!
//! # Used By
//!
//! - `warpfx-ops` - Geometry tables and filters

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod coeff;
mod interp;
mod projection;
mod resample;

pub use coeff::*;
pub use interp::*;
pub use projection::*;
pub use resample::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{DVec2, Vec2};
}
