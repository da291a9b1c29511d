//! # warpfx-core
//!
//! Core types for per-frame raster video filters.
//!
//! This crate provides the foundational types used throughout warpfx:
//!
//! - [`VideoFormat`], [`PlaneFormat`] - Frame and plane layout, value ranges
//! - [`Sample`] - The `u8` / `u16` / `f32` storage abstraction filters are
//!   generic over
//! - [`Plane`], [`Frame`], [`AnyFrame`] - Copy-on-write planar buffers
//! - [`ClipInfo`] - Clip header filters validate their parameters against
//!
//! ## Design Philosophy
//!
//! Filters are written once against [`Sample`] and work in each plane's
//! native value domain. The sample width is resolved once per frame (through
//! [`AnyFrame`] or a generic call), never per pixel:
//!
//! ```rust
//! use warpfx_core::{Frame, Sample, VideoFormat};
//!
//! fn brightest<T: Sample>(frame: &Frame<T>) -> f32 {
//!     let plane = frame.plane(0);
//!     (0..plane.height() as usize)
//!         .flat_map(|y| plane.row(y).iter().map(|v| v.to_f32()))
//!         .fold(f32::MIN, f32::max)
//! }
//!
//! let mut frame: Frame<u16> = Frame::new(VideoFormat::gray16(), 4, 4).unwrap();
//! frame.plane_mut(0).set(1, 2, 4000);
//! assert_eq!(brightest(&frame), 4000.0);
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! warpfx-core (this crate)
//!    ^
//!    |
//!    +-- warpfx-math (coefficient tables, resampling, projections)
//!    +-- warpfx-ops (geometry tables, scheduling, filters)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for formats and clip headers

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clip;
pub mod error;
pub mod format;
pub mod frame;
pub mod sample;

pub use clip::*;
pub use error::*;
pub use format::*;
pub use frame::*;
pub use sample::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use warpfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clip::ClipInfo;
    pub use crate::error::{Error, Result};
    pub use crate::format::{ColorFamily, PlaneFormat, SampleRange, SampleType, VideoFormat};
    pub use crate::frame::{AnyFrame, Frame, Plane};
    pub use crate::sample::Sample;
}
