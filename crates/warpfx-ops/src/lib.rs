//! # warpfx-ops
//!
//! Geometric video filters built on quantized resampling.
//!
//! This crate turns the sampling primitives of `warpfx-math` into per-frame
//! filters. The pieces, leaves first:
//!
//! # Modules
//!
//! - [`schedule`] - Frame ranges and linearly animated parameters
//! - [`geometry`] - Quadrant lookup tables for fisheye mirrors
//! - [`symmetry`] - Four-fold replication of quadrant tables
//! - [`rng`] - Deterministic per-frame random numbers
//! - [`filters`] - The filters themselves
//! - `parallel` - Batch rendering on the Rayon pool (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{ClipInfo, Frame, VideoFormat};
//! use warpfx_ops::filters::{FrameFilter, RearViewMirror, RearViewMirrorParams};
//! use warpfx_ops::Point;
//!
//! let clip = ClipInfo::new(VideoFormat::yuv420p8(), 640, 360, 250);
//! let params = RearViewMirrorParams {
//!     center: Some(Point::new(480, 90)),
//!     width: Some(200),
//!     height: Some(100),
//!     start_frame: Some(50),
//!     ..RearViewMirrorParams::default()
//! };
//! let mirror = RearViewMirror::new(&params, &clip).unwrap();
//!
//! let frame: Frame<u8> = Frame::black(clip.format, 640, 360).unwrap();
//! let out = mirror.render(100, &frame);
//! assert_eq!(out.dimensions(), (640, 360));
//! ```
//!
//! # Errors
//!
//! Parameters are checked once, when a filter is created, and reported as
//! [`OpsError`]. Rendering never fails; handing a filter a frame of the
//! wrong format or size is a programming error and panics.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod filters;
pub mod geometry;
pub mod rng;
pub mod schedule;
pub mod symmetry;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use filters::FrameFilter;
pub use geometry::{Entry, GeometryParams, GeometryTable, MirrorShape, GEOMETRY_QUANTILES};
pub use rng::FrameRng;
pub use schedule::{schedule, FrameRange, Point, Schedulable, Scheduled};
pub use symmetry::{Mirror, Replicator};
