//! Parallel frame rendering using Rayon.
//!
//! Filters render through `&self` and keep no per-frame state, so any
//! number of frames can be rendered at once. The results are identical to
//! rendering the frames one after another.
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{ClipInfo, Frame, VideoFormat};
//! use warpfx_ops::filters::{Lens, LensParams};
//! use warpfx_ops::parallel::render_batch;
//!
//! let clip = ClipInfo::new(VideoFormat::gray8(), 64, 64, 8);
//! let lens = Lens::new(&LensParams::default(), &clip).unwrap();
//! let frames: Vec<Frame<u8>> = (0..8)
//!     .map(|_| Frame::new(clip.format, 64, 64).unwrap())
//!     .collect();
//!
//! let out = render_batch(&lens, 0, &frames);
//! assert_eq!(out.len(), 8);
//! ```

use crate::filters::FrameFilter;
use rayon::prelude::*;
use tracing::debug;
use warpfx_core::{Frame, Sample};

/// Renders consecutive frames `first, first + 1, ...` in parallel.
///
/// # Panics
///
/// Panics if a frame does not match the filter's clip.
pub fn render_batch<F, T>(filter: &F, first: u32, frames: &[Frame<T>]) -> Vec<Frame<T>>
where
    F: FrameFilter,
    T: Sample,
{
    debug!(filter = filter.name(), first, count = frames.len(), "Rendering batch");
    frames
        .par_iter()
        .enumerate()
        .map(|(i, frame)| filter.render(first + i as u32, frame))
        .collect()
}

/// Like [`render_batch`], drawing each frame over its own background.
///
/// # Panics
///
/// Panics if the slices differ in length or a frame does not match the
/// filter's clip.
pub fn render_batch_over<F, T>(
    filter: &F,
    first: u32,
    frames: &[Frame<T>],
    backgrounds: &[Frame<T>],
) -> Vec<Frame<T>>
where
    F: FrameFilter,
    T: Sample,
{
    assert_eq!(
        frames.len(),
        backgrounds.len(),
        "{}: {} frames but {} backgrounds",
        filter.name(),
        frames.len(),
        backgrounds.len()
    );
    debug!(filter = filter.name(), first, count = frames.len(), "Rendering batch over backgrounds");
    frames
        .par_iter()
        .zip(backgrounds.par_iter())
        .enumerate()
        .map(|(i, (frame, bg))| filter.render_over(first + i as u32, frame, bg))
        .collect()
}
