//! Per-frame video filters.
//!
//! Every filter is created once from a parameter struct and a
//! [`ClipInfo`], validates everything up front, precomputes its tables,
//! and then renders frames through `&self`:
//!
//! - [`RearViewMirror`] - Fisheye view of the frame in a curved mirror
//! - [`Lens`] - Moving magnifying disc
//! - [`FiguredGlass`] - Tiling of magnifying discs
//! - [`LineMagnifier`] - Magnifying band along one axis
//! - [`Binoculars`] - Twin magnified discs
//! - [`Cone`] - Frame wrapped around a cone
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{ClipInfo, Frame, VideoFormat};
//! use warpfx_ops::filters::{FrameFilter, Lens, LensParams};
//!
//! let clip = ClipInfo::new(VideoFormat::yuv420p8(), 128, 96, 30);
//! let lens = Lens::new(&LensParams::default(), &clip).unwrap();
//!
//! let src: Frame<u8> = Frame::black(clip.format, 128, 96).unwrap();
//! let out = lens.render(0, &src);
//! assert_eq!(out.dimensions(), (128, 96));
//! ```

mod binoculars;
mod cone;
mod figured_glass;
mod lens;
mod line_magnifier;
mod magnify;
mod mirror;

pub use binoculars::{Binoculars, BinocularsParams};
pub use cone::{Cone, ConeParams};
pub use figured_glass::{FiguredGlass, FiguredGlassParams};
pub use lens::{Lens, LensParams};
pub use line_magnifier::{LineMagnifier, LineMagnifierParams};
pub use mirror::{MirrorTestMode, RearViewMirror, RearViewMirrorParams};

use crate::schedule::FrameRange;
use crate::{OpsError, OpsResult};
use tracing::trace;
use warpfx_core::{AnyFrame, ClipInfo, Frame, Sample, VideoFormat};

/// A filter that renders frames of one clip.
///
/// Implementors provide [`process`](Self::process) for active frames; the
/// provided methods handle the frame range and runtime sample types.
pub trait FrameFilter: Send + Sync {
    /// Filter name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Clip the filter was created for.
    fn clip(&self) -> &ClipInfo;

    /// Frames the filter modifies.
    fn frame_range(&self) -> FrameRange;

    /// Renders active frame `n` of `src` over `background`.
    fn process<T: Sample>(&self, n: u32, src: &Frame<T>, background: &Frame<T>) -> Frame<T>;

    /// Renders frame `n`; frames outside the range are returned unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `src` does not have the clip's format and size.
    fn render<T: Sample>(&self, n: u32, src: &Frame<T>) -> Frame<T> {
        self.render_over(n, src, src)
    }

    /// Like [`render`](Self::render), drawing onto a copy of `background`.
    ///
    /// # Panics
    ///
    /// Panics if either frame does not have the clip's format and size.
    fn render_over<T: Sample>(&self, n: u32, src: &Frame<T>, background: &Frame<T>) -> Frame<T> {
        let clip = self.clip();
        if let Err(e) = clip.matches(src).and_then(|_| clip.matches(background)) {
            panic!("{}: frame does not match clip: {e}", self.name());
        }
        if !self.frame_range().contains(n) {
            trace!(filter = self.name(), n, "outside frame range");
            return src.clone();
        }
        trace!(filter = self.name(), n, "render");
        self.process(n, src, background)
    }

    /// Renders a frame whose sample type is known only at runtime.
    fn render_any(&self, n: u32, src: &AnyFrame) -> AnyFrame {
        match src {
            AnyFrame::U8(f) => AnyFrame::U8(self.render(n, f)),
            AnyFrame::U16(f) => AnyFrame::U16(self.render(n, f)),
            AnyFrame::F32(f) => AnyFrame::F32(self.render(n, f)),
        }
    }
}

/// Validates a clip for a filter.
pub(crate) fn check_clip(filter: &'static str, clip: &ClipInfo) -> OpsResult<()> {
    clip.validate().map_err(|e| OpsError::format(filter, e))
}

/// Per-plane fill values in native units: `color` if given, else black.
pub(crate) fn fill_values(
    filter: &'static str,
    format: VideoFormat,
    color: Option<&[f32]>,
) -> OpsResult<Vec<f32>> {
    match color {
        None => Ok(format.planes().map(|p| p.black()).collect()),
        Some(c) if c.len() != format.num_planes() => Err(OpsError::config(
            filter,
            format!("colour has {} values, format has {} planes", c.len(), format.num_planes()),
        )),
        Some(c) => {
            for (p, (&v, pf)) in c.iter().zip(format.planes()).enumerate() {
                if !pf.range().contains(v) {
                    return Err(OpsError::config(
                        filter,
                        format!("colour value {v} outside the range of plane {p}"),
                    ));
                }
            }
            Ok(c.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_clip_is_format_error() {
        let odd = ClipInfo::new(VideoFormat::yuv420p8(), 63, 48, 10);
        let err = check_clip("Lens", &odd).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().starts_with("Lens: "));

        let empty = ClipInfo::new(VideoFormat::rgb24(), 64, 48, 0);
        assert!(check_clip("Lens", &empty).unwrap_err().is_format());
        assert!(check_clip("Lens", &ClipInfo::new(VideoFormat::rgb24(), 64, 48, 1)).is_ok());
    }

    #[test]
    fn test_fill_values_default_black() {
        let fill = fill_values("Test", VideoFormat::yuv420p10(), None).unwrap();
        assert_eq!(fill, vec![64.0, 512.0, 512.0]);
        let fill = fill_values("Test", VideoFormat::rgbs(), None).unwrap();
        assert_eq!(fill, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fill_values_plane_order() {
        let fill = fill_values("Test", VideoFormat::rgb24(), Some(&[255.0, 0.0, 10.0])).unwrap();
        assert_eq!(fill, vec![255.0, 0.0, 10.0]);
    }

    #[test]
    fn test_fill_values_errors() {
        assert!(fill_values("Test", VideoFormat::gray8(), Some(&[1.0, 2.0])).is_err());
        let studio = Some(&[16.0, 250.0, 128.0][..]);
        let err = fill_values("Test", VideoFormat::yuv420p8(), studio).unwrap_err();
        assert!(err.is_configuration());
    }
}
