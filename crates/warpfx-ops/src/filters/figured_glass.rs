//! Figured glass: the frame seen through a sheet of lenslets.
//!
//! Touching magnifying discs of radius `r` are laid out on a square grid
//! with centres at `(r + 2ir, r + 2jr)`. Each disc magnifies the source
//! beneath it; the gaps between discs keep the background.

use super::magnify::{magnify_disc, Disc};
use super::{check_clip, FrameFilter};
use crate::error::check_range;
use crate::schedule::{FrameRange, Point};
use crate::OpsResult;
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Sample};
use warpfx_math::{CoefficientTable, Kernel};

const NAME: &str = "FiguredGlass";
const QUANTILES: usize = 64;

/// Figured glass parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FiguredGlassParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Disc radius, 4..=min(w, h)/2 (default an eighth of that limit)
    pub radius: Option<i32>,
    /// Magnification, 1.5..=8
    pub mag: f32,
    /// Magnification falls off towards each rim
    pub drop: bool,
}

impl Default for FiguredGlassParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            radius: None,
            mag: 4.0,
            drop: true,
        }
    }
}

/// Figured glass filter.
#[derive(Debug, Clone)]
pub struct FiguredGlass {
    clip: ClipInfo,
    range: FrameRange,
    table: CoefficientTable,
    discs: Vec<Disc>,
}

impl FiguredGlass {
    /// Validates `params` against `clip` and lays out the discs.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`](crate::OpsError::Configuration) when a
    /// parameter is out of range.
    pub fn new(params: &FiguredGlassParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let rmax = clip.min_dimension() as i32 / 2;
        let radius = params.radius.unwrap_or((rmax / 8).max(4));
        check_range(NAME, "radius", radius, 4, rmax)?;
        check_range(NAME, "mag", params.mag, 1.5, 8.0)?;

        let step = 2 * radius as usize;
        let (w, h) = (clip.width as i32, clip.height as i32);
        let discs: Vec<Disc> = (radius..w)
            .step_by(step)
            .flat_map(|cx| {
                (radius..h).step_by(step).map(move |cy| Disc {
                    center: Point::new(cx, cy),
                    radius,
                    mag: params.mag,
                    drop: params.drop,
                })
            })
            .collect();

        debug!(?range, radius, discs = discs.len(), mag = params.mag, "Created FiguredGlass");
        Ok(Self {
            clip: *clip,
            range,
            table: CoefficientTable::build(Kernel::Cubic, QUANTILES),
            discs,
        })
    }

    /// Number of lenslets.
    pub fn disc_count(&self) -> usize {
        self.discs.len()
    }
}

impl FrameFilter for FiguredGlass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clip(&self) -> &ClipInfo {
        &self.clip
    }

    fn frame_range(&self) -> FrameRange {
        self.range
    }

    fn process<T: Sample>(&self, _n: u32, src: &Frame<T>, background: &Frame<T>) -> Frame<T> {
        let mut dst = background.clone();
        for disc in &self.discs {
            magnify_disc(&mut dst, src, &self.table, disc, &[0], false);
        }
        dst
    }
}
