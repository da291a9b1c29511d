//! Binocular view.
//!
//! The disc around the current centre is magnified and drawn twice, shifted
//! one radius to the left and to the right, so the two eyepieces overlap in
//! the middle. The centre pans from its start to its end position over the
//! active range while the magnification changes linearly.

use super::magnify::{magnify_disc, Disc};
use super::{check_clip, FrameFilter};
use crate::error::check_range;
use crate::schedule::{schedule, FrameRange, Point, Scheduled};
use crate::OpsResult;
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Sample};
use warpfx_math::{CoefficientTable, Kernel};

const NAME: &str = "Binoculars";
const QUANTILES: usize = 64;

/// Binocular parameters. Unset values default from the clip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BinocularsParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Eyepiece radius, 8..=min(w, h)/4 (default min(w, h)/8)
    pub radius: Option<i32>,
    /// Centre at the start (default half a radius from the left edge)
    pub center: Option<Point>,
    /// Centre at the end (default half a radius from the right edge)
    pub end_center: Option<Point>,
    /// Magnification at the start, 2..=radius/4
    pub mag: f32,
    /// Magnification at the end (default `mag`)
    pub end_mag: Option<f32>,
}

impl Default for BinocularsParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            radius: None,
            center: None,
            end_center: None,
            mag: 2.0,
            end_mag: None,
        }
    }
}

/// Binoculars filter.
#[derive(Debug, Clone)]
pub struct Binoculars {
    clip: ClipInfo,
    range: FrameRange,
    table: CoefficientTable,
    radius: i32,
    center: Scheduled<Point>,
    mag: Scheduled<f32>,
}

impl Binoculars {
    /// Validates `params` against `clip` and builds the filter.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`](crate::OpsError::Configuration) when a
    /// parameter is out of range.
    pub fn new(params: &BinocularsParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let (w, h) = (clip.width as i32, clip.height as i32);

        let eighth = clip.min_dimension() as i32 / 8;
        let radius = params.radius.unwrap_or(eighth);
        check_range(NAME, "radius", radius, 8, 2 * eighth)?;

        let center = params.center.unwrap_or(Point::new(radius / 2, h / 2));
        let end_center = params.end_center.unwrap_or(Point::new(w - radius / 2, h / 2));
        for (label, p) in [("center", center), ("end_center", end_center)] {
            check_range(NAME, &format!("{label}.x"), p.x, 0, w - 1)?;
            check_range(NAME, &format!("{label}.y"), p.y, 0, h - 1)?;
        }

        let max_mag = radius as f32 / 4.0;
        let end_mag = params.end_mag.unwrap_or(params.mag);
        check_range(NAME, "mag", params.mag, 2.0, max_mag)?;
        check_range(NAME, "end_mag", end_mag, 2.0, max_mag)?;

        debug!(?range, radius, mag = params.mag, end_mag, "Created Binoculars");
        Ok(Self {
            clip: *clip,
            range,
            table: CoefficientTable::build(Kernel::Cubic, QUANTILES),
            radius,
            center: schedule(center, end_center, range),
            mag: schedule(params.mag, end_mag, range),
        })
    }

    fn disc_at(&self, n: u32) -> Disc {
        Disc {
            center: self.center.value_at(n),
            radius: self.radius,
            mag: self.mag.value_at(n),
            drop: false,
        }
    }
}

impl FrameFilter for Binoculars {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clip(&self) -> &ClipInfo {
        &self.clip
    }

    fn frame_range(&self) -> FrameRange {
        self.range
    }

    fn process<T: Sample>(&self, n: u32, src: &Frame<T>, background: &Frame<T>) -> Frame<T> {
        let mut dst = background.clone();
        let shifts = [-self.radius, self.radius];
        magnify_disc(&mut dst, src, &self.table, &self.disc_at(n), &shifts, true);
        dst
    }
}
