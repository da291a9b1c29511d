//! Moving magnifying lens.
//!
//! A disc of the frame is shown magnified, as through a hand lens moving
//! over the picture. Centre, radius and magnification move linearly from
//! their start to their end values over the active range.

use super::magnify::{magnify_disc, Disc};
use super::{check_clip, FrameFilter};
use crate::error::check_range;
use crate::schedule::{schedule, FrameRange, Point, Scheduled};
use crate::OpsResult;
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Sample};
use warpfx_math::{CoefficientTable, Kernel};

const NAME: &str = "Lens";
const QUANTILES: usize = 64;
const MARGIN: i32 = 4;

/// Lens parameters. Unset values default from the clip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LensParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Centre at the start (default frame centre)
    pub center: Option<Point>,
    /// Centre at the end (default `center`)
    pub end_center: Option<Point>,
    /// Radius at the start, 4..=min(w, h)/2 (default a quarter of that limit)
    pub radius: Option<i32>,
    /// Radius at the end (default `radius`)
    pub end_radius: Option<i32>,
    /// Magnification at the start, 1.5..=8
    pub mag: f32,
    /// Magnification at the end (default `mag`)
    pub end_mag: Option<f32>,
    /// Magnification falls off towards the rim
    pub drop: bool,
}

impl Default for LensParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            center: None,
            end_center: None,
            radius: None,
            end_radius: None,
            mag: 4.0,
            end_mag: None,
            drop: true,
        }
    }
}

/// Moving magnifying lens filter.
#[derive(Debug, Clone)]
pub struct Lens {
    clip: ClipInfo,
    range: FrameRange,
    table: CoefficientTable,
    center: Scheduled<Point>,
    radius: Scheduled<i32>,
    mag: Scheduled<f32>,
    drop: bool,
}

impl Lens {
    /// Validates `params` against `clip` and builds the filter.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`](crate::OpsError::Configuration) when a
    /// parameter is out of range.
    pub fn new(params: &LensParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let (w, h) = (clip.width as i32, clip.height as i32);

        let rmax = clip.min_dimension() as i32 / 2;
        let radius = params.radius.unwrap_or((rmax / 4).max(MARGIN));
        let end_radius = params.end_radius.unwrap_or(radius);
        check_range(NAME, "radius", radius, MARGIN, rmax)?;
        check_range(NAME, "end_radius", end_radius, MARGIN, rmax)?;

        let (cx, cy) = clip.center();
        let center = params.center.unwrap_or(Point::new(cx as i32, cy as i32));
        let end_center = params.end_center.unwrap_or(center);
        for (label, p) in [("center", center), ("end_center", end_center)] {
            check_range(NAME, &format!("{label}.x"), p.x, MARGIN, w - MARGIN)?;
            check_range(NAME, &format!("{label}.y"), p.y, MARGIN, h - MARGIN)?;
        }

        let end_mag = params.end_mag.unwrap_or(params.mag);
        check_range(NAME, "mag", params.mag, 1.5, 8.0)?;
        check_range(NAME, "end_mag", end_mag, 1.5, 8.0)?;

        let table = CoefficientTable::build(Kernel::Cubic, QUANTILES);
        debug!(
            ?range,
            radius,
            end_radius,
            mag = params.mag,
            end_mag,
            drop = params.drop,
            "Created Lens"
        );
        Ok(Self {
            clip: *clip,
            range,
            table,
            center: schedule(center, end_center, range),
            radius: schedule(radius, end_radius, range),
            mag: schedule(params.mag, end_mag, range),
            drop: params.drop,
        })
    }

    /// Disc shown at frame `n`.
    pub(crate) fn disc_at(&self, n: u32) -> Disc {
        Disc {
            center: self.center.value_at(n),
            radius: self.radius.value_at(n),
            mag: self.mag.value_at(n),
            drop: self.drop,
        }
    }
}

impl FrameFilter for Lens {
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
        magnify_disc(&mut dst, src, &self.table, &self.disc_at(n), &[0], false);
        dst
    }
}
