//! Line magnifier: a cylindrical lens lying across the frame.
//!
//! A band `width` pixels wide, running the full height (vertical band) or
//! full width (horizontal band) of the frame, shows the source magnified
//! across the band about its centre line. The band position moves linearly
//! over the active range.
//!
//! The mapping across the band does not depend on the frame, so it is
//! computed once: for each position in the band the floor source offset
//! from the centre line and its quantile.

use super::{check_clip, FrameFilter};
use crate::error::check_range;
use crate::schedule::{schedule, FrameRange, Scheduled};
use crate::OpsResult;
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Plane, Sample};
use warpfx_math::{nearest, Axis, CoefficientTable, Kernel, Resampler};

const NAME: &str = "LineMagnifier";
const QUANTILES: usize = 64;
const MARGIN: i32 = 4;

/// Line magnifier parameters. Unset values default from the clip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineMagnifierParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Vertical band moving horizontally; `false` for a horizontal band
    pub vertical: bool,
    /// Band width, 4..=dim/8 (default dim/16) where dim is the frame size
    /// across the band
    pub width: Option<i32>,
    /// Magnification, 1.5..=8 (2..=8 with drop)
    pub mag: f32,
    /// Magnification falls off towards the band edges
    pub drop: bool,
    /// Band centre at the start (default frame centre)
    pub position: Option<i32>,
    /// Band centre at the end (default `position`)
    pub end_position: Option<i32>,
}

impl Default for LineMagnifierParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            vertical: true,
            width: None,
            mag: 4.0,
            drop: false,
            position: None,
            end_position: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BandTap {
    near: i32,
    q: usize,
}

/// Line magnifier filter.
#[derive(Debug, Clone)]
pub struct LineMagnifier {
    clip: ClipInfo,
    range: FrameRange,
    table: CoefficientTable,
    axis: Axis,
    taps: Vec<BandTap>,
    position: Scheduled<i32>,
}

impl LineMagnifier {
    /// Validates `params` against `clip` and builds the band table.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`](crate::OpsError::Configuration) when a
    /// parameter is out of range.
    pub fn new(params: &LineMagnifierParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let (dim, axis) = if params.vertical {
            (clip.width as i32, Axis::Horizontal)
        } else {
            (clip.height as i32, Axis::Vertical)
        };

        let width = params.width.unwrap_or(dim / 16);
        check_range(NAME, "width", width, 4, dim / 8)?;
        let min_mag = if params.drop { 2.0 } else { 1.5 };
        check_range(NAME, "mag", params.mag, min_mag, 8.0)?;

        let (lo, hi) = (width / 2 + MARGIN, dim - MARGIN - width / 2);
        let position = params.position.unwrap_or(dim / 2);
        let end_position = params.end_position.unwrap_or(position);
        check_range(NAME, "position", position, lo, hi)?;
        check_range(NAME, "end_position", end_position, lo, hi)?;

        let table = CoefficientTable::build(Kernel::Cubic, QUANTILES);
        let taps = band_taps(width, params.mag, params.drop, &table);
        debug!(?range, ?axis, width, mag = params.mag, drop = params.drop, "Created LineMagnifier");
        Ok(Self {
            clip: *clip,
            range,
            table,
            axis,
            taps,
            position: schedule(position, end_position, range),
        })
    }

    /// Band width in pixels.
    pub fn band_width(&self) -> usize {
        self.taps.len()
    }

    fn render_plane<T: Sample>(
        &self,
        dst: &mut Plane<T>,
        src: &Plane<T>,
        rs: &Resampler<'_>,
        center: i32,
        sub: u32,
    ) {
        let start = center - self.taps.len() as i32 / 2;
        let lines = match self.axis {
            Axis::Horizontal => src.height() as isize,
            Axis::Vertical => src.width() as isize,
        };
        let at = |along: isize, across: isize| match self.axis {
            Axis::Horizontal => (along, across),
            Axis::Vertical => (across, along),
        };
        let mask = (1i32 << sub) - 1;

        for line in 0..lines {
            for (i, tap) in self.taps.iter().enumerate() {
                let d = start + i as i32;
                let s = center + tap.near;
                let value = if sub == 0 {
                    let (x, y) = at(s as isize, line);
                    rs.along_line(src, x, y, self.axis, tap.q)
                } else if d & mask == 0 {
                    let (x, y) = at((s >> sub) as isize, line);
                    nearest(src, x, y)
                } else {
                    continue;
                };
                let (x, y) = at((d >> sub) as isize, line);
                if dst.contains(x, y) {
                    dst.set(x as usize, y as usize, value);
                }
            }
        }
    }
}

/// Source offsets from the band centre for each position across the band.
fn band_taps(width: i32, mag: f32, drop: bool, table: &CoefficientTable) -> Vec<BandTap> {
    let half = width / 2;
    let quarter_sq = (width * width) as f32 / 4.0;
    (0..width)
        .map(|i| {
            let d = i - half;
            let m = if drop {
                mag * (1.0 + (d * d) as f32 / quarter_sq) / 2.0
            } else {
                mag
            };
            let s = d as f32 / m;
            let near = s.floor();
            BandTap {
                near: near as i32,
                q: table.quantize(s - near),
            }
        })
        .collect()
}

impl FrameFilter for LineMagnifier {
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
        let center = self.position.value_at(n);
        let format = src.format();
        for (p, (out, inp)) in dst.planes_mut().iter_mut().zip(src.planes()).enumerate() {
            let pf = format.plane(p);
            let sub = match self.axis {
                Axis::Horizontal => pf.sub_sampling_w,
                Axis::Vertical => pf.sub_sampling_h,
            };
            let rs = Resampler::new(&self.table, pf.range());
            self.render_plane(out, inp, &rs, center, sub);
        }
        dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpfx_core::VideoFormat;

    fn ramp_frame(format: VideoFormat, w: u32, h: u32) -> Frame<u8> {
        let mut frame: Frame<u8> = Frame::new(format, w, h).unwrap();
        for plane in frame.planes_mut() {
            let (pw, ph) = (plane.width(), plane.height());
            let data = (0..ph).flat_map(|_| (0..pw).map(|x| (x * 2 + 16) as u8)).collect();
            *plane = Plane::from_data(pw, ph, pw as usize, data).unwrap();
        }
        frame
    }

    #[test]
    fn test_band_taps_uniform() {
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let taps = band_taps(8, 4.0, false, &table);
        assert_eq!(taps.len(), 8);
        // Centre position maps to the centre line
        assert_eq!(taps[4], BandTap { near: 0, q: 0 });
        // -4 / 4 = -1
        assert_eq!(taps[0], BandTap { near: -1, q: 0 });
        // 2 / 4 = 0.5
        assert_eq!(taps[6], BandTap { near: 0, q: 32 });
        // -1 / 4 = -0.25 -> floor -1, fraction 0.75
        assert_eq!(taps[3], BandTap { near: -1, q: 48 });
    }

    #[test]
    fn test_band_taps_drop() {
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let taps = band_taps(8, 4.0, true, &table);
        // Edge: 4 * (1 + 16/16) / 2 = 4
        assert_eq!(taps[0], BandTap { near: -1, q: 0 });
        // Centre magnification is mag / 2
        assert_eq!(taps[4], BandTap { near: 0, q: 0 });
    }

    #[test]
    fn test_defaults_and_validation() {
        let clip = ClipInfo::new(VideoFormat::rgb24(), 320, 240, 10);
        let lm = LineMagnifier::new(&LineMagnifierParams::default(), &clip).unwrap();
        assert_eq!(lm.band_width(), 20);
        assert_eq!(lm.position.start, 160);

        let bad = LineMagnifierParams {
            drop: true,
            mag: 1.8,
            ..LineMagnifierParams::default()
        };
        assert!(LineMagnifier::new(&bad, &clip).unwrap_err().is_configuration());
        let bad = LineMagnifierParams {
            width: Some(41),
            ..LineMagnifierParams::default()
        };
        assert!(LineMagnifier::new(&bad, &clip).is_err());
        let bad = LineMagnifierParams {
            position: Some(10),
            ..LineMagnifierParams::default()
        };
        assert!(LineMagnifier::new(&bad, &clip).is_err());
        let horizontal = LineMagnifierParams {
            vertical: false,
            ..LineMagnifierParams::default()
        };
        let lm = LineMagnifier::new(&horizontal, &clip).unwrap();
        assert_eq!(lm.band_width(), 15);
        assert_eq!(lm.position.start, 120);
    }

    #[test]
    fn test_vertical_band_magnifies_ramp() {
        let clip = ClipInfo::new(VideoFormat::gray8(), 64, 16, 1);
        let src = ramp_frame(clip.format, 64, 16);
        let params = LineMagnifierParams {
            width: Some(8),
            mag: 2.0,
            ..LineMagnifierParams::default()
        };
        let lm = LineMagnifier::new(&params, &clip).unwrap();
        let out = lm.render(0, &src);
        let p = out.plane(0);
        // Band spans 28..36 around 32; slope halves inside it
        assert_eq!(p.get(32, 5), src.plane(0).get(32, 5));
        assert_eq!(p.get(34, 5), 16 + 2 * 33);
        assert_eq!(p.get(30, 5), 16 + 2 * 31);
        assert_eq!(p.get(27, 5), src.plane(0).get(27, 5));
        assert_eq!(p.get(36, 5), src.plane(0).get(36, 5));
    }

    #[test]
    fn test_subsampled_chroma_nearest() {
        let clip = ClipInfo::new(VideoFormat::yuv420p8(), 64, 16, 1);
        let src = ramp_frame(clip.format, 64, 16);
        let params = LineMagnifierParams {
            width: Some(8),
            mag: 2.0,
            ..LineMagnifierParams::default()
        };
        let lm = LineMagnifier::new(&params, &clip).unwrap();
        let out = lm.render(0, &src);
        // Frame x = 28 shows source 30, chroma column 15
        assert_eq!(out.plane(1).get(14, 3), src.plane(1).get(15, 3));
        assert_eq!(out.plane(1).get(16, 3), src.plane(1).get(16, 3));
    }

    #[test]
    fn test_horizontal_band() {
        let clip = ClipInfo::new(VideoFormat::gray8(), 16, 64, 1);
        let mut src: Frame<u8> = Frame::new(clip.format, 16, 64).unwrap();
        let data = (0..64u32).flat_map(|y| (0..16).map(move |_| (y * 3) as u8)).collect();
        *src.plane_mut(0) = Plane::from_data(16, 64, 16, data).unwrap();
        let params = LineMagnifierParams {
            vertical: false,
            width: Some(8),
            mag: 2.0,
            ..LineMagnifierParams::default()
        };
        let lm = LineMagnifier::new(&params, &clip).unwrap();
        let out = lm.render(0, &src);
        assert_eq!(out.plane(0).get(5, 34), 3 * 33);
        assert_eq!(out.plane(0).get(5, 40), src.plane(0).get(5, 40));
    }
}
