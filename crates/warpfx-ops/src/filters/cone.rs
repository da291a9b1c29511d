//! Cone: the frame wrapped around a cone seen side on.
//!
//! Each row of a vertical cone (each column of a horizontal one) is wrapped
//! around a circle and viewed from the front. The visible half circle of
//! diameter `D` shows the whole source line, so destination offset `w`
//! from the centre shows the source at
//!
//! ```text
//! s(w) = dim * asin(w / r) / π        r = D / 2
//! ```
//!
//! The diameter runs linearly from `top` on the first line to `base` on the
//! last. With `progressive` set both diameters start at the full frame size
//! and shrink to their final values over the active range. Pixels beyond
//! the cone keep the background.

use super::{check_clip, FrameFilter};
use crate::error::check_range;
use crate::schedule::{schedule, FrameRange, Scheduled};
use crate::OpsResult;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Plane, Sample};
use warpfx_math::{nearest, Axis, CoefficientTable, Kernel, Resampler};

const NAME: &str = "Cone";
const QUANTILES: usize = 64;
const MARGIN: i32 = 8;

/// Cone parameters. Unset values default from the clip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConeParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Upright cone wrapping rows; `false` wraps columns
    pub vertical: bool,
    /// Shrink from the full frame size to the final diameters over the range
    pub progressive: bool,
    /// Diameter at the first line, 4..=limit (default limit / 8)
    pub top: Option<i32>,
    /// Diameter at the last line, 8..=limit (default limit)
    pub base: Option<i32>,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            vertical: true,
            progressive: true,
            top: None,
            base: None,
        }
    }
}

/// Cone filter.
#[derive(Debug, Clone)]
pub struct Cone {
    clip: ClipInfo,
    range: FrameRange,
    table: CoefficientTable,
    axis: Axis,
    top: Scheduled<i32>,
    base: Scheduled<i32>,
}

impl Cone {
    /// Validates `params` against `clip`.
    ///
    /// The diameter limit is `(dim - 8) / (π / 2)`, where `dim` is the
    /// frame width for a vertical cone and the height otherwise.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`](crate::OpsError::Configuration) when a
    /// diameter is out of range.
    pub fn new(params: &ConeParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let (dim, axis) = if params.vertical {
            (clip.width as i32, Axis::Horizontal)
        } else {
            (clip.height as i32, Axis::Vertical)
        };

        let limit = ((dim - MARGIN).max(0) as f64 / FRAC_PI_2) as i32;
        let top = params.top.unwrap_or(limit / 8);
        let base = params.base.unwrap_or(limit);
        check_range(NAME, "top", top, 4, limit)?;
        check_range(NAME, "base", base, 8, limit)?;

        let (top, base) = if params.progressive {
            (schedule(dim, top, range), schedule(dim, base, range))
        } else {
            (Scheduled::constant(top, range), Scheduled::constant(base, range))
        };
        debug!(?range, ?axis, ?top, ?base, "Created Cone");
        Ok(Self {
            clip: *clip,
            range,
            table: CoefficientTable::build(Kernel::Cubic, QUANTILES),
            axis,
            top,
            base,
        })
    }

    /// Top and base diameters at frame `n`.
    pub fn diameters_at(&self, n: u32) -> (i32, i32) {
        (self.top.value_at(n), self.base.value_at(n))
    }

    fn render_plane<T: Sample>(
        &self,
        dst: &mut Plane<T>,
        src: &Plane<T>,
        rs: &Resampler<'_>,
        (top, base): (i32, i32),
        (sub_along, sub_line): (u32, u32),
    ) {
        let (dim, lines) = match self.axis {
            Axis::Horizontal => (self.clip.width as i32, self.clip.height as i32),
            Axis::Vertical => (self.clip.height as i32, self.clip.width as i32),
        };
        let at = |along: i32, line: i32| match self.axis {
            Axis::Horizontal => (along as isize, line as isize),
            Axis::Vertical => (line as isize, along as isize),
        };
        let center = dim / 2;
        let (mask_along, mask_line) = ((1i32 << sub_along) - 1, (1i32 << sub_line) - 1);
        let mut put = |d: i32, line: i32, value: T| {
            let (x, y) = at(d, line);
            if dst.contains(x, y) {
                dst.set(x as usize, y as usize, value);
            }
        };

        let subsampled = sub_along | sub_line != 0;
        for line in 0..lines {
            if subsampled && line & mask_line != 0 {
                continue;
            }
            let radius = line_radius(top, base, line, lines);
            for (w, tap) in wrap_taps(radius, dim, &self.table).iter().enumerate() {
                let w = w as i32;
                if !subsampled {
                    let (x, y) = at(center + tap.near, line);
                    put(center + w, line, rs.along_line_dir(src, x, y, self.axis, tap.q, 1));
                    let (x, y) = at(center - tap.near, line);
                    put(center - w, line, rs.along_line_dir(src, x, y, self.axis, tap.q, -1));
                } else if w & mask_along == 0 {
                    let l = line >> sub_line;
                    for sign in [1, -1] {
                        let (x, y) = at((center + sign * tap.near) >> sub_along, l);
                        put((center + sign * w) >> sub_along, l, nearest(src, x, y));
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WrapTap {
    near: i32,
    q: usize,
}

/// Half the diameter at `line`, interpolated from `top` at line 0 towards
/// `base`.
fn line_radius(top: i32, base: i32, line: i32, lines: i32) -> i32 {
    (base - (base - top) * (lines - line) / lines) / 2
}

/// Source offsets from the centre line for destination offsets
/// `0..radius`.
fn wrap_taps(radius: i32, dim: i32, table: &CoefficientTable) -> Vec<WrapTap> {
    let r = radius.max(1) as f64;
    (0..radius.max(0))
        .map(|w| {
            let s = dim as f64 * (w as f64 / r).asin() / PI;
            let near = s.floor();
            WrapTap {
                near: near as i32,
                q: table.quantize((s - near) as f32),
            }
        })
        .collect()
}

impl FrameFilter for Cone {
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
        let diameters = self.diameters_at(n);
        let format = src.format();
        for (p, (out, inp)) in dst.planes_mut().iter_mut().zip(src.planes()).enumerate() {
            let pf = format.plane(p);
            let subs = match self.axis {
                Axis::Horizontal => (pf.sub_sampling_w, pf.sub_sampling_h),
                Axis::Vertical => (pf.sub_sampling_h, pf.sub_sampling_w),
            };
            let rs = Resampler::new(&self.table, pf.range());
            self.render_plane(out, inp, &rs, diameters, subs);
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
            let data = (0..ph).flat_map(|_| (0..pw).map(|x| (x * 3 + 20) as u8)).collect();
            *plane = Plane::from_data(pw, ph, pw as usize, data).unwrap();
        }
        frame
    }

    fn fixed(top: i32, base: i32) -> ConeParams {
        ConeParams {
            progressive: false,
            top: Some(top),
            base: Some(base),
            ..ConeParams::default()
        }
    }

    #[test]
    fn test_wrap_taps() {
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let taps = wrap_taps(16, 64, &table);
        assert_eq!(taps.len(), 16);
        assert_eq!(taps[0], WrapTap { near: 0, q: 0 });
        let pos: Vec<f64> = taps.iter().map(|t| t.near as f64 + t.q as f64 / 64.0).collect();
        assert!(pos.windows(2).all(|p| p[1] > p[0]));
        // The rim approaches, but never reaches, half the line
        assert!(taps[15].near < 32);
        assert!(taps[15].near >= 20);
        // w = r/2: asin(1/2) = π/6, so s = dim/6
        let mid = pos[8];
        assert!((mid - 64.0 / 6.0).abs() < 1.0 / 32.0, "{mid}");
    }

    #[test]
    fn test_line_radius() {
        // First line uses the top diameter, last line nearly the base
        assert_eq!(line_radius(20, 100, 0, 10), 10);
        assert_eq!(line_radius(20, 100, 5, 10), 30);
        assert_eq!(line_radius(20, 100, 9, 10), 46);
    }

    #[test]
    fn test_defaults_and_schedule() {
        let clip = ClipInfo::new(VideoFormat::rgb24(), 320, 240, 10);
        // limit = 312 / (π/2) = 198
        let cone = Cone::new(&ConeParams::default(), &clip).unwrap();
        assert_eq!(cone.diameters_at(0), (320, 320));
        // 320 + (24 - 320) * 5 / 10, 320 + (198 - 320) * 5 / 10
        assert_eq!(cone.diameters_at(5), (172, 259));

        let fixed_cone = Cone::new(&fixed(30, 150), &clip).unwrap();
        assert_eq!(fixed_cone.diameters_at(0), (30, 150));
        assert_eq!(fixed_cone.diameters_at(9), (30, 150));

        let horizontal = ConeParams {
            vertical: false,
            progressive: false,
            ..ConeParams::default()
        };
        // limit = 232 / (π/2) = 147
        let cone = Cone::new(&horizontal, &clip).unwrap();
        assert_eq!(cone.diameters_at(3), (18, 147));
    }

    #[test]
    fn test_validation() {
        let clip = ClipInfo::new(VideoFormat::rgb24(), 320, 240, 10);
        for params in [fixed(3, 100), fixed(20, 199), fixed(20, 7)] {
            let err = Cone::new(&params, &clip).unwrap_err();
            assert!(err.is_configuration(), "{err}");
        }
        // limit 5 leaves no legal base
        let tiny = ClipInfo::new(VideoFormat::rgb24(), 16, 16, 1);
        assert!(Cone::new(&ConeParams::default(), &tiny).is_err());
    }

    #[test]
    fn test_vertical_cone_over_background() {
        let clip = ClipInfo::new(VideoFormat::gray8(), 64, 8, 1);
        let src = ramp_frame(clip.format, 64, 8);
        let bg: Frame<u8> = Frame::new(clip.format, 64, 8).unwrap();
        let cone = Cone::new(&fixed(32, 32), &clip).unwrap();
        let out = cone.render_over(0, &src, &bg);
        let (o, s) = (out.plane(0), src.plane(0));
        for y in 0..8 {
            // Centre column is the source centre
            assert_eq!(o.get(32, y), s.get(32, y));
            // Radius 16: columns 17..=47 are covered, the rest keep the background
            assert_eq!(o.get(16, y), 0);
            assert_eq!(o.get(48, y), 0);
            assert_ne!(o.get(17, y), 0);
            assert_ne!(o.get(47, y), 0);
            // Both halves mirror the ramp about the centre
            for w in 1..16 {
                let sum = o.get(32 + w, y) as i32 + o.get(32 - w, y) as i32;
                assert!((sum - 2 * s.get(32, y) as i32).abs() <= 1, "w = {w}");
                assert!(o.get(32 + w, y) > o.get(32 + w - 1, y));
            }
        }
    }

    #[test]
    fn test_horizontal_cone() {
        let clip = ClipInfo::new(VideoFormat::gray8(), 8, 64, 1);
        let mut src: Frame<u8> = Frame::new(clip.format, 8, 64).unwrap();
        let data = (0..64u32).flat_map(|y| (0..8).map(move |_| (y * 3 + 20) as u8)).collect();
        *src.plane_mut(0) = Plane::from_data(8, 64, 8, data).unwrap();
        let bg: Frame<u8> = Frame::new(clip.format, 8, 64).unwrap();
        let params = ConeParams {
            vertical: false,
            ..fixed(32, 32)
        };
        let cone = Cone::new(&params, &clip).unwrap();
        let out = cone.render_over(0, &src, &bg);
        assert_eq!(out.plane(0).get(3, 32), src.plane(0).get(3, 32));
        assert_eq!(out.plane(0).get(3, 16), 0);
        assert!(out.plane(0).get(3, 40) > out.plane(0).get(3, 32));
    }

    #[test]
    fn test_subsampled_chroma_nearest() {
        let clip = ClipInfo::new(VideoFormat::yuv420p8(), 64, 8, 1);
        let src = ramp_frame(clip.format, 64, 8);
        let bg: Frame<u8> = Frame::new(clip.format, 64, 8).unwrap();
        let cone = Cone::new(&fixed(32, 32), &clip).unwrap();
        let out = cone.render_over(0, &src, &bg);
        // Chroma centre column shows the source chroma centre
        assert_eq!(out.plane(1).get(16, 2), src.plane(1).get(16, 2));
        // Beyond the cone the background stays
        assert_eq!(out.plane(1).get(4, 2), 0);
    }
}
