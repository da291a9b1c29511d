//! Rear-view mirror: the frame as seen in a convex fisheye mirror.
//!
//! The mirror is an oval or rectangle placed anywhere in the frame. Inside
//! it the source, centred on the frame centre, is compressed by a fisheye
//! projection so that a wide field of view fits the mirror. A border of
//! fill colour frames the mirror, and everything outside it shows the
//! background clip.
//!
//! The mapping is a [`GeometryTable`] built once. Rendering fans each
//! quadrant entry out to four destination pixels with a [`Replicator`]
//! around the mirror centre; the source taps of mirrored images are walked
//! in the matching direction around the frame centre.
//!
//! # Test mode
//!
//! To help choose the parameters, test mode shows the dimmed source with
//! white dots marking where a regular grid of mirror pixels samples from.
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{ClipInfo, Frame, VideoFormat};
//! use warpfx_ops::filters::{FrameFilter, RearViewMirror, RearViewMirrorParams};
//!
//! let clip = ClipInfo::new(VideoFormat::rgb24(), 640, 480, 100);
//! let mirror = RearViewMirror::new(&RearViewMirrorParams::default(), &clip).unwrap();
//!
//! let src: Frame<u8> = Frame::new(clip.format, 640, 480).unwrap();
//! let out = mirror.render(10, &src);
//! assert_eq!(out.dimensions(), (640, 480));
//! ```

use super::{check_clip, fill_values, FrameFilter};
use crate::error::check_range;
use crate::geometry::{Entry, GeometryParams, GeometryTable, MirrorShape, GEOMETRY_QUANTILES};
use crate::schedule::{FrameRange, Point};
use crate::symmetry::Replicator;
use crate::{OpsError, OpsResult};
use tracing::debug;
use warpfx_core::{ClipInfo, Frame, Plane, PlaneFormat, Sample};
use warpfx_math::{nearest, CoefficientTable, Kernel, Projection, Resampler};

const NAME: &str = "RearViewMirror";
const MIN_SIZE: u32 = 40;

/// Test mode settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MirrorTestMode {
    /// Dot density, 1 (sparse) ..= 4 (dense)
    pub dots: u32,
    /// How much to darken the source, 0..=1
    pub dim: f32,
}

impl Default for MirrorTestMode {
    fn default() -> Self {
        Self { dots: 2, dim: 0.25 }
    }
}

impl MirrorTestMode {
    /// Spacing of dots in table cells.
    pub fn spacing(&self) -> u32 {
        (5 - self.dots) * 16
    }
}

/// Rear-view mirror parameters. Unset values default from the clip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RearViewMirrorParams {
    /// First active frame (default 0)
    pub start_frame: Option<u32>,
    /// Last active frame (default last frame)
    pub end_frame: Option<u32>,
    /// Mirror centre (default frame centre)
    pub center: Option<Point>,
    /// Mirror width, at least 40 (default a quarter of the frame width)
    pub width: Option<u32>,
    /// Mirror height, at least 40 (default a quarter of the frame height)
    pub height: Option<u32>,
    /// Oval mirror; `false` for a rectangle
    pub oval: bool,
    /// Border width, 0..=30
    pub border: u32,
    /// Fisheye mapping
    pub projection: Projection,
    /// Field of view in degrees, 20..=170
    pub fov: f64,
    /// Convexity, 1.0..=1.5
    pub convexity: f64,
    /// Interpolation kernel
    pub kernel: Kernel,
    /// Border colour as native per-plane values (default black)
    pub border_color: Option<Vec<f32>>,
    /// Show the sampling pattern instead of the mirror
    pub test: Option<MirrorTestMode>,
}

impl Default for RearViewMirrorParams {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            center: None,
            width: None,
            height: None,
            oval: true,
            border: 5,
            projection: Projection::Equidistant,
            fov: 120.0,
            convexity: 1.15,
            kernel: Kernel::Cubic,
            border_color: None,
            test: None,
        }
    }
}

/// Rear-view mirror filter.
#[derive(Debug, Clone)]
pub struct RearViewMirror {
    clip: ClipInfo,
    range: FrameRange,
    center: Point,
    source_center: Point,
    geometry: GeometryTable,
    table: CoefficientTable,
    fill: Vec<f32>,
    test: Option<MirrorTestMode>,
}

impl RearViewMirror {
    /// Validates `params` against `clip` and builds the mirror tables.
    ///
    /// # Errors
    ///
    /// [`OpsError::Configuration`] when a parameter is out of range or the
    /// mirror does not fit in the frame, [`OpsError::Geometry`] when the
    /// field of view needs more of the source than the frame holds.
    pub fn new(params: &RearViewMirrorParams, clip: &ClipInfo) -> OpsResult<Self> {
        check_clip(NAME, clip)?;
        let range = FrameRange::resolve(NAME, params.start_frame, params.end_frame, clip)?;
        let (fw, fh) = (clip.width, clip.height);

        let width = params.width.unwrap_or(fw / 4);
        let height = params.height.unwrap_or(fh / 4);
        check_range(NAME, "width", width, MIN_SIZE, fw)?;
        check_range(NAME, "height", height, MIN_SIZE, fh)?;
        check_range(NAME, "border", params.border, 0, 30)?;
        check_range(NAME, "fov", params.fov, 20.0, 170.0)?;
        check_range(NAME, "convexity", params.convexity, 1.0, 1.5)?;

        let (cx, cy) = clip.center();
        let center = params.center.unwrap_or(Point::new(cx as i32, cy as i32));
        let reach_x = (width / 2 + params.border) as i32;
        let reach_y = (height / 2 + params.border) as i32;
        if center.x - reach_x < 0
            || center.x + reach_x >= fw as i32
            || center.y - reach_y < 0
            || center.y + reach_y >= fh as i32
        {
            return Err(OpsError::config(
                NAME,
                format!(
                    "{width}x{height} mirror, border {}, at ({}, {}) exceeds the {fw}x{fh} frame",
                    params.border, center.x, center.y
                ),
            ));
        }

        let test = params.test;
        if let Some(t) = test {
            check_range(NAME, "dots", t.dots, 1, 4)?;
            check_range(NAME, "dim", t.dim, 0.0, 1.0)?;
        }
        let fill = fill_values(NAME, clip.format, params.border_color.as_deref())?;

        let geometry_params = GeometryParams {
            shape: if params.oval {
                MirrorShape::Oval
            } else {
                MirrorShape::Rectangle
            },
            width,
            height,
            border: params.border,
            projection: params.projection,
            fov: params.fov,
            convexity: params.convexity,
        };
        let geometry = GeometryTable::build(&geometry_params, fw, fh).map_err(|e| match e {
            OpsError::Geometry { message, .. } => OpsError::geometry(NAME, message),
            other => other,
        })?;

        debug!(
            ?range,
            width,
            height,
            oval = params.oval,
            projection = ?params.projection,
            kernel = params.kernel.name(),
            output_radius = geometry.output_radius(),
            test = test.is_some(),
            "Created RearViewMirror"
        );
        Ok(Self {
            clip: *clip,
            range,
            center,
            source_center: Point::new(cx as i32, cy as i32),
            geometry,
            table: CoefficientTable::build(params.kernel, GEOMETRY_QUANTILES),
            fill,
            test,
        })
    }

    /// Quadrant geometry in use.
    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    /// Mirror centre in frame coordinates.
    pub fn center(&self) -> Point {
        self.center
    }

    fn render_mirror<T: Sample>(&self, src: &Frame<T>, background: &Frame<T>) -> Frame<T> {
        let mut dst = background.clone();
        let format = src.format();
        for (p, out) in dst.planes_mut().iter_mut().enumerate() {
            let pf = format.plane(p);
            let inp = src.plane(p);
            let (ssw, ssh) = pf.sub_sampling();
            let rs = Resampler::new(&self.table, pf.range());
            let fill = T::from_f32(self.fill[p], pf.range());
            let (sx, sy) = Replicator::new(self.source_center, (ssw, ssh)).center();

            let replicator = Replicator::new(self.center, (ssw, ssh));
            replicator.apply(out, &self.geometry, |entry, m| match entry {
                Entry::OutOfField => None,
                Entry::Border => Some(fill),
                Entry::Mapped { x, y, .. } if pf.is_subsampled() => Some(nearest(
                    inp,
                    sx + m.dx * (x >> ssw) as isize,
                    sy + m.dy * (y >> ssh) as isize,
                )),
                Entry::Mapped { x, y, qx, qy } => Some(rs.sample_mirrored(
                    inp,
                    sx + m.dx * x as isize,
                    sy + m.dy * y as isize,
                    qx as usize,
                    qy as usize,
                    m.dx,
                    m.dy,
                )),
            });
        }
        dst
    }

    fn render_test<T: Sample>(&self, src: &Frame<T>, mode: MirrorTestMode) -> Frame<T> {
        let mut dst = src.clone();
        let format = src.format();
        let keep = 1.0 - mode.dim;
        let spacing = mode.spacing();

        for (p, plane) in dst.planes_mut().iter_mut().enumerate() {
            let pf = format.plane(p);
            if !pf.is_chroma() {
                dim_plane(plane, &pf, keep);
            }
            let (ssw, ssh) = pf.sub_sampling();
            let white = T::from_f32(pf.white(), pf.range());
            let source = Replicator::new(self.source_center, (ssw, ssh));
            let side = self.geometry.side();
            for h in (spacing / 2..side).step_by(spacing as usize) {
                for w in (spacing / 2..side).step_by(spacing as usize) {
                    if let Entry::Mapped { x, y, .. } = self.geometry.get(w, h) {
                        source.paint(plane, (x >> ssw) as usize, (y >> ssh) as usize, white);
                    }
                }
            }
        }
        dst
    }
}

/// Scales a plane towards its floor value, keeping `keep` of the distance.
fn dim_plane<T: Sample>(plane: &mut Plane<T>, pf: &PlaneFormat, keep: f32) {
    let range = pf.range();
    let floor = range.min;
    plane.map_samples(|v| T::from_f32(floor + (v.to_f32() - floor) * keep, range));
}

impl FrameFilter for RearViewMirror {
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
        match self.test {
            Some(mode) => self.render_test(src, mode),
            None => self.render_mirror(src, background),
        }
    }
}
