//! Disc magnification shared by the lens family.
//!
//! A destination pixel at distance `r` from the disc centre `c` shows the
//! source at `c + (p - c) / m`. With drop enabled the magnification falls
//! from the centre to the rim as `m(r) = mag * (1 + r²/R²) / 2`, like a
//! water drop. Full-resolution planes are interpolated through the
//! coefficient table; subsampled planes take the nearest co-sited sample at
//! aligned positions only.

use crate::schedule::Point;
use warpfx_core::{Frame, Plane, Sample};
use warpfx_math::{nearest, CoefficientTable, Resampler};

/// One magnifying disc.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Disc {
    pub center: Point,
    pub radius: i32,
    pub mag: f32,
    pub drop: bool,
}

impl Disc {
    /// Source position shown at `(w, h)`, or `None` outside the disc.
    fn source(&self, w: i32, h: i32) -> Option<(f32, f32)> {
        let (dx, dy) = (w - self.center.x, h - self.center.y);
        let d2 = dx as i64 * dx as i64 + dy as i64 * dy as i64;
        let r2 = self.radius as i64 * self.radius as i64;
        if d2 > r2 || r2 == 0 {
            return None;
        }
        let m = if self.drop {
            self.mag * (1.0 + d2 as f32 / r2 as f32) / 2.0
        } else {
            self.mag
        };
        Some((
            self.center.x as f32 + dx as f32 / m,
            self.center.y as f32 + dy as f32 / m,
        ))
    }

    /// Destination bounding box clipped to a `width` x `height` frame,
    /// as inclusive `(x0, y0, x1, y1)`.
    fn bounds(&self, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
        let (wd, ht) = (width as i32, height as i32);
        let x0 = (self.center.x - self.radius).max(0);
        let y0 = (self.center.y - self.radius).max(0);
        let x1 = (self.center.x + self.radius).min(wd - 1);
        let y1 = (self.center.y + self.radius).min(ht - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

/// Renders `disc` from `src` into `dst`, once per horizontal shift in
/// `shifts`.
///
/// Source positions outside the frame are skipped, as are shifted
/// destinations that leave the frame.
pub(crate) fn magnify_disc<T: Sample>(
    dst: &mut Frame<T>,
    src: &Frame<T>,
    table: &CoefficientTable,
    disc: &Disc,
    shifts: &[i32],
    flat_skip: bool,
) {
    let (width, height) = src.dimensions();
    let Some((x0, y0, x1, y1)) = disc.bounds(width, height) else {
        return;
    };
    let format = src.format();

    for (p, (out, inp)) in dst.planes_mut().iter_mut().zip(src.planes()).enumerate() {
        let pf = format.plane(p);
        let (ssw, ssh) = pf.sub_sampling();
        let rs = Resampler::new(table, pf.range()).with_flat_skip(flat_skip);

        for h in y0..=y1 {
            if !pf.is_aligned(0, h as usize) {
                continue;
            }
            for w in x0..=x1 {
                if !pf.is_aligned(w as usize, 0) {
                    continue;
                }
                let Some((fx, fy)) = disc.source(w, h) else {
                    continue;
                };
                let (ix, iy) = (fx.floor() as i32, fy.floor() as i32);
                if ix < 0 || iy < 0 || ix >= width as i32 || iy >= height as i32 {
                    continue;
                }
                let value = if pf.is_subsampled() {
                    nearest(inp, (ix >> ssw) as isize, (iy >> ssh) as isize)
                } else {
                    rs.sample_at(inp, fx, fy)
                };
                for &shift in shifts {
                    let x = w + shift;
                    if x < 0 || x >= width as i32 {
                        continue;
                    }
                    write(out, (x >> ssw) as isize, (h >> ssh) as isize, value);
                }
            }
        }
    }
}

#[inline]
fn write<T: Sample>(plane: &mut Plane<T>, x: isize, y: isize, value: T) {
    if plane.contains(x, y) {
        plane.set(x as usize, y as usize, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use warpfx_core::VideoFormat;
    use warpfx_math::Kernel;

    fn disc(mag: f32, drop: bool) -> Disc {
        Disc {
            center: Point::new(20, 20),
            radius: 10,
            mag,
            drop,
        }
    }

    #[test]
    fn test_source_uniform() {
        let d = disc(2.0, false);
        assert_eq!(d.source(20, 20), Some((20.0, 20.0)));
        let (x, y) = d.source(30, 20).unwrap();
        assert_abs_diff_eq!(x, 25.0);
        assert_abs_diff_eq!(y, 20.0);
        assert_eq!(d.source(31, 20), None);
    }

    #[test]
    fn test_source_drop() {
        let d = disc(4.0, true);
        // Rim: full magnification 4
        let (x, _) = d.source(30, 20).unwrap();
        assert_abs_diff_eq!(x, 22.5);
        // Half way: 4 * 1.25 / 2 = 2.5
        let (x, _) = d.source(25, 20).unwrap();
        assert_abs_diff_eq!(x, 22.0);
    }

    #[test]
    fn test_bounds_clipped() {
        let d = Disc {
            center: Point::new(3, 50),
            ..disc(2.0, false)
        };
        assert_eq!(d.bounds(40, 55), Some((0, 40, 13, 54)));
    }

    #[test]
    fn test_flat_frame_unchanged() {
        let src: Frame<u8> = Frame::black(VideoFormat::yuv420p8(), 40, 40).unwrap();
        let mut dst = src.clone();
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        magnify_disc(&mut dst, &src, &table, &disc(3.0, true), &[0], false);
        assert_eq!(dst.planes(), src.planes());
    }

    #[test]
    fn test_centre_pixel_preserved() {
        let mut src: Frame<u16> = Frame::new(VideoFormat::gray16(), 40, 40).unwrap();
        let data: Vec<u16> = (0..1600).map(|i| (i * 37 % 4096) as u16).collect();
        *src.plane_mut(0) = Plane::from_data(40, 40, 40, data).unwrap();
        let mut dst = src.clone();
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        magnify_disc(&mut dst, &src, &table, &disc(2.0, false), &[0], false);
        assert_eq!(dst.plane(0).get(20, 20), src.plane(0).get(20, 20));
        assert_ne!(dst.plane(0), src.plane(0));
    }

    #[test]
    fn test_shifted_copies() {
        let mut src: Frame<u8> = Frame::new(VideoFormat::gray8(), 60, 30).unwrap();
        src.plane_mut(0).set(30, 15, 200);
        let mut dst = src.clone();
        dst.plane_mut(0).fill(0);
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let d = Disc {
            center: Point::new(30, 15),
            radius: 5,
            mag: 2.0,
            drop: false,
        };
        magnify_disc(&mut dst, &src, &table, &d, &[-10, 10], false);
        assert_eq!(dst.plane(0).get(20, 15), 200);
        assert_eq!(dst.plane(0).get(40, 15), 200);
        assert_eq!(dst.plane(0).get(30, 15), 0);
    }
}
