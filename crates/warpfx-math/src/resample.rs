//! Sub-pixel sampling from a plane through a [`CoefficientTable`].
//!
//! A [`Resampler`] pairs a coefficient table with the clamp range of the
//! plane it reads. Given an integer floor coordinate and a pair of quantiles
//! it gathers `span x span` samples and sums them separably: each tap row is
//! reduced horizontally first, then the row sums are combined vertically.
//! The result is clamped into the plane's range and converted back to the
//! plane's sample type.
//!
//! # Directions
//!
//! Symmetry replication renders mirrored quadrants from one quadrant table.
//! In a mirrored quadrant the fractional offset points the other way, so
//! [`Resampler::sample_mirrored`] walks the taps in direction `-1` on the
//! mirrored axis while using the same weight row. On a mirror-symmetric
//! image this reproduces the unmirrored result bit for bit.
//!
//! # Edges
//!
//! [`Resampler::sample`] requires every tap to lie inside the plane. The
//! `*_clamped` and mirrored variants check with [`Resampler::fits`] first
//! and fall back to the floor sample (clamped into the plane) when a tap
//! would fall outside.
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{Plane, SampleRange};
//! use warpfx_math::{CoefficientTable, Kernel, Resampler};
//!
//! let data: Vec<u8> = (0..64).map(|i| (i % 8) as u8 * 10).collect();
//! let plane = Plane::from_data(8, 8, 8, data).unwrap();
//! let table = CoefficientTable::build(Kernel::Linear, 4);
//! let rs = Resampler::new(&table, SampleRange::new(0.0, 255.0));
//!
//! assert_eq!(rs.sample(&plane, 2, 3, 0, 0), 20);
//! assert_eq!(rs.sample(&plane, 2, 3, 2, 0), 25);
//! assert_eq!(rs.sample(&plane, 2, 3, 4, 0), 30);
//! ```

use crate::coeff::CoefficientTable;
use warpfx_core::{Plane, Sample, SampleRange};

/// Axis of a one-dimensional sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Along a row.
    #[default]
    Horizontal,
    /// Along a column.
    Vertical,
}

/// Samples one plane through a coefficient table.
#[derive(Debug, Clone, Copy)]
pub struct Resampler<'a> {
    table: &'a CoefficientTable,
    range: SampleRange,
    flat_skip: bool,
}

impl<'a> Resampler<'a> {
    /// Creates a resampler writing values clamped into `range`.
    pub fn new(table: &'a CoefficientTable, range: SampleRange) -> Self {
        Self {
            table,
            range,
            flat_skip: false,
        }
    }

    /// Returns the floor sample unchanged when its 2x2 neighbourhood is flat.
    pub fn with_flat_skip(mut self, enabled: bool) -> Self {
        self.flat_skip = enabled;
        self
    }

    /// Coefficient table in use.
    #[inline]
    pub fn table(&self) -> &CoefficientTable {
        self.table
    }

    /// Clamp range in use.
    #[inline]
    pub fn range(&self) -> SampleRange {
        self.range
    }

    /// Whether all taps around `(x, y)` lie inside `plane`.
    #[inline]
    pub fn fits<T: Sample>(&self, plane: &Plane<T>, x: isize, y: isize) -> bool {
        self.fits_dir(plane, x, y, 1, 1)
    }

    /// Whether all taps around `(x, y)` walked in direction `(dx, dy)` lie
    /// inside `plane`.
    pub fn fits_dir<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        dx: isize,
        dy: isize,
    ) -> bool {
        let (lo, hi) = (self.table.first_offset(), self.table.last_offset());
        let span_fits = |c: isize, d: isize, len: u32| {
            let (a, b) = (c + d * lo, c + d * hi);
            a.min(b) >= 0 && a.max(b) < len as isize
        };
        span_fits(x, dx, plane.width()) && span_fits(y, dy, plane.height())
    }

    /// Interpolated value at floor `(x, y)` with quantiles `(qx, qy)`.
    ///
    /// # Panics
    ///
    /// Panics if a tap falls outside the plane; check with [`fits`](Self::fits)
    /// or use [`sample_clamped`](Self::sample_clamped).
    pub fn sample<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: usize,
        y: usize,
        qx: usize,
        qy: usize,
    ) -> T {
        self.gather(plane, x as isize, y as isize, qx, qy, 1, 1)
    }

    /// Like [`sample`](Self::sample), falling back to the nearest sample
    /// when the taps do not fit.
    pub fn sample_clamped<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        qx: usize,
        qy: usize,
    ) -> T {
        self.sample_mirrored(plane, x, y, qx, qy, 1, 1)
    }

    /// Interpolated value with taps walked in direction `(dx, dy)`.
    ///
    /// `dx` and `dy` are `1` or `-1`. Falls back to the nearest sample when
    /// the taps do not fit.
    #[allow(clippy::too_many_arguments)]
    pub fn sample_mirrored<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        qx: usize,
        qy: usize,
        dx: isize,
        dy: isize,
    ) -> T {
        if self.fits_dir(plane, x, y, dx, dy) {
            self.gather(plane, x, y, qx, qy, dx, dy)
        } else {
            nearest(plane, x, y)
        }
    }

    /// Interpolated value at a real coordinate.
    ///
    /// The coordinate is split into floor and fraction, the fraction
    /// quantized to `floor(frac * Q)`.
    pub fn sample_at<T: Sample>(&self, plane: &Plane<T>, fx: f32, fy: f32) -> T {
        let (x, y) = (fx.floor(), fy.floor());
        let qx = self.table.quantize(fx - x);
        let qy = self.table.quantize(fy - y);
        self.sample_clamped(plane, x as isize, y as isize, qx, qy)
    }

    /// One-dimensional interpolation along `axis` at floor `(x, y)`.
    ///
    /// Falls back to the nearest sample when the taps do not fit.
    pub fn along_line<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        axis: Axis,
        q: usize,
    ) -> T {
        self.along_line_dir(plane, x, y, axis, q, 1)
    }

    /// Like [`along_line`](Self::along_line) with taps walked in direction
    /// `dir` (`1` or `-1`), so that `q` measures the fraction towards lower
    /// coordinates when `dir` is `-1`.
    pub fn along_line_dir<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        axis: Axis,
        q: usize,
        dir: isize,
    ) -> T {
        let (step_x, step_y) = match axis {
            Axis::Horizontal => (dir, 0),
            Axis::Vertical => (0, dir),
        };
        let lo = self.table.first_offset();
        let hi = self.table.last_offset();
        let fits = plane.contains(x + step_x * lo, y + step_y * lo)
            && plane.contains(x + step_x * hi, y + step_y * hi);
        if !fits {
            return nearest(plane, x, y);
        }

        let row = self.table.row(q);
        let mut sum = 0.0f32;
        for (i, &w) in row.iter().enumerate() {
            let o = lo + i as isize;
            let v = plane.get((x + step_x * o) as usize, (y + step_y * o) as usize);
            sum += w * v.to_f32();
        }
        T::from_f32(sum, self.range)
    }

    #[allow(clippy::too_many_arguments)]
    fn gather<T: Sample>(
        &self,
        plane: &Plane<T>,
        x: isize,
        y: isize,
        qx: usize,
        qy: usize,
        dx: isize,
        dy: isize,
    ) -> T {
        if self.flat_skip && is_flat(plane, x, y, dx, dy) {
            return plane.get(x as usize, y as usize);
        }

        let wx = self.table.row(qx);
        let wy = self.table.row(qy);
        let lo = self.table.first_offset();
        let mut sum = 0.0f32;
        for (j, &wj) in wy.iter().enumerate() {
            let sy = (y + dy * (lo + j as isize)) as usize;
            let mut partial = 0.0f32;
            for (i, &wi) in wx.iter().enumerate() {
                let sx = (x + dx * (lo + i as isize)) as usize;
                partial += wi * plane.get(sx, sy).to_f32();
            }
            sum += wj * partial;
        }
        T::from_f32(sum, self.range)
    }
}

/// Floor sample at `(x, y)`, clamped into the plane.
#[inline]
pub fn nearest<T: Sample>(plane: &Plane<T>, x: isize, y: isize) -> T {
    let cx = x.clamp(0, plane.width() as isize - 1) as usize;
    let cy = y.clamp(0, plane.height() as isize - 1) as usize;
    plane.get(cx, cy)
}

fn is_flat<T: Sample>(plane: &Plane<T>, x: isize, y: isize, dx: isize, dy: isize) -> bool {
    let (nx, ny) = (x + dx, y + dy);
    if !plane.contains(x, y) || !plane.contains(nx, ny) {
        return false;
    }
    let (x, y, nx, ny) = (x as usize, y as usize, nx as usize, ny as usize);
    let v = plane.get(x, y);
    plane.get(nx, y) == v && plane.get(x, ny) == v && plane.get(nx, ny) == v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeff::Kernel;

    fn ramp(w: u32, h: u32) -> Plane<u8> {
        let data = (0..h).flat_map(|y| (0..w).map(move |x| (x * 10 + y) as u8)).collect();
        Plane::from_data(w, h, w as usize, data).unwrap()
    }

    const FULL8: SampleRange = SampleRange::new(0.0, 255.0);

    #[test]
    fn test_anchor_quantiles() {
        let plane = ramp(10, 10);
        for kernel in [Kernel::Linear, Kernel::Cubic, Kernel::Lanczos4, Kernel::Lanczos6] {
            let table = CoefficientTable::build(kernel, 64);
            let rs = Resampler::new(&table, FULL8);
            assert_eq!(rs.sample(&plane, 4, 4, 0, 0), plane.get(4, 4));
            assert_eq!(rs.sample(&plane, 4, 4, 64, 0), plane.get(5, 4));
            assert_eq!(rs.sample(&plane, 4, 4, 0, 64), plane.get(4, 5));
            assert_eq!(rs.sample(&plane, 4, 4, 64, 64), plane.get(5, 5));
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let plane = ramp(10, 10);
        let table = CoefficientTable::build(Kernel::Linear, 2);
        let rs = Resampler::new(&table, FULL8);
        // (30+40)/2 with y = 0
        assert_eq!(rs.sample(&plane, 3, 0, 1, 0), 35);
    }

    #[test]
    fn test_cubic_reproduces_linear_ramp() {
        let plane = ramp(10, 10);
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let rs = Resampler::new(&table, FULL8);
        // Catmull-Rom is exact on linear data
        assert_eq!(rs.sample(&plane, 4, 2, 32, 0), 47);
    }

    #[test]
    fn test_clamped_to_range() {
        let mut plane: Plane<u8> = Plane::filled(8, 8, 20);
        plane.set(4, 4, 235);
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let rs = Resampler::new(&table, SampleRange::new(16.0, 235.0));
        // Cubic undershoots near the spike; the result stays legal
        let v = rs.sample(&plane, 5, 4, 32, 0);
        assert!(v >= 16);
    }

    #[test]
    fn test_fits() {
        let plane = ramp(8, 8);
        let table = CoefficientTable::build(Kernel::Cubic, 16);
        let rs = Resampler::new(&table, FULL8);
        assert!(rs.fits(&plane, 1, 1));
        assert!(!rs.fits(&plane, 0, 1));
        assert!(rs.fits(&plane, 5, 5));
        assert!(!rs.fits(&plane, 6, 5));
        // Mirrored taps extend the other way
        assert!(rs.fits_dir(&plane, 6, 5, -1, 1));
        assert!(!rs.fits_dir(&plane, 1, 1, -1, 1));
    }

    #[test]
    fn test_sample_clamped_edge_fallback() {
        let plane = ramp(8, 8);
        let table = CoefficientTable::build(Kernel::Cubic, 16);
        let rs = Resampler::new(&table, FULL8);
        assert_eq!(rs.sample_clamped(&plane, 0, 0, 8, 8), plane.get(0, 0));
        assert_eq!(rs.sample_clamped(&plane, 9, -3, 8, 8), plane.get(7, 0));
    }

    #[test]
    fn test_mirrored_matches_on_symmetric_plane() {
        // Symmetric about x = 8: value(8 + k) == value(8 - k)
        let w = 17u32;
        let data: Vec<f32> = (0..w * 7)
            .map(|i| {
                let x = (i % w) as i32;
                ((x - 8).abs() as f32).sqrt() * 0.1
            })
            .collect();
        let plane = Plane::from_data(w, 7, w as usize, data).unwrap();
        let table = CoefficientTable::build(Kernel::Lanczos6, 64);
        let rs = Resampler::new(&table, SampleRange::new(0.0, 1.0));
        for k in 0..4 {
            for q in [0, 13, 32, 50, 64] {
                let right = rs.sample_mirrored(&plane, 8 + k, 3, q, 0, 1, 1);
                let left = rs.sample_mirrored(&plane, 8 - k, 3, q, 0, -1, 1);
                assert_eq!(right, left);
            }
        }
    }

    #[test]
    fn test_sample_at() {
        let plane = ramp(10, 10);
        let table = CoefficientTable::build(Kernel::Linear, 64);
        let rs = Resampler::new(&table, FULL8);
        assert_eq!(rs.sample_at(&plane, 3.5, 0.0), 35);
        assert_eq!(rs.sample_at(&plane, 3.0, 2.0), 32);
    }

    #[test]
    fn test_along_line() {
        let plane = ramp(10, 10);
        let table = CoefficientTable::build(Kernel::Linear, 4);
        let rs = Resampler::new(&table, FULL8);
        assert_eq!(rs.along_line(&plane, 2, 2, Axis::Horizontal, 2), 27);
        assert_eq!(rs.along_line(&plane, 2, 2, Axis::Vertical, 2), 23);
        // Right edge: nearest
        assert_eq!(rs.along_line(&plane, 9, 2, Axis::Horizontal, 2), plane.get(9, 2));
    }

    #[test]
    fn test_along_line_reversed() {
        let plane = ramp(10, 10);
        let table = CoefficientTable::build(Kernel::Linear, 4);
        let rs = Resampler::new(&table, FULL8);
        // Halfway from (5, 2) towards (4, 2): (52 + 42) / 2
        assert_eq!(rs.along_line_dir(&plane, 5, 2, Axis::Horizontal, 2, -1), 47);
        // The full quantile lands on the next sample upwards
        assert_eq!(rs.along_line_dir(&plane, 5, 2, Axis::Vertical, 4, -1), 51);
        // q = 0 is the floor sample in either direction
        assert_eq!(rs.along_line_dir(&plane, 5, 2, Axis::Horizontal, 0, -1), 52);
        // Left edge walking left: nearest
        assert_eq!(rs.along_line_dir(&plane, 0, 2, Axis::Horizontal, 2, -1), plane.get(0, 2));
    }

    #[test]
    fn test_flat_skip() {
        let mut plane: Plane<u16> = Plane::filled(8, 8, 500);
        plane.set(2, 4, 900);
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let rs = Resampler::new(&table, SampleRange::new(0.0, 1023.0)).with_flat_skip(true);
        // Flat 2x2 at (4,4): floor value returned untouched
        assert_eq!(rs.sample(&plane, 4, 4, 32, 32), 500);
        // Spike at (2,4) is among the cubic taps of (3,4) but not in its 2x2
        assert_eq!(rs.sample(&plane, 3, 4, 32, 32), 500);
        let plain = Resampler::new(&table, SampleRange::new(0.0, 1023.0));
        assert_ne!(plain.sample(&plane, 3, 4, 32, 32), 500);
    }
}
