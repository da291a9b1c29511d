//! Four-fold symmetric replication of quadrant tables.
//!
//! A [`GeometryTable`] covers one quadrant. The [`Replicator`] visits every
//! entry and every distinct mirror image of its offset:
//!
//! ```text
//!        (-w,-h) | (+w,-h)
//!       ---------+---------      points with w == 0 or h == 0 lie on an
//!        (-w,+h) | (+w,+h)       axis and are visited once per image
//! ```
//!
//! The callback receives the entry and the [`Mirror`] signs, so it can walk
//! its source taps in the matching direction.
//!
//! # Subsampled planes
//!
//! On a plane subsampled by `(sw, sh)` only offsets aligned to the
//! subsampling grid are visited, and they are scaled down by the shifts.
//! The centre is given in frame coordinates and scaled the same way.

use crate::geometry::{Entry, GeometryTable};
use crate::schedule::Point;
use warpfx_core::{Plane, Sample};

/// Signs of one mirror image: `1` keeps an axis, `-1` flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mirror {
    /// Horizontal sign
    pub dx: isize,
    /// Vertical sign
    pub dy: isize,
}

const IMAGES: [Mirror; 4] = [
    Mirror { dx: 1, dy: 1 },
    Mirror { dx: -1, dy: 1 },
    Mirror { dx: 1, dy: -1 },
    Mirror { dx: -1, dy: -1 },
];

/// Fans quadrant offsets out around a centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replicator {
    cx: isize,
    cy: isize,
    sub_w: u32,
    sub_h: u32,
}

impl Replicator {
    /// Creates a replicator around frame coordinate `center` for a plane
    /// with subsampling shifts `subsampling`.
    pub fn new(center: Point, subsampling: (u32, u32)) -> Self {
        let (sub_w, sub_h) = subsampling;
        Self {
            cx: (center.x >> sub_w) as isize,
            cy: (center.y >> sub_h) as isize,
            sub_w,
            sub_h,
        }
    }

    /// Centre in plane coordinates.
    #[inline]
    pub fn center(&self) -> (isize, isize) {
        (self.cx, self.cy)
    }

    /// Subsampling shifts `(w, h)`.
    #[inline]
    pub fn subsampling(&self) -> (u32, u32) {
        (self.sub_w, self.sub_h)
    }

    /// Distinct mirror images of plane offset `(w, h)` as
    /// `(x, y, mirror)` plane coordinates.
    pub fn points(&self, w: usize, h: usize) -> impl Iterator<Item = (isize, isize, Mirror)> + '_ {
        let (w, h) = (w as isize, h as isize);
        IMAGES
            .iter()
            .filter(move |m| !(w == 0 && m.dx < 0) && !(h == 0 && m.dy < 0))
            .map(move |&m| (self.cx + m.dx * w, self.cy + m.dy * h, m))
    }

    /// Writes `value` at every image of plane offset `(w, h)` inside `dst`.
    pub fn paint<T: Sample>(&self, dst: &mut Plane<T>, w: usize, h: usize, value: T) {
        for (x, y, _) in self.points(w, h) {
            if dst.contains(x, y) {
                dst.set(x as usize, y as usize, value);
            }
        }
    }

    /// Applies `table` to `dst`.
    ///
    /// For every table entry and each of its mirror images inside `dst`,
    /// `f(entry, mirror)` is called and its value, if any, written.
    pub fn apply<T, F>(&self, dst: &mut Plane<T>, table: &GeometryTable, mut f: F)
    where
        T: Sample,
        F: FnMut(Entry, Mirror) -> Option<T>,
    {
        let mask_w = (1u32 << self.sub_w) - 1;
        let mask_h = (1u32 << self.sub_h) - 1;
        for (w, h, entry) in table.iter() {
            if w & mask_w != 0 || h & mask_h != 0 {
                continue;
            }
            let (pw, ph) = ((w >> self.sub_w) as usize, (h >> self.sub_h) as usize);
            for (x, y, mirror) in self.points(pw, ph) {
                if !dst.contains(x, y) {
                    continue;
                }
                if let Some(v) = f(entry, mirror) {
                    dst.set(x as usize, y as usize, v);
                }
            }
        }
    }
}
