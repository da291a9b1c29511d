//! Quadrant geometry tables for radial warps.
//!
//! A [`GeometryTable`] records, for every destination offset `(w, h)` in one
//! quadrant of a mirror, where the shown pixel comes from. The mirror is
//! symmetric about both axes through its centre, so one quadrant describes
//! all four; [`Replicator`](crate::Replicator) fans the entries out.
//!
//! # Entries
//!
//! ```text
//!   h
//!   ^  . . . . . o o
//!   |  B B B . . o o       M = Mapped: source offset + quantiles
//!   |  M M B B . o o       B = Border: painted with the fill colour
//!   |  M M M B . o o       o = OutOfField: left untouched
//!   |  M M M B B . o       (. also OutOfField)
//!   +-----------------> w
//! ```
//!
//! A Mapped entry stores the floor of the source offset from the source
//! frame centre plus the quantized fractions. Source offsets always satisfy
//! `0 <= x < width/2` and `0 <= y < height/2`.
//!
//! # Example
//!
//! ```rust
//! use warpfx_ops::{Entry, GeometryParams, GeometryTable};
//!
//! let params = GeometryParams {
//!     width: 200,
//!     height: 200,
//!     ..GeometryParams::default()
//! };
//! let table = GeometryTable::build(&params, 1000, 1000).unwrap();
//! assert!(table.output_radius() <= 500);
//! assert_eq!(table.get(0, 0), Entry::Mapped { x: 0, y: 0, qx: 0, qy: 0 });
//! ```

use crate::{OpsError, OpsResult};
use glam::DVec2;
use tracing::debug;
use warpfx_math::{Projection, RadialMap};

/// Quantiles per unit used by geometry tables.
pub const GEOMETRY_QUANTILES: usize = 64;

/// Outline of a mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MirrorShape {
    /// Ellipse with the given half axes.
    #[default]
    Oval,
    /// Axis-aligned rectangle.
    Rectangle,
}

/// Inputs of a geometry table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeometryParams {
    /// Mirror outline
    pub shape: MirrorShape,
    /// Mirror width in pixels
    pub width: u32,
    /// Mirror height in pixels
    pub height: u32,
    /// Border width around the mirror in pixels
    pub border: u32,
    /// Fisheye mapping
    pub projection: Projection,
    /// Field of view in degrees
    pub fov: f64,
    /// Convexity, 1.0 is flat
    pub convexity: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            shape: MirrorShape::Oval,
            width: 100,
            height: 100,
            border: 5,
            projection: Projection::Equidistant,
            fov: 120.0,
            convexity: 1.15,
        }
    }
}

impl GeometryParams {
    /// Radius of the circle the projection is fitted to.
    ///
    /// Half the larger side for an oval, half the truncated diagonal for a
    /// rectangle. Both are taken from the full size, so odd sizes round once.
    pub fn mirror_radius(&self) -> u32 {
        match self.shape {
            MirrorShape::Oval => self.width.max(self.height) / 2,
            MirrorShape::Rectangle => {
                let (w, h) = (self.width as u64, self.height as u64);
                ((w * w + h * h) as f64).sqrt() as u32 / 2
            }
        }
    }

    /// Half axes `(a, b)` of the mirror outline.
    #[inline]
    pub fn half_axes(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// One quadrant table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    /// Shows the source pixel at offset `(x, y)` from the source centre,
    /// with fractional quantiles `(qx, qy)`.
    Mapped {
        /// Source column offset
        x: u32,
        /// Source row offset
        y: u32,
        /// Horizontal quantile
        qx: u16,
        /// Vertical quantile
        qy: u16,
    },
    /// Inside the mirror frame; painted with the fill colour.
    Border,
    /// Outside the mirror, or mapped outside the source frame.
    OutOfField,
}

/// Quadrant lookup table of a mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTable {
    side: u32,
    radius: u32,
    output_radius: u32,
    entries: Vec<Entry>,
}

impl GeometryTable {
    /// Builds the table for a `input_width` x `input_height` source.
    ///
    /// # Errors
    ///
    /// [`OpsError::Geometry`] if the source radius needed to fill the
    /// mirror reaches half the smaller frame dimension.
    pub fn build(params: &GeometryParams, input_width: u32, input_height: u32) -> OpsResult<Self> {
        const FILTER: &str = "GeometryTable";

        let radius = params.mirror_radius();
        if radius == 0 {
            return Err(OpsError::geometry(FILTER, "mirror has zero size"));
        }
        let map = RadialMap::new(params.projection, radius as f64, params.fov, params.convexity);
        let output_radius = map.source_radius(radius as f64).floor();
        let limit = input_width.min(input_height) / 2;
        if !output_radius.is_finite() || output_radius >= limit as f64 {
            return Err(OpsError::geometry(
                FILTER,
                format!("mirror needs source radius {output_radius}, frame allows {limit}"),
            ));
        }
        let output_radius = output_radius as u32;

        let side = radius + params.border;
        let (half_iw, half_ih) = (input_width / 2, input_height / 2);
        let mut entries = Vec::with_capacity(side as usize * side as usize);
        for h in 0..side {
            for w in 0..side {
                let entry = match classify(params, w, h) {
                    Zone::Mirror => map_source(&map, w, h, half_iw, half_ih),
                    Zone::Border => Entry::Border,
                    Zone::Outside => Entry::OutOfField,
                };
                entries.push(entry);
            }
        }

        let table = Self {
            side,
            radius,
            output_radius,
            entries,
        };
        debug!(
            side,
            radius,
            output_radius,
            mapped = table.count(|e| matches!(e, Entry::Mapped { .. })),
            border = table.count(|e| matches!(e, Entry::Border)),
            "Built geometry table"
        );
        Ok(table)
    }

    /// Side of the square quadrant (mirror radius plus border).
    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Radius the projection is fitted to.
    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Largest source offset the mirror shows.
    #[inline]
    pub fn output_radius(&self) -> u32 {
        self.output_radius
    }

    /// Entry at quadrant offset `(w, h)`; OutOfField beyond the table.
    #[inline]
    pub fn get(&self, w: u32, h: u32) -> Entry {
        if w >= self.side || h >= self.side {
            return Entry::OutOfField;
        }
        self.entries[(h * self.side + w) as usize]
    }

    /// Iterates `(w, h, entry)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Entry)> + '_ {
        let side = self.side;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, &e)| (i as u32 % side, i as u32 / side, e))
    }

    /// Number of entries matching `pred`.
    pub fn count(&self, pred: impl Fn(&Entry) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }
}

enum Zone {
    Mirror,
    Border,
    Outside,
}

fn classify(params: &GeometryParams, w: u32, h: u32) -> Zone {
    let (a, b) = params.half_axes();
    let (a, b, bw) = (a as u64, b as u64, params.border as u64);
    let (w, h) = (w as u64, h as u64);
    match params.shape {
        MirrorShape::Oval => {
            let inside = |a: u64, b: u64| w * w * b * b + h * h * a * a <= a * a * b * b;
            if inside(a, b) {
                Zone::Mirror
            } else if inside(a + bw, b + bw) {
                Zone::Border
            } else {
                Zone::Outside
            }
        }
        MirrorShape::Rectangle => {
            if w <= a && h <= b {
                Zone::Mirror
            } else if w <= a + bw && h <= b + bw {
                Zone::Border
            } else {
                Zone::Outside
            }
        }
    }
}

fn map_source(map: &RadialMap, w: u32, h: u32, half_iw: u32, half_ih: u32) -> Entry {
    let s = map.source_offset(DVec2::new(w as f64, h as f64));
    let (fx, fy) = (s.x.floor(), s.y.floor());
    if fx < 0.0 || fy < 0.0 || fx >= half_iw as f64 || fy >= half_ih as f64 {
        return Entry::OutOfField;
    }
    let quantize = |frac: f64| {
        ((frac * GEOMETRY_QUANTILES as f64) as u16).min(GEOMETRY_QUANTILES as u16)
    };
    Entry::Mapped {
        x: fx as u32,
        y: fy as u32,
        qx: quantize(s.x - fx),
        qy: quantize(s.y - fy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_mirror(radius: u32) -> GeometryParams {
        GeometryParams {
            width: 2 * radius,
            height: 2 * radius,
            ..GeometryParams::default()
        }
    }

    #[test]
    fn test_reference_mirror() {
        let table = GeometryTable::build(&round_mirror(100), 1000, 1000).unwrap();
        assert_eq!(table.side(), 105);
        assert!(table.output_radius() <= 500);
        assert!(table.output_radius() > 100);
        assert_eq!(table.get(0, 0), Entry::Mapped { x: 0, y: 0, qx: 0, qy: 0 });
    }

    #[test]
    fn test_mapped_entries_in_half_frame() {
        let table = GeometryTable::build(&round_mirror(100), 640, 480).unwrap();
        for (_, _, e) in table.iter() {
            if let Entry::Mapped { x, y, qx, qy } = e {
                assert!(x < 320 && y < 240);
                assert!(qx < 64 && qy < 64);
            }
        }
    }

    #[test]
    fn test_zones() {
        let table = GeometryTable::build(&round_mirror(100), 1000, 1000).unwrap();
        assert!(matches!(table.get(100, 0), Entry::Mapped { .. }));
        assert_eq!(table.get(103, 0), Entry::Border);
        assert_eq!(table.get(104, 104), Entry::OutOfField);
        assert_eq!(table.get(500, 0), Entry::OutOfField);
        assert!(table.count(|e| *e == Entry::Border) > 0);
    }

    #[test]
    fn test_oval_axes() {
        let params = GeometryParams {
            width: 160,
            height: 80,
            border: 3,
            ..GeometryParams::default()
        };
        let table = GeometryTable::build(&params, 800, 800).unwrap();
        assert_eq!(table.radius(), 80);
        assert!(matches!(table.get(80, 0), Entry::Mapped { .. }));
        assert!(matches!(table.get(0, 40), Entry::Mapped { .. }));
        assert_eq!(table.get(0, 42), Entry::Border);
        assert_eq!(table.get(0, 44), Entry::OutOfField);
    }

    #[test]
    fn test_rectangle() {
        let params = GeometryParams {
            shape: MirrorShape::Rectangle,
            width: 60,
            height: 80,
            border: 2,
            ..GeometryParams::default()
        };
        assert_eq!(params.mirror_radius(), 50);
        let table = GeometryTable::build(&params, 800, 800).unwrap();
        assert!(matches!(table.get(30, 40), Entry::Mapped { .. }));
        assert_eq!(table.get(32, 40), Entry::Border);
        assert_eq!(table.get(33, 10), Entry::OutOfField);
    }

    #[test]
    fn test_odd_sizes_round_once() {
        // sqrt(40² + 45²) = 60.2, so the radius is 30 rather than the 29
        // that halving each side first would give
        let rect = GeometryParams {
            shape: MirrorShape::Rectangle,
            width: 40,
            height: 45,
            ..GeometryParams::default()
        };
        assert_eq!(rect.mirror_radius(), 30);
        assert_eq!(rect.half_axes(), (20, 22));

        let oval = GeometryParams {
            width: 81,
            height: 60,
            ..GeometryParams::default()
        };
        assert_eq!(oval.mirror_radius(), 40);
    }

    #[test]
    fn test_deterministic() {
        let params = round_mirror(60);
        let a = GeometryTable::build(&params, 500, 400).unwrap();
        let b = GeometryTable::build(&params, 500, 400).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_wide_is_geometry_error() {
        let params = GeometryParams {
            projection: Projection::Orthographic,
            fov: 170.0,
            convexity: 1.0,
            ..round_mirror(100)
        };
        let err = GeometryTable::build(&params, 1000, 1000).unwrap_err();
        assert!(err.is_geometry());
    }

    #[test]
    fn test_monotonic_along_axis() {
        let table = GeometryTable::build(&round_mirror(80), 1000, 1000).unwrap();
        let mut last = 0;
        for w in 0..=80 {
            if let Entry::Mapped { x, .. } = table.get(w, 0) {
                assert!(x >= last);
                last = x;
            }
        }
        assert!(last > 80);
    }
}
