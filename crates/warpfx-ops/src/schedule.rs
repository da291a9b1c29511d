//! Frame ranges and linearly scheduled parameters.
//!
//! Every filter is active over an inclusive [`FrameRange`] and returns its
//! source frame untouched outside it. Within the range, animated parameters
//! move linearly from a start value to an end value:
//!
//! ```text
//! value(n) = start + (end - start) * (n - sf) / (ef - sf + 1)
//! ```
//!
//! The denominator counts the frames of the range, so the last frame stops
//! one step short of `end`. Integer parameters use truncating integer
//! division, float parameters use float division.
//!
//! # Example
//!
//! ```rust
//! use warpfx_ops::{schedule, FrameRange, Point};
//!
//! let range = FrameRange::new(10, 19);
//! let radius = schedule(20i32, 40, range);
//! assert_eq!(radius.value_at(10), 20);
//! assert_eq!(radius.value_at(15), 30);
//! assert_eq!(radius.value_at(19), 38);
//!
//! let centre = schedule(Point::new(0, 100), Point::new(100, 0), range);
//! assert_eq!(centre.value_at(15), Point::new(50, 50));
//! ```

use crate::{OpsError, OpsResult};
use warpfx_core::ClipInfo;

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Inclusive range of frame indices.
///
/// `start <= end` always holds; the fields are private so that every range
/// goes through [`FrameRange::new`], [`FrameRange::resolve`] or a checked
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawFrameRange")
)]
pub struct FrameRange {
    start: u32,
    end: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFrameRange {
    start: u32,
    end: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFrameRange> for FrameRange {
    type Error = String;

    fn try_from(raw: RawFrameRange) -> Result<Self, Self::Error> {
        if raw.start > raw.end {
            return Err(format!("start frame {} is after end frame {}", raw.start, raw.end));
        }
        Ok(Self { start: raw.start, end: raw.end })
    }
}

impl FrameRange {
    /// Creates a range; `end` is raised to `start` if smaller.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// First active frame.
    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last active frame.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Range covering every frame of `clip`.
    pub fn whole(clip: &ClipInfo) -> Self {
        Self::new(0, clip.last_frame())
    }

    /// Resolves optional host arguments against a clip.
    ///
    /// Missing bounds default to the first and last frame of the clip.
    ///
    /// # Errors
    ///
    /// Fails when `start > end` or `end` is past the last frame.
    pub fn resolve(
        filter: &'static str,
        start: Option<u32>,
        end: Option<u32>,
        clip: &ClipInfo,
    ) -> OpsResult<Self> {
        let last = clip.last_frame();
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(last);
        if end > last {
            return Err(OpsError::config(
                filter,
                format!("end frame {end} is past the last frame {last}"),
            ));
        }
        if start > end {
            return Err(OpsError::config(
                filter,
                format!("start frame {start} is after end frame {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Whether frame `n` is active.
    #[inline]
    pub fn contains(&self, n: u32) -> bool {
        n >= self.start && n <= self.end
    }

    /// Number of frames in the range.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always `false`; a range holds at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Values that can be linearly scheduled.
pub trait Schedulable: Copy {
    /// `start + (end - start) * num / den`.
    fn interpolate(start: Self, end: Self, num: i64, den: i64) -> Self;
}

impl Schedulable for f32 {
    #[inline]
    fn interpolate(start: f32, end: f32, num: i64, den: i64) -> f32 {
        start + (end - start) * num as f32 / den as f32
    }
}

impl Schedulable for i32 {
    #[inline]
    fn interpolate(start: i32, end: i32, num: i64, den: i64) -> i32 {
        start + ((end as i64 - start as i64) * num / den) as i32
    }
}

impl Schedulable for Point {
    #[inline]
    fn interpolate(start: Point, end: Point, num: i64, den: i64) -> Point {
        Point::new(
            i32::interpolate(start.x, end.x, num, den),
            i32::interpolate(start.y, end.y, num, den),
        )
    }
}

/// A parameter moving linearly over a frame range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduled<T> {
    /// Value at the first frame
    pub start: T,
    /// Value approached at the last frame
    pub end: T,
    /// Active range
    pub range: FrameRange,
}

impl<T: Schedulable> Scheduled<T> {
    /// Creates a scheduled parameter.
    #[inline]
    pub fn new(start: T, end: T, range: FrameRange) -> Self {
        Self { start, end, range }
    }

    /// A parameter that does not move.
    #[inline]
    pub fn constant(value: T, range: FrameRange) -> Self {
        Self::new(value, value, range)
    }

    /// Value at frame `n`, with `n` clamped into the range.
    pub fn value_at(&self, n: u32) -> T {
        let n = n.clamp(self.range.start, self.range.end);
        T::interpolate(
            self.start,
            self.end,
            (n - self.range.start) as i64,
            self.range.len() as i64,
        )
    }
}

/// Shorthand for [`Scheduled::new`].
#[inline]
pub fn schedule<T: Schedulable>(start: T, end: T, range: FrameRange) -> Scheduled<T> {
    Scheduled::new(start, end, range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use warpfx_core::VideoFormat;

    #[test]
    fn test_contains() {
        let range = FrameRange::new(10, 20);
        assert!(!range.contains(9));
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
        assert_eq!(range.len(), 11);
    }

    #[test]
    fn test_float_schedule() {
        let p = schedule(2.0f32, 6.0, FrameRange::new(0, 3));
        assert_abs_diff_eq!(p.value_at(0), 2.0);
        assert_abs_diff_eq!(p.value_at(2), 4.0);
        assert_abs_diff_eq!(p.value_at(3), 5.0);
    }

    #[test]
    fn test_end_value_approached() {
        let p = schedule(0.0f32, 100.0, FrameRange::new(0, 999));
        assert_abs_diff_eq!(p.value_at(999), 100.0, epsilon = 0.2);
    }

    #[test]
    fn test_integer_truncates_toward_zero() {
        let range = FrameRange::new(0, 2);
        let down = schedule(10i32, 0, range);
        // 10 + (-10 * 1) / 3 = 10 - 3
        assert_eq!(down.value_at(1), 7);
        let up = schedule(0i32, 10, range);
        assert_eq!(up.value_at(1), 3);
    }

    #[test]
    fn test_single_frame_range() {
        let p = schedule(5i32, 50, FrameRange::new(7, 7));
        assert_eq!(p.value_at(7), 5);
    }

    #[test]
    fn test_value_clamped_outside_range() {
        let p = schedule(1.0f32, 2.0, FrameRange::new(10, 19));
        assert_abs_diff_eq!(p.value_at(0), 1.0);
        assert_abs_diff_eq!(p.value_at(100), p.value_at(19));
    }

    #[test]
    fn test_resolve() {
        let clip = ClipInfo::new(VideoFormat::rgb24(), 64, 64, 100);
        assert_eq!(
            FrameRange::resolve("Lens", None, None, &clip).unwrap(),
            FrameRange::new(0, 99)
        );
        assert_eq!(
            FrameRange::resolve("Lens", Some(5), None, &clip).unwrap(),
            FrameRange::new(5, 99)
        );
        assert!(FrameRange::resolve("Lens", Some(50), Some(10), &clip).is_err());
        assert!(FrameRange::resolve("Lens", None, Some(100), &clip).is_err());
    }

    #[test]
    fn test_new_orders_bounds() {
        let range = FrameRange::new(10, 5);
        assert_eq!(range, FrameRange::new(10, 10));
        assert_eq!((range.start(), range.end()), (10, 10));
        assert_eq!(range.len(), 1);
        let p = schedule(1.0f32, 2.0, range);
        assert_abs_diff_eq!(p.value_at(7), 1.0);
        assert_abs_diff_eq!(p.value_at(12), 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_bounds() {
        let ok: FrameRange = serde_json::from_str(r#"{"start":3,"end":8}"#).unwrap();
        assert_eq!(ok, FrameRange::new(3, 8));
        let inverted = serde_json::from_str::<FrameRange>(r#"{"start":10,"end":5}"#);
        assert!(inverted.is_err());
    }
}
