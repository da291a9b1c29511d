//! Video and plane formats.
//!
//! This module describes how the host lays out a frame and what values a
//! plane may legally hold.
//!
//! # Types
//!
//! - [`VideoFormat`] - Frame-level format: colour family, sample type, bit
//!   depth, chroma subsampling
//! - [`PlaneFormat`] - Per-plane view of a [`VideoFormat`] with the plane's
//!   subsampling and clamp range resolved
//! - [`SampleRange`] - Inclusive value range used when writing interpolated
//!   samples
//!
//! # Value domains
//!
//! | Family  | Sample  | Plane     | Range                                   |
//! |---------|---------|-----------|-----------------------------------------|
//! | RGB/Gray| integer | any       | `0 ..= 2^bits - 1`                      |
//! | YUV     | integer | luma      | `16 << (bits-8) ..= 235 << (bits-8)`    |
//! | YUV     | integer | chroma    | `16 << (bits-8) ..= 240 << (bits-8)`    |
//! | RGB/Gray| float   | any       | `0.0 ..= 1.0`                           |
//! | YUV     | float   | luma      | `0.0 ..= 1.0`                           |
//! | YUV     | float   | chroma    | `-0.5 ..= 0.5`                          |
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::format::VideoFormat;
//!
//! let fmt = VideoFormat::yuv420p10();
//! let luma = fmt.plane(0);
//! let chroma = fmt.plane(1);
//!
//! assert_eq!(luma.range().min, 64.0);
//! assert_eq!(luma.range().max, 940.0);
//! assert_eq!(chroma.sub_sampling(), (1, 1));
//! assert_eq!(fmt.plane_size(1, 1920, 1080), (960, 540));
//! ```

use crate::{Error, Result};

/// Colour family of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorFamily {
    /// Three full-resolution planes R, G, B (in that plane order).
    #[default]
    Rgb,
    /// Luma plus two (possibly subsampled) chroma planes.
    Yuv,
    /// Single luma plane.
    Gray,
}

/// Numeric type of the stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleType {
    /// Unsigned integer samples (8 to 16 bits).
    #[default]
    Integer,
    /// 32-bit IEEE float samples.
    Float,
}

/// Frame-level format description.
///
/// Subsampling is expressed as shifts: a chroma plane of a frame `W` wide
/// is `W >> sub_sampling_w` wide. Shifts only apply to YUV planes 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoFormat {
    /// Colour family.
    pub color_family: ColorFamily,
    /// Sample storage type.
    pub sample_type: SampleType,
    /// Significant bits per sample (8..=16 for integer, 32 for float).
    pub bits_per_sample: u32,
    /// Horizontal chroma subsampling shift.
    pub sub_sampling_w: u32,
    /// Vertical chroma subsampling shift.
    pub sub_sampling_h: u32,
}

impl VideoFormat {
    /// Creates a format without validating it.
    ///
    /// Use [`validate`](Self::validate) before handing it to a filter.
    pub const fn new(
        color_family: ColorFamily,
        sample_type: SampleType,
        bits_per_sample: u32,
        sub_sampling_w: u32,
        sub_sampling_h: u32,
    ) -> Self {
        Self {
            color_family,
            sample_type,
            bits_per_sample,
            sub_sampling_w,
            sub_sampling_h,
        }
    }

    /// 8-bit gray.
    pub const fn gray8() -> Self {
        Self::new(ColorFamily::Gray, SampleType::Integer, 8, 0, 0)
    }

    /// 16-bit gray.
    pub const fn gray16() -> Self {
        Self::new(ColorFamily::Gray, SampleType::Integer, 16, 0, 0)
    }

    /// 8-bit planar RGB.
    pub const fn rgb24() -> Self {
        Self::new(ColorFamily::Rgb, SampleType::Integer, 8, 0, 0)
    }

    /// 16-bit planar RGB.
    pub const fn rgb48() -> Self {
        Self::new(ColorFamily::Rgb, SampleType::Integer, 16, 0, 0)
    }

    /// 32-bit float planar RGB.
    pub const fn rgbs() -> Self {
        Self::new(ColorFamily::Rgb, SampleType::Float, 32, 0, 0)
    }

    /// 8-bit YUV 4:2:0.
    pub const fn yuv420p8() -> Self {
        Self::new(ColorFamily::Yuv, SampleType::Integer, 8, 1, 1)
    }

    /// 10-bit YUV 4:2:0 (stored in 16-bit samples).
    pub const fn yuv420p10() -> Self {
        Self::new(ColorFamily::Yuv, SampleType::Integer, 10, 1, 1)
    }

    /// 8-bit YUV 4:2:2.
    pub const fn yuv422p8() -> Self {
        Self::new(ColorFamily::Yuv, SampleType::Integer, 8, 1, 0)
    }

    /// 8-bit YUV 4:4:4.
    pub const fn yuv444p8() -> Self {
        Self::new(ColorFamily::Yuv, SampleType::Integer, 8, 0, 0)
    }

    /// 32-bit float YUV 4:4:4.
    pub const fn yuv444ps() -> Self {
        Self::new(ColorFamily::Yuv, SampleType::Float, 32, 0, 0)
    }

    /// Checks that the filters can process this format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for half float, integer depths
    /// outside 8..=16, subsampled RGB/Gray and shifts above 2.
    pub fn validate(&self) -> Result<()> {
        match self.sample_type {
            SampleType::Integer if !(8..=16).contains(&self.bits_per_sample) => {
                return Err(Error::unsupported_format(format!(
                    "{}-bit integer samples",
                    self.bits_per_sample
                )));
            }
            SampleType::Float if self.bits_per_sample == 16 => {
                return Err(Error::unsupported_format("half float samples"));
            }
            SampleType::Float if self.bits_per_sample != 32 => {
                return Err(Error::unsupported_format(format!(
                    "{}-bit float samples",
                    self.bits_per_sample
                )));
            }
            _ => {}
        }

        let subsampled = self.sub_sampling_w > 0 || self.sub_sampling_h > 0;
        if subsampled && self.color_family != ColorFamily::Yuv {
            return Err(Error::unsupported_format(format!(
                "subsampled {:?}",
                self.color_family
            )));
        }
        if self.sub_sampling_w > 2 || self.sub_sampling_h > 2 {
            return Err(Error::unsupported_format(format!(
                "subsampling shift {}x{}",
                self.sub_sampling_w, self.sub_sampling_h
            )));
        }
        Ok(())
    }

    /// Number of planes (alpha is never part of a frame).
    #[inline]
    pub const fn num_planes(&self) -> usize {
        match self.color_family {
            ColorFamily::Gray => 1,
            ColorFamily::Rgb | ColorFamily::Yuv => 3,
        }
    }

    /// Storage width of one sample in bytes.
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        match self.sample_type {
            SampleType::Float => 4,
            SampleType::Integer if self.bits_per_sample <= 8 => 1,
            SampleType::Integer => 2,
        }
    }

    /// Whether samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self.sample_type, SampleType::Float)
    }

    /// Resolves the format of plane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_planes()`.
    pub fn plane(&self, index: usize) -> PlaneFormat {
        assert!(index < self.num_planes(), "plane {index} out of range");
        let chroma = self.color_family == ColorFamily::Yuv && index > 0;
        PlaneFormat {
            color_family: self.color_family,
            sample_type: self.sample_type,
            bits_per_sample: self.bits_per_sample,
            index,
            sub_sampling_w: if chroma { self.sub_sampling_w } else { 0 },
            sub_sampling_h: if chroma { self.sub_sampling_h } else { 0 },
        }
    }

    /// Iterates over the formats of all planes.
    pub fn planes(&self) -> impl Iterator<Item = PlaneFormat> + '_ {
        (0..self.num_planes()).map(|p| self.plane(p))
    }

    /// Dimensions of plane `index` for a frame of `width` x `height`.
    #[inline]
    pub fn plane_size(&self, index: usize, width: u32, height: u32) -> (u32, u32) {
        let plane = self.plane(index);
        (width >> plane.sub_sampling_w, height >> plane.sub_sampling_h)
    }
}

impl Default for VideoFormat {
    fn default() -> Self {
        Self::rgb24()
    }
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let family = match self.color_family {
            ColorFamily::Rgb => "rgb",
            ColorFamily::Yuv => "yuv",
            ColorFamily::Gray => "gray",
        };
        let kind = match self.sample_type {
            SampleType::Integer => "i",
            SampleType::Float => "f",
        };
        write!(f, "{family}{}{kind}", self.bits_per_sample)?;
        if self.color_family == ColorFamily::Yuv {
            write!(f, " ss{}x{}", self.sub_sampling_w, self.sub_sampling_h)?;
        }
        Ok(())
    }
}

/// Inclusive range of legal sample values, in the plane's native domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    /// Smallest legal value.
    pub min: f32,
    /// Largest legal value.
    pub max: f32,
}

impl SampleRange {
    /// Creates a range.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamps `v` into the range.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.max(self.min).min(self.max)
    }

    /// Whether `v` lies inside the range.
    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Format of a single plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneFormat {
    /// Colour family of the owning frame.
    pub color_family: ColorFamily,
    /// Sample storage type.
    pub sample_type: SampleType,
    /// Significant bits per sample.
    pub bits_per_sample: u32,
    /// Plane index within the frame.
    pub index: usize,
    /// Horizontal subsampling shift of this plane.
    pub sub_sampling_w: u32,
    /// Vertical subsampling shift of this plane.
    pub sub_sampling_h: u32,
}

impl PlaneFormat {
    /// Whether this is a YUV chroma plane.
    #[inline]
    pub const fn is_chroma(&self) -> bool {
        matches!(self.color_family, ColorFamily::Yuv) && self.index > 0
    }

    /// Whether this plane is smaller than the frame.
    #[inline]
    pub const fn is_subsampled(&self) -> bool {
        self.sub_sampling_w > 0 || self.sub_sampling_h > 0
    }

    /// Subsampling shifts as `(w, h)`.
    #[inline]
    pub const fn sub_sampling(&self) -> (u32, u32) {
        (self.sub_sampling_w, self.sub_sampling_h)
    }

    /// Whether frame coordinate `(x, y)` falls on this plane's sample grid.
    ///
    /// Full-resolution planes accept every coordinate.
    #[inline]
    pub const fn is_aligned(&self, x: usize, y: usize) -> bool {
        let mask_w = (1usize << self.sub_sampling_w) - 1;
        let mask_h = (1usize << self.sub_sampling_h) - 1;
        x & mask_w == 0 && y & mask_h == 0
    }

    #[inline]
    fn studio_shift(&self) -> u32 {
        self.bits_per_sample.saturating_sub(8)
    }

    /// Legal value range of this plane.
    pub fn range(&self) -> SampleRange {
        match (self.sample_type, self.color_family) {
            (SampleType::Float, ColorFamily::Yuv) if self.index > 0 => SampleRange::new(-0.5, 0.5),
            (SampleType::Float, _) => SampleRange::new(0.0, 1.0),
            (SampleType::Integer, ColorFamily::Yuv) => {
                let shift = self.studio_shift();
                let top = if self.index > 0 { 240u32 } else { 235u32 };
                SampleRange::new((16u32 << shift) as f32, (top << shift) as f32)
            }
            (SampleType::Integer, _) => {
                SampleRange::new(0.0, ((1u32 << self.bits_per_sample) - 1) as f32)
            }
        }
    }

    /// Native value of black on this plane.
    pub fn black(&self) -> f32 {
        match (self.sample_type, self.color_family) {
            (SampleType::Integer, ColorFamily::Yuv) if self.index > 0 => {
                (128u32 << self.studio_shift()) as f32
            }
            (SampleType::Integer, ColorFamily::Yuv) => (16u32 << self.studio_shift()) as f32,
            _ => 0.0,
        }
    }

    /// Native value of white on this plane.
    pub fn white(&self) -> f32 {
        match (self.sample_type, self.color_family) {
            (SampleType::Integer, ColorFamily::Yuv) if self.index > 0 => {
                (128u32 << self.studio_shift()) as f32
            }
            (SampleType::Float, ColorFamily::Yuv) if self.index > 0 => 0.0,
            _ => self.range().max,
        }
    }
}
