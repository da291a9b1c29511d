//! Clip description.
//!
//! [`ClipInfo`] is the header a host passes when a filter is created: the
//! frame format, the frame size, and the number of frames. Filters validate
//! their parameters against it once and never look at it again.
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{ClipInfo, VideoFormat};
//!
//! let clip = ClipInfo::new(VideoFormat::yuv420p8(), 1920, 1080, 250);
//! assert_eq!(clip.last_frame(), 249);
//! assert_eq!(clip.center(), (960, 540));
//! assert!(clip.validate().is_ok());
//! ```

use crate::{Error, Frame, Result, Sample, VideoFormat};

/// Format, size and length of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipInfo {
    /// Frame format
    pub format: VideoFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Number of frames
    pub num_frames: u32,
}

impl ClipInfo {
    /// Creates a clip description.
    pub const fn new(format: VideoFormat, width: u32, height: u32, num_frames: u32) -> Self {
        Self {
            format,
            width,
            height,
            num_frames,
        }
    }

    /// Describes a clip from one of its frames.
    pub fn of_frame<T: Sample>(frame: &Frame<T>, num_frames: u32) -> Self {
        Self::new(frame.format(), frame.width(), frame.height(), num_frames)
    }

    /// Checks format, size and length.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported format, an empty frame size, a size the
    /// subsampling does not divide, or a clip without frames.
    pub fn validate(&self) -> Result<()> {
        self.format.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_dimensions(self.width, self.height, "empty frame"));
        }
        if self.width % (1 << self.format.sub_sampling_w) != 0
            || self.height % (1 << self.format.sub_sampling_h) != 0
        {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                "not divisible by chroma subsampling",
            ));
        }
        if self.num_frames == 0 {
            return Err(Error::invalid_dimensions(self.width, self.height, "clip has no frames"));
        }
        Ok(())
    }

    /// Index of the last frame.
    #[inline]
    pub fn last_frame(&self) -> u32 {
        self.num_frames.saturating_sub(1)
    }

    /// Frame centre, rounded down.
    #[inline]
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Smaller of width and height.
    #[inline]
    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Checks that `frame` has this clip's format and size.
    pub fn matches<T: Sample>(&self, frame: &Frame<T>) -> Result<()> {
        if frame.format() != self.format {
            return Err(Error::unsupported_format(format!(
                "frame is {}, clip is {}",
                frame.format(),
                self.format
            )));
        }
        if frame.dimensions() != (self.width, self.height) {
            return Err(Error::dimension_mismatch(
                (self.width, self.height),
                frame.dimensions(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ClipInfo::new(VideoFormat::rgb24(), 320, 240, 10).validate().is_ok());
        assert!(ClipInfo::new(VideoFormat::rgb24(), 0, 240, 10).validate().is_err());
        assert!(ClipInfo::new(VideoFormat::rgb24(), 320, 240, 0).validate().is_err());
        assert!(ClipInfo::new(VideoFormat::yuv420p8(), 321, 240, 10).validate().is_err());
    }

    #[test]
    fn test_matches() {
        let clip = ClipInfo::new(VideoFormat::gray8(), 16, 8, 1);
        let frame: Frame<u8> = Frame::new(VideoFormat::gray8(), 16, 8).unwrap();
        assert!(clip.matches(&frame).is_ok());

        let other: Frame<u8> = Frame::new(VideoFormat::gray8(), 8, 8).unwrap();
        assert!(clip.matches(&other).unwrap_err().is_dimension_error());

        let rgb: Frame<u8> = Frame::new(VideoFormat::rgb24(), 16, 8).unwrap();
        assert!(clip.matches(&rgb).unwrap_err().is_format_error());
    }

    #[test]
    fn test_helpers() {
        let clip = ClipInfo::new(VideoFormat::rgb24(), 101, 60, 1);
        assert_eq!(clip.last_frame(), 0);
        assert_eq!(clip.center(), (50, 30));
        assert_eq!(clip.min_dimension(), 60);
    }
}
