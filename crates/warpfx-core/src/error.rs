//! Error types for warpfx-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of building frames and
//! describing formats:
//! - Plane buffers that do not match their declared geometry
//! - Video formats the filters cannot process (half float, odd bit depths)
//! - Frames whose dimensions do not match a clip description
//!
//! None of these can occur while a filter renders a frame; they are raised
//! when the host hands buffers or clip metadata to the library.
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{Error, Result};
//!
//! fn check_plane(width: u32, height: u32) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "empty plane"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while describing formats and assembling frames.
///
/// # Categories
///
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`DimensionMismatch`](Error::DimensionMismatch), [`InvalidStride`](Error::InvalidStride)
/// - **Format errors**: [`UnsupportedFormat`](Error::UnsupportedFormat),
///   [`PlaneCount`](Error::PlaneCount)
#[derive(Debug, Error)]
pub enum Error {
    /// Plane or frame dimensions are unusable.
    ///
    /// Returned when width or height is zero, or when a sample buffer is
    /// shorter than `stride * (height - 1) + width`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Two frames or planes that must agree in size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First width
        a_width: u32,
        /// First height
        a_height: u32,
        /// Second width
        b_width: u32,
        /// Second height
        b_height: u32,
    },

    /// Stride (in samples) is smaller than the plane width.
    #[error("stride {stride} is less than width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Plane width
        width: u32,
    },

    /// Video format cannot be processed.
    ///
    /// Half float samples, integer depths outside 8..=16 bits and
    /// subsampled RGB are rejected.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },

    /// Number of planes handed over does not match the format.
    #[error("plane count mismatch: format has {expected}, got {got}")]
    PlaneCount {
        /// Planes the format declares
        expected: usize,
        /// Planes provided
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Returns `true` if this is a size-related error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. }
                | Self::DimensionMismatch { .. }
                | Self::InvalidStride { .. }
        )
    }

    /// Returns `true` if this is a format-related error.
    #[inline]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. } | Self::PlaneCount { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 50, "empty plane");
        let msg = err.to_string();
        assert!(msg.contains("0x50"));
        assert!(msg.contains("empty plane"));
        assert!(err.is_dimension_error());
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((640, 480), (320, 240));
        let msg = err.to_string();
        assert!(msg.contains("640x480"));
        assert!(msg.contains("320x240"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = Error::unsupported_format("half float");
        assert!(err.to_string().contains("half float"));
        assert!(err.is_format_error());
    }
}
