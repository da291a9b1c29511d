//! Planar frame buffers.
//!
//! This module provides the containers filters read from and write to:
//! - [`Plane`] - One channel of raster data with its own size and stride
//! - [`Frame`] - All planes of one video frame plus its [`VideoFormat`]
//! - [`AnyFrame`] - A frame whose sample type is only known at runtime
//!
//! # Memory Layout
//!
//! Planes store samples in **row-major** order with a stride measured in
//! samples (not bytes). Rows may be padded:
//!
//! ```text
//! [s s s s s s . .]  ← row 0 (width 6, stride 8)
//! [s s s s s s . .]  ← row 1
//! ```
//!
//! # Copy-on-write
//!
//! Sample buffers live in an [`Arc<Vec<T>>`], so cloning a frame is cheap.
//! A filter that passes a frame through unchanged returns a clone; a filter
//! that modifies one clones its background and writes into it, which copies
//! each plane once on first write.
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{Frame, VideoFormat};
//!
//! let mut frame: Frame<u8> = Frame::new(VideoFormat::yuv420p8(), 64, 48).unwrap();
//! frame.plane_mut(0).fill(100);
//! frame.plane_mut(1).set(3, 4, 90);
//!
//! assert_eq!(frame.plane(0).get(10, 10), 100);
//! assert_eq!(frame.plane(1).width(), 32);
//! assert_eq!(frame.plane(1).get(3, 4), 90);
//! ```

use crate::{Error, Result, Sample, VideoFormat};
use std::sync::Arc;

/// One plane of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T: Sample> {
    /// Sample buffer (Arc for cheap cloning)
    data: Arc<Vec<T>>,
    /// Width in samples
    width: u32,
    /// Height in rows
    height: u32,
    /// Samples per row including padding
    stride: usize,
}

impl<T: Sample> Plane<T> {
    /// Creates a zero-filled plane with `stride == width`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Creates a plane filled with `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let len = width as usize * height as usize;
        Self {
            data: Arc::new(vec![value; len]),
            width,
            height,
            stride: width as usize,
        }
    }

    /// Wraps a host buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `stride < width`
    /// - [`Error::InvalidDimensions`] if the buffer is empty or too short
    ///
    /// # Example
    ///
    /// ```rust
    /// use warpfx_core::Plane;
    ///
    /// // 3x2 plane with one padding sample per row
    /// let plane = Plane::from_data(3, 2, 4, vec![1u8, 2, 3, 0, 4, 5, 6, 0]).unwrap();
    /// assert_eq!(plane.get(2, 1), 6);
    /// ```
    pub fn from_data(width: u32, height: u32, stride: usize, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "empty plane"));
        }
        if stride < width as usize {
            return Err(Error::InvalidStride { stride, width });
        }
        let needed = stride * (height as usize - 1) + width as usize;
        if data.len() < needed {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected at least {} samples, got {}", needed, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            stride,
        })
    }

    /// Width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per row, padding included.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw sample buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable sample buffer (copy-on-write).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Whether `(x, y)` is inside the plane.
    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Buffer index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width as usize && y < self.height as usize, "sample out of bounds");
        self.data[self.index(x, y)]
    }

    /// Sample at `(x, y)`, or `None` outside the plane.
    #[inline]
    pub fn try_get(&self, x: isize, y: isize) -> Option<T> {
        if self.contains(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Writes the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width as usize && y < self.height as usize, "sample out of bounds");
        let idx = self.index(x, y);
        Arc::make_mut(&mut self.data)[idx] = value;
    }

    /// Fills every sample (padding included).
    pub fn fill(&mut self, value: T) {
        Arc::make_mut(&mut self.data).fill(value);
    }

    /// One row without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// One mutable row without padding.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.stride;
        let width = self.width as usize;
        &mut Arc::make_mut(&mut self.data)[start..start + width]
    }

    /// Applies `f` to every visible sample.
    pub fn map_samples(&mut self, f: impl Fn(T) -> T) {
        for y in 0..self.height as usize {
            for v in self.row_mut(y) {
                *v = f(*v);
            }
        }
    }
}

/// A video frame: planes plus their format.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T: Sample> {
    format: VideoFormat,
    width: u32,
    height: u32,
    planes: Vec<Plane<T>>,
}

impl<T: Sample> Frame<T> {
    /// Creates a zero-filled frame.
    ///
    /// # Errors
    ///
    /// Fails if the format is unsupported, its sample width does not match
    /// `T`, or the dimensions are empty or not divisible by the subsampling.
    pub fn new(format: VideoFormat, width: u32, height: u32) -> Result<Self> {
        check_frame(&format, width, height, T::BYTES)?;
        let planes = (0..format.num_planes())
            .map(|p| {
                let (w, h) = format.plane_size(p, width, height);
                Plane::new(w, h)
            })
            .collect();
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Creates a frame with every plane set to its [`black`](crate::PlaneFormat::black) value.
    pub fn black(format: VideoFormat, width: u32, height: u32) -> Result<Self> {
        let mut frame = Self::new(format, width, height)?;
        for (p, plane) in frame.planes.iter_mut().enumerate() {
            let pf = format.plane(p);
            plane.fill(T::from_f32(pf.black(), pf.range()));
        }
        Ok(frame)
    }

    /// Assembles a frame from host planes.
    ///
    /// # Errors
    ///
    /// Fails on format problems, a wrong plane count, or a plane whose size
    /// does not match the format's subsampling.
    pub fn from_planes(format: VideoFormat, planes: Vec<Plane<T>>) -> Result<Self> {
        if planes.len() != format.num_planes() {
            return Err(Error::PlaneCount {
                expected: format.num_planes(),
                got: planes.len(),
            });
        }
        let (width, height) = (planes[0].width(), planes[0].height());
        check_frame(&format, width, height, T::BYTES)?;
        for (p, plane) in planes.iter().enumerate() {
            let expected = format.plane_size(p, width, height);
            let got = (plane.width(), plane.height());
            if got != expected {
                return Err(Error::dimension_mismatch(expected, got));
            }
        }
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Frame format.
    #[inline]
    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Luma / full-resolution width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Luma / full-resolution height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of planes.
    #[inline]
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Plane `p`.
    #[inline]
    pub fn plane(&self, p: usize) -> &Plane<T> {
        &self.planes[p]
    }

    /// Mutable plane `p`.
    #[inline]
    pub fn plane_mut(&mut self, p: usize) -> &mut Plane<T> {
        &mut self.planes[p]
    }

    /// All planes.
    #[inline]
    pub fn planes(&self) -> &[Plane<T>] {
        &self.planes
    }

    /// All planes, mutable.
    #[inline]
    pub fn planes_mut(&mut self) -> &mut [Plane<T>] {
        &mut self.planes
    }

    /// Consumes the frame, returning its planes.
    pub fn into_planes(self) -> Vec<Plane<T>> {
        self.planes
    }
}

fn check_frame(format: &VideoFormat, width: u32, height: u32, bytes: usize) -> Result<()> {
    format.validate()?;
    if format.bytes_per_sample() != bytes {
        return Err(Error::unsupported_format(format!(
            "{format} stored in {bytes}-byte samples"
        )));
    }
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "empty frame"));
    }
    let mask_w = (1u32 << format.sub_sampling_w) - 1;
    let mask_h = (1u32 << format.sub_sampling_h) - 1;
    if width & mask_w != 0 || height & mask_h != 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            format!(
                "not divisible by subsampling {}x{}",
                1 << format.sub_sampling_w,
                1 << format.sub_sampling_h
            ),
        ));
    }
    Ok(())
}

/// A frame whose sample type is resolved at runtime.
///
/// Hosts that only learn the sample width from clip metadata wrap frames in
/// this enum; filters dispatch on it once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyFrame {
    /// 8-bit integer samples.
    U8(Frame<u8>),
    /// 9 to 16-bit integer samples.
    U16(Frame<u16>),
    /// 32-bit float samples.
    F32(Frame<f32>),
}

impl AnyFrame {
    /// Frame format.
    pub fn format(&self) -> VideoFormat {
        match self {
            Self::U8(f) => f.format(),
            Self::U16(f) => f.format(),
            Self::F32(f) => f.format(),
        }
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::U8(f) => f.dimensions(),
            Self::U16(f) => f.dimensions(),
            Self::F32(f) => f.dimensions(),
        }
    }

    /// Allocates a zero-filled frame with the storage type `format` needs.
    pub fn new(format: VideoFormat, width: u32, height: u32) -> Result<Self> {
        format.validate()?;
        Ok(match format.bytes_per_sample() {
            1 => Self::U8(Frame::new(format, width, height)?),
            2 => Self::U16(Frame::new(format, width, height)?),
            _ => Self::F32(Frame::new(format, width, height)?),
        })
    }
}

impl From<Frame<u8>> for AnyFrame {
    fn from(f: Frame<u8>) -> Self {
        Self::U8(f)
    }
}

impl From<Frame<u16>> for AnyFrame {
    fn from(f: Frame<u16>) -> Self {
        Self::U16(f)
    }
}

impl From<Frame<f32>> for AnyFrame {
    fn from(f: Frame<f32>) -> Self {
        Self::F32(f)
    }
}
