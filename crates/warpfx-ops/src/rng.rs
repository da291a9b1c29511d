//! Deterministic per-frame random numbers.
//!
//! Procedural filters need noise that is identical every time a frame is
//! rendered, no matter which thread renders it or in what order. A
//! [`FrameRng`] is a [`StdRng`] seeded from the frame index and a
//! caller-chosen stream number; it holds no shared state.
//!
//! It implements [`RngCore`], so the whole [`rand::Rng`] API is available
//! on top of the convenience methods below.
//!
//! # Example
//!
//! ```rust
//! use warpfx_ops::FrameRng;
//!
//! let mut a = FrameRng::new(42, 7);
//! let mut b = FrameRng::new(42, 7);
//! assert_eq!(a.next_u64(), b.next_u64());
//!
//! let x = a.range(10, 20);
//! assert!((10..20).contains(&x));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Random generator keyed by `(frame, stream)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRng {
    inner: StdRng,
}

impl FrameRng {
    /// Creates the generator for `frame` and `stream`.
    ///
    /// Both halves of the key go into the seed verbatim, so distinct keys
    /// never share a sequence.
    pub fn new(frame: u32, stream: u64) -> Self {
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        seed[..4].copy_from_slice(&frame.to_le_bytes());
        seed[4..12].copy_from_slice(&stream.to_le_bytes());
        Self { inner: StdRng::from_seed(seed) }
    }

    /// Next 64 random bits.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.inner.r#gen::<f32>()
    }

    /// Uniform integer in `[lo, hi)`; `lo` when the range is empty.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Uniform float in `[lo, hi)`; `lo` when the range is empty.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if lo.is_nan() || hi.is_nan() || hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }
}

impl RngCore for FrameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
