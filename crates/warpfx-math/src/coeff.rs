//! Quantized interpolation coefficient tables.
//!
//! Geometric filters never evaluate a kernel per pixel. Instead the unit
//! interval between two samples is divided into `Q` quantiles and the kernel
//! weights for each quantile are computed once, when the filter is created.
//! A fractional source coordinate `x + f` then selects row `floor(f * Q)`.
//!
//! # Layout
//!
//! A table has `Q + 1` rows of `span` weights. Tap `i` of a row applies to
//! the sample at offset [`CoefficientTable::first_offset`]` + i` from the
//! floor sample:
//!
//! ```text
//! kernel     span  offsets
//! Nearest      1   0
//! Linear       2   0 +1
//! Cubic        4   -1 0 +1 +2
//! Lanczos4     4   -1 0 +1 +2
//! Lanczos6     6   -2 -1 0 +1 +2 +3
//! ```
//!
//! Row 0 reproduces the floor sample exactly and row `Q` reproduces the next
//! sample exactly (except for `Nearest`, whose single tap is always the
//! floor sample). Every row sums to 1.
//!
//! # Example
//!
//! ```rust
//! use warpfx_math::{CoefficientTable, Kernel};
//!
//! let table = CoefficientTable::build(Kernel::Cubic, 64);
//! assert_eq!(table.span(), 4);
//! assert_eq!(table.row(0), &[0.0, 1.0, 0.0, 0.0]);
//! assert_eq!(table.row(64), &[0.0, 0.0, 1.0, 0.0]);
//!
//! let mid = table.row(32);
//! assert_eq!(mid[1], mid[2]);
//! ```

use crate::interp::lanczos;

/// Interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kernel {
    /// Floor sample, no interpolation.
    Nearest,
    /// Two-tap linear.
    Linear,
    /// Four-tap Catmull-Rom cubic.
    #[default]
    Cubic,
    /// Four-tap Lanczos (a = 2).
    Lanczos4,
    /// Six-tap Lanczos (a = 3).
    Lanczos6,
}

impl Kernel {
    /// Number of taps per axis.
    #[inline]
    pub const fn span(&self) -> usize {
        match self {
            Self::Nearest => 1,
            Self::Linear => 2,
            Self::Cubic | Self::Lanczos4 => 4,
            Self::Lanczos6 => 6,
        }
    }

    /// Kernel for a 1-based method number (1 nearest .. 5 lanczos-6).
    pub fn from_method(method: u32) -> Option<Self> {
        match method {
            1 => Some(Self::Nearest),
            2 => Some(Self::Linear),
            3 => Some(Self::Cubic),
            4 => Some(Self::Lanczos4),
            5 => Some(Self::Lanczos6),
            _ => None,
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::Lanczos4 => "lanczos4",
            Self::Lanczos6 => "lanczos6",
        }
    }
}

/// Quantized weights for one kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    kernel: Kernel,
    quantiles: usize,
    span: usize,
    /// `(quantiles + 1) * span` weights, row-major
    weights: Vec<f32>,
}

impl CoefficientTable {
    /// Builds the table for `kernel` with `quantiles` steps per unit.
    ///
    /// `quantiles == 0` is treated as 1.
    pub fn build(kernel: Kernel, quantiles: usize) -> Self {
        let quantiles = quantiles.max(1);
        let span = kernel.span();
        let mut weights = Vec::with_capacity((quantiles + 1) * span);
        let mut row = vec![0.0f64; span];

        for q in 0..=quantiles {
            let x = q as f64 / quantiles as f64;
            match kernel {
                Kernel::Nearest => row[0] = 1.0,
                Kernel::Linear => {
                    row[0] = 1.0 - x;
                    row[1] = x;
                }
                Kernel::Cubic => {
                    let (x2, x3) = (x * x, x * x * x);
                    row[0] = -x + 2.0 * x2 - x3;
                    row[1] = 2.0 - 5.0 * x2 + 3.0 * x3;
                    row[2] = x + 4.0 * x2 - 3.0 * x3;
                    row[3] = -x2 + x3;
                }
                Kernel::Lanczos4 | Kernel::Lanczos6 => lanczos_row(&mut row, q, quantiles),
            }
            normalize(&mut row);
            weights.extend(row.iter().map(|&w| w as f32));
        }

        Self {
            kernel,
            quantiles,
            span,
            weights,
        }
    }

    /// Kernel this table was built for.
    #[inline]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Number of quantiles `Q` (rows are `0..=Q`).
    #[inline]
    pub fn quantiles(&self) -> usize {
        self.quantiles
    }

    /// Taps per axis.
    #[inline]
    pub fn span(&self) -> usize {
        self.span
    }

    /// Offset of tap 0 relative to the floor sample.
    #[inline]
    pub fn first_offset(&self) -> isize {
        if self.span == 1 {
            0
        } else {
            1 - (self.span / 2) as isize
        }
    }

    /// Offset of the last tap relative to the floor sample.
    #[inline]
    pub fn last_offset(&self) -> isize {
        self.first_offset() + self.span as isize - 1
    }

    /// Weights for quantile `q`.
    ///
    /// # Panics
    ///
    /// Panics if `q > quantiles()`.
    #[inline]
    pub fn row(&self, q: usize) -> &[f32] {
        let start = q * self.span;
        &self.weights[start..start + self.span]
    }

    /// Quantile of a fractional part in `[0, 1]`: `floor(frac * Q)`.
    #[inline]
    pub fn quantize(&self, frac: f32) -> usize {
        ((frac.max(0.0) * self.quantiles as f32) as usize).min(self.quantiles)
    }
}

fn lanczos_row(row: &mut [f64], q: usize, quantiles: usize) {
    let half = row.len() / 2;
    row.fill(0.0);
    if q == 0 {
        row[half - 1] = 1.0;
        return;
    }
    if q == quantiles {
        row[half] = 1.0;
        return;
    }
    let frac = q as f64 / quantiles as f64;
    for (i, w) in row.iter_mut().enumerate() {
        let d = (half as f64 - 1.0) - i as f64 + frac;
        *w = lanczos(d, half as f64);
    }
}

fn normalize(row: &mut [f64]) {
    let sum: f64 = row.iter().sum();
    if sum.abs() > 1e-12 {
        for w in row.iter_mut() {
            *w /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Kernel; 5] = [
        Kernel::Nearest,
        Kernel::Linear,
        Kernel::Cubic,
        Kernel::Lanczos4,
        Kernel::Lanczos6,
    ];

    #[test]
    fn test_rows_sum_to_one() {
        for kernel in ALL {
            for quantiles in [1, 4, 16, 64] {
                let table = CoefficientTable::build(kernel, quantiles);
                for q in 0..=quantiles {
                    let sum: f32 = table.row(q).iter().sum();
                    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_anchor_rows_are_one_hot() {
        for kernel in [Kernel::Linear, Kernel::Cubic, Kernel::Lanczos4, Kernel::Lanczos6] {
            let table = CoefficientTable::build(kernel, 64);
            let floor_tap = (-table.first_offset()) as usize;
            for (i, &w) in table.row(0).iter().enumerate() {
                let expected = if i == floor_tap { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(w, expected, epsilon = 1e-6);
            }
            for (i, &w) in table.row(64).iter().enumerate() {
                let expected = if i == floor_tap + 1 { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(w, expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_cubic_midpoint_symmetric() {
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        let row = table.row(32);
        assert_eq!(row[1], row[2]);
        assert_eq!(row[0], row[3]);
        assert_abs_diff_eq!(row[1], 0.5625, epsilon = 1e-6);
        assert_abs_diff_eq!(row[0], -0.0625, epsilon = 1e-6);
    }

    #[test]
    fn test_lanczos_midpoint_symmetric() {
        for kernel in [Kernel::Lanczos4, Kernel::Lanczos6] {
            let table = CoefficientTable::build(kernel, 64);
            let row = table.row(32);
            let n = row.len();
            for i in 0..n / 2 {
                assert_abs_diff_eq!(row[i], row[n - 1 - i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_linear_weights() {
        let table = CoefficientTable::build(Kernel::Linear, 4);
        assert_eq!(table.row(1), &[0.75, 0.25]);
        assert_eq!(table.row(2), &[0.5, 0.5]);
    }

    #[test]
    fn test_nearest() {
        let table = CoefficientTable::build(Kernel::Nearest, 8);
        assert_eq!(table.span(), 1);
        assert_eq!(table.first_offset(), 0);
        assert_eq!(table.row(5), &[1.0]);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(CoefficientTable::build(Kernel::Linear, 4).first_offset(), 0);
        assert_eq!(CoefficientTable::build(Kernel::Cubic, 4).first_offset(), -1);
        let l6 = CoefficientTable::build(Kernel::Lanczos6, 4);
        assert_eq!(l6.first_offset(), -2);
        assert_eq!(l6.last_offset(), 3);
    }

    #[test]
    fn test_zero_quantiles_clamped() {
        let table = CoefficientTable::build(Kernel::Linear, 0);
        assert_eq!(table.quantiles(), 1);
        assert_eq!(table.row(1), &[0.0, 1.0]);
    }

    #[test]
    fn test_quantize() {
        let table = CoefficientTable::build(Kernel::Cubic, 64);
        assert_eq!(table.quantize(0.0), 0);
        assert_eq!(table.quantize(0.5), 32);
        assert_eq!(table.quantize(0.999), 63);
        assert_eq!(table.quantize(1.0), 64);
        assert_eq!(table.quantize(-0.1), 0);
    }

    #[test]
    fn test_from_method() {
        assert_eq!(Kernel::from_method(3), Some(Kernel::Cubic));
        assert_eq!(Kernel::from_method(0), None);
        assert_eq!(Kernel::from_method(6), None);
    }
}
