//! Radial lens projections.
//!
//! A fisheye lens of focal length `f` images a ray at angle `θ` from the
//! optical axis at radius `r = f * P(θ)`. This module provides the five
//! classic mapping functions and a [`RadialMap`] that turns a destination
//! radius on a curved mirror into the radius of the flat source pixel it
//! shows.
//!
//! | Projection     | `P(θ)`         | `P⁻¹(u)`          |
//! |----------------|----------------|-------------------|
//! | Rectilinear    | `tan θ`        | `atan u`          |
//! | Stereographic  | `2 tan(θ/2)`   | `2 atan(u/2)`     |
//! | Equidistant    | `θ`            | `u`               |
//! | Orthographic   | `sin θ`        | `asin(min(u,1))`  |
//! | Equisolid      | `2 sin(θ/2)`   | `2 asin(min(u/2,1))` |
//!
//! # Mirror model
//!
//! The mirror of radius `R` covers a field of view `fov`, so
//! `f = R / P(fov/2)`. A destination radius `rd` corresponds to the angle
//! `θ = P⁻¹(rd / f)`, which a flat (rectilinear) view would put at
//! `f * tan θ`. Convexity `c >= 1` compresses that further:
//!
//! ```text
//! rs(rd) = f * tan(θ)^(1/c)
//! ```
//!
//! # Example
//!
//! ```rust
//! use warpfx_math::{Projection, RadialMap};
//!
//! let map = RadialMap::new(Projection::Rectilinear, 100.0, 90.0, 1.0);
//! // Rectilinear with no convexity is the identity
//! assert!((map.source_radius(42.0) - 42.0).abs() < 1e-9);
//! ```

use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

/// Largest angle a source ray may have; rays at 90° would be at infinity.
const MAX_THETA: f64 = FRAC_PI_2 - 1e-3;

/// Fisheye mapping function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// `r = f tan θ` (pinhole).
    Rectilinear,
    /// `r = 2f tan(θ/2)` (conformal).
    Stereographic,
    /// `r = f θ` (angle-linear).
    #[default]
    Equidistant,
    /// `r = f sin θ`.
    Orthographic,
    /// `r = 2f sin(θ/2)` (equal area).
    Equisolid,
}

impl Projection {
    /// Normalized image radius of a ray at `theta` radians.
    #[inline]
    pub fn forward(&self, theta: f64) -> f64 {
        match self {
            Self::Rectilinear => theta.tan(),
            Self::Stereographic => 2.0 * (theta / 2.0).tan(),
            Self::Equidistant => theta,
            Self::Orthographic => theta.sin(),
            Self::Equisolid => 2.0 * (theta / 2.0).sin(),
        }
    }

    /// Ray angle of normalized image radius `u`.
    #[inline]
    pub fn inverse(&self, u: f64) -> f64 {
        match self {
            Self::Rectilinear => u.atan(),
            Self::Stereographic => 2.0 * (u / 2.0).atan(),
            Self::Equidistant => u,
            Self::Orthographic => u.min(1.0).asin(),
            Self::Equisolid => 2.0 * (u / 2.0).min(1.0).asin(),
        }
    }

    /// Projection for a 1-based type number (1 rectilinear .. 5 equisolid).
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(Self::Rectilinear),
            2 => Some(Self::Stereographic),
            3 => Some(Self::Equidistant),
            4 => Some(Self::Orthographic),
            5 => Some(Self::Equisolid),
            _ => None,
        }
    }
}

/// Destination-to-source radius mapping of a convex mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialMap {
    projection: Projection,
    focal: f64,
    inv_convexity: f64,
}

impl RadialMap {
    /// Creates the mapping for a mirror of `radius` pixels showing
    /// `fov_degrees`, with convexity `convexity` (1 = none).
    pub fn new(projection: Projection, radius: f64, fov_degrees: f64, convexity: f64) -> Self {
        let theta_max = (fov_degrees.to_radians() / 2.0).min(MAX_THETA);
        let focal = radius / projection.forward(theta_max);
        Self {
            projection,
            focal,
            inv_convexity: 1.0 / convexity.max(1e-6),
        }
    }

    /// Projection in use.
    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Focal length in pixels.
    #[inline]
    pub fn focal(&self) -> f64 {
        self.focal
    }

    /// Source radius shown at destination radius `rd`.
    #[inline]
    pub fn source_radius(&self, rd: f64) -> f64 {
        let theta = self.projection.inverse(rd / self.focal).min(MAX_THETA);
        self.focal * theta.tan().powf(self.inv_convexity)
    }

    /// Source offset shown at destination offset `d` from the mirror centre.
    ///
    /// The centre maps to the centre.
    #[inline]
    pub fn source_offset(&self, d: DVec2) -> DVec2 {
        let rd = d.length();
        if rd == 0.0 {
            DVec2::ZERO
        } else {
            d * (self.source_radius(rd) / rd)
        }
    }
}
