//! Error types for filter construction.
//!
//! Every check happens when a filter is created. Once a filter exists,
//! rendering a frame cannot fail.

use thiserror::Error;

/// Error type for filter construction.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A parameter is outside its legal range or inconsistent with the clip.
    #[error("{filter}: {message}")]
    Configuration {
        /// Filter name
        filter: &'static str,
        /// What is wrong
        message: String,
    },

    /// The requested geometry does not fit the frame.
    #[error("{filter}: geometry error: {message}")]
    Geometry {
        /// Filter name
        filter: &'static str,
        /// What is wrong
        message: String,
    },

    /// The clip format or frame layout is unusable.
    #[error("{filter}: {source}")]
    Format {
        /// Filter name
        filter: &'static str,
        /// Underlying clip error
        #[source]
        source: warpfx_core::Error,
    },
}

impl OpsError {
    /// Creates an [`OpsError::Configuration`] error.
    pub fn config(filter: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            filter,
            message: message.into(),
        }
    }

    /// Creates an [`OpsError::Geometry`] error.
    pub fn geometry(filter: &'static str, message: impl Into<String>) -> Self {
        Self::Geometry {
            filter,
            message: message.into(),
        }
    }

    /// Creates an [`OpsError::Format`] error.
    pub fn format(filter: &'static str, source: warpfx_core::Error) -> Self {
        Self::Format { filter, source }
    }

    /// Returns `true` for parameter errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` for geometry errors.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry { .. })
    }

    /// Returns `true` for clip format errors.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Result type for filter construction.
pub type OpsResult<T> = Result<T, OpsError>;

/// Fails with a configuration error unless `value` lies in `lo..=hi`.
pub(crate) fn check_range<T>(
    filter: &'static str,
    name: &str,
    value: T,
    lo: T,
    hi: T,
) -> OpsResult<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(OpsError::config(
            filter,
            format!("{name} = {value} is outside {lo}..={hi}"),
        ))
    }
}
