use thiserror::Error;

/// Rejected configuration, reported by [`crate::PullLoaderOptions::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Row pitch must be finite and strictly positive; range math divides by it.
    #[error("row height must be a finite positive number, got {0}")]
    InvalidRowHeight(f64),

    #[error("refresh threshold must be a finite non-negative number, got {0}")]
    InvalidRefreshThreshold(f64),

    #[error("scroll threshold must be a finite number, got {0}")]
    InvalidScrollThreshold(f64),

    /// The easing's maximum draggable distance (typically the display height).
    #[error("maximum pull distance must be a finite positive number, got {0}")]
    InvalidMaxPullDistance(f64),
}
