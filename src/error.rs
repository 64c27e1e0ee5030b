//! Error types for Borde operations

use std::fmt;

use thiserror::Error;

use crate::Backend;

/// Result type for Borde operations
pub type Result<T> = std::result::Result<T, SobelError>;

/// Which of the two caller-owned buffers a size check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// Grayscale source image
    Input,
    /// Gradient-magnitude destination image
    Output,
}

impl fmt::Display for BufferRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferRole::Input => f.write_str("input"),
            BufferRole::Output => f.write_str("output"),
        }
    }
}

/// Errors that can occur during Borde operations
///
/// Every error is reported before the output buffer is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SobelError {
    /// Width or height is zero, or `width * height` does not fit in `usize`
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Buffer length differs from `width * height`
    #[error("Size mismatch for {buffer} buffer: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Buffer that failed the check
        buffer: BufferRole,
        /// Expected length (`width * height`)
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Required instruction set is not available on this processor
    #[error("Backend not supported on this platform: {0:?}")]
    UnsupportedBackend(Backend),

    /// Building a dedicated worker pool failed
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl SobelError {
    /// True for caller contract violations (bad dimensions or buffer sizes)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SobelError::InvalidDimensions { .. } | SobelError::SizeMismatch { .. }
        )
    }
}
