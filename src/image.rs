//! Grayscale image buffers
//!
//! The kernel entry points work on caller-owned flat row-major byte slices;
//! [`validate_buffers`] is the contract check they all run first.
//! [`GrayImage`] is an owned convenience wrapper for callers that do not
//! manage buffers themselves.
//!
//! # Example
//!
//! ```
//! use borde::{GrayImage, Variant};
//!
//! let image = GrayImage::from_vec(3, 3, vec![0, 0, 255, 0, 0, 255, 0, 0, 255]).unwrap();
//! let edges = image.sobel(Variant::Reference).unwrap();
//! assert_eq!(edges.get(1, 1), Some(255));
//! assert_eq!(edges.get(0, 0), Some(0));
//! ```

use crate::error::BufferRole;
use crate::{Result, SobelError, Variant};

/// Check dimensions and buffer lengths for a `width x height` call
///
/// Returns the pixel count on success.
///
/// # Errors
///
/// - [`SobelError::InvalidDimensions`] if either dimension is zero or the
///   pixel count overflows `usize`
/// - [`SobelError::SizeMismatch`] if a buffer is not `width * height` long
pub fn validate_buffers(input: &[u8], width: usize, height: usize, output: &[u8]) -> Result<usize> {
    let len = pixel_count(width, height)?;

    if input.len() != len {
        return Err(SobelError::SizeMismatch {
            buffer: BufferRole::Input,
            expected: len,
            actual: input.len(),
        });
    }

    if output.len() != len {
        return Err(SobelError::SizeMismatch {
            buffer: BufferRole::Output,
            expected: len,
            actual: output.len(),
        });
    }

    Ok(len)
}

fn pixel_count(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(SobelError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(SobelError::InvalidDimensions { width, height })
}

/// An 8-bit single-channel image with row-major storage
///
/// For a 3x2 image the data is stored as `[r0c0, r0c1, r0c2, r1c0, r1c1, r1c2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImage {
    /// All-black image
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap row-major `data`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero dimension and `SizeMismatch`
    /// if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let len = pixel_count(width, height)?;
        if data.len() != len {
            return Err(SobelError::SizeMismatch {
                buffer: BufferRole::Input,
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        (y < self.height).then(|| &self.data[y * self.width..(y + 1) * self.width])
    }

    /// Row-major pixel data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable row-major pixel data
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image, returning its row-major pixel data
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Gradient-magnitude image computed with `variant`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedBackend` if the variant needs AVX2 and the
    /// processor lacks it.
    pub fn sobel(&self, variant: Variant) -> Result<GrayImage> {
        let mut output = vec![0; self.data.len()];
        crate::apply_sobel(variant, &self.data, self.width, self.height, &mut output)?;
        Ok(GrayImage {
            width: self.width,
            height: self.height,
            data: output,
        })
    }
}
