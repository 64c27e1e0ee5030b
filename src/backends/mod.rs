//! Row kernels for the different instruction sets
//!
//! Every backend fills the interior of one output row at a time; the border
//! and the row loop live in the drivers ([`convolve_image`] here and
//! [`crate::parallel`] for the multi-threaded path), so the widening and
//! saturation rules are written once per lane width.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The public
//! API checks the processor capability before any backend runs.
//!
//! # Backends
//!
//! - `scalar`: Portable per-pixel kernel, generic over the magnitude policy
//! - `avx2`: 16-lane exact and 32-lane dual-lane abs-sum kernels (x86_64)

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

use crate::border::{zero_border, zero_row_border};
use crate::magnitude::MagnitudePolicy;

/// Interior convolution of a single image row
///
/// # Safety
///
/// Implementations may use SIMD intrinsics. Callers must ensure:
/// - The instruction set the kernel targets is available
/// - `out_row.len() == width`, `width >= 3`
/// - `1 <= y` and rows `y - 1 ..= y + 1` lie inside `input`
pub trait RowKernel {
    /// Pixels produced per vector iteration (1 for scalar)
    const LANES: usize;

    /// Magnitude policy, also used for the scalar remainder of each row
    type Magnitude: MagnitudePolicy;

    /// Write `out_row[1..width - 1]` for image row `y`
    ///
    /// # Safety
    ///
    /// See the trait-level safety section.
    unsafe fn convolve_row(input: &[u8], width: usize, y: usize, out_row: &mut [u8]);
}

/// Border first, then every interior row top to bottom
///
/// # Safety
///
/// - The instruction set `K` targets must be available
/// - `input.len()` and `output.len()` must both equal `width * height`
pub(crate) unsafe fn convolve_image<K: RowKernel>(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) {
    zero_border(width, height, output);
    if width < 3 || height < 3 {
        return;
    }

    for (y, out_row) in output
        .chunks_exact_mut(width)
        .enumerate()
        .take(height - 1)
        .skip(1)
    {
        K::convolve_row(input, width, y, out_row);
    }
}

/// Border cells of row `y`, then its interior
///
/// # Safety
///
/// Same requirements as [`convolve_image`].
#[inline]
pub(crate) unsafe fn convolve_row_with_border<K: RowKernel>(
    input: &[u8],
    width: usize,
    height: usize,
    y: usize,
    out_row: &mut [u8],
) {
    if zero_row_border(y, height, out_row) {
        K::convolve_row(input, width, y, out_row);
    }
}

#[cfg(test)]
mod tests {
    use super::scalar::ScalarKernel;
    use super::*;
    use crate::magnitude::{AbsSum, Euclidean};

    #[test]
    fn test_convolve_image_row_driver_matches_whole_image() {
        let (width, height) = (9, 7);
        let input: Vec<u8> = (0..width * height).map(|i| (i * 37 % 251) as u8).collect();

        let mut whole = vec![7u8; width * height];
        let mut rows = vec![7u8; width * height];
        unsafe {
            convolve_image::<ScalarKernel<AbsSum>>(&input, width, height, &mut whole);
            for (y, row) in rows.chunks_exact_mut(width).enumerate() {
                convolve_row_with_border::<ScalarKernel<AbsSum>>(&input, width, height, y, row);
            }
        }

        assert_eq!(whole, rows);
    }

    #[test]
    fn test_convolve_image_degenerate() {
        for (width, height) in [(1, 1), (2, 9), (9, 2), (3, 1)] {
            let input = vec![255u8; width * height];
            let mut output = vec![1u8; width * height];
            unsafe {
                convolve_image::<ScalarKernel<Euclidean>>(&input, width, height, &mut output);
            }
            assert!(output.iter().all(|&v| v == 0), "{width}x{height}");
        }
    }
}
