//! Scalar (non-SIMD) backend implementation
//!
//! This is the portable baseline that works on all platforms. With the
//! [`Euclidean`](crate::magnitude::Euclidean) policy it is the correctness
//! reference every vector kernel is validated against; with
//! [`AbsSum`](crate::magnitude::AbsSum) it finishes the rows of the
//! dual-lane kernel.

use std::marker::PhantomData;
use std::ops::Range;

use super::RowKernel;
use crate::kernel::gradient_at;
use crate::magnitude::MagnitudePolicy;

/// Scalar kernel (portable, no SIMD), one pixel per step
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel<M>(PhantomData<M>);

impl<M: MagnitudePolicy> ScalarKernel<M> {
    /// Compute the pixels `columns` of row `y` into `out_row`
    ///
    /// Used directly for whole rows and for the remainder a vector loop
    /// leaves behind.
    ///
    /// # Panics
    ///
    /// Panics if any column in `columns` is not interior.
    #[inline]
    pub fn convolve_span(
        input: &[u8],
        width: usize,
        y: usize,
        columns: Range<usize>,
        out_row: &mut [u8],
    ) {
        for x in columns {
            let (sum_x, sum_y) = gradient_at(input, width, x, y);
            out_row[x] = M::magnitude(sum_x, sum_y);
        }
    }
}

impl<M: MagnitudePolicy> RowKernel for ScalarKernel<M> {
    const LANES: usize = 1;
    type Magnitude = M;

    // SAFETY: This function is safe because:
    // 1. All slice accesses are bounds-checked by Rust indexing
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match RowKernel trait interface
    unsafe fn convolve_row(input: &[u8], width: usize, y: usize, out_row: &mut [u8]) {
        Self::convolve_span(input, width, y, 1..width - 1, out_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnitude::{AbsSum, Euclidean};

    /// Single bright column at x = 2 of a 5x5 image
    fn bright_column() -> Vec<u8> {
        (0..25).map(|i| if i % 5 == 2 { 255 } else { 0 }).collect()
    }

    #[test]
    fn test_scalar_bright_column_euclidean() {
        let input = bright_column();
        let mut out_row = [9u8; 5];
        unsafe {
            ScalarKernel::<Euclidean>::convolve_row(&input, 5, 2, &mut out_row);
        }
        // Columns 1 and 3 see |sumX| = 4 * 255, column 2 is symmetric
        assert_eq!(out_row, [9, 255, 0, 255, 9]);
    }

    #[test]
    fn test_scalar_span_only_touches_columns() {
        let input = bright_column();
        let mut out_row = [9u8; 5];
        ScalarKernel::<AbsSum>::convolve_span(&input, 5, 1, 2..3, &mut out_row);
        assert_eq!(out_row, [9, 9, 0, 9, 9]);
    }

    #[test]
    fn test_scalar_soft_gradient() {
        // Horizontal ramp of 10 per column: sumX = 4 * 20 = 80, sumY = 0
        let width = 6;
        let input: Vec<u8> = (0..width * 3).map(|i| (i % width * 10) as u8).collect();
        let mut exact = vec![0u8; width];
        let mut approx = vec![0u8; width];
        unsafe {
            ScalarKernel::<Euclidean>::convolve_row(&input, width, 1, &mut exact);
            ScalarKernel::<AbsSum>::convolve_row(&input, width, 1, &mut approx);
        }
        assert_eq!(&exact[1..width - 1], &[80, 80, 80, 80]);
        assert_eq!(exact, approx);
    }

    #[test]
    fn test_scalar_diagonal_policies_diverge() {
        // Diagonal edge: both gradients non-zero, abs-sum overestimates
        #[rustfmt::skip]
        let input = [
            0,  0,  0,
            0,  0, 40,
            0, 40, 40,
        ];
        let mut exact = [0u8; 3];
        let mut approx = [0u8; 3];
        unsafe {
            ScalarKernel::<Euclidean>::convolve_row(&input, 3, 1, &mut exact);
            ScalarKernel::<AbsSum>::convolve_row(&input, 3, 1, &mut approx);
        }
        // sumX = 2*40 + 40 = 120, sumY = 2*40 + 40 = 120
        assert_eq!(exact[1], 170);
        assert_eq!(approx[1], 240);
    }
}
